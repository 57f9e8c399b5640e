/// The first non-blank line of `page_text`, trimmed. Empty when the page
/// has no text at all.
pub fn top_line(page_text: &str) -> &str {
    page_text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
}
