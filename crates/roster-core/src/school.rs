/// School name from the roster's top line: its second whitespace-separated
/// word. Purely positional, so multi-word names are cut to one word.
pub fn school_name(top_line: &str) -> Option<&str> {
    top_line.split_whitespace().nth(1)
}
