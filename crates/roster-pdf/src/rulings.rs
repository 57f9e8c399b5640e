//! Ruling geometry (drawn lines, rectangles, curves) of a page.
//!
//! `pdfplumber::Pdf` only hands back characters for a parsed page, so the
//! painted paths that ruled tables are made of are read here straight from
//! the page content stream. Path construction and the conversion to
//! top-left based shapes are pdfplumber's own `PathBuilder` and
//! `extract_shapes`; this module only drives them from the operators.

use lopdf::content::{Content, Operation};
use lopdf::{Document, ObjectId};
use pdfplumber::{Ctm, Curve, GraphicsState, Line, PathBuilder, Rect, extract_shapes};

#[derive(Debug, Default)]
pub(crate) struct Rulings {
    pub lines: Vec<Line>,
    pub rects: Vec<Rect>,
    pub curves: Vec<Curve>,
}

/// Collect the painted shapes of `page_id`. `page_height` flips PDF user
/// space (origin bottom-left) into pdfplumber's top-left coordinates.
pub(crate) fn page_rulings(
    doc: &Document,
    page_id: ObjectId,
    page_height: f64,
) -> Result<Rulings, lopdf::Error> {
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;
    Ok(rulings_from_operations(&content.operations, page_height))
}

pub(crate) fn rulings_from_operations(operations: &[Operation], page_height: f64) -> Rulings {
    let mut ctm = Ctm::identity();
    let mut gs = GraphicsState::default();
    let mut saved: Vec<(Ctm, GraphicsState)> = Vec::new();
    let mut path = PathBuilder::new(ctm);
    let mut out = Rulings::default();

    for op in operations {
        let n = |i: usize| -> Option<f64> {
            op.operands
                .get(i)
                .and_then(|o| o.as_float().ok())
                .map(f64::from)
        };

        let painted = match op.operator.as_str() {
            "q" => {
                saved.push((ctm, gs.clone()));
                None
            }
            "Q" => {
                if let Some((c, g)) = saved.pop() {
                    ctm = c;
                    gs = g;
                    path.set_ctm(ctm);
                }
                None
            }
            "cm" => {
                if let (Some(a), Some(b), Some(c), Some(d), Some(e), Some(f)) =
                    (n(0), n(1), n(2), n(3), n(4), n(5))
                {
                    ctm = Ctm::new(a, b, c, d, e, f).concat(&ctm);
                    path.set_ctm(ctm);
                }
                None
            }
            "w" => {
                if let Some(w) = n(0) {
                    gs.line_width = w;
                }
                None
            }
            "m" => {
                if let (Some(x), Some(y)) = (n(0), n(1)) {
                    path.move_to(x, y);
                }
                None
            }
            "l" => {
                if let (Some(x), Some(y)) = (n(0), n(1)) {
                    path.line_to(x, y);
                }
                None
            }
            "c" => {
                if let (Some(x1), Some(y1), Some(x2), Some(y2), Some(x3), Some(y3)) =
                    (n(0), n(1), n(2), n(3), n(4), n(5))
                {
                    path.curve_to(x1, y1, x2, y2, x3, y3);
                }
                None
            }
            "v" => {
                if let (Some(x2), Some(y2), Some(x3), Some(y3)) = (n(0), n(1), n(2), n(3)) {
                    path.curve_to_v(x2, y2, x3, y3);
                }
                None
            }
            "y" => {
                if let (Some(x1), Some(y1), Some(x3), Some(y3)) = (n(0), n(1), n(2), n(3)) {
                    path.curve_to_y(x1, y1, x3, y3);
                }
                None
            }
            "h" => {
                path.close_path();
                None
            }
            "re" => {
                if let (Some(x), Some(y), Some(w), Some(h)) = (n(0), n(1), n(2), n(3)) {
                    path.rectangle(x, y, w, h);
                }
                None
            }
            "S" => Some(path.stroke(&gs)),
            "s" => Some(path.close_and_stroke(&gs)),
            "f" | "F" => Some(path.fill(&gs)),
            "f*" => Some(path.fill_even_odd(&gs)),
            "B" => Some(path.fill_and_stroke(&gs)),
            "B*" => Some(path.fill_even_odd_and_stroke(&gs)),
            "b" => Some(path.close_fill_and_stroke(&gs)),
            "b*" => Some(path.close_fill_even_odd_and_stroke(&gs)),
            "n" => path.end_path(),
            _ => None,
        };

        if let Some(painted) = painted {
            let (lines, rects, curves) = extract_shapes(&painted, page_height);
            out.lines.extend(lines);
            out.rects.extend(rects);
            out.curves.extend(curves);
        }
    }

    out
}
