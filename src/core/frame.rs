//! Renderable frame assembly.
//!
//! A frame is the pure description of what one repaint should show: for each
//! visible screen row, the right-padded line-number margin plus the rendered
//! characters and their classifications, clipped to the column window. The
//! terminal layer maps classifications to colors; nothing here touches I/O.

use crate::core::document::Document;
use crate::core::highlight::Highlight;
use crate::core::window::Window;

/// One visible document line, margin plus classified cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    /// Line number, right-padded to the margin width.
    pub margin: String,
    /// Visible characters with their classification.
    pub cells: Vec<(char, Highlight)>,
}

/// One repaint's worth of rows; `None` marks a row past the end of the
/// document (painted as a placeholder by the terminal layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<Option<FrameRow>>,
}

/// Assemble the frame for the current viewport.
pub fn build(doc: &Document, win: &Window, margin: usize) -> Frame {
    let mut rows = Vec::with_capacity(win.rows);

    for y in 0..win.rows {
        let line = win.row_offset + y;
        let Some(row) = doc.row(line) else {
            rows.push(None);
            continue;
        };

        let mut number = format!("{}", line + 1);
        number.truncate(margin);
        let margin_text = format!("{:<width$}", number, width = margin);

        let cells = row
            .render()
            .chars()
            .zip(row.hl().iter().copied())
            .skip(win.col_offset)
            .take(win.cols)
            .collect();

        rows.push(Some(FrameRow {
            margin: margin_text,
            cells,
        }));
    }

    Frame { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::Language;

    fn setup(lines: &[&str]) -> (Document, Window) {
        let mut doc = Document::from_lines(lines.iter().copied(), 8);
        doc.set_language(Some(Language::c()));
        (doc, Window::new(4, 10))
    }

    #[test]
    fn test_margin_is_right_padded() {
        let (doc, win) = setup(&["a", "b"]);
        let frame = build(&doc, &win, 5);
        assert_eq!(frame.rows[0].as_ref().unwrap().margin, "1    ");
        assert_eq!(frame.rows[1].as_ref().unwrap().margin, "2    ");
    }

    #[test]
    fn test_rows_past_end_are_placeholders() {
        let (doc, win) = setup(&["only"]);
        let frame = build(&doc, &win, 5);
        assert!(frame.rows[0].is_some());
        assert!(frame.rows[1].is_none());
        assert_eq!(frame.rows.len(), 4);
    }

    #[test]
    fn test_cells_carry_classification() {
        let (doc, win) = setup(&["if x"]);
        let frame = build(&doc, &win, 3);
        let cells = &frame.rows[0].as_ref().unwrap().cells;
        assert_eq!(cells[0], ('i', Highlight::Keyword));
        assert_eq!(cells[1], ('f', Highlight::Keyword));
        assert_eq!(cells[3], ('x', Highlight::Normal));
    }

    #[test]
    fn test_cells_clip_to_column_window() {
        let (doc, mut win) = setup(&["0123456789abcdef"]);
        win.col_offset = 4;
        win.cols = 6;
        let frame = build(&doc, &win, 3);
        let cells = &frame.rows[0].as_ref().unwrap().cells;
        let text: String = cells.iter().map(|(c, _)| *c).collect();
        assert_eq!(text, "456789");
    }

    #[test]
    fn test_viewport_vertical_clip() {
        let lines: Vec<String> = (0..20).map(|i| format!("line{}", i)).collect();
        let doc = Document::from_lines(lines, 8);
        let mut win = Window::new(3, 20);
        win.row_offset = 5;
        let frame = build(&doc, &win, 4);
        assert_eq!(frame.rows[0].as_ref().unwrap().margin, "6   ");
        assert_eq!(frame.rows.len(), 3);
    }
}
