//! One editable line and its derived forms.
//!
//! A [`Row`] owns three parallel representations: the raw stored text, its
//! tab-expanded rendered form, and one [`Highlight`] per rendered character.
//! The rendered form and classification are regenerated by the document
//! whenever the raw text changes; `Row` itself never talks to a grammar.
//!
//! All column arguments are character offsets, not byte offsets.

use crate::core::highlight::Highlight;

#[derive(Debug, Clone)]
pub struct Row {
    /// Position within the document; `doc.row(i).index == i` always.
    pub index: usize,
    raw: String,
    render: String,
    hl: Vec<Highlight>,
    /// True if this line ends inside an unterminated block comment.
    pub open_comment: bool,
}

/// Expand tabs: each `\t` becomes spaces up to the next multiple of
/// `tab_stop` (at least one). Pure; requires `tab_stop >= 1`.
pub fn expand(raw: &str, tab_stop: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut width = 0;
    for ch in raw.chars() {
        if ch == '\t' {
            out.push(' ');
            width += 1;
            while width % tab_stop != 0 {
                out.push(' ');
                width += 1;
            }
        } else {
            out.push(ch);
            width += 1;
        }
    }
    out
}

impl Row {
    pub fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            raw: text.to_string(),
            render: String::new(),
            hl: Vec::new(),
            open_comment: false,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn render(&self) -> &str {
        &self.render
    }

    pub fn hl(&self) -> &[Highlight] {
        &self.hl
    }

    /// Raw length in characters.
    pub fn char_len(&self) -> usize {
        self.raw.chars().count()
    }

    /// Rendered length in characters.
    pub fn render_len(&self) -> usize {
        self.render.chars().count()
    }

    /// Regenerate the rendered form after a raw-text change.
    pub fn update_render(&mut self, tab_stop: usize) {
        self.render = expand(&self.raw, tab_stop);
    }

    /// Install a fresh classification; length must match the rendered form.
    pub fn set_hl(&mut self, hl: Vec<Highlight>) {
        debug_assert_eq!(hl.len(), self.render_len());
        self.hl = hl;
    }

    /// Snapshot the classification for later restore.
    pub fn save_hl(&self) -> Vec<Highlight> {
        self.hl.clone()
    }

    /// Restore a previously saved classification.
    pub fn restore_hl(&mut self, saved: Vec<Highlight>) {
        if saved.len() == self.hl.len() {
            self.hl = saved;
        }
    }

    /// Overlay the `Match` class onto a rendered span.
    pub fn overlay_match(&mut self, start: usize, len: usize) {
        let start = start.min(self.hl.len());
        let end = (start + len).min(self.hl.len());
        for slot in &mut self.hl[start..end] {
            *slot = Highlight::Match;
        }
    }

    /// Insert one character at a raw character offset, clamped to the end.
    pub fn insert_char(&mut self, at: usize, ch: char) {
        let byte = self.char_to_byte(at.min(self.char_len()));
        self.raw.insert(byte, ch);
    }

    /// Delete the character at a raw offset; out-of-range is a no-op.
    pub fn delete_char(&mut self, at: usize) {
        if at < self.char_len() {
            let byte = self.char_to_byte(at);
            self.raw.remove(byte);
        }
    }

    /// Append another line's raw content (used by line merge).
    pub fn append_str(&mut self, s: &str) {
        self.raw.push_str(s);
    }

    /// Truncate at a raw offset and return the remainder (used by split).
    pub fn split_off(&mut self, at: usize) -> String {
        let byte = self.char_to_byte(at.min(self.char_len()));
        self.raw.split_off(byte)
    }

    /// Map a raw column to its rendered column.
    pub fn raw_to_rendered(&self, raw_col: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for ch in self.raw.chars().take(raw_col) {
            if ch == '\t' {
                rx += tab_stop - 1 - (rx % tab_stop);
            }
            rx += 1;
        }
        rx
    }

    /// Map a rendered column back to a raw column.
    ///
    /// Returns the raw length when `rendered_col` is past the end of the
    /// rendered line. Round-trips with [`Row::raw_to_rendered`] for any raw
    /// column not strictly inside a tab's expansion.
    pub fn rendered_to_raw(&self, rendered_col: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for (cx, ch) in self.raw.chars().enumerate() {
            if ch == '\t' {
                rx += tab_stop - 1 - (rx % tab_stop);
            }
            rx += 1;
            if rx > rendered_col {
                return cx;
            }
        }
        self.char_len()
    }

    fn char_to_byte(&self, at: usize) -> usize {
        self.raw
            .char_indices()
            .nth(at)
            .map(|(b, _)| b)
            .unwrap_or(self.raw.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_text() {
        assert_eq!(expand("hello", 8), "hello");
        assert_eq!(expand("", 8), "");
    }

    #[test]
    fn test_expand_tab_to_next_stop() {
        assert_eq!(expand("\t", 4), "    ");
        assert_eq!(expand("ab\tc", 4), "ab  c");
        // At a stop boundary the tab still produces a full stop's width
        assert_eq!(expand("abcd\te", 4), "abcd    e");
    }

    #[test]
    fn test_expand_minimum_one_space() {
        assert_eq!(expand("abc\t", 4), "abc ");
    }

    #[test]
    fn test_insert_and_delete_char() {
        let mut row = Row::new(0, "ac");
        row.insert_char(1, 'b');
        assert_eq!(row.raw(), "abc");
        row.insert_char(99, 'd'); // clamped to end
        assert_eq!(row.raw(), "abcd");
        row.delete_char(0);
        assert_eq!(row.raw(), "bcd");
        row.delete_char(99); // no-op
        assert_eq!(row.raw(), "bcd");
    }

    #[test]
    fn test_split_and_append() {
        let mut row = Row::new(0, "hello world");
        let rest = row.split_off(5);
        assert_eq!(row.raw(), "hello");
        assert_eq!(rest, " world");
        row.append_str(&rest);
        assert_eq!(row.raw(), "hello world");
    }

    #[test]
    fn test_coordinate_mapping_no_tabs() {
        let row = Row::new(0, "abcdef");
        for cx in 0..=6 {
            assert_eq!(row.raw_to_rendered(cx, 8), cx);
            assert_eq!(row.rendered_to_raw(cx, 8), cx);
        }
    }

    #[test]
    fn test_coordinate_mapping_with_tab() {
        let row = Row::new(0, "\tx");
        assert_eq!(row.raw_to_rendered(0, 8), 0);
        assert_eq!(row.raw_to_rendered(1, 8), 8);
        assert_eq!(row.raw_to_rendered(2, 8), 9);
        // Inside the tab's expansion, clamp to the tab itself
        assert_eq!(row.rendered_to_raw(3, 8), 0);
        assert_eq!(row.rendered_to_raw(8, 8), 1);
    }

    #[test]
    fn test_coordinate_round_trip() {
        let row = Row::new(0, "a\tbc\td");
        for cx in 0..=row.char_len() {
            let rx = row.raw_to_rendered(cx, 4);
            assert_eq!(row.rendered_to_raw(rx, 4), cx, "round trip at {}", cx);
        }
    }

    #[test]
    fn test_rendered_to_raw_past_end() {
        let row = Row::new(0, "ab\tc");
        assert_eq!(row.rendered_to_raw(1000, 8), row.char_len());
    }

    #[test]
    fn test_overlay_clamps_to_line() {
        let mut row = Row::new(0, "abc");
        row.update_render(8);
        row.set_hl(vec![Highlight::Normal; 3]);
        row.overlay_match(2, 10);
        assert_eq!(row.hl(), &[Highlight::Normal, Highlight::Normal, Highlight::Match]);
    }
}
