//! Document: the ordered collection of editable lines.
//!
//! Owns every [`Row`] and is the only mutation path for them. Each edit
//! re-derives the affected row's rendered form and classification, then
//! walks forward while the trailing block-comment state keeps changing,
//! so classification always reaches a fixed point bounded by line count.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::error::EditError;
use crate::core::highlight::{Highlight, highlight_line};
use crate::core::language::Language;
use crate::core::row::Row;

#[derive(Debug)]
pub struct Document {
    rows: Vec<Row>,
    /// Tab stop used for expansion and coordinate mapping.
    tab_stop: usize,
    /// Modified since last load/save.
    pub dirty: bool,
    pub filename: Option<PathBuf>,
    language: Option<Language>,
}

impl Document {
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            tab_stop,
            dirty: false,
            filename: None,
            language: None,
        }
    }

    /// Build a document from pre-split lines (terminators already stripped).
    pub fn from_lines<I, S>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new(tab_stop);
        for line in lines {
            let at = doc.rows.len();
            // Bounds hold by construction; append cannot fail.
            let _ = doc.insert_line(at, line.as_ref());
        }
        doc.dirty = false;
        doc
    }

    /// Load a document from a file, normalizing line endings to `\n`.
    pub fn open(path: impl AsRef<Path>, tab_stop: usize) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            let mut line = line?;
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }

        let mut doc = Self::from_lines(lines, tab_stop);
        doc.filename = Some(path.to_path_buf());
        Ok(doc)
    }

    // ==================== Accessors ====================

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Select (or clear) the grammar and reclassify every line.
    pub fn set_language(&mut self, language: Option<Language>) {
        self.language = language;
        self.rehighlight_all();
    }

    /// Map a raw column on a line to its rendered column.
    pub fn raw_to_rendered(&self, line: usize, raw_col: usize) -> usize {
        self.rows
            .get(line)
            .map_or(0, |r| r.raw_to_rendered(raw_col, self.tab_stop))
    }

    /// Map a rendered column on a line back to a raw column.
    pub fn rendered_to_raw(&self, line: usize, rendered_col: usize) -> usize {
        self.rows
            .get(line)
            .map_or(0, |r| r.rendered_to_raw(rendered_col, self.tab_stop))
    }

    // ==================== Line Operations ====================

    /// Insert a new line at `at` (0 <= at <= line_count).
    pub fn insert_line(&mut self, at: usize, text: &str) -> Result<(), EditError> {
        if at > self.rows.len() {
            return Err(EditError::OutOfRange {
                index: at,
                len: self.rows.len(),
            });
        }
        self.rows.insert(at, Row::new(at, text));
        self.renumber_from(at + 1);
        // The fresh row inherits the entry state its follower was last
        // classified under, keeping the cascade's change detection exact.
        self.rows[at].open_comment = at > 0 && self.rows[at - 1].open_comment;
        self.update_row(at);
        self.dirty = true;
        Ok(())
    }

    /// Delete the line at `at`.
    pub fn delete_line(&mut self, at: usize) -> Result<(), EditError> {
        if at >= self.rows.len() {
            return Err(EditError::OutOfRange {
                index: at,
                len: self.rows.len(),
            });
        }
        self.rows.remove(at);
        self.renumber_from(at);
        // The next line's entry state may have changed with its predecessor gone.
        if at < self.rows.len() {
            self.rehighlight_from(at);
        }
        self.dirty = true;
        Ok(())
    }

    /// Insert one character into a line at a raw offset (clamped).
    pub fn insert_char(&mut self, line: usize, at: usize, ch: char) -> Result<(), EditError> {
        let row = self.row_mut(line)?;
        row.insert_char(at, ch);
        self.update_row(line);
        self.dirty = true;
        Ok(())
    }

    /// Delete the character at a raw offset; past-end offsets are a no-op.
    pub fn delete_char(&mut self, line: usize, at: usize) -> Result<(), EditError> {
        let row = self.row_mut(line)?;
        row.delete_char(at);
        self.update_row(line);
        self.dirty = true;
        Ok(())
    }

    /// Truncate `line` at a raw offset, creating a new following line from
    /// the remainder. Used for newline insertion.
    pub fn split_line(&mut self, line: usize, at: usize) -> Result<(), EditError> {
        let row = self.row_mut(line)?;
        let rest = row.split_off(at);
        self.rows.insert(line + 1, Row::new(line + 1, &rest));
        self.renumber_from(line + 2);
        self.rows[line + 1].open_comment = self.rows[line].open_comment;
        self.update_row(line);
        self.update_row(line + 1);
        self.dirty = true;
        Ok(())
    }

    /// Append the next line's content to `line` and delete the next line.
    /// Used for backspace at line start and delete at line end.
    pub fn merge_with_next(&mut self, line: usize) -> Result<(), EditError> {
        if line + 1 >= self.rows.len() {
            return Err(EditError::OutOfRange {
                index: line + 1,
                len: self.rows.len(),
            });
        }
        let next_raw = self.rows[line + 1].raw().to_string();
        self.rows[line].append_str(&next_raw);
        self.rows.remove(line + 1);
        self.renumber_from(line + 1);
        self.update_row(line);
        self.dirty = true;
        Ok(())
    }

    /// All lines joined by `\n`, trailing newline included. This is the save
    /// format; load followed by serialize reproduces the input byte-for-byte
    /// modulo line-ending normalization.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(row.raw());
            out.push('\n');
        }
        out
    }

    // ==================== File Operations ====================

    /// Save to the current filename via a temp file and atomic rename.
    /// A failed save leaves the in-memory document untouched.
    pub fn save(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        let path = self
            .filename
            .clone()
            .ok_or("no filename set for document")?;

        let content = self.serialize();
        let parent = path.parent().unwrap_or(Path::new("."));
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path)?;

        self.dirty = false;
        Ok(content.len())
    }

    // ==================== Derivation ====================

    fn row_mut(&mut self, line: usize) -> Result<&mut Row, EditError> {
        let len = self.rows.len();
        self.rows
            .get_mut(line)
            .ok_or(EditError::OutOfRange { index: line, len })
    }

    fn renumber_from(&mut self, at: usize) {
        for i in at..self.rows.len() {
            self.rows[i].index = i;
        }
    }

    /// Re-expand one row and reclassify from it forward.
    fn update_row(&mut self, at: usize) {
        let tab_stop = self.tab_stop;
        if let Some(row) = self.rows.get_mut(at) {
            row.update_render(tab_stop);
        }
        self.rehighlight_from(at);
    }

    /// Reclassify `at`, then keep walking forward while each line's trailing
    /// block-comment state changes. Terminates at the first line whose exit
    /// state is unchanged, or at end of document.
    fn rehighlight_from(&mut self, mut at: usize) {
        while at < self.rows.len() {
            let entry = at > 0 && self.rows[at - 1].open_comment;
            let (hl, open) = highlight_line(self.rows[at].render(), self.language.as_ref(), entry);
            let changed = self.rows[at].open_comment != open;
            self.rows[at].set_hl(hl);
            self.rows[at].open_comment = open;
            if !changed {
                break;
            }
            at += 1;
        }
    }

    fn rehighlight_all(&mut self) {
        for at in 0..self.rows.len() {
            let entry = at > 0 && self.rows[at - 1].open_comment;
            let (hl, open) = highlight_line(self.rows[at].render(), self.language.as_ref(), entry);
            self.rows[at].set_hl(hl);
            self.rows[at].open_comment = open;
        }
    }

    /// Snapshot one line's classification (for the search overlay).
    pub fn save_line_hl(&self, line: usize) -> Option<Vec<Highlight>> {
        self.rows.get(line).map(|r| r.save_hl())
    }

    /// Restore a previously saved classification.
    pub fn restore_line_hl(&mut self, line: usize, saved: Vec<Highlight>) {
        if let Some(row) = self.rows.get_mut(line) {
            row.restore_hl(saved);
        }
    }

    /// Overlay the `Match` class onto a rendered span of one line.
    pub fn overlay_match(&mut self, line: usize, start: usize, len: usize) {
        if let Some(row) = self.rows.get_mut(line) {
            row.overlay_match(start, len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::highlight::Highlight;
    use crate::core::language::Language;

    fn doc_from(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().copied(), 8)
    }

    fn c_doc(lines: &[&str]) -> Document {
        let mut doc = doc_from(lines);
        doc.set_language(Some(Language::c()));
        doc
    }

    #[test]
    fn test_index_invariant_after_insert_delete() {
        let mut doc = doc_from(&["a", "b", "c"]);
        doc.insert_line(1, "x").unwrap();
        doc.delete_line(3).unwrap();
        doc.insert_line(0, "top").unwrap();
        for (i, row) in doc.rows().iter().enumerate() {
            assert_eq!(row.index, i);
        }
    }

    #[test]
    fn test_insert_line_out_of_range() {
        let mut doc = doc_from(&["a"]);
        assert_eq!(
            doc.insert_line(5, "x"),
            Err(EditError::OutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_delete_line_out_of_range() {
        let mut doc = Document::new(8);
        assert!(doc.delete_line(0).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let text = "first\nsecond\n\tindented\n";
        let lines: Vec<&str> = text.lines().collect();
        let doc = Document::from_lines(lines, 8);
        assert_eq!(doc.serialize(), text);
        assert!(!doc.dirty);
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let mut doc = doc_from(&["abc"]);
        assert!(!doc.dirty);
        doc.insert_char(0, 1, 'x').unwrap();
        assert!(doc.dirty);
    }

    #[test]
    fn test_split_and_merge() {
        let mut doc = doc_from(&["hello world"]);
        doc.split_line(0, 5).unwrap();
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.row(0).unwrap().raw(), "hello");
        assert_eq!(doc.row(1).unwrap().raw(), " world");
        assert_eq!(doc.row(1).unwrap().index, 1);

        doc.merge_with_next(0).unwrap();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.row(0).unwrap().raw(), "hello world");
    }

    #[test]
    fn test_merge_without_next_fails() {
        let mut doc = doc_from(&["only"]);
        assert!(doc.merge_with_next(0).is_err());
    }

    #[test]
    fn test_block_comment_propagates_to_end() {
        let mut doc = c_doc(&["/* start", "middle", "end"]);
        assert!(doc.row(0).unwrap().open_comment);
        assert!(doc.row(1).unwrap().open_comment);
        assert!(doc.row(2).unwrap().open_comment);
        assert!(
            doc.row(2)
                .unwrap()
                .hl()
                .iter()
                .all(|h| *h == Highlight::BlockComment)
        );

        // Closing the comment on line 0 must reclassify everything below.
        for ch in " */".chars() {
            let at = doc.row(0).unwrap().char_len();
            doc.insert_char(0, at, ch).unwrap();
        }
        assert!(!doc.row(0).unwrap().open_comment);
        assert!(!doc.row(1).unwrap().open_comment);
        assert!(
            doc.row(1)
                .unwrap()
                .hl()
                .iter()
                .all(|h| *h == Highlight::Normal)
        );
    }

    #[test]
    fn test_block_comment_spanning_three_lines() {
        let doc = c_doc(&["/* start", "middle", "end */ code"]);
        assert!(doc.row(0).unwrap().open_comment);
        assert!(doc.row(1).unwrap().open_comment);
        let last = doc.row(2).unwrap();
        assert!(!last.open_comment);
        assert_eq!(&last.hl()[..6], &[Highlight::BlockComment; 6]);
        assert_eq!(last.hl()[7], Highlight::Normal);
    }

    #[test]
    fn test_comment_opened_and_closed_on_consecutive_lines() {
        let mut doc = c_doc(&["int a;", "int b;", "int c;"]);
        doc.insert_line(0, "/*").unwrap();
        doc.insert_line(1, "*/").unwrap();
        assert!(doc.row(0).unwrap().open_comment);
        assert!(!doc.row(1).unwrap().open_comment);
        // Fixed point: lines past the close are untouched.
        assert_eq!(doc.row(2).unwrap().hl()[0], Highlight::Identifier);
    }

    #[test]
    fn test_insert_close_line_between_reclassifies_below() {
        let mut doc = c_doc(&["/*", "int a;"]);
        assert!(doc.row(1).unwrap().open_comment);
        doc.insert_line(1, "*/").unwrap();
        assert!(!doc.row(1).unwrap().open_comment);
        assert!(!doc.row(2).unwrap().open_comment);
        assert_eq!(doc.row(2).unwrap().hl()[0], Highlight::Identifier);
    }

    #[test]
    fn test_delete_line_reclassifies_follower() {
        let mut doc = c_doc(&["/* open", "inside"]);
        assert!(doc.row(1).unwrap().open_comment);
        doc.delete_line(0).unwrap();
        assert!(!doc.row(0).unwrap().open_comment);
        assert_eq!(doc.row(0).unwrap().hl()[0], Highlight::Normal);
    }

    #[test]
    fn test_no_language_all_normal() {
        let doc = doc_from(&["if (x) { /* c */ }"]);
        assert!(
            doc.row(0)
                .unwrap()
                .hl()
                .iter()
                .all(|h| *h == Highlight::Normal)
        );
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");

        let mut doc = doc_from(&["int x;", "\tint y;"]);
        doc.filename = Some(path.clone());
        let written = doc.save().unwrap();
        assert_eq!(written, "int x;\n\tint y;\n".len());
        assert!(!doc.dirty);

        let reloaded = Document::open(&path, 8).unwrap();
        assert_eq!(reloaded.serialize(), doc.serialize());
    }

    #[test]
    fn test_open_normalizes_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();

        let doc = Document::open(&path, 8).unwrap();
        assert_eq!(doc.serialize(), "one\ntwo\n");
    }
}
