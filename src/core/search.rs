//! Incremental substring search over rendered lines.
//!
//! Each step scans circularly from the previous match, overlays the `Match`
//! class onto the found span, and remembers the span's prior classification.
//! The snapshot is restored before every new step and on exit (confirm or
//! cancel) — leaking a stale overlay is a correctness bug, not cosmetics.

use crate::core::document::Document;
use crate::core::highlight::Highlight;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A successful search step: where the match starts, in both coordinate
/// systems, for cursor placement and overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub line: usize,
    pub raw_col: usize,
    pub rendered_col: usize,
}

struct SavedHighlight {
    line: usize,
    hl: Vec<Highlight>,
}

/// Stateful incremental search session.
pub struct Search {
    last_match: Option<usize>,
    saved: Option<SavedHighlight>,
}

impl Search {
    pub fn new() -> Self {
        Self {
            last_match: None,
            saved: None,
        }
    }

    /// Forget the previous match position so the next step starts from the
    /// top. Called when the query text changes.
    pub fn restart(&mut self) {
        self.last_match = None;
    }

    /// Remove any pending overlay and reset. Must be called on both confirm
    /// and cancel.
    pub fn finish(&mut self, doc: &mut Document) {
        self.restore(doc);
        self.last_match = None;
    }

    /// Advance the search one step in `direction`, scanning circularly from
    /// one past the previous match. Returns `None` after a full wrap with no
    /// hit; that is an empty result, not an error.
    pub fn find_next(
        &mut self,
        doc: &mut Document,
        query: &str,
        direction: Direction,
    ) -> Option<Match> {
        self.restore(doc);

        let count = doc.line_count();
        if query.is_empty() || count == 0 {
            self.last_match = None;
            return None;
        }

        // With no previous match the scan always runs forward from the top.
        let mut current = self.last_match.unwrap_or(count - 1);
        let direction = if self.last_match.is_none() {
            Direction::Forward
        } else {
            direction
        };

        for _ in 0..count {
            current = match direction {
                Direction::Forward => (current + 1) % count,
                Direction::Backward => current.checked_sub(1).unwrap_or(count - 1),
            };

            let row = doc.row(current)?;
            let Some(byte_idx) = row.render().find(query) else {
                continue;
            };

            let rendered_col = row.render()[..byte_idx].chars().count();
            let raw_col = doc.rendered_to_raw(current, rendered_col);
            let span = query.chars().count();

            self.last_match = Some(current);
            self.saved = doc.save_line_hl(current).map(|hl| SavedHighlight {
                line: current,
                hl,
            });
            doc.overlay_match(current, rendered_col, span);

            return Some(Match {
                line: current,
                raw_col,
                rendered_col,
            });
        }

        self.last_match = None;
        None
    }

    fn restore(&mut self, doc: &mut Document) {
        if let Some(saved) = self.saved.take() {
            doc.restore_line_hl(saved.line, saved.hl);
        }
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::Language;

    fn doc(lines: &[&str]) -> Document {
        let mut doc = Document::from_lines(lines.iter().copied(), 8);
        doc.set_language(Some(Language::c()));
        doc
    }

    #[test]
    fn test_forward_search_finds_first_line() {
        let mut d = doc(&["alpha", "beta", "gamma"]);
        let mut s = Search::new();
        let m = s.find_next(&mut d, "beta", Direction::Forward).unwrap();
        assert_eq!(m.line, 1);
        assert_eq!(m.raw_col, 0);
    }

    #[test]
    fn test_search_wraps_around() {
        let mut d = doc(&["needle here", "middle", "last"]);
        let mut s = Search::new();
        // First hit is line 0; stepping forward again from line 0 wraps
        // through 1 and 2 back to 0.
        assert_eq!(
            s.find_next(&mut d, "needle", Direction::Forward).unwrap().line,
            0
        );
        assert_eq!(
            s.find_next(&mut d, "needle", Direction::Forward).unwrap().line,
            0
        );
    }

    #[test]
    fn test_backward_search_wraps() {
        let mut d = doc(&["x one", "y", "x two"]);
        let mut s = Search::new();
        assert_eq!(s.find_next(&mut d, "x", Direction::Forward).unwrap().line, 0);
        assert_eq!(s.find_next(&mut d, "x", Direction::Backward).unwrap().line, 2);
    }

    #[test]
    fn test_no_match_returns_none() {
        let mut d = doc(&["aaa", "bbb"]);
        let mut s = Search::new();
        assert!(s.find_next(&mut d, "zzz", Direction::Forward).is_none());
    }

    #[test]
    fn test_overlay_applied_and_restored() {
        let mut d = doc(&["int value;"]);
        let before = d.save_line_hl(0).unwrap();

        let mut s = Search::new();
        let m = s.find_next(&mut d, "value", Direction::Forward).unwrap();
        let overlaid = d.row(0).unwrap().hl();
        assert_eq!(overlaid[m.rendered_col], Highlight::Match);

        s.finish(&mut d);
        assert_eq!(d.save_line_hl(0).unwrap(), before);
    }

    #[test]
    fn test_previous_overlay_removed_before_next() {
        let mut d = doc(&["match a", "match b"]);
        let mut s = Search::new();
        s.find_next(&mut d, "match", Direction::Forward).unwrap();
        s.find_next(&mut d, "match", Direction::Forward).unwrap();

        // Line 0's overlay must be gone once line 1 is the current match.
        assert!(
            d.row(0)
                .unwrap()
                .hl()
                .iter()
                .all(|h| *h != Highlight::Match)
        );
        assert!(
            d.row(1)
                .unwrap()
                .hl()
                .iter()
                .any(|h| *h == Highlight::Match)
        );
    }

    #[test]
    fn test_match_column_accounts_for_tabs() {
        let mut d = doc(&["\tvalue"]);
        let mut s = Search::new();
        let m = s.find_next(&mut d, "value", Direction::Forward).unwrap();
        assert_eq!(m.rendered_col, 8);
        assert_eq!(m.raw_col, 1);
    }
}
