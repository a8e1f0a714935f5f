//! Per-line syntax classification.
//!
//! A single left-to-right pass over a line's rendered (tab-expanded) form
//! assigns one [`Highlight`] per character. The only state threaded between
//! lines is whether the line ended inside an unterminated block comment;
//! the document re-runs this pass on following lines until that entry state
//! stops changing.

use crate::core::language::Language;

/// Syntax category assigned to one rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Plain text / fallback
    Normal,
    /// Single-line comment, from the marker to end of line
    Comment,
    /// Inside a block comment, including both markers
    BlockComment,
    /// Primary keyword (control flow, declarations)
    Keyword,
    /// Secondary keyword: type names, rendered in a distinct class
    Identifier,
    /// String or character literal, including quotes and escapes
    String,
    /// Numeric literal
    Number,
    /// Transient search-match overlay
    Match,
}

/// Separators delimit keywords and numeric literals: whitespace, NUL, or a
/// fixed punctuation set. End-of-line also counts (handled at the call site).
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

/// Does `marker` occur in `chars` starting at `at`?
fn matches_at(chars: &[char], at: usize, marker: &str) -> bool {
    let mut i = at;
    for m in marker.chars() {
        if chars.get(i) != Some(&m) {
            return false;
        }
        i += 1;
    }
    !marker.is_empty()
}

/// Longest keyword (primary or secondary) matching at `at` with a separator
/// on both sides. The character immediately following the span is checked,
/// clamped to end-of-line; end-of-line counts as a separator.
fn match_keyword(lang: &Language, chars: &[char], at: usize) -> Option<(usize, Highlight)> {
    let mut best: Option<(usize, Highlight)> = None;

    let candidates = lang
        .keywords
        .iter()
        .map(|kw| (*kw, Highlight::Keyword))
        .chain(lang.types.iter().map(|kw| (*kw, Highlight::Identifier)));

    for (kw, class) in candidates {
        let len = kw.chars().count();
        if len == 0 || !matches_at(chars, at, kw) {
            continue;
        }
        let follows_ok = match chars.get(at + len) {
            Some(&next) => is_separator(next),
            None => true,
        };
        if follows_ok && best.map_or(true, |(blen, _)| len > blen) {
            best = Some((len, class));
        }
    }

    best
}

/// Classify one rendered line.
///
/// `starts_in_comment` is the predecessor's trailing block-comment state.
/// Returns the per-character classification and whether this line ends
/// inside an unterminated block comment.
pub fn highlight_line(
    render: &str,
    lang: Option<&Language>,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let chars: Vec<char> = render.chars().collect();
    let mut hl = vec![Highlight::Normal; chars.len()];

    let Some(lang) = lang else {
        return (hl, false);
    };

    let has_block = !lang.block_comment_start.is_empty() && !lang.block_comment_end.is_empty();

    let mut prev_sep = true;
    let mut in_string: Option<char> = None;
    let mut in_comment = starts_in_comment && has_block;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comment swallows the rest of the line.
        if !lang.line_comment.is_empty()
            && in_string.is_none()
            && !in_comment
            && matches_at(&chars, i, lang.line_comment)
        {
            for slot in &mut hl[i..] {
                *slot = Highlight::Comment;
            }
            break;
        }

        if has_block && in_string.is_none() {
            if in_comment {
                hl[i] = Highlight::BlockComment;
                if matches_at(&chars, i, lang.block_comment_end) {
                    let end = i + lang.block_comment_end.chars().count();
                    for slot in &mut hl[i..end] {
                        *slot = Highlight::BlockComment;
                    }
                    i = end;
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if matches_at(&chars, i, lang.block_comment_start) {
                let end = i + lang.block_comment_start.chars().count();
                for slot in &mut hl[i..end] {
                    *slot = Highlight::BlockComment;
                }
                i = end;
                in_comment = true;
                continue;
            }
        }

        if lang.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // A backslash keeps the next character inside the string.
                if c == '\\' && i + 1 < chars.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if lang.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(lang, &chars, i) {
                for slot in &mut hl[i..i + len] {
                    *slot = class;
                }
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}
