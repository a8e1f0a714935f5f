//! Frame painting.
//!
//! Turns a [`Frame`] plus the app's status into queued crossterm commands:
//! one pass per repaint, colors switched only when the classification
//! changes. Search matches are painted as a background color, everything
//! else as foreground, with the palette supplying the ANSI-256 values.

use std::io::{Stdout, Write, stdout};

use crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{QueueableCommand, cursor};
use unicode_width::UnicodeWidthStr;

use crate::core::app::App;
use crate::core::frame::FrameRow;
use crate::core::highlight::Highlight;

/// Gutter and placeholder color (ANSI-256 gray).
const MARGIN_COLOR: u8 = 242;

pub struct Screen {
    stdout: Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Self { stdout: stdout() }
    }

    /// Repaint the whole terminal from the app's current state.
    pub fn draw(&mut self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        let frame = app.frame();
        let width = app.config.margin + app.win.cols;

        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(cursor::MoveTo(0, 0))?;

        let empty_doc = app.doc.is_empty();
        for (y, row) in frame.rows.iter().enumerate() {
            match row {
                Some(row) => self.draw_text_row(row, app)?,
                None => self.draw_placeholder_row(y, empty_doc, app)?,
            }
            self.stdout.queue(Clear(ClearType::UntilNewLine))?;
            self.stdout.write_all(b"\r\n")?;
        }

        self.draw_status_bar(app, width)?;
        self.draw_message_bar(app, width)?;

        let cursor_col = app.config.margin + app.win.rendered_x - app.win.col_offset;
        let cursor_row = app.win.cursor_y - app.win.row_offset;
        self.stdout
            .queue(cursor::MoveTo(cursor_col as u16, cursor_row as u16))?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.flush()?;

        Ok(())
    }

    fn draw_text_row(&mut self, row: &FrameRow, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        self.stdout
            .queue(SetForegroundColor(Color::AnsiValue(MARGIN_COLOR)))?;
        write!(self.stdout, "{}", row.margin)?;
        self.stdout.queue(ResetColor)?;

        // (color, painted-as-background) of the last escape emitted
        let mut current: Option<(u8, bool)> = None;
        for (ch, class) in &row.cells {
            if *class == Highlight::Normal {
                if current.is_some() {
                    self.stdout.queue(ResetColor)?;
                    current = None;
                }
            } else {
                let color = app.config.palette.color(*class);
                let as_background = *class == Highlight::Match;
                if current != Some((color, as_background)) {
                    self.stdout.queue(ResetColor)?;
                    if as_background {
                        self.stdout.queue(SetBackgroundColor(Color::AnsiValue(color)))?;
                    } else {
                        self.stdout.queue(SetForegroundColor(Color::AnsiValue(color)))?;
                    }
                    current = Some((color, as_background));
                }
            }
            write!(self.stdout, "{}", ch)?;
        }
        if current.is_some() {
            self.stdout.queue(ResetColor)?;
        }
        Ok(())
    }

    fn draw_placeholder_row(
        &mut self,
        y: usize,
        empty_doc: bool,
        app: &App,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.stdout
            .queue(SetForegroundColor(Color::AnsiValue(MARGIN_COLOR)))?;
        write!(self.stdout, ">")?;
        self.stdout.queue(ResetColor)?;

        if empty_doc && y == app.win.rows / 3 {
            let welcome = format!("slate editor -- version {}", env!("CARGO_PKG_VERSION"));
            let width = app.config.margin + app.win.cols;
            let welcome = truncate_to_width(&welcome, width.saturating_sub(1));
            let padding = (width.saturating_sub(welcome.width() + 1)) / 2;
            write!(self.stdout, "{}{}", " ".repeat(padding), welcome)?;
        }
        Ok(())
    }

    fn draw_status_bar(&mut self, app: &App, width: usize) -> Result<(), Box<dyn std::error::Error>> {
        let name = app
            .doc
            .filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[Unnamed]".to_string());
        let modified = if app.doc.dirty { "[Modified]" } else { "" };

        let left = format!("{:.20} - {} lines {}", name, app.doc.line_count(), modified);
        let right = format!(
            "{} | {}:{}",
            app.language_name(),
            app.win.cursor_x,
            app.win.cursor_y + 1
        );

        let left = truncate_to_width(&left, width);
        let mut bar = left.clone();
        let used = left.width();
        if used + right.width() <= width {
            bar.push_str(&" ".repeat(width - used - right.width()));
            bar.push_str(&right);
        } else {
            bar.push_str(&" ".repeat(width - used));
        }

        self.stdout.queue(SetAttribute(Attribute::Reverse))?;
        write!(self.stdout, "{}", bar)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.write_all(b"\r\n")?;
        Ok(())
    }

    fn draw_message_bar(&mut self, app: &App, width: usize) -> Result<(), Box<dyn std::error::Error>> {
        self.stdout.queue(Clear(ClearType::UntilNewLine))?;
        let message = app
            .prompt_text()
            .or_else(|| app.status_message().map(|s| s.to_string()));
        if let Some(message) = message {
            write!(self.stdout, "{}", truncate_to_width(&message, width))?;
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate to a display width, never splitting a wide character.
fn truncate_to_width(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_plain_ascii() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hi", 10), "hi");
    }

    #[test]
    fn test_truncate_respects_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_to_width("日本語", 4), "日本");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}
