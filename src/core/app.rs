//! Application state and synchronous key dispatch.
//!
//! `App` owns the document, the view, and the modal interaction state
//! (prompts, the incremental search session, quit confirmation). It is
//! headless: the terminal layer feeds it decoded keys and asks it for
//! frames, so the whole editing surface is testable without a terminal.
//! Every operation runs to completion before the next key is processed.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

use crate::config::Config;
use crate::core::document::Document;
use crate::core::frame::{self, Frame};
use crate::core::language::LanguageRegistry;
use crate::core::search::{Direction, Search};
use crate::core::window::Window;

/// Decoded key event delivered by the terminal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Cursor and scroll state saved on entering search, restored on cancel.
struct SavedView {
    cursor_x: usize,
    cursor_y: usize,
    row_offset: usize,
    col_offset: usize,
}

enum PromptKind {
    SaveAs,
    Search { saved: SavedView },
}

struct Prompt {
    input: String,
    kind: PromptKind,
}

pub struct App {
    pub doc: Document,
    pub win: Window,
    pub config: Config,
    registry: LanguageRegistry,
    search: Search,
    prompt: Option<Prompt>,
    status: Option<(String, Instant)>,
    quit_times: u32,
    pub running: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let quit_times = config.quit_times;
        Self {
            doc: Document::new(config.tab_stop),
            win: Window::new(24, 80),
            config,
            registry: LanguageRegistry::new(),
            search: Search::new(),
            prompt: None,
            status: None,
            quit_times,
            running: true,
        }
    }

    /// Load a file into the document and select its grammar.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        self.doc = Document::open(path, self.config.tab_stop)?;
        self.select_language();
        Ok(())
    }

    fn select_language(&mut self) {
        let language = self
            .doc
            .filename
            .as_ref()
            .and_then(|p| p.to_str())
            .and_then(|name| self.registry.detect(name))
            .cloned();
        self.doc.set_language(language);
    }

    // ==================== Frame / status ====================

    /// Scroll the view to the cursor and assemble the next frame.
    pub fn frame(&mut self) -> Frame {
        self.win.scroll(&self.doc);
        frame::build(&self.doc, &self.win, self.config.margin)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    /// The transient status message, if it has not expired.
    pub fn status_message(&self) -> Option<&str> {
        match &self.status {
            Some((msg, at)) if at.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// The active prompt rendered for the message bar.
    pub fn prompt_text(&self) -> Option<String> {
        self.prompt.as_ref().map(|p| match p.kind {
            PromptKind::SaveAs => format!("Save as: {} (ESC to cancel)", p.input),
            PromptKind::Search { .. } => format!("Search: {} (Use ESC/Arrows/Enter)", p.input),
        })
    }

    pub fn language_name(&self) -> &str {
        self.doc.language().map_or("no ft", |l| l.name)
    }

    // ==================== Key dispatch ====================

    pub fn handle_key(&mut self, key: Key) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
        } else {
            self.process_key(key);
        }
    }

    fn process_key(&mut self, key: Key) {
        match key {
            Key::Ctrl('q') => {
                if self.doc.dirty && self.quit_times > 0 {
                    self.set_status(format!(
                        "WARNING!!! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_times
                    ));
                    self.quit_times -= 1;
                    return;
                }
                self.running = false;
                return;
            }
            Key::Enter => self.insert_newline(),
            Key::Tab => self.insert_soft_tab(),
            Key::Ctrl('s') => self.save(),
            Key::Ctrl('f') => self.start_search(),
            Key::Ctrl('r') => {
                self.prompt = Some(Prompt {
                    input: String::new(),
                    kind: PromptKind::SaveAs,
                });
            }
            Key::Backspace | Key::Ctrl('h') => self.delete_back(),
            Key::Delete => self.delete_forward(),
            Key::Home => self.win.move_home(),
            Key::End => self.win.move_end(&self.doc),
            Key::Up => self.win.move_up(&self.doc),
            Key::Down => self.win.move_down(&self.doc),
            Key::Left => self.win.move_left(&self.doc),
            Key::Right => self.win.move_right(&self.doc),
            Key::PageUp => self.win.page_up(&self.doc),
            Key::PageDown => self.win.page_down(&self.doc),
            Key::Char(c) => self.insert_char(c),
            Key::Esc | Key::Ctrl(_) => {}
        }
        self.quit_times = self.config.quit_times;
    }

    // ==================== Editing ====================

    fn insert_char(&mut self, c: char) {
        if self.win.cursor_y == self.doc.line_count() {
            if let Err(e) = self.doc.insert_line(self.win.cursor_y, "") {
                self.set_status(e.to_string());
                return;
            }
        }
        if let Err(e) = self.doc.insert_char(self.win.cursor_y, self.win.cursor_x, c) {
            self.set_status(e.to_string());
            return;
        }
        self.win.cursor_x += 1;
    }

    fn insert_newline(&mut self) {
        let result = if self.win.cursor_x == 0 {
            self.doc.insert_line(self.win.cursor_y, "")
        } else {
            self.doc.split_line(self.win.cursor_y, self.win.cursor_x)
        };
        if let Err(e) = result {
            self.set_status(e.to_string());
            return;
        }
        self.win.cursor_y += 1;
        self.win.cursor_x = 0;
    }

    /// Tab inserts spaces up to the next tab stop.
    fn insert_soft_tab(&mut self) {
        let tab_stop = self.config.tab_stop;
        let spaces = tab_stop - (self.win.cursor_x % tab_stop);
        for _ in 0..spaces {
            self.insert_char(' ');
        }
    }

    fn delete_back(&mut self) {
        if self.win.cursor_y == self.doc.line_count() {
            return;
        }
        if self.win.cursor_x == 0 && self.win.cursor_y == 0 {
            return;
        }

        if self.win.cursor_x > 0 {
            if self
                .doc
                .delete_char(self.win.cursor_y, self.win.cursor_x - 1)
                .is_ok()
            {
                self.win.cursor_x -= 1;
            }
        } else {
            let prev = self.win.cursor_y - 1;
            let prev_len = self.doc.row(prev).map_or(0, |r| r.char_len());
            if self.doc.merge_with_next(prev).is_ok() {
                self.win.cursor_y = prev;
                self.win.cursor_x = prev_len;
            }
        }
    }

    fn delete_forward(&mut self) {
        let Some(row) = self.doc.row(self.win.cursor_y) else {
            return;
        };
        if self.win.cursor_x < row.char_len() {
            let _ = self.doc.delete_char(self.win.cursor_y, self.win.cursor_x);
        } else if self.win.cursor_y + 1 < self.doc.line_count() {
            let _ = self.doc.merge_with_next(self.win.cursor_y);
        }
    }

    // ==================== Save ====================

    fn save(&mut self) {
        if self.doc.filename.is_none() {
            self.prompt = Some(Prompt {
                input: String::new(),
                kind: PromptKind::SaveAs,
            });
            return;
        }
        match self.doc.save() {
            Ok(len) => self.set_status(format!("{} bytes written to disk", len)),
            Err(e) => self.set_status(format!("Can't save! I/O error: {}", e)),
        }
    }

    // ==================== Search session ====================

    fn start_search(&mut self) {
        self.search.restart();
        self.prompt = Some(Prompt {
            input: String::new(),
            kind: PromptKind::Search {
                saved: SavedView {
                    cursor_x: self.win.cursor_x,
                    cursor_y: self.win.cursor_y,
                    row_offset: self.win.row_offset,
                    col_offset: self.win.col_offset,
                },
            },
        });
    }

    /// Run one search step and move the cursor to the hit.
    /// `direction == None` restarts from the top (the query changed).
    fn search_step(&mut self, direction: Option<Direction>) {
        let Some(prompt) = &self.prompt else { return };
        let query = prompt.input.clone();

        let hit = match direction {
            Some(dir) => self.search.find_next(&mut self.doc, &query, dir),
            None => {
                self.search.restart();
                self.search.find_next(&mut self.doc, &query, Direction::Forward)
            }
        };

        if let Some(m) = hit {
            self.win.jump_to(&self.doc, m.line, m.raw_col);
        }
    }

    // ==================== Prompt handling ====================

    fn handle_prompt_key(&mut self, key: Key) {
        let Some(prompt) = &mut self.prompt else { return };
        let searching = matches!(prompt.kind, PromptKind::Search { .. });

        match key {
            Key::Char(c) => {
                prompt.input.push(c);
                if searching {
                    self.search_step(None);
                }
            }
            Key::Backspace | Key::Ctrl('h') | Key::Delete => {
                pop_grapheme(&mut prompt.input);
                if searching {
                    self.search_step(None);
                }
            }
            Key::Right | Key::Down if searching => self.search_step(Some(Direction::Forward)),
            Key::Left | Key::Up if searching => self.search_step(Some(Direction::Backward)),
            Key::Esc => self.cancel_prompt(),
            Key::Enter => self.confirm_prompt(),
            _ => {}
        }
    }

    fn cancel_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else { return };
        match prompt.kind {
            PromptKind::SaveAs => self.set_status("Save aborted"),
            PromptKind::Search { saved } => {
                self.search.finish(&mut self.doc);
                self.win.cursor_x = saved.cursor_x;
                self.win.cursor_y = saved.cursor_y;
                self.win.row_offset = saved.row_offset;
                self.win.col_offset = saved.col_offset;
            }
        }
    }

    fn confirm_prompt(&mut self) {
        // Enter on an empty save-as prompt keeps the prompt open.
        if let Some(p) = &self.prompt {
            if matches!(p.kind, PromptKind::SaveAs) && p.input.is_empty() {
                return;
            }
        }
        let Some(prompt) = self.prompt.take() else { return };
        match prompt.kind {
            PromptKind::SaveAs => {
                self.doc.filename = Some(PathBuf::from(&prompt.input));
                self.select_language();
                self.save();
            }
            PromptKind::Search { .. } => {
                self.search.finish(&mut self.doc);
            }
        }
    }
}

/// Remove the last grapheme cluster from a prompt line.
fn pop_grapheme(s: &mut String) {
    if let Some(g) = s.graphemes(true).next_back() {
        let new_len = s.len() - g.len();
        s.truncate(new_len);
    }
}
