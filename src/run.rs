//! The synchronous editor loop.
//!
//! Blocking input lives out here: the loop polls for one decoded event,
//! hands it to the app, and repaints. Every edit, reclassification cascade,
//! and search step runs to completion inside `handle_key` before the next
//! event is read.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::core::app::App;
use crate::terminal::events::{self, Event};
use crate::terminal::raw::RawMode;
use crate::terminal::screen::Screen;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(file: Option<PathBuf>, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config);
    // Open before entering raw mode so load errors print on a sane terminal.
    if let Some(path) = file {
        app.open(path)?;
    }

    let _raw = RawMode::new()?;
    let mut screen = Screen::new();

    app.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find | Ctrl-R = rename");

    while app.running {
        let (cols, rows) = crossterm::terminal::size()?;
        let margin = app.config.margin;
        app.win.set_dimensions(
            (rows as usize).saturating_sub(2),
            (cols as usize).saturating_sub(margin),
        );

        screen.draw(&mut app)?;

        match events::poll_event(INPUT_POLL_INTERVAL)? {
            Some(Event::Key(key)) => app.handle_key(key),
            // Dimensions are re-queried at the top of every iteration.
            Some(Event::Resize(..)) | None => {}
        }
    }

    Ok(())
}
