//! slate - a lightweight terminal text editor.
//!
//! The `core` module is a headless editing engine (line store, highlighting,
//! search, frames); `terminal` adapts it to a character-cell terminal via
//! crossterm; `run` wires the two into the synchronous event loop.

pub mod cli;
pub mod config;
pub mod core;
pub mod run;
pub mod terminal;
