//! This module constitutes the core, headless editing engine of slate.
//! It manages the document's line store, tab expansion, per-line syntax
//! classification, cursor/viewport state, incremental search, and the
//! assembly of renderable frames. Nothing in here performs terminal I/O.

pub mod app;
pub mod document;
pub mod error;
pub mod frame;
pub mod highlight;
pub mod language;
pub mod row;
pub mod search;
pub mod window;
