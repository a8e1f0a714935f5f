//! Terminal services: raw-mode setup, key decoding, and frame painting.
//!
//! Everything here is replaceable plumbing around the headless core; the
//! only contract is that `screen` maps classifications to palette colors
//! and `events` delivers decoded keys.

pub mod events;
pub mod raw;
pub mod screen;
