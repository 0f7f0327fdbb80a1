//! The user's terminal as a Tinker terminal surface

mod keys;
mod raw;

pub use keys::{KeyAction, encode_key};
pub use raw::{RawTerminal, clear_screen, write_stdout};
