//! Output previews of an assembled document.
//!
//! JSON is the hand-off format for an external document writer; plain text
//! is a quick human-readable preview.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{to_text, TextOptions};
