//! Shortcut combination grammar.
//!
//! Parses strings like `"f"`, `"["`, `"ctrl-s"`, `"@digit"` and key sequences
//! like `"n o"` into structured [`Node`] values.

mod node;
mod parser;

pub use node::{CharGroup, KEY_SEP, KEY_SEP_ALT, Key, Modifier, Modifiers, Node};
pub use parser::{ParseError, parse, parse_seq};
