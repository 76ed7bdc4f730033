//! Keyboard shortcut dispatch for the curio client.
//!
//! * [`KeyBindingDispatcher`]: shared registry, many handlers per combination
//! * [`KeyListener`] / [`SequenceListener`]: low-level key sources, one slot per combination
//! * [`Shortcut`]: mount/update/unmount wrapper around a single binding
//! * [`FocusTarget`]: per-event focus context deciding whether shortcuts are held back

mod combination;
mod dispatcher;
mod error;
mod event;
mod listener;
mod shortcut;

pub use combination::Combination;
pub use curio_keymap_parser as parser;
pub use dispatcher::{KeyBindingDispatcher, ShortcutHandler, handler};
pub use error::{KeymapError, Result};
pub use event::{ElementKind, FocusTarget, InputType, KeyEvent};
pub use listener::{KeyListener, SequenceListener};
pub use shortcut::Shortcut;
