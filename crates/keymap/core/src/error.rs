//! Error types for shortcut registration.

use thiserror::Error;

/// Errors raised while registering or removing shortcuts.
///
/// Removing something that is not bound is not an error; those calls are
/// no-ops reported through their return value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
	/// The combination string does not follow the key grammar.
	#[error("invalid key combination '{keys}': {source}")]
	InvalidCombination {
		keys: String,
		#[source]
		source: curio_keymap_parser::ParseError,
	},
}

/// Result type for keymap operations.
pub type Result<T> = std::result::Result<T, KeymapError>;
