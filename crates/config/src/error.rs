//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid TOML or does not match the schema.
	#[error("TOML parse error in {path}: {error}")]
	Toml {
		path: PathBuf,
		#[source]
		error: toml::de::Error,
	},

	/// `base_url` does not parse as an absolute URL.
	#[error("invalid base_url '{value}': {error}")]
	InvalidBaseUrl {
		value: String,
		#[source]
		error: url::ParseError,
	},

	/// `api_prefix` must start with '/'.
	#[error("invalid api_prefix '{0}' (must start with '/')")]
	InvalidPrefix(String),

	/// A duration field is zero.
	#[error("{0} must be greater than zero")]
	ZeroDuration(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
