//! Error types for API requests.

use serde_json::Value;
use thiserror::Error;

/// Message used when an error response carries no `detail`.
pub const UNKNOWN_ERROR: &str = "Unknown error";
/// Message used when a response body is not JSON.
pub const UNPARSEABLE: &str = "Unable to parse response";

/// Which stage of a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The request never reached the server or the response could not be read.
	Transport,
	/// The server answered with a non-success status.
	Response,
	/// The response body was not valid JSON.
	Parse,
}

impl ErrorKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Transport => "transport",
			Self::Response => "response",
			Self::Parse => "parse",
		}
	}
}

/// A failed API request.
///
/// Cheap to clone so it can sit inside a loader's state snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
	#[error("{message}")]
	Transport { message: String },

	/// Non-2xx status. `message` is the body's `detail` field when present.
	#[error("{message}")]
	Response { status: u16, message: String, data: Value },

	#[error("{}", UNPARSEABLE)]
	Parse { status: u16 },
}

impl RequestError {
	pub(crate) fn transport(error: impl std::fmt::Display) -> Self {
		Self::Transport {
			message: error.to_string(),
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Transport { .. } => ErrorKind::Transport,
			Self::Response { .. } => ErrorKind::Response,
			Self::Parse { .. } => ErrorKind::Parse,
		}
	}

	/// HTTP status, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport { .. } => None,
			Self::Response { status, .. } | Self::Parse { status } => Some(*status),
		}
	}

	/// Parsed error body of a [`RequestError::Response`].
	pub fn data(&self) -> Option<&Value> {
		match self {
			Self::Response { data, .. } => Some(data),
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, RequestError>;
