use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a notice. Views pick their styling from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	/// Informational message (default).
	#[default]
	Info,
	Success,
	Warning,
	Error,
}

impl Status {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Info => "info",
			Self::Success => "success",
			Self::Warning => "warning",
			Self::Error => "error",
		}
	}
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Status {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"info" => Ok(Self::Info),
			"success" => Ok(Self::Success),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			_ => Err(()),
		}
	}
}
