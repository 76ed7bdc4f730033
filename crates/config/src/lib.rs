//! Configuration for the curio client.
//!
//! Settings live in a TOML file, looked up at
//! `$XDG_CONFIG_HOME/curio/config.toml` (or the platform equivalent). Every
//! field is optional:
//!
//! ```toml
//! base_url = "https://curio.example.org"
//! api_prefix = "/api"
//! csrf_cookie = "csrftoken"
//! csrf_header = "X-CSRFToken"
//! request_timeout_secs = 30
//! notice_duration_secs = 3
//! sequence_timeout_ms = 1000
//! ```
//!
//! `CURIO_BASE_URL` and `CURIO_API_PREFIX` override the file.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

pub use error::{ConfigError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const ENV_BASE_URL: &str = "CURIO_BASE_URL";
/// Environment variable overriding [`ClientConfig::api_prefix`].
pub const ENV_API_PREFIX: &str = "CURIO_API_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
	/// Server origin requests are sent to.
	pub base_url: String,
	/// Path prefix prepended to every request path. Stored without a trailing slash.
	pub api_prefix: String,
	/// Cookie holding the anti-forgery token.
	pub csrf_cookie: String,
	/// Header the anti-forgery token is sent in on POST and PATCH.
	pub csrf_header: String,
	/// Per-request timeout. Unset leaves it to the transport.
	pub request_timeout_secs: Option<u64>,
	/// Lifetime of notices that do not set their own.
	pub notice_duration_secs: u64,
	/// Longest gap allowed between the keys of a shortcut sequence.
	pub sequence_timeout_ms: u64,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			api_prefix: DEFAULT_API_PREFIX.to_string(),
			csrf_cookie: "csrftoken".to_string(),
			csrf_header: "X-CSRFToken".to_string(),
			request_timeout_secs: None,
			notice_duration_secs: 3,
			sequence_timeout_ms: 1000,
		}
	}
}

impl ClientConfig {
	/// Parse a TOML string without applying overrides or validation.
	pub fn parse(input: &str, origin: &Path) -> Result<Self> {
		toml::from_str(input).map_err(|error| ConfigError::Toml {
			path: origin.to_path_buf(),
			error,
		})
	}

	/// Load configuration from a file, then apply environment overrides and validate.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let mut config = Self::parse(&content, path)?;
		config.apply_overrides(env_lookup);
		config.validate()?;
		tracing::debug!(path = %path.display(), "config.load");
		Ok(config)
	}

	/// Load the user's config file if there is one, otherwise defaults.
	pub fn discover() -> Result<Self> {
		match default_path().filter(|path| path.is_file()) {
			Some(path) => Self::load(path),
			None => {
				tracing::debug!("config.defaults");
				let mut config = Self::default();
				config.apply_overrides(env_lookup);
				config.validate()?;
				Ok(config)
			}
		}
	}

	/// Applies `CURIO_*` overrides found through `lookup`.
	pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
		if let Some(base_url) = lookup(ENV_BASE_URL) {
			tracing::debug!(%base_url, "config.override.base_url");
			self.base_url = base_url;
		}
		if let Some(prefix) = lookup(ENV_API_PREFIX) {
			tracing::debug!(%prefix, "config.override.api_prefix");
			self.api_prefix = prefix;
		}
	}

	/// Checks field values and normalizes `api_prefix`.
	pub fn validate(&mut self) -> Result<()> {
		self.base_url()?;

		if !self.api_prefix.starts_with('/') {
			return Err(ConfigError::InvalidPrefix(self.api_prefix.clone()));
		}
		let trimmed = self.api_prefix.trim_end_matches('/').len();
		self.api_prefix.truncate(trimmed);

		if self.notice_duration_secs == 0 {
			return Err(ConfigError::ZeroDuration("notice_duration_secs"));
		}
		if self.sequence_timeout_ms == 0 {
			return Err(ConfigError::ZeroDuration("sequence_timeout_ms"));
		}
		if self.request_timeout_secs == Some(0) {
			return Err(ConfigError::ZeroDuration("request_timeout_secs"));
		}
		Ok(())
	}

	pub fn base_url(&self) -> Result<Url> {
		Url::parse(&self.base_url).map_err(|error| ConfigError::InvalidBaseUrl {
			value: self.base_url.clone(),
			error,
		})
	}

	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_timeout_secs.map(Duration::from_secs)
	}

	pub fn notice_duration(&self) -> Duration {
		Duration::from_secs(self.notice_duration_secs)
	}

	pub fn sequence_timeout(&self) -> Duration {
		Duration::from_millis(self.sequence_timeout_ms)
	}
}

/// `$XDG_CONFIG_HOME/curio/config.toml`, if a config directory is known.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("curio").join("config.toml"))
}

fn env_lookup(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|value| !value.is_empty())
}
