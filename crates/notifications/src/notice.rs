use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::Status;

/// Default lifetime of a notice that does not set its own.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(3);

/// Identifier assigned to a notice when it is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub(crate) u64);

impl NotificationId {
	pub const fn get(self) -> u64 {
		self.0
	}
}

/// What a caller hands to [`NotificationBus::publish`](crate::NotificationBus::publish).
///
/// Unset fields take the bus defaults: status [`Status::Info`] and the bus's
/// default duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<Status>,
	#[serde(default, skip_serializing_if = "Option::is_none", with = "opt_secs")]
	pub duration: Option<Duration>,
}

impl Notice {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn status(mut self, status: Status) -> Self {
		self.status = Some(status);
		self
	}

	pub fn duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);
		self
	}
}

/// A published notice as seen by subscribers and the live list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
	pub id: NotificationId,
	pub title: String,
	pub message: Option<String>,
	pub status: Status,
	pub created_at: SystemTime,
	#[serde(rename = "duration_seconds", serialize_with = "secs::serialize")]
	pub duration: Duration,
}

mod secs {
	use std::time::Duration;

	use serde::Serializer;

	pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_f64(value.as_secs_f64())
	}
}

/// Durations are written as fractional seconds.
mod opt_secs {
	use std::time::Duration;

	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
		match value {
			Some(duration) => serializer.serialize_f64(duration.as_secs_f64()),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
		let secs = Option::<f64>::deserialize(deserializer)?;
		secs.map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
			.transpose()
	}
}
