//! Reading the anti-forgery token out of a `Cookie`-style string.

use parking_lot::RwLock;

/// Source of the current cookie string (`"a=1; csrftoken=abc"`).
pub trait CookieSource: Send + Sync {
	fn cookies(&self) -> Option<String>;
}

/// In-memory cookie string, updated by whoever receives `Set-Cookie`.
#[derive(Debug, Default)]
pub struct CookieJar {
	raw: RwLock<String>,
}

impl CookieJar {
	pub fn new(raw: impl Into<String>) -> Self {
		Self { raw: RwLock::new(raw.into()) }
	}

	pub fn set(&self, raw: impl Into<String>) {
		*self.raw.write() = raw.into();
	}
}

impl CookieSource for CookieJar {
	fn cookies(&self) -> Option<String> {
		let raw = self.raw.read();
		(!raw.is_empty()).then(|| raw.clone())
	}
}

/// Returns the percent-decoded value of cookie `name`.
///
/// Entries are split on `;` and trimmed; the first one starting with
/// `name=` wins. A value that is not valid percent-encoded UTF-8 counts as
/// missing.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
	cookies
		.split(';')
		.map(str::trim)
		.find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
		.and_then(|value| match urlencoding::decode(value) {
			Ok(decoded) => Some(decoded.into_owned()),
			Err(err) => {
				tracing::debug!(cookie = name, error = %err, "api.cookie.undecodable");
				None
			}
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_named_cookie() {
		let raw = "sessionid=xyz; csrftoken=abc123;theme=dark";
		assert_eq!(get_cookie(raw, "csrftoken").as_deref(), Some("abc123"));
		assert_eq!(get_cookie(raw, "theme").as_deref(), Some("dark"));
	}

	#[test]
	fn missing_or_prefix_only_is_none() {
		assert_eq!(get_cookie("", "csrftoken"), None);
		assert_eq!(get_cookie("csrftokenx=1", "csrftoken"), None);
		assert_eq!(get_cookie("xcsrftoken=1", "csrftoken"), None);
	}

	#[test]
	fn values_are_percent_decoded() {
		assert_eq!(get_cookie("name=a%20b%3Dc", "name").as_deref(), Some("a b=c"));
		assert_eq!(get_cookie("name=%FF", "name"), None);
	}

	#[test]
	fn jar_reports_empty_as_absent() {
		let jar = CookieJar::default();
		assert_eq!(jar.cookies(), None);
		jar.set("csrftoken=t");
		assert_eq!(jar.cookies().as_deref(), Some("csrftoken=t"));
	}
}
