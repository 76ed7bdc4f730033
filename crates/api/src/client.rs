//! JSON request client.

use std::sync::Arc;

use async_trait::async_trait;
use curio_loader::Fetch;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::cookie::{CookieSource, get_cookie};
use crate::error::{RequestError, Result, UNKNOWN_ERROR};
use crate::transport::{HttpRequest, Method, Transport};


/// Client for the curio REST API.
///
/// Every path is resolved against `base_url` under the API prefix, so
/// `get("/projects/")` requests `{base_url}/api/projects/`. Responses are
/// parsed as JSON regardless of status.
#[derive(Clone)]
pub struct ApiClient {
	base_url: Url,
	prefix: String,
	transport: Arc<dyn Transport>,
	cookies: Option<Arc<dyn CookieSource>>,
	csrf_cookie: String,
	csrf_header: String,
}

impl std::fmt::Debug for ApiClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ApiClient")
			.field("base_url", &self.base_url.as_str())
			.field("prefix", &self.prefix)
			.field("csrf_header", &self.csrf_header)
			.finish_non_exhaustive()
	}
}

impl ApiClient {
	pub fn new(base_url: Url, transport: Arc<dyn Transport>) -> Self {
		Self {
			base_url,
			prefix: "/api".to_string(),
			transport,
			cookies: None,
			csrf_cookie: "csrftoken".to_string(),
			csrf_header: "X-CSRFToken".to_string(),
		}
	}

	/// Sets the path prefix. A trailing slash is dropped.
	pub fn with_prefix(mut self, prefix: &str) -> Self {
		self.prefix = prefix.trim_end_matches('/').to_string();
		self
	}

	pub fn with_cookies(mut self, cookies: Arc<dyn CookieSource>) -> Self {
		self.cookies = Some(cookies);
		self
	}

	/// Names the cookie the anti-forgery token is read from and the header it is sent in.
	pub fn with_csrf(mut self, cookie: impl Into<String>, header: impl Into<String>) -> Self {
		self.csrf_cookie = cookie.into();
		self.csrf_header = header.into();
		self
	}

	/// Full URL for an API path.
	pub fn url(&self, path: &str) -> String {
		format!("{}{}{}", self.base_url.as_str().trim_end_matches('/'), self.prefix, path)
	}

	pub async fn get(&self, path: &str) -> Result<Value> {
		self.request(Method::Get, path, None).await
	}

	pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
		let body = serde_json::to_string(body).map_err(RequestError::transport)?;
		self.request(Method::Post, path, Some(body)).await
	}

	pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
		let body = serde_json::to_string(body).map_err(RequestError::transport)?;
		self.request(Method::Patch, path, Some(body)).await
	}

	/// Sends a request and interprets the JSON response.
	///
	/// Requests with a body are sent as JSON with the anti-forgery header,
	/// when the token cookie is available.
	pub async fn request(&self, method: Method, path: &str, body: Option<String>) -> Result<Value> {
		let cookies = self.cookies.as_ref().and_then(|source| source.cookies());
		let mut headers = Vec::new();
		if let Some(raw) = &cookies {
			headers.push(("Cookie".to_string(), raw.clone()));
		}
		if body.is_some() {
			headers.push(("Content-Type".to_string(), "application/json".to_string()));
			if let Some(token) = cookies.as_deref().and_then(|raw| get_cookie(raw, &self.csrf_cookie)) {
				headers.push((self.csrf_header.clone(), token));
			}
		}

		let request = HttpRequest {
			method,
			url: self.url(path),
			headers,
			body,
		};
		tracing::debug!(method = method.as_str(), url = %request.url, "api.request");

		let response = self.transport.send(request).await.inspect_err(|err| {
			tracing::debug!(method = method.as_str(), path, error = %err, "api.transport_failed");
		})?;
		let status = response.status;
		let data: Value = serde_json::from_slice(&response.body).map_err(|_| RequestError::Parse { status })?;
		if response.is_success() {
			return Ok(data);
		}

		let message = data
			.get("detail")
			.and_then(Value::as_str)
			.filter(|detail| !detail.is_empty())
			.unwrap_or(UNKNOWN_ERROR)
			.to_string();
		tracing::debug!(method = method.as_str(), path, status, %message, "api.error_response");
		Err(RequestError::Response { status, message, data })
	}
}

/// Loads a path with GET, so an [`ApiClient`] can back a resource loader.
#[async_trait]
impl Fetch for ApiClient {
	type Output = Value;
	type Error = RequestError;

	async fn fetch(&self, key: &str) -> Result<Value> {
		self.get(key).await
	}
}
