//! REST client for the curio server.
//!
//! [`ApiClient`] sends JSON requests through a [`Transport`] (normally
//! [`ReqwestTransport`]) and maps failures onto [`RequestError`]: transport
//! failure, non-success status with the server's `detail`, or an unreadable
//! body.

mod client;
mod cookie;
mod error;
mod transport;

pub use client::ApiClient;
pub use cookie::{CookieJar, CookieSource, get_cookie};
pub use error::{ErrorKind, RequestError, Result, UNKNOWN_ERROR, UNPARSEABLE};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
