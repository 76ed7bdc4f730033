use async_trait::async_trait;

/// Resolves a resource key into data.
///
/// Implementations report transport, status and parse failures through
/// `Error`; the loader stores whichever comes back without retrying.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
	type Output: Clone + Send + Sync + 'static;
	type Error: Clone + Send + Sync + 'static;

	async fn fetch(&self, key: &str) -> Result<Self::Output, Self::Error>;
}
