use thiserror::Error;

/// Misuse of a [`ResourceLoader`](crate::ResourceLoader) lifecycle.
///
/// Fetch failures are not reported here; they land in
/// [`LoadState::error`](crate::LoadState::error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoaderError {
	/// The loader was detached and accepts no further loads.
	#[error("loader has been stopped")]
	Stopped,
	/// `refresh` was called before any key was loaded.
	#[error("no resource key to refresh")]
	NoKey,
}

pub type Result<T> = std::result::Result<T, LoaderError>;
