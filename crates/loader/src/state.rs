/// Where a [`ResourceLoader`](crate::ResourceLoader) is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderPhase {
	/// Created, nothing requested yet.
	#[default]
	Idle,
	Loading,
	Ready,
	Failed,
	/// Detached. Terminal: no further state updates.
	Stopped,
}

impl LoaderPhase {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Loading => "loading",
			Self::Ready => "ready",
			Self::Failed => "failed",
			Self::Stopped => "stopped",
		}
	}
}

/// What a view renders: data, an error, or a loading indicator.
///
/// While `is_loading` is set, `data` may still hold the previous result and
/// should not be shown. A settled state never holds both data and error.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadState<T, E> {
	pub data: Option<T>,
	pub error: Option<E>,
	pub is_loading: bool,
}

impl<T, E> Default for LoadState<T, E> {
	fn default() -> Self {
		Self {
			data: None,
			error: None,
			is_loading: true,
		}
	}
}

impl<T, E> LoadState<T, E> {
	pub(crate) fn loaded(data: T) -> Self {
		Self {
			data: Some(data),
			error: None,
			is_loading: false,
		}
	}

	pub(crate) fn failed(error: E) -> Self {
		Self {
			data: None,
			error: Some(error),
			is_loading: false,
		}
	}

	pub fn is_settled(&self) -> bool {
		!self.is_loading
	}
}
