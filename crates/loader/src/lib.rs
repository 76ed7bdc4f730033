//! Resource loading for curio views.
//!
//! A [`ResourceLoader`] owns the [`LoadState`] of whatever a view currently
//! displays, fetched through a [`Fetch`] implementation and keyed by a
//! request path.

mod error;
mod fetch;
mod loader;
mod state;

pub use error::{LoaderError, Result};
pub use fetch::Fetch;
pub use loader::{OnLoad, ResourceLoader};
pub use state::{LoadState, LoaderPhase};
