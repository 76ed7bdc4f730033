//! Task primitives for the curio client core.
//!
//! * [`spawn`]: runs futures on the ambient tokio runtime (or a shared fallback)
//! * [`CancelableTask`]: suppress-after-the-fact wrapper for one async operation
//! * [`TaskToken`] / [`GenerationClock`]: per-cycle cancellation flags for loads and timers
//! * [`Timers`]: cancelable one-shot timers

mod class;
mod spawn;
mod task;
mod timer;
mod token;

pub use class::TaskClass;
pub use spawn::spawn;
pub use task::{BoxFutureStatic, CancelMode, CancelableTask};
pub use timer::{TimerId, Timers};
pub use token::{GenerationClock, TaskToken};
