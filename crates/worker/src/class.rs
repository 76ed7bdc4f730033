/// Execution classes used to label spawned work in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Loads whose outcome feeds a view that is currently displayed.
	Interactive,
	/// Work nobody is waiting on, such as fire-and-forget mutations.
	Background,
	/// Deferred callbacks driven by [`crate::Timers`].
	Timer,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::Timer => "timer",
		}
	}
}
