use std::error::Error;
use std::fmt;

/// Error raised when a state window has no recorded successor.
///
/// The sentence walk starts from the all-BEGIN window and only moves through
/// transitions observed during training, so every window it visits is known
/// to the model. Hitting an unknown or empty window therefore signals a
/// corrupted or hand-built model, not a recoverable sampling condition.
/// Callers propagate it; an exhausted attempt budget is reported as
/// `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct NoSuccessorError {
	window: Vec<String>,
}

impl NoSuccessorError {
	pub(crate) fn new(window: &[String]) -> Self {
		Self { window: window.to_vec() }
	}

	/// The state window that had no successor.
	pub fn window(&self) -> &[String] {
		&self.window
	}
}

impl fmt::Display for NoSuccessorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "No successor recorded for state [{}]", self.window.join(", "))
	}
}

impl Error for NoSuccessorError {}
