/// Default attempt budget for a sampling call.
pub const DEFAULT_ATTEMPTS: usize = 10;

/// Input parameters for one rejection-sampling call.
///
/// `SampleParams` bundles the attempt budget with the rejection checks that
/// are active for the call. The fallback cascade is expressed as a fixed
/// sequence of these, each stage looser than the one before.
///
/// # Responsibilities
/// - Cap the number of raw walks (`max_attempts`)
/// - Toggle the novelty filter (`require_novel`)
/// - Optionally cap the sentence length in characters (`max_chars`)
///
/// # Invariants
/// - A call with `max_attempts == 0` draws nothing and reports `None`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
	/// Maximum number of raw walks before giving up.
	pub max_attempts: usize,

	/// Reject candidates that overlap too heavily with one source sentence.
	pub require_novel: bool,

	/// Reject candidates longer than this many characters, when set.
	pub max_chars: Option<usize>,
}

impl SampleParams {
	/// Creates parameters with the given attempt budget and default checks.
	pub fn new(max_attempts: usize) -> Self {
		Self { max_attempts, ..Self::default() }
	}
}

impl Default for SampleParams {
	/// Default parameters: novelty filter on, no length cap.
	fn default() -> Self {
		Self {
			max_attempts: DEFAULT_ATTEMPTS,
			require_novel: true,
			max_chars: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_keep_the_novelty_filter_on() {
		let params = SampleParams::default();
		assert_eq!(params.max_attempts, DEFAULT_ATTEMPTS);
		assert!(params.require_novel);
		assert_eq!(params.max_chars, None);
	}

	#[test]
	fn new_overrides_only_the_budget() {
		let params = SampleParams::new(500);
		assert_eq!(params.max_attempts, 500);
		assert!(params.require_novel);
	}
}
