use std::collections::HashMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Represents a state in a chain model.
///
/// A `State` corresponds to a fixed window of consecutive tokens (`key`) and
/// stores all observed transitions from this window to the next token.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate successor occurrences during training
/// - Pick the next token using weighted random sampling
/// - Merge with another state having the same key (model combination support)
///
/// ## Invariants
/// - All successors belong to the same `key`
/// - Each successor occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct State {
	/// Identifier of the state (window of `order` tokens).
	key: Vec<String>,
	/// Outgoing transitions indexed by the next token.
	/// The value represents how many times this transition was observed.
	/// Example: { "sat" => 42, "ran" => 3 }
	successors: HashMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given window.
	pub(crate) fn new(key: &[String]) -> Self {
		Self {
			key: key.to_vec(),
			successors: HashMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next_token`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub(crate) fn add_successor(&mut self, next_token: &str) {
		*self.successors.entry(next_token.to_owned()).or_insert(0) += 1;
	}

	/// Picks the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the successors
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no successors.
	pub(crate) fn next<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.successors.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: usize = self.successors.values().sum();

		// Randomly select a bucket
		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&str> = None;
		for (next_token, occurrence) in &self.successors {
			if r < *occurrence {
				return Some(next_token);
			}
			r -= occurrence;
			fallback = Some(next_token);
		}

		// Fallback: should not happen, but kept for safety.
		fallback
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same window (`key`).
	/// Successor occurrence counts are summed.
	///
	/// This method is intended for combining models trained on
	/// separate corpora into a single one.
	///
	/// # Errors
	/// Returns an error if the state keys do not match.
	pub(crate) fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.key != other.key {
			return Err("Key mismatch".to_owned());
		}

		for (next_token, occurrence) in &other.successors {
			*self.successors.entry(next_token.clone()).or_insert(0) += *occurrence;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn key(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| (*w).to_owned()).collect()
	}

	#[test]
	fn single_successor_is_always_picked() {
		let mut state = State::new(&key(&["the", "cat"]));
		state.add_successor("sat");

		let mut rng = SmallRng::seed_from_u64(0);
		for _ in 0..10 {
			assert_eq!(state.next(&mut rng), Some("sat"));
		}
	}

	#[test]
	fn sampling_only_returns_recorded_successors() {
		let mut state = State::new(&key(&["the"]));
		state.add_successor("cat");
		state.add_successor("dog");
		state.add_successor("cat");

		let mut rng = SmallRng::seed_from_u64(42);
		for _ in 0..50 {
			let picked = state.next(&mut rng).unwrap();
			assert!(picked == "cat" || picked == "dog");
		}
	}

	#[test]
	fn empty_state_yields_nothing() {
		let state = State::new(&key(&["lonely"]));
		let mut rng = SmallRng::seed_from_u64(1);
		assert_eq!(state.next(&mut rng), None);
	}

	#[test]
	fn merge_sums_occurrence_counts() {
		let mut left = State::new(&key(&["the"]));
		left.add_successor("cat");
		left.add_successor("cat");

		let mut right = State::new(&key(&["the"]));
		right.add_successor("cat");
		right.add_successor("dog");

		left.merge(&right).unwrap();

		let mut expected = State::new(&key(&["the"]));
		expected.add_successor("cat");
		expected.add_successor("cat");
		expected.add_successor("cat");
		expected.add_successor("dog");
		assert_eq!(left, expected);
	}

	#[test]
	fn merge_rejects_different_keys() {
		let mut left = State::new(&key(&["the"]));
		let right = State::new(&key(&["a"]));
		assert!(left.merge(&right).is_err());
	}
}
