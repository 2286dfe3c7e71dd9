use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::NoSuccessorError;

/// Sentinel token padded before every training sequence.
///
/// Never appears in generated output; the all-BEGIN window is the entry
/// point of every sentence walk.
pub const BEGIN_TOKEN: &str = "___BEGIN__";

/// Sentinel token appended after every training sequence.
///
/// Sampling it ends the walk; it never appears in generated output.
pub const END_TOKEN: &str = "___END__";

/// Hard ceiling on the length of a single walk, in tokens.
///
/// A chain trained on real sentences always reaches `END_TOKEN`, but the
/// ceiling bounds the walk against pathological cycles. A cut-off walk is
/// returned as-is, without the sentinel.
pub const MAX_WALK_STEPS: usize = 1000;

/// Represents a fixed-order Markov chain over token windows.
///
/// The `ChainModel` stores states for windows of `order` consecutive tokens
/// and allows probabilistic prediction of the next token based on learned
/// sequences.
///
/// # Responsibilities
/// - Accumulate transition counts from sentinel-padded token sequences
/// - Predict the next token given a window
/// - Run the raw sentence walk from the all-BEGIN window
/// - Merge with another chain model of the same order
///
/// # Invariants
/// - `order` is always >= 1
/// - Every recorded state has at least one successor
/// - All successor occurrence counts are >= 1
/// - Training order does not matter: counts are additive
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChainModel {
	/// The window width of the model (number of tokens forming one state).
	order: usize, // must be >= 1

	/// Mapping from a window of `order` tokens to its corresponding state.
	states: HashMap<Vec<String>, State>,
}

impl ChainModel {
	/// Creates a new empty chain model of the given window width.
	///
	/// # Errors
	/// Returns an error if `order` is zero.
	pub(crate) fn new(order: usize) -> Result<Self, String> {
		if order == 0 {
			return Err("Order must be >= 1".to_owned());
		}
		Ok(Self { order, states: HashMap::new() })
	}

	/// Returns the window width of the model.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the number of distinct states recorded.
	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	/// Adds one tokenized sentence to the model.
	///
	/// The sequence is padded to `[BEGIN; order] + tokens + [END]`, then a
	/// window slides across it one position at a time; each window becomes a
	/// state and the token following it a successor.
	///
	/// # Notes
	/// - Sentences shorter than the order still contribute their
	///   BEGIN-heavy windows; nothing is skipped.
	/// - Feeding the same sentence twice doubles its counts.
	pub(crate) fn add_sequence(&mut self, tokens: &[String]) {
		let mut padded: Vec<String> = vec![BEGIN_TOKEN.to_owned(); self.order];
		padded.reserve(tokens.len() + 1);
		padded.extend_from_slice(tokens);
		padded.push(END_TOKEN.to_owned());

		// For each window and the token that follows it
		for window in padded.windows(self.order + 1) {
			let (key, successor) = window.split_at(self.order);
			let state = self.states.entry(key.to_vec()).or_insert_with(|| State::new(key));
			state.add_successor(&successor[0]);
		}
	}

	/// Predicts the next token after the given window.
	///
	/// The probability of selecting a token is proportional to its observed
	/// occurrence count.
	///
	/// # Errors
	/// Fails with `NoSuccessorError` if the window was never recorded. The
	/// sentence walk cannot trigger this (it starts from the all-BEGIN
	/// window and only follows observed transitions), so callers treat the
	/// error as a defect and propagate it.
	pub fn next_token<R: Rng + ?Sized>(
		&self,
		window: &[String],
		rng: &mut R,
	) -> Result<&str, NoSuccessorError> {
		self.states
			.get(window)
			.and_then(|state| state.next(rng))
			.ok_or_else(|| NoSuccessorError::new(window))
	}

	/// Runs one raw sentence walk.
	///
	/// Starts at the all-BEGIN window, repeatedly samples the next token and
	/// slides the window forward, until `END_TOKEN` is drawn or
	/// `MAX_WALK_STEPS` tokens have been emitted. The returned sequence
	/// contains no sentinels.
	///
	/// # Errors
	/// Propagates `NoSuccessorError` from `next_token`.
	pub fn walk<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>, NoSuccessorError> {
		let mut window: Vec<String> = vec![BEGIN_TOKEN.to_owned(); self.order];
		let mut tokens: Vec<String> = Vec::new();

		while tokens.len() < MAX_WALK_STEPS {
			let next = self.next_token(&window, rng)?.to_owned();
			if next == END_TOKEN {
				break;
			}
			window.remove(0);
			window.push(next.clone());
			tokens.push(next);
		}

		Ok(tokens)
	}

	/// Merges another chain model into this one.
	///
	/// # Notes
	/// - Both models must have the same order.
	/// - Occurrence counts for matching states and successors are summed.
	///
	/// # Errors
	/// Returns an error if the model orders do not match.
	pub(crate) fn merge(&mut self, other: &Self) -> Result<(), String> {
		if self.order != other.order {
			return Err("Order mismatch".to_owned());
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state)?;
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}
