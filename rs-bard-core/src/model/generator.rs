use log::warn;
use rand::Rng;

use super::sample_params::{DEFAULT_ATTEMPTS, SampleParams};
use super::text_model::TextModel;
use crate::error::NoSuccessorError;
use crate::tokenizer::Tokenizer;

/// Character cap used by the short-sentence fallback stage.
const SHORT_STAGE_CHARS: usize = 140;

/// Attempt budget of the final, unconstrained fallback stage.
const FINAL_STAGE_ATTEMPTS: usize = 200;

/// Builds the fallback cascade: four sampling stages, each looser than the
/// one before.
///
/// 1. The caller's full budget with the novelty filter on.
/// 2. One single attempt with the filter off. Novelty is abandoned before
///    any further budget is spent on it; the lone attempt is deliberate and
///    kept as-is.
/// 3. Default budget, filter off, preferring a short sentence.
/// 4. A large budget, filter off, no length cap.
fn fallback_stages(max_tries: usize) -> [SampleParams; 4] {
	[
		SampleParams { max_attempts: max_tries, require_novel: true, max_chars: None },
		SampleParams { max_attempts: 1, require_novel: false, max_chars: None },
		SampleParams {
			max_attempts: DEFAULT_ATTEMPTS,
			require_novel: false,
			max_chars: Some(SHORT_STAGE_CHARS),
		},
		SampleParams { max_attempts: FINAL_STAGE_ATTEMPTS, require_novel: false, max_chars: None },
	]
}

/// Runs sampling stages in order and returns the first sentence produced.
///
/// A stage reporting `None` hands over to the next one; an error stops the
/// cascade immediately.
fn run_cascade<F>(stages: &[SampleParams], mut sample: F) -> Result<Option<String>, NoSuccessorError>
where
	F: FnMut(&SampleParams) -> Result<Option<String>, NoSuccessorError>,
{
	for params in stages {
		if let Some(sentence) = sample(params)? {
			return Ok(Some(sentence));
		}
	}
	Ok(None)
}

/// Generates one sentence, degrading through the fallback cascade.
///
/// Tries the four stages of `fallback_stages` in order and returns the
/// first sentence any of them produces. Despite the name this is not an
/// absolute guarantee: a model whose every walk gets rejected through the
/// final stage as well still comes back as `Ok(None)`, and callers surface
/// that as an empty slot. In practice only degenerate corpora get there.
///
/// # Errors
/// Propagates `NoSuccessorError` from the underlying walks.
pub fn generate_guaranteed<T, R>(
	model: &TextModel<T>,
	max_tries: usize,
	rng: &mut R,
) -> Result<Option<String>, NoSuccessorError>
where
	T: Tokenizer,
	R: Rng + ?Sized,
{
	let sentence = run_cascade(&fallback_stages(max_tries), |params| model.sample(params, rng))?;
	if sentence.is_none() {
		warn!("Fallback cascade exhausted, no sentence produced");
	}
	Ok(sentence)
}

/// Generates a batch of sentences, one full cascade per slot.
///
/// A slot whose cascade comes back empty stays `None` without aborting the
/// remaining slots.
///
/// # Errors
/// Propagates `NoSuccessorError` from the underlying walks.
pub fn generate_batch<T, R>(
	model: &TextModel<T>,
	count: usize,
	max_tries: usize,
	rng: &mut R,
) -> Result<Vec<Option<String>>, NoSuccessorError>
where
	T: Tokenizer,
	R: Rng + ?Sized,
{
	let mut batch = Vec::with_capacity(count);
	for _ in 0..count {
		batch.push(generate_guaranteed(model, max_tries, rng)?);
	}
	Ok(batch)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stages_follow_the_declared_contract() {
		let stages = fallback_stages(42);

		assert_eq!(
			stages[0],
			SampleParams { max_attempts: 42, require_novel: true, max_chars: None }
		);
		assert_eq!(
			stages[1],
			SampleParams { max_attempts: 1, require_novel: false, max_chars: None }
		);
		assert_eq!(
			stages[2],
			SampleParams {
				max_attempts: DEFAULT_ATTEMPTS,
				require_novel: false,
				max_chars: Some(140),
			}
		);
		assert_eq!(
			stages[3],
			SampleParams { max_attempts: 200, require_novel: false, max_chars: None }
		);
	}

	#[test]
	fn cascade_stops_at_the_first_producing_stage() {
		let stages = fallback_stages(100);
		let mut visited: Vec<SampleParams> = Vec::new();

		let sentence = run_cascade(&stages, |params| {
			visited.push(*params);
			if visited.len() < 3 { Ok(None) } else { Ok(Some("done".to_owned())) }
		})
		.unwrap();

		assert_eq!(sentence.as_deref(), Some("done"));
		assert_eq!(visited, stages[..3]);
	}

	#[test]
	fn cascade_reports_none_when_every_stage_fails() {
		let stages = fallback_stages(5);
		let mut calls = 0;

		let sentence = run_cascade(&stages, |_| {
			calls += 1;
			Ok(None)
		})
		.unwrap();

		assert_eq!(sentence, None);
		assert_eq!(calls, stages.len());
	}

	#[test]
	fn cascade_propagates_defects_immediately() {
		let stages = fallback_stages(5);
		let mut calls = 0;

		let result = run_cascade(&stages, |_| {
			calls += 1;
			Err(NoSuccessorError::new(&["ghost".to_owned()]))
		});

		assert!(result.is_err());
		assert_eq!(calls, 1);
	}
}
