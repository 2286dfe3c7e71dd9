use std::collections::HashSet;
use std::path::Path;

use log::debug;
use rand::Rng;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::chain_model::ChainModel;
use super::sample_params::SampleParams;
use crate::corpus::{CorpusProvider, FileCorpus};
use crate::error::NoSuccessorError;
use crate::io::{file_stem_name, sibling_with_extension};
use crate::tokenizer::Tokenizer;

/// A trained text model: the transition chain plus everything needed to
/// turn raw walks into acceptable sentences.
///
/// This struct manages:
/// - `chain`: the fixed-order transition model over the tokenizer's atoms.
/// - `corpus_bigrams`: per-sentence word-bigram sets of the deduplicated
///   source sentences, used by the novelty filter.
/// - `corpus_names`: names of the corpus files this model was trained from.
/// - `tokenizer`: the variant the model was trained with; a model only ever
///   samples through the tokenizer it learned under.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TextModel<T: Tokenizer> {
	chain: ChainModel,
	corpus_bigrams: Vec<HashSet<String>>,
	corpus_names: Vec<String>,
	tokenizer: T,
}

impl<T: Tokenizer> TextModel<T> {
	/// Trains a model of the given window width over the corpus sentences.
	///
	/// Every sentence is tokenized and fed to the chain. Counts accumulate
	/// additively, so the order of the input sentences does not affect the
	/// result.
	///
	/// # Notes
	/// - A duplicated sentence counts twice in the transition statistics.
	/// - The novelty filter data keeps one entry per distinct sentence.
	///
	/// # Errors
	/// Fails on an empty corpus, a zero order, or a sentence the tokenizer
	/// rejects.
	pub fn train(sentences: &[String], order: usize, tokenizer: T) -> Result<Self, String> {
		if sentences.is_empty() {
			return Err("Cannot train on an empty corpus".to_owned());
		}

		let mut chain = ChainModel::new(order)?;
		let mut seen: HashSet<&str> = HashSet::new();
		let mut corpus_bigrams: Vec<HashSet<String>> = Vec::new();

		for sentence in sentences {
			let tokens = tokenizer.tokenize(sentence)?;
			chain.add_sequence(&tokens);

			// Duplicates still weigh on the chain, but the novelty filter
			// needs each source sentence only once.
			if seen.insert(sentence.as_str()) {
				corpus_bigrams.push(word_bigrams(sentence));
			}
		}

		debug!(
			"Trained '{}' model: order {}, {} states, {} distinct sentences",
			tokenizer.name(),
			order,
			chain.state_count(),
			corpus_bigrams.len()
		);

		Ok(Self { chain, corpus_bigrams, corpus_names: Vec::new(), tokenizer })
	}

	/// Draws one sentence by rejection sampling.
	///
	/// Runs up to `params.max_attempts` raw walks. Each candidate is
	/// detokenized, then dropped if the novelty filter rejects it (when
	/// `require_novel` is set) or if it exceeds `max_chars` (when set). The
	/// first candidate passing all active checks is returned.
	///
	/// `Ok(None)` means the attempt budget ran out without an acceptable
	/// candidate. This is an expected outcome on strict parameters, not an
	/// error; the fallback cascade in `generator` builds on it.
	///
	/// # Errors
	/// Propagates `NoSuccessorError` from the walk (internal defect).
	pub fn sample<R: Rng + ?Sized>(
		&self,
		params: &SampleParams,
		rng: &mut R,
	) -> Result<Option<String>, NoSuccessorError> {
		for _ in 0..params.max_attempts {
			let tokens = self.chain.walk(rng)?;
			let sentence = self.tokenizer.detokenize(&tokens);

			if params.require_novel && self.is_stale(&sentence) {
				continue;
			}
			if let Some(budget) = params.max_chars {
				if sentence.chars().count() > budget {
					continue;
				}
			}
			return Ok(Some(sentence));
		}

		debug!("Sampling budget of {} attempts exhausted", params.max_attempts);
		Ok(None)
	}

	/// The novelty filter: does the candidate lean too heavily on a single
	/// source sentence?
	///
	/// Rejects when more than half of the candidate's word bigrams occur
	/// contiguously within some one source sentence. This is a heuristic
	/// guard against regurgitated training material, not a proof of novelty:
	/// a candidate stitched from many different sources passes even if every
	/// word of it appears somewhere in the corpus.
	fn is_stale(&self, sentence: &str) -> bool {
		let words: Vec<&str> = sentence.split_whitespace().collect();
		let bigrams: Vec<String> = words
			.windows(2)
			.map(|pair| format!("{} {}", pair[0], pair[1]))
			.collect();
		if bigrams.is_empty() {
			// Zero or one word: nothing to compare, accept.
			return false;
		}

		self.corpus_bigrams.iter().any(|source| {
			let matched = bigrams.iter().filter(|bigram| source.contains(bigram.as_str())).count();
			2 * matched > bigrams.len()
		})
	}

	/// Combines two trained models into a new one.
	///
	/// Transition counts are summed; novelty data and corpus names are
	/// concatenated. Both inputs are consumed: combination builds a new
	/// value and never mutates a model in place. The type parameter already
	/// restricts combination to models of the same tokenizer variant.
	///
	/// # Errors
	/// Returns an error if the orders differ.
	pub fn combine(mut self, other: Self) -> Result<Self, String> {
		self.chain.merge(&other.chain)?;
		self.corpus_bigrams.extend(other.corpus_bigrams);
		self.corpus_names.extend(other.corpus_names);
		Ok(self)
	}

	/// Returns the underlying transition chain.
	pub fn chain(&self) -> &ChainModel {
		&self.chain
	}

	/// Returns the window width the model was trained with.
	pub fn order(&self) -> usize {
		self.chain.order()
	}

	/// Returns the names of the corpus files this model was trained from.
	///
	/// Empty for models trained directly from sentences.
	pub fn corpus_names(&self) -> &[String] {
		&self.corpus_names
	}

	/// Returns the number of distinct source sentences.
	pub fn sentence_count(&self) -> usize {
		self.corpus_bigrams.len()
	}
}

impl<T: Tokenizer + Serialize + DeserializeOwned> TextModel<T> {
	/// Loads a model from a corpus text file, using a binary cache if one
	/// exists beside it.
	///
	/// - The cache lives at `<stem>.<variant>.bin` next to the corpus file
	///   and is encoded with `postcard`.
	/// - On a cache miss the corpus is cleaned, split into sentences and
	///   trained from scratch, then the cache is written for future runs.
	///
	/// # Notes
	/// - A cache hit wins over `order`; delete the `.bin` file to retrain
	///   with a different window width.
	///
	/// # Errors
	/// Fails on file I/O errors, cache decoding errors, or training errors.
	pub fn from_corpus_file<P: AsRef<Path>>(
		filepath: P,
		order: usize,
		tokenizer: T,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let cache_path = sibling_with_extension(&filepath, &format!("{}.bin", tokenizer.name()))?;

		let mut model;
		if cache_path.exists() {
			let bytes = std::fs::read(&cache_path)?;
			model = postcard::from_bytes(&bytes)?;
			debug!("Loaded cached model from {}", cache_path.display());
		} else {
			let sentences = FileCorpus::new(&filepath).load()?;
			model = Self::train(&sentences, order, tokenizer)?;

			let bytes = postcard::to_stdvec(&model)?;
			std::fs::write(&cache_path, bytes)?;
			debug!("Wrote model cache to {}", cache_path.display());
		}
		model.corpus_names.push(file_stem_name(&filepath)?);
		Ok(model)
	}

	/// Serializes the model to a file with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<(), Box<dyn std::error::Error>> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(filepath, bytes)?;
		Ok(())
	}

	/// Reads a model back from a `postcard` file.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, Box<dyn std::error::Error>> {
		let bytes = std::fs::read(filepath)?;
		Ok(postcard::from_bytes(&bytes)?)
	}
}

/// Collects the contiguous word pairs of a surface sentence.
fn word_bigrams(sentence: &str) -> HashSet<String> {
	let words: Vec<&str> = sentence.split_whitespace().collect();
	words
		.windows(2)
		.map(|pair| format!("{} {}", pair[0], pair[1]))
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::tokenizer::WordTokenizer;

	fn sentences(lines: &[&str]) -> Vec<String> {
		lines.iter().map(|s| (*s).to_owned()).collect()
	}

	#[test]
	fn training_on_an_empty_corpus_fails() {
		assert!(TextModel::train(&[], 2, WordTokenizer).is_err());
	}

	#[test]
	fn regurgitated_sentences_are_stale() {
		let corpus = sentences(&["the cat sat on the mat"]);
		let model = TextModel::train(&corpus, 2, WordTokenizer).unwrap();

		assert!(model.is_stale("the cat sat on the mat"));
	}

	#[test]
	fn half_overlap_is_still_novel() {
		// Source bigrams: "a b", "b c", "c d", "d e"
		let corpus = sentences(&["a b c d e"]);
		let model = TextModel::train(&corpus, 1, WordTokenizer).unwrap();

		// Exactly two of four candidate bigrams match: not stale
		assert!(!model.is_stale("a b c x y"));
		// Three of four match: stale
		assert!(model.is_stale("a b c d x"));
	}

	#[test]
	fn overlap_must_come_from_one_source_sentence() {
		let corpus = sentences(&["a b c", "c d e"]);
		let model = TextModel::train(&corpus, 1, WordTokenizer).unwrap();

		// "a b", "b c" sit in the first source, "c d", "d e" in the second;
		// neither source alone covers more than half of the candidate.
		assert!(!model.is_stale("a b c d e"));
	}

	#[test]
	fn single_word_candidates_are_never_stale() {
		let corpus = sentences(&["a b c"]);
		let model = TextModel::train(&corpus, 1, WordTokenizer).unwrap();
		assert!(!model.is_stale("a"));
	}

	#[test]
	fn duplicates_weigh_on_the_chain_but_not_the_novelty_set() {
		let once = sentences(&["the cat sat"]);
		let twice = sentences(&["the cat sat", "the cat sat"]);

		let single = TextModel::train(&once, 2, WordTokenizer).unwrap();
		let double = TextModel::train(&twice, 2, WordTokenizer).unwrap();

		assert_eq!(double.sentence_count(), 1);
		// Doubled counts make the chains observably different
		assert_ne!(single.chain(), double.chain());
	}

	#[test]
	fn strict_sampling_on_a_tiny_corpus_reports_none() {
		let corpus = sentences(&["the cat sat on the mat"]);
		let model = TextModel::train(&corpus, 2, WordTokenizer).unwrap();

		// Order 2 over one sentence can only reproduce it, and the novelty
		// filter rejects the reproduction every time.
		let params = SampleParams { max_attempts: 30, require_novel: true, max_chars: None };
		let mut rng = SmallRng::seed_from_u64(3);
		assert_eq!(model.sample(&params, &mut rng).unwrap(), None);

		// Without the filter the first walk is accepted.
		let loose = SampleParams { max_attempts: 1, require_novel: false, max_chars: None };
		let drawn = model.sample(&loose, &mut rng).unwrap();
		assert_eq!(drawn.as_deref(), Some("the cat sat on the mat"));
	}

	#[test]
	fn length_cap_rejects_long_candidates() {
		let corpus = sentences(&["one single rather long training sentence here"]);
		let model = TextModel::train(&corpus, 2, WordTokenizer).unwrap();

		let params = SampleParams { max_attempts: 5, require_novel: false, max_chars: Some(10) };
		let mut rng = SmallRng::seed_from_u64(0);
		assert_eq!(model.sample(&params, &mut rng).unwrap(), None);
	}

	#[test]
	fn zero_attempts_draw_nothing() {
		let corpus = sentences(&["a b c"]);
		let model = TextModel::train(&corpus, 1, WordTokenizer).unwrap();

		let params = SampleParams { max_attempts: 0, require_novel: false, max_chars: None };
		let mut rng = SmallRng::seed_from_u64(0);
		assert_eq!(model.sample(&params, &mut rng).unwrap(), None);
	}

	#[test]
	fn combining_equals_training_on_the_concatenation() {
		let first = sentences(&["the cat sat on the mat"]);
		let second = sentences(&["the dog slept by the door"]);
		let all = sentences(&[
			"the cat sat on the mat",
			"the dog slept by the door",
		]);

		let combined = TextModel::train(&first, 2, WordTokenizer)
			.unwrap()
			.combine(TextModel::train(&second, 2, WordTokenizer).unwrap())
			.unwrap();
		let whole = TextModel::train(&all, 2, WordTokenizer).unwrap();

		assert_eq!(combined.chain(), whole.chain());
		assert_eq!(combined.sentence_count(), whole.sentence_count());
	}

	#[test]
	fn combining_mismatched_orders_fails() {
		let corpus = sentences(&["a b c"]);
		let left = TextModel::train(&corpus, 1, WordTokenizer).unwrap();
		let right = TextModel::train(&corpus, 2, WordTokenizer).unwrap();
		assert!(left.combine(right).is_err());
	}
}
