use serde::{Deserialize, Serialize};

use crate::tag::Tagger;

/// Separator between the surface form and the role label in composite tokens.
///
/// Reserved: neither surface words nor role labels may contain it. Both sides
/// are checked at tokenization time and a colliding sentence is rejected
/// before any transition is recorded.
pub const TAG_SEPARATOR: &str = "::";

/// Converts a sentence into an ordered token sequence and back.
///
/// The chain trains on whatever atoms the tokenizer emits, so the choice of
/// tokenizer decides what a "state" means. Two variants are provided: plain
/// surface words (`WordTokenizer`) and word-plus-role composites
/// (`PosTokenizer`).
///
/// # Invariants
/// - Implementations are deterministic
/// - `detokenize(tokenize(s))` reproduces the surface words of `s` in order
pub trait Tokenizer {
	/// Short variant label, used for cache file names and logging.
	fn name(&self) -> &'static str;

	/// Splits a sentence into tokens.
	///
	/// # Errors
	/// Returns an error for an empty sentence, or when the input collides
	/// with the reserved separator.
	fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String>;

	/// Joins tokens back into a surface sentence.
	fn detokenize(&self, tokens: &[String]) -> String;
}

/// Plain tokenizer: one token per whitespace-delimited surface word.
///
/// Punctuation stays attached to its word; the corpus cleanup pass has
/// already collapsed whitespace runs to single spaces.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
	fn name(&self) -> &'static str {
		"word"
	}

	fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String> {
		let tokens: Vec<String> = sentence.split_whitespace().map(str::to_owned).collect();
		if tokens.is_empty() {
			return Err("Cannot tokenize an empty sentence".to_owned());
		}
		Ok(tokens)
	}

	fn detokenize(&self, tokens: &[String]) -> String {
		tokens.join(" ")
	}
}

/// Composite tokenizer: emits `surface::ROLE` tokens.
///
/// Every surface word is paired with the label the tagging oracle assigns
/// it, so the chain learns transitions over (word, role) pairs. The same
/// spelling used in two roles becomes two distinct atoms, which sharpens the
/// transition statistics on small corpora. Labels exist only inside the
/// model: `detokenize` strips everything from the separator on, and
/// generated sentences read as plain text.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PosTokenizer<G: Tagger> {
	tagger: G,
}

impl<G: Tagger> PosTokenizer<G> {
	/// Creates a composite tokenizer around the given tagging oracle.
	pub fn new(tagger: G) -> Self {
		Self { tagger }
	}
}

impl<G: Tagger> Tokenizer for PosTokenizer<G> {
	fn name(&self) -> &'static str {
		"pos"
	}

	fn tokenize(&self, sentence: &str) -> Result<Vec<String>, String> {
		let words: Vec<&str> = sentence.split_whitespace().collect();
		if words.is_empty() {
			return Err("Cannot tokenize an empty sentence".to_owned());
		}

		let mut tokens = Vec::with_capacity(words.len());
		for word in words {
			if word.contains(TAG_SEPARATOR) {
				return Err(format!(
					"Word {:?} contains the reserved separator {:?}",
					word, TAG_SEPARATOR
				));
			}
			let role = self.tagger.tag(word);
			if role.contains(TAG_SEPARATOR) {
				return Err(format!(
					"Role label {:?} contains the reserved separator {:?}",
					role, TAG_SEPARATOR
				));
			}
			tokens.push(format!("{}{}{}", word, TAG_SEPARATOR, role));
		}
		Ok(tokens)
	}

	fn detokenize(&self, tokens: &[String]) -> String {
		tokens
			.iter()
			.map(|token| {
				token
					.split_once(TAG_SEPARATOR)
					.map_or(token.as_str(), |(surface, _)| surface)
			})
			.collect::<Vec<_>>()
			.join(" ")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Fixed-label oracle, so tests do not depend on the real tagger rules.
	struct FakeTagger(&'static str);

	impl Tagger for FakeTagger {
		fn tag(&self, _word: &str) -> String {
			self.0.to_owned()
		}
	}

	#[test]
	fn plain_tokens_round_trip() {
		let tokenizer = WordTokenizer;
		let tokens = tokenizer.tokenize("the cat sat on the mat.").unwrap();
		assert_eq!(tokens, ["the", "cat", "sat", "on", "the", "mat."]);
		assert_eq!(tokenizer.detokenize(&tokens), "the cat sat on the mat.");
	}

	#[test]
	fn empty_sentences_are_rejected() {
		assert!(WordTokenizer.tokenize("").is_err());
		assert!(WordTokenizer.tokenize("   ").is_err());
		assert!(PosTokenizer::new(FakeTagger("NOUN")).tokenize("").is_err());
	}

	#[test]
	fn composite_tokens_carry_the_role_and_shed_it_again() {
		let tokenizer = PosTokenizer::new(FakeTagger("NOUN"));
		let tokens = tokenizer.tokenize("cats sleep").unwrap();
		assert_eq!(tokens, ["cats::NOUN", "sleep::NOUN"]);
		assert_eq!(tokenizer.detokenize(&tokens), "cats sleep");
	}

	#[test]
	fn separator_collisions_fail_fast() {
		let tokenizer = PosTokenizer::new(FakeTagger("NOUN"));
		assert!(tokenizer.tokenize("broken::word here").is_err());

		let bad_oracle = PosTokenizer::new(FakeTagger("NO::UN"));
		assert!(bad_oracle.tokenize("anything").is_err());
	}

	#[test]
	fn detokenize_splits_on_the_first_separator_only() {
		let tokenizer = PosTokenizer::new(FakeTagger("X"));
		let tokens = vec!["word::X::Y".to_owned()];
		assert_eq!(tokenizer.detokenize(&tokens), "word");
	}
}
