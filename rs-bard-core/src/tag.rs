use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Assigns a grammatical-role label to a single surface word.
///
/// The composite tokenizer pairs every word with the label returned here, so
/// implementations must be deterministic: the same word always maps to the
/// same label, with no hidden context.
pub trait Tagger {
	/// Returns the role label for `word` (ex. `"NOUN"`, `"VERB"`).
	fn tag(&self, word: &str) -> String;
}

/// Closed-class wordlist: words whose role never depends on context.
///
/// Coverage is aimed at literary English, so the archaic second-person forms
/// (`thou`, `thee`, `thy`, `hath`, ...) are listed alongside the modern ones.
const CLOSED_CLASS: &[(&str, &str)] = &[
	// Determiners
	("the", "DET"), ("a", "DET"), ("an", "DET"), ("this", "DET"), ("that", "DET"),
	("these", "DET"), ("those", "DET"), ("no", "DET"), ("every", "DET"), ("each", "DET"),
	("some", "DET"), ("any", "DET"), ("all", "DET"), ("both", "DET"),
	("thy", "DET"), ("thine", "DET"),
	// Pronouns
	("i", "PRON"), ("you", "PRON"), ("he", "PRON"), ("she", "PRON"), ("it", "PRON"),
	("we", "PRON"), ("they", "PRON"), ("me", "PRON"), ("him", "PRON"), ("her", "PRON"),
	("us", "PRON"), ("them", "PRON"), ("who", "PRON"), ("whom", "PRON"), ("what", "PRON"),
	("my", "PRON"), ("your", "PRON"), ("his", "PRON"), ("its", "PRON"), ("our", "PRON"),
	("their", "PRON"), ("mine", "PRON"), ("yours", "PRON"), ("himself", "PRON"),
	("herself", "PRON"), ("itself", "PRON"), ("thou", "PRON"), ("thee", "PRON"), ("ye", "PRON"),
	// Adpositions
	("of", "ADP"), ("in", "ADP"), ("to", "ADP"), ("on", "ADP"), ("at", "ADP"),
	("by", "ADP"), ("for", "ADP"), ("with", "ADP"), ("from", "ADP"), ("into", "ADP"),
	("upon", "ADP"), ("over", "ADP"), ("under", "ADP"), ("through", "ADP"),
	("against", "ADP"), ("within", "ADP"), ("without", "ADP"), ("unto", "ADP"),
	// Conjunctions
	("and", "CONJ"), ("or", "CONJ"), ("but", "CONJ"), ("nor", "CONJ"),
	("if", "CONJ"), ("though", "CONJ"), ("although", "CONJ"), ("because", "CONJ"),
	("while", "CONJ"), ("when", "CONJ"), ("whether", "CONJ"), ("lest", "CONJ"),
	// Auxiliaries and modals
	("am", "AUX"), ("is", "AUX"), ("are", "AUX"), ("was", "AUX"), ("were", "AUX"),
	("be", "AUX"), ("been", "AUX"), ("being", "AUX"), ("have", "AUX"), ("has", "AUX"),
	("had", "AUX"), ("do", "AUX"), ("does", "AUX"), ("did", "AUX"), ("will", "AUX"),
	("would", "AUX"), ("shall", "AUX"), ("should", "AUX"), ("may", "AUX"), ("might", "AUX"),
	("must", "AUX"), ("can", "AUX"), ("could", "AUX"),
	("hath", "AUX"), ("doth", "AUX"), ("art", "AUX"), ("wilt", "AUX"), ("shalt", "AUX"),
	// Adverbs
	("not", "ADV"), ("never", "ADV"), ("ever", "ADV"), ("always", "ADV"),
	("very", "ADV"), ("too", "ADV"), ("so", "ADV"), ("then", "ADV"),
	("there", "ADV"), ("here", "ADV"), ("now", "ADV"), ("thus", "ADV"),
	("hence", "ADV"), ("more", "ADV"), ("most", "ADV"), ("well", "ADV"),
];

/// Rule-based English tagger: a closed-class lexicon plus suffix heuristics.
///
/// A lightweight stand-in for a full linguistic pipeline. Produces coarse
/// labels only (`DET`, `PRON`, `ADP`, `CONJ`, `AUX`, `ADV`, `VERB`, `ADJ`,
/// `NOUN`, `NUM`, `PUNCT`); open-class words fall through the suffix rules
/// and default to `NOUN`.
///
/// # Responsibilities
/// - Normalize the word (lowercase, surrounding punctuation stripped)
/// - Look it up in the closed-class lexicon
/// - Otherwise classify by suffix shape
///
/// # Invariants
/// - Deterministic: one word, one label
/// - Labels never contain the composite-token separator
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HeuristicTagger {
	lexicon: HashMap<String, String>,
}

impl HeuristicTagger {
	/// Creates a tagger with the built-in closed-class lexicon.
	pub fn new() -> Self {
		let lexicon = CLOSED_CLASS
			.iter()
			.map(|(word, label)| ((*word).to_owned(), (*label).to_owned()))
			.collect();
		Self { lexicon }
	}
}

impl Default for HeuristicTagger {
	fn default() -> Self {
		Self::new()
	}
}

impl Tagger for HeuristicTagger {
	fn tag(&self, word: &str) -> String {
		// "The," and "the" must share a label, so normalize before lookup.
		let core: String = word
			.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
			.to_lowercase();

		if core.is_empty() {
			return "PUNCT".to_owned();
		}
		if core.chars().all(|c| c.is_ascii_digit()) {
			return "NUM".to_owned();
		}
		if let Some(label) = self.lexicon.get(&core) {
			return label.clone();
		}

		suffix_label(&core).to_owned()
	}
}

/// Classifies an open-class word by its suffix shape.
///
/// Length guards keep short words like "red" or "king" out of the verbal
/// rules. Anything unmatched is treated as a noun.
fn suffix_label(word: &str) -> &'static str {
	if word.len() > 3 && word.ends_with("ly") {
		return "ADV";
	}
	if word.len() > 4 && word.ends_with("ing") {
		return "VERB";
	}
	if word.len() > 3 && word.ends_with("ed") {
		return "VERB";
	}
	if word.len() > 5
		&& ["tion", "sion", "ment", "ness", "ship", "hood"]
			.iter()
			.any(|suffix| word.ends_with(suffix))
	{
		return "NOUN";
	}
	if word.len() > 4
		&& ["ous", "ful", "ive", "less", "able", "ible", "ish"]
			.iter()
			.any(|suffix| word.ends_with(suffix))
	{
		return "ADJ";
	}
	"NOUN"
}
