use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::io::read_text;

/// Produces the ordered sentences a text model trains on.
///
/// The contract is deliberately narrow: sentences come back cleaned and
/// non-empty, ready for tokenization. Everything upstream of that (files,
/// archives, HTTP, test fixtures) hides behind this trait.
pub trait CorpusProvider {
	/// Loads and prepares the corpus sentences, preserving their order.
	fn load(&self) -> io::Result<Vec<String>>;
}

/// Text-file corpus: reads a file, cleans it, splits it into sentences.
pub struct FileCorpus {
	path: PathBuf,
}

impl FileCorpus {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self { path: path.as_ref().to_path_buf() }
	}
}

impl CorpusProvider for FileCorpus {
	fn load(&self) -> io::Result<Vec<String>> {
		let text = read_text(&self.path)?;
		Ok(split_sentences(&clean_text(&text)))
	}
}

/// Strips editorial noise from a raw literary text.
///
/// Passes, in order: chapter headings, double dashes, bracketed stage
/// directions, bare numbers (line and act numbering), then a whitespace
/// collapse so every gap becomes a single space.
pub fn clean_text(text: &str) -> String {
	let chapters = Regex::new(r"Chapter \d+").expect("Invalid chapter pattern");
	let brackets = Regex::new(r"\[.*?\]").expect("Invalid bracket pattern");
	let numbers = Regex::new(r"(\b|\s+-?|^-?)(\d+|\d*\.\d+)\b").expect("Invalid number pattern");

	let text = chapters.replace_all(text, "");
	let text = text.replace("--", " ");
	let text = brackets.replace_all(&text, "");
	let text = numbers.replace_all(&text, "");

	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits cleaned text into sentences on terminal punctuation.
///
/// The terminator stays attached to its sentence. Fragments of one character
/// or less (stray quotes, lone terminators) are dropped. Abbreviations are
/// not special-cased: "Mr. Smith" splits after "Mr.", which the chain
/// tolerates since both pieces remain plausible sentence material.
pub fn split_sentences(text: &str) -> Vec<String> {
	let mut sentences = Vec::new();
	let mut current = String::new();

	for c in text.chars() {
		current.push(c);
		if matches!(c, '.' | '!' | '?') {
			push_fragment(&mut sentences, &current);
			current.clear();
		}
	}
	push_fragment(&mut sentences, &current);

	sentences
}

fn push_fragment(sentences: &mut Vec<String>, fragment: &str) {
	let trimmed = fragment.trim();
	if trimmed.chars().count() > 1 {
		sentences.push(trimmed.to_owned());
	}
}
