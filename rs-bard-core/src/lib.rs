//! Markov-chain pastiche sentence generation library.
//!
//! This crate provides a word-level Markov generation system including:
//! - Fixed-order chain models over sliding token windows (`ChainModel`)
//! - Tokenized text models with novelty filtering (`TextModel`)
//! - Plain and grammar-aware tokenization (`WordTokenizer`, `PosTokenizer`)
//! - A guaranteed-output fallback cascade (`generator`)
//! - Utilities for corpus cleanup and I/O
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core chain models and generation logic.
///
/// This module exposes the high-level text model and fallback cascade while
/// keeping internal state representations private.
pub mod model;

/// Corpus loading: raw-text cleanup passes and sentence splitting.
pub mod corpus;

/// Errors reported by the chain model.
pub mod error;

/// Sentence tokenization: plain word tokens and composite word-plus-role tokens.
pub mod tokenizer;

/// The grammatical-role oracle seam and a rule-based English implementation.
pub mod tag;

/// I/O utilities (file loading, path helpers).
pub mod io;
