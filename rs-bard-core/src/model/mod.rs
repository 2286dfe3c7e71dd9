//! Top-level module for the Markov generation system.
//!
//! This crate provides a word-level pastiche sentence generator, including:
//! - Fixed-order chain models (`ChainModel`)
//! - Tokenizer-aware text models with novelty filtering (`TextModel`)
//! - Internal state management (`State`)
//! - Sampling configuration (`SampleParams`)
//! - A guaranteed-output fallback cascade (`generator`)

/// Guaranteed sentence generation through a fallback cascade.
///
/// Runs rejection sampling under progressively looser parameter sets until
/// one of them produces a sentence.
pub mod generator;

/// Fixed-order Markov chain over token windows (`order >= 1`).
///
/// Handles sequence ingestion with sentinel padding, transition counting,
/// weighted next-token sampling, the raw sentence walk, and chain merging.
pub mod chain_model;

/// Tokenizer-aware text model built on top of `ChainModel`.
///
/// Supports training from cleaned sentences, rejection sampling with a
/// novelty filter, binary persistence, and model combination.
pub mod text_model;

/// Internal representation of a single chain state (token window).
///
/// Tracks outgoing transitions and supports weighted random sampling.
/// This module is not exposed publicly.
mod state;

/// Sampling parameter structure.
///
/// Bundles the attempt budget with the active rejection checks; the
/// fallback cascade is a fixed sequence of these.
pub mod sample_params;
