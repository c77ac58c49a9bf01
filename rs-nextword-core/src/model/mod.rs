//! Top-level module for next-word generation.
//!
//! This module provides:
//! - The closed vocabulary and its sentinel tokens (`Vocabulary`)
//! - The artifact metadata record (`VocabularyMetadata`)
//! - The scoring seam and the pre-trained window model (`Scorer`, `FeedForwardModel`)
//! - The sliding context window (`ContextWindow`)
//! - Greedy decoding (`Generator`) and its degraded-mode wrapper (`TextEngine`)
//! - Form parsing for generation requests (`GenerationRequest`)

/// Word ↔ id mapping with `<PAD>` / `<UNK>` handling.
pub mod vocabulary;

/// JSON metadata stored next to the model weights.
pub mod metadata;

/// Scoring trait and the feed-forward window model.
pub mod scorer;

/// Fixed-length id window, left-padded with `<PAD>`.
pub mod context;

/// Greedy decoding loop and artifact loading.
pub mod generator;

/// Shared generation entry point with degraded mode.
pub mod engine;

/// Parsing of raw generation form fields.
pub mod request;
