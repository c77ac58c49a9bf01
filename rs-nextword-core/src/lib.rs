//! Word-level next-word generation library.
//!
//! This crate provides the serving core of the text generation demo:
//! - A closed vocabulary with `<PAD>` / `<UNK>` sentinel handling
//! - A fixed-context scoring model loaded from a pre-trained artifact
//! - Greedy (argmax) decoding over a sliding context window
//! - Sequential storage of uploaded canvas screenshots
//!
//! Artifact loading and file helpers are kept internal.

/// Vocabulary, scoring model and generation logic.
///
/// Exposes the generator, the degraded-mode engine wrapper and the
/// request parsing helpers used by the HTTP layer.
pub mod model;

/// Image decoding, sequential naming and on-disk storage.
pub mod storage;

/// Error types shared by the model and storage modules.
pub mod error;

/// I/O utilities (file loading, atomic writes, path helpers).
///
/// Not exposed
pub(crate) mod io;
