//! Storage of uploaded canvas screenshots.
//!
//! - `counter`: monotonically increasing id, persisted after every increment
//! - `image`: data-URL decoding and `user_<N>.png` files

/// Persisted sequential id generator.
pub mod counter;

/// Image decoding and the on-disk image store.
pub mod image;
