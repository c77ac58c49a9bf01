use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::io::{read_to_string, write_atomic};

/// Context length assumed when the metadata omits `seq_length`.
pub const DEFAULT_SEQ_LENGTH: usize = 3;

fn default_seq_length() -> usize {
	DEFAULT_SEQ_LENGTH
}

/// Vocabulary metadata written next to the model weights.
///
/// Stored as JSON: `{ "vocab": ["<PAD>", "<UNK>", ...], "seq_length": 3 }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VocabularyMetadata {
	/// Ordered vocabulary; a word's position is its id.
	pub vocab: Vec<String>,

	/// Number of trailing words fed to the model per step.
	#[serde(default = "default_seq_length")]
	pub seq_length: usize,
}

impl VocabularyMetadata {
	/// Reads and validates a metadata file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let contents = read_to_string(path)?;
		Self::from_json(&contents)
	}

	/// Parses metadata from a JSON string.
	///
	/// # Errors
	/// Returns an error on malformed JSON, a missing `vocab` field,
	/// or a `seq_length` of zero.
	pub fn from_json(contents: &str) -> Result<Self, ModelError> {
		let metadata: Self = serde_json::from_str(contents)?;
		if metadata.seq_length == 0 {
			return Err(ModelError::Shape("seq_length must be at least 1".to_owned()));
		}
		Ok(metadata)
	}

	/// Writes the metadata as pretty-printed JSON.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		let contents = serde_json::to_string_pretty(self)?;
		write_atomic(path, contents.as_bytes())?;
		Ok(())
	}
}
