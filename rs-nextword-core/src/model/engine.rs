use std::path::Path;

use log::{error, warn};

use super::generator::Generator;

/// Reply used for every generation request while no model is loaded.
pub const UNAVAILABLE_MESSAGE: &str = "Model is not available.";

/// Generation entry point shared by all request handlers.
///
/// Wraps an optional `Generator`. A missing or malformed artifact does not
/// stop the process: the engine starts in degraded mode and answers with
/// `UNAVAILABLE_MESSAGE` instead.
#[derive(Debug)]
pub struct TextEngine {
	generator: Option<Generator>,
}

impl TextEngine {
	/// Loads the artifacts from `folder`, degrading on failure.
	pub fn load<P: AsRef<Path>>(folder: P) -> Self {
		match Generator::load(&folder) {
			Ok(generator) => Self::from_generator(generator),
			Err(e) => {
				error!(
					"Model or tokenizer metadata could not be loaded from {}: {}",
					folder.as_ref().display(),
					e
				);
				Self::unavailable()
			}
		}
	}

	pub fn from_generator(generator: Generator) -> Self {
		Self { generator: Some(generator) }
	}

	/// Engine in degraded mode.
	pub fn unavailable() -> Self {
		Self { generator: None }
	}

	pub fn is_available(&self) -> bool {
		self.generator.is_some()
	}

	/// Generates text, or explains why it cannot.
	///
	/// # Returns
	/// - the generated sequence when a model is loaded
	/// - `UNAVAILABLE_MESSAGE` in degraded mode
	/// - a short error description if inference fails
	pub fn generate_text(&self, seed: &str, num_words: usize) -> String {
		let Some(generator) = &self.generator else {
			return UNAVAILABLE_MESSAGE.to_owned();
		};

		match generator.generate(seed, num_words) {
			Ok(text) => text,
			Err(e) => {
				warn!("Generation failed for seed {:?}: {}", seed, e);
				format!("Generation failed: {}", e)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::generator::{META_FILE, MODEL_FILE};
	use crate::model::metadata::VocabularyMetadata;
	use crate::model::scorer::FeedForwardModel;
	use crate::model::vocabulary::Vocabulary;

	fn echo_generator() -> Generator {
		// One-hot embeddings, the single context slot votes for itself.
		let words = vec!["<PAD>".to_owned(), "<UNK>".to_owned(), "ус".to_owned()];
		let n = words.len();
		let mut identity = vec![0.0; n * n];
		for i in 0..n {
			identity[i * n + i] = 1.0;
		}
		let model = FeedForwardModel::from_parts(n, 1, n, identity.clone(), identity, vec![0.0; n]).unwrap();
		Generator::new(Vocabulary::new(words).unwrap(), Box::new(model), 1).unwrap()
	}

	#[test]
	fn degraded_engine_returns_fixed_message() {
		let engine = TextEngine::unavailable();
		assert!(!engine.is_available());
		assert_eq!(engine.generate_text("ус", 5), UNAVAILABLE_MESSAGE);
	}

	#[test]
	fn missing_artifacts_degrade_instead_of_failing() {
		let dir = tempfile::tempdir().unwrap();
		let engine = TextEngine::load(dir.path().join("missing"));
		assert!(!engine.is_available());
		assert_eq!(engine.generate_text("ус", 1), UNAVAILABLE_MESSAGE);
	}

	#[test]
	fn corrupted_weights_degrade_the_engine() {
		let dir = tempfile::tempdir().unwrap();
		let metadata = VocabularyMetadata {
			vocab: vec!["<PAD>".to_owned(), "<UNK>".to_owned(), "нар".to_owned()],
			seq_length: 1,
		};
		metadata.save(dir.path().join(META_FILE)).unwrap();
		// Shapes are valid, the weights are not.
		let mut bytes = postcard::to_stdvec(&(3usize, 1usize, 1usize)).unwrap();
		bytes.extend(postcard::to_stdvec(&(vec![1.0f32; 3], vec![f32::NAN; 3], vec![0.0f32; 3])).unwrap());
		std::fs::write(dir.path().join(MODEL_FILE), bytes).unwrap();

		let engine = TextEngine::load(dir.path());
		assert!(!engine.is_available());
		assert_eq!(engine.generate_text("нар", 3), UNAVAILABLE_MESSAGE);
	}

	#[test]
	fn loaded_engine_generates() {
		let engine = TextEngine::from_generator(echo_generator());
		assert!(engine.is_available());
		assert_eq!(engine.generate_text("ус", 2), "ус ус ус");
	}
}
