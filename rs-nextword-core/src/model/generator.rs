use std::fmt;
use std::path::Path;

use log::info;

use crate::error::ModelError;
use crate::io;
use super::context::ContextWindow;
use super::metadata::VocabularyMetadata;
use super::scorer::{FeedForwardModel, Scorer};
use super::vocabulary::Vocabulary;

/// File name of the model weights inside an artifact directory.
pub const MODEL_FILE: &str = "language_model.bin";

/// File name of the vocabulary metadata inside an artifact directory.
pub const META_FILE: &str = "tokenizer_meta.json";

/// Greedy next-word generator.
///
/// # Responsibilities
/// - Own the vocabulary and the scoring model loaded at startup
/// - Turn a seed phrase into a padded id context
/// - Extend the phrase one argmax word at a time
///
/// # Invariants
/// - `scorer.vocab_size() == vocabulary.len()`
/// - `scorer.context_length() == context_length >= 1`
pub struct Generator {
	vocabulary: Vocabulary,
	scorer: Box<dyn Scorer>,
	context_length: usize,
}

impl fmt::Debug for Generator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Generator")
			.field("vocab_size", &self.vocabulary.len())
			.field("context_length", &self.context_length)
			.finish()
	}
}

impl Generator {
	/// Assembles a generator from a vocabulary and a scoring model.
	///
	/// # Errors
	/// Returns `ModelError::Shape` if the scorer does not agree with the
	/// vocabulary size or the context length.
	pub fn new(vocabulary: Vocabulary, scorer: Box<dyn Scorer>, context_length: usize) -> Result<Self, ModelError> {
		if context_length == 0 {
			return Err(ModelError::Shape("context length must be at least 1".to_owned()));
		}
		if scorer.vocab_size() != vocabulary.len() {
			return Err(ModelError::Shape(format!(
				"model scores {} words but the vocabulary has {}",
				scorer.vocab_size(),
				vocabulary.len()
			)));
		}
		if scorer.context_length() != context_length {
			return Err(ModelError::Shape(format!(
				"model expects {} context words but the metadata declares {}",
				scorer.context_length(),
				context_length
			)));
		}

		Ok(Self { vocabulary, scorer, context_length })
	}

	/// Loads `tokenizer_meta.json` and `language_model.bin` from a directory.
	///
	/// # Parameters
	/// - `folder`: Artifact directory. `"."` resolves to the working directory.
	///
	/// # Errors
	/// - Either artifact is missing or unreadable
	/// - The metadata or the weights are malformed
	/// - The two artifacts disagree on shapes
	pub fn load<P: AsRef<Path>>(folder: P) -> Result<Self, ModelError> {
		let folder = io::normalize_folder(folder);

		let metadata = VocabularyMetadata::load(folder.join(META_FILE))?;
		let context_length = metadata.seq_length;
		let vocabulary = Vocabulary::new(metadata.vocab)?;
		let model = FeedForwardModel::load(folder.join(MODEL_FILE))?;

		info!(
			"Loaded model from {} ({} words, context of {})",
			folder.display(),
			vocabulary.len(),
			context_length
		);
		Self::new(vocabulary, Box::new(model), context_length)
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn context_length(&self) -> usize {
		self.context_length
	}

	/// Scores `context` and returns the id with the highest score.
	///
	/// # Errors
	/// Returns `ModelError::Inference` if the scorer fails, returns a vector
	/// of the wrong length, or returns no comparable score (all NaN).
	pub fn predict_next(&self, context: &[usize]) -> Result<usize, ModelError> {
		let scores = self.scorer.score(context)?;
		if scores.len() != self.vocabulary.len() {
			return Err(ModelError::Inference(format!(
				"model returned {} scores for a vocabulary of {}",
				scores.len(),
				self.vocabulary.len()
			)));
		}
		argmax(&scores).ok_or_else(|| ModelError::Inference("model returned no comparable score".to_owned()))
	}

	/// Extends `seed` by `num_words` greedily chosen words.
	///
	/// # Behavior
	/// - The seed is split on whitespace and kept verbatim (no case folding)
	/// - Each step scores the last `context_length` words, left-padded with `<PAD>`
	/// - Unseen words are read as `<UNK>`
	/// - The result is the seed words followed by the generated ones, joined by a space
	///
	/// # Notes
	/// - Deterministic for a fixed model and seed.
	/// - `num_words = 0` returns the normalized seed.
	pub fn generate(&self, seed: &str, num_words: usize) -> Result<String, ModelError> {
		let mut generated: Vec<String> = seed.split_whitespace().map(str::to_owned).collect();

		let mut window = ContextWindow::from_words(&generated, self.context_length, &self.vocabulary);
		for _ in 0..num_words {
			let next = self.predict_next(window.ids())?;
			let word = self
				.vocabulary
				.word_of(next)
				.ok_or_else(|| ModelError::Inference(format!("id {} is outside the vocabulary", next)))?;

			generated.push(word.to_owned());
			window.push(next);
		}

		Ok(generated.join(" "))
	}
}

/// Index of the highest score.
///
/// Exact ties go to the lowest index. NaN scores are skipped.
pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
	let mut best: Option<(usize, f32)> = None;
	for (idx, &score) in scores.iter().enumerate() {
		if score.is_nan() {
			continue;
		}
		match best {
			Some((_, top)) if score <= top => (),
			_ => best = Some((idx, score)),
		}
	}
	best.map(|(idx, _)| idx)
}
