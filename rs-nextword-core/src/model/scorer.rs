use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::io::write_atomic;

/// Opaque next-word scoring function.
///
/// Given exactly `context_length()` word ids, returns one score per
/// vocabulary entry. Higher is more likely. Implementations must be
/// shareable across request handlers.
pub trait Scorer: Send + Sync {
	/// Number of ids expected by `score`.
	fn context_length(&self) -> usize;

	/// Length of the returned score vector.
	fn vocab_size(&self) -> usize;

	/// Scores every vocabulary entry as the successor of `context`.
	///
	/// # Errors
	/// Returns an error if `context` has the wrong length or holds an id
	/// outside the vocabulary.
	fn score(&self, context: &[usize]) -> Result<Vec<f32>, ModelError>;
}

/// Pre-trained feed-forward window model.
///
/// The `N` context ids are embedded, concatenated into a single
/// `N * embedding_dim` feature vector, projected onto the vocabulary by a
/// dense layer and normalized with a softmax.
///
/// # Layout
/// - `embeddings`: `vocab_size` rows of `embedding_dim` values
/// - `weights`: `context_length * embedding_dim` rows of `vocab_size` values
/// - `bias`: `vocab_size` values
///
/// Serialized with `postcard`; shapes are checked on every construction
/// path, including deserialization.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeedForwardModel {
	vocab_size: usize,
	context_length: usize,
	embedding_dim: usize,
	embeddings: Vec<f32>,
	weights: Vec<f32>,
	bias: Vec<f32>,
}

impl FeedForwardModel {
	/// Builds a model from raw weight buffers.
	///
	/// # Errors
	/// Returns `ModelError::Shape` if any dimension is zero or a buffer
	/// length does not match the declared dimensions.
	pub fn from_parts(
		vocab_size: usize,
		context_length: usize,
		embedding_dim: usize,
		embeddings: Vec<f32>,
		weights: Vec<f32>,
		bias: Vec<f32>,
	) -> Result<Self, ModelError> {
		let model = Self { vocab_size, context_length, embedding_dim, embeddings, weights, bias };
		model.validate()?;
		Ok(model)
	}

	/// Builds a model with small uniform random weights in `[-scale, scale)`.
	///
	/// Useful as an untrained placeholder and for tests with a seeded RNG.
	pub fn random<R: Rng>(
		vocab_size: usize,
		context_length: usize,
		embedding_dim: usize,
		scale: f32,
		rng: &mut R,
	) -> Result<Self, ModelError> {
		let (embedding_len, weight_len) = Self::buffer_lengths(vocab_size, context_length, embedding_dim)?;
		let scale = scale.abs().max(f32::EPSILON);
		let mut fill = |len: usize| (0..len).map(|_| rng.random_range(-scale..scale)).collect::<Vec<f32>>();

		let embeddings = fill(embedding_len);
		let weights = fill(weight_len);
		let bias = fill(vocab_size);
		Self::from_parts(vocab_size, context_length, embedding_dim, embeddings, weights, bias)
	}

	/// Loads a `postcard`-encoded model and validates its shapes.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let bytes = std::fs::read(path)?;
		let model: Self = postcard::from_bytes(&bytes)?;
		model.validate()?;
		Ok(model)
	}

	/// Writes the model in `postcard` format.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		let bytes = postcard::to_stdvec(self)?;
		write_atomic(path, &bytes)?;
		Ok(())
	}

	/// Expected lengths of the embedding and weight buffers.
	fn buffer_lengths(vocab_size: usize, context_length: usize, embedding_dim: usize) -> Result<(usize, usize), ModelError> {
		if vocab_size == 0 || context_length == 0 || embedding_dim == 0 {
			return Err(ModelError::Shape(format!(
				"dimensions must be non-zero, got vocab_size={}, context_length={}, embedding_dim={}",
				vocab_size, context_length, embedding_dim
			)));
		}

		let overflow = || ModelError::Shape("model dimensions overflow".to_owned());
		let embedding_len = vocab_size.checked_mul(embedding_dim).ok_or_else(overflow)?;
		let weight_len = context_length
			.checked_mul(embedding_dim)
			.and_then(|features| features.checked_mul(vocab_size))
			.ok_or_else(overflow)?;
		Ok((embedding_len, weight_len))
	}

	fn validate(&self) -> Result<(), ModelError> {
		let (embedding_len, weight_len) = Self::buffer_lengths(self.vocab_size, self.context_length, self.embedding_dim)?;

		for (name, expected, actual) in [
			("embeddings", embedding_len, self.embeddings.len()),
			("weights", weight_len, self.weights.len()),
			("bias", self.vocab_size, self.bias.len()),
		] {
			if expected != actual {
				return Err(ModelError::Shape(format!("{} has {} values, expected {}", name, actual, expected)));
			}
		}

		for (name, values) in [("embeddings", &self.embeddings), ("weights", &self.weights), ("bias", &self.bias)] {
			if let Some(position) = values.iter().position(|v| !v.is_finite()) {
				return Err(ModelError::Shape(format!("{} holds a non-finite value at {}", name, position)));
			}
		}
		Ok(())
	}

	/// Numerically stable softmax.
	///
	/// Non-finite logits yield an all-NaN vector, which the generator
	/// reports as an inference error.
	fn softmax(logits: &[f32]) -> Vec<f32> {
		if logits.iter().any(|l| !l.is_finite()) {
			return vec![f32::NAN; logits.len()];
		}

		let max_logit = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
		let exps: Vec<f32> = logits.iter().map(|&l| (l - max_logit).exp()).collect();
		let sum: f32 = exps.iter().sum();
		exps.iter().map(|&e| e / sum).collect()
	}
}

impl Scorer for FeedForwardModel {
	fn context_length(&self) -> usize {
		self.context_length
	}

	fn vocab_size(&self) -> usize {
		self.vocab_size
	}

	fn score(&self, context: &[usize]) -> Result<Vec<f32>, ModelError> {
		if context.len() != self.context_length {
			return Err(ModelError::Inference(format!(
				"expected {} context ids, got {}",
				self.context_length,
				context.len()
			)));
		}

		let dim = self.embedding_dim;
		let mut logits = self.bias.clone();

		for (position, &id) in context.iter().enumerate() {
			if id >= self.vocab_size {
				return Err(ModelError::Inference(format!("id {} is outside the vocabulary", id)));
			}

			let embedding = &self.embeddings[id * dim..(id + 1) * dim];
			for (offset, &value) in embedding.iter().enumerate() {
				if value == 0.0 {
					continue;
				}
				let row = (position * dim + offset) * self.vocab_size;
				for (logit, &weight) in logits.iter_mut().zip(&self.weights[row..row + self.vocab_size]) {
					*logit += value * weight;
				}
			}
		}

		Ok(Self::softmax(&logits))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	/// One-hot embeddings; the last context slot votes for `id + 1`.
	fn successor_model(vocab_size: usize, context_length: usize) -> FeedForwardModel {
		let dim = vocab_size;
		let mut embeddings = vec![0.0; vocab_size * dim];
		for id in 0..vocab_size {
			embeddings[id * dim + id] = 1.0;
		}

		let mut weights = vec![0.0; context_length * dim * vocab_size];
		let last = context_length - 1;
		for id in 0..vocab_size {
			let row = (last * dim + id) * vocab_size;
			weights[row + (id + 1) % vocab_size] = 4.0;
		}

		FeedForwardModel::from_parts(vocab_size, context_length, dim, embeddings, weights, vec![0.0; vocab_size]).unwrap()
	}

	#[test]
	fn scores_form_a_distribution() {
		let mut rng = StdRng::seed_from_u64(7);
		let model = FeedForwardModel::random(6, 3, 4, 0.5, &mut rng).unwrap();

		let scores = model.score(&[0, 5, 2]).unwrap();
		assert_eq!(scores.len(), 6);
		assert!((scores.iter().sum::<f32>() - 1.0).abs() < 1e-5);
		assert!(scores.iter().all(|s| *s > 0.0));
	}

	#[test]
	fn last_slot_drives_successor_model() {
		let model = successor_model(5, 2);
		let scores = model.score(&[3, 1]).unwrap();

		let best = scores
			.iter()
			.enumerate()
			.max_by(|a, b| a.1.total_cmp(b.1))
			.map(|(idx, _)| idx)
			.unwrap();
		assert_eq!(best, 2);
	}

	#[test]
	fn rejects_bad_contexts() {
		let model = successor_model(4, 3);
		assert!(model.score(&[0, 1]).is_err());
		assert!(model.score(&[0, 1, 4]).is_err());
	}

	#[test]
	fn from_parts_checks_shapes() {
		assert!(FeedForwardModel::from_parts(2, 1, 1, vec![0.0; 2], vec![0.0; 2], vec![0.0; 2]).is_ok());
		assert!(FeedForwardModel::from_parts(2, 1, 1, vec![0.0; 3], vec![0.0; 2], vec![0.0; 2]).is_err());
		assert!(FeedForwardModel::from_parts(2, 1, 1, vec![0.0; 2], vec![0.0; 2], vec![0.0; 1]).is_err());
		assert!(FeedForwardModel::from_parts(0, 1, 1, Vec::new(), Vec::new(), Vec::new()).is_err());
	}

	#[test]
	fn load_restores_saved_weights() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("language_model.bin");
		let mut rng = StdRng::seed_from_u64(11);
		let model = FeedForwardModel::random(8, 2, 3, 0.1, &mut rng).unwrap();

		model.save(&path).unwrap();
		assert_eq!(FeedForwardModel::load(&path).unwrap(), model);
	}

	#[test]
	fn load_rejects_inconsistent_weights() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("language_model.bin");
		let broken = FeedForwardModel {
			vocab_size: 3,
			context_length: 2,
			embedding_dim: 2,
			embeddings: vec![0.0; 6],
			weights: vec![0.0; 5],
			bias: vec![0.0; 3],
		};
		std::fs::write(&path, postcard::to_stdvec(&broken).unwrap()).unwrap();

		assert!(matches!(FeedForwardModel::load(&path), Err(ModelError::Shape(_))));
	}

	#[test]
	fn rejects_non_finite_weights() {
		let nan = FeedForwardModel::from_parts(3, 1, 1, vec![1.0; 3], vec![f32::NAN; 3], vec![0.0; 3]);
		assert!(matches!(nan, Err(ModelError::Shape(_))));

		let inf = FeedForwardModel::from_parts(3, 1, 1, vec![f32::INFINITY, 1.0, 1.0], vec![0.0; 3], vec![0.0; 3]);
		assert!(matches!(inf, Err(ModelError::Shape(_))));
	}

	#[test]
	fn load_rejects_non_finite_weights() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("language_model.bin");
		let corrupted = FeedForwardModel {
			vocab_size: 3,
			context_length: 1,
			embedding_dim: 1,
			embeddings: vec![1.0; 3],
			weights: vec![f32::NAN; 3],
			bias: vec![0.0; 3],
		};
		std::fs::write(&path, postcard::to_stdvec(&corrupted).unwrap()).unwrap();

		assert!(matches!(FeedForwardModel::load(&path), Err(ModelError::Shape(_))));
	}

	#[test]
	fn overflowing_logits_become_nan_scores() {
		let huge = FeedForwardModel::from_parts(2, 2, 1, vec![f32::MAX; 2], vec![f32::MAX; 4], vec![0.0; 2]).unwrap();
		let scores = huge.score(&[0, 1]).unwrap();
		assert!(scores.iter().all(|s| s.is_nan()));
	}

	#[test]
	fn load_rejects_garbage() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("language_model.bin");
		std::fs::write(&path, b"\xff\xff\xff").unwrap();

		assert!(FeedForwardModel::load(&path).is_err());
	}
}
