use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_nextword_core::error::ModelError;
use rs_nextword_core::model::engine::TextEngine;
use rs_nextword_core::model::generator::{Generator, META_FILE, MODEL_FILE};
use rs_nextword_core::model::metadata::VocabularyMetadata;
use rs_nextword_core::model::scorer::FeedForwardModel;
use rs_nextword_core::model::vocabulary::{PAD_TOKEN, UNK_TOKEN, Vocabulary};

const CONTEXT_LENGTH: usize = 3;

/// Writes a toy artifact pair where every word is followed by the next one
/// of `words`, cycling at the end.
///
/// Embeddings are one-hot; only the last context slot has non-zero weights,
/// so the model behaves like a hand-written bigram table.
fn write_toy_artifacts(folder: &Path, words: &[&str]) -> Result<(), ModelError> {
	let mut vocab = vec![PAD_TOKEN.to_owned(), UNK_TOKEN.to_owned()];
	vocab.extend(words.iter().map(|w| w.to_string()));
	let vocab_size = vocab.len();
	let dim = vocab_size;

	let mut embeddings = vec![0.0; vocab_size * dim];
	for id in 0..vocab_size {
		embeddings[id * dim + id] = 1.0;
	}

	// Content words start at id 2; sentinels lead to the first word.
	let first = 2;
	let successor = |id: usize| if id < first || id + 1 == vocab_size { first } else { id + 1 };
	let mut weights = vec![0.0; CONTEXT_LENGTH * dim * vocab_size];
	let last_slot = CONTEXT_LENGTH - 1;
	for id in 0..vocab_size {
		weights[(last_slot * dim + id) * vocab_size + successor(id)] = 5.0;
	}

	let model = FeedForwardModel::from_parts(vocab_size, CONTEXT_LENGTH, dim, embeddings, weights, vec![0.0; vocab_size])?;
	fs::create_dir_all(folder)?;
	model.save(folder.join(MODEL_FILE))?;
	VocabularyMetadata { vocab, seq_length: CONTEXT_LENGTH }.save(folder.join(META_FILE))?;
	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Artifacts are read from "./data"; a toy pair is written when missing
	let folder = Path::new("./data");
	if !folder.join(MODEL_FILE).exists() || !folder.join(META_FILE).exists() {
		println!("No artifacts in {}, writing a toy model", folder.display());
		write_toy_artifacts(folder, &["the", "quick", "brown", "fox", "jumps", "over", "a", "lazy", "dog"])?;
	}

	let generator = Generator::load(folder)?;
	println!(
		"Loaded {} words, context of {}",
		generator.vocabulary().len(),
		generator.context_length()
	);

	// Seeds are used verbatim: "The" is not "the" and reads as <UNK>
	for (seed, num_words) in [("the", 8), ("lazy dog", 5), ("The", 3), ("moon", 4), ("fox", 0)] {
		let unknown: Vec<&str> = seed
			.split_whitespace()
			.filter(|word| !generator.vocabulary().contains(word))
			.collect();
		println!("{:>10} + {} → {}", seed, num_words, generator.generate(seed, num_words)?);
		if !unknown.is_empty() {
			println!("{:>10}   unknown: {}", "", unknown.join(", "));
		}
	}

	// Same input, same output
	assert_eq!(generator.generate("brown", 6)?, generator.generate("brown", 6)?);

	// An untrained placeholder of the same shape: arbitrary but repeatable text
	let mut rng = StdRng::seed_from_u64(7);
	let placeholder = FeedForwardModel::random(generator.vocabulary().len(), generator.context_length(), 8, 0.5, &mut rng)?;
	let vocabulary = Vocabulary::new(VocabularyMetadata::load(folder.join(META_FILE))?.vocab)?;
	let untrained = Generator::new(vocabulary, Box::new(placeholder), generator.context_length())?;
	println!("Untrained placeholder says: {}", untrained.generate("the", 6)?);

	// Without artifacts the engine degrades instead of failing
	let degraded = TextEngine::load("./missing-model-dir");
	println!("Degraded engine says: {}", degraded.generate_text("the", 3));

	Ok(())
}
