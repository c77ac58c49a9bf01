use std::collections::HashMap;

use crate::error::ModelError;

/// Sentinel used to left-pad contexts shorter than the model window.
pub const PAD_TOKEN: &str = "<PAD>";

/// Sentinel substituted for words absent from the vocabulary.
pub const UNK_TOKEN: &str = "<UNK>";

/// Closed, ordered set of words the model can read and emit.
///
/// # Responsibilities
/// - Map every word to its position (`word -> id`)
/// - Map every position back to its word (`id -> word`)
/// - Resolve unseen words to the `<UNK>` id
///
/// # Invariants
/// - Words are unique and the list is never empty
/// - Ids are contiguous from 0 and equal to the word's position
/// - Immutable once built
#[derive(Debug, Clone)]
pub struct Vocabulary {
	/// Words indexed by id.
	words: Vec<String>,

	/// Reverse index of `words`.
	ids: HashMap<String, usize>,

	/// Id returned for unseen words: `<UNK>` if present, 0 otherwise.
	unknown_id: usize,
}

impl Vocabulary {
	/// Builds the vocabulary from an ordered word list.
	///
	/// # Errors
	/// Returns an error if the list is empty or contains a duplicate.
	pub fn new(words: Vec<String>) -> Result<Self, ModelError> {
		if words.is_empty() {
			return Err(ModelError::Vocabulary("vocabulary is empty".to_owned()));
		}

		let mut ids = HashMap::with_capacity(words.len());
		for (id, word) in words.iter().enumerate() {
			if let Some(first) = ids.insert(word.clone(), id) {
				return Err(ModelError::Vocabulary(format!(
					"duplicate word '{}' at positions {} and {}",
					word, first, id
				)));
			}
		}

		let unknown_id = ids.get(UNK_TOKEN).copied().unwrap_or(0);
		Ok(Self { words, ids, unknown_id })
	}

	/// Returns the id of `word`.
	///
	/// Never fails: unseen words resolve to the `<UNK>` id, or 0 when the
	/// vocabulary has no `<UNK>` entry. `<PAD>` follows the same rule.
	pub fn id_of(&self, word: &str) -> usize {
		self.ids.get(word).copied().unwrap_or(self.unknown_id)
	}

	/// Returns the word at `id`, or `None` outside the vocabulary.
	pub fn word_of(&self, id: usize) -> Option<&str> {
		self.words.get(id).map(String::as_str)
	}

	/// Whether `word` is a known entry (exact match, no case folding).
	pub fn contains(&self, word: &str) -> bool {
		self.ids.contains_key(word)
	}

	/// Id used for unseen words.
	pub fn unknown_id(&self) -> usize {
		self.unknown_id
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vocabulary(words: &[&str]) -> Vocabulary {
		Vocabulary::new(words.iter().map(|w| w.to_string()).collect()).unwrap()
	}

	#[test]
	fn ids_follow_positions() {
		let vocab = vocabulary(&["а", "б", "в", PAD_TOKEN, UNK_TOKEN]);

		for (id, word) in ["а", "б", "в", PAD_TOKEN, UNK_TOKEN].iter().enumerate() {
			assert_eq!(vocab.id_of(word), id);
			assert_eq!(vocab.word_of(id), Some(*word));
		}
		assert_eq!(vocab.word_of(5), None);
		assert_eq!(vocab.len(), 5);
	}

	#[test]
	fn unknown_word_maps_to_unk() {
		let vocab = vocabulary(&["а", "б", UNK_TOKEN, PAD_TOKEN]);
		assert_eq!(vocab.id_of("г"), 2);
		assert_eq!(vocab.unknown_id(), 2);
	}

	#[test]
	fn unknown_word_without_unk_maps_to_zero() {
		let vocab = vocabulary(&["а", "б", PAD_TOKEN]);
		assert_eq!(vocab.id_of("г"), 0);
	}

	#[test]
	fn lookup_is_case_sensitive() {
		let vocab = vocabulary(&[UNK_TOKEN, "Монгол", "монгол"]);
		assert_eq!(vocab.id_of("Монгол"), 1);
		assert_eq!(vocab.id_of("монгол"), 2);
		assert_eq!(vocab.id_of("МОНГОЛ"), 0);
	}

	#[test]
	fn rejects_duplicates_and_empty_lists() {
		assert!(Vocabulary::new(Vec::new()).is_err());

		let err = Vocabulary::new(vec!["а".to_owned(), "б".to_owned(), "а".to_owned()]).unwrap_err();
		assert!(err.to_string().contains("duplicate word 'а'"));
	}
}
