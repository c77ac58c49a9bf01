use super::vocabulary::{PAD_TOKEN, Vocabulary};

/// Fixed-length window of the most recent word ids.
///
/// Always holds exactly `length` ids. Pushing a new id drops the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextWindow {
	ids: Vec<usize>,
}

impl ContextWindow {
	/// Builds the window from the trailing words of `words`.
	///
	/// Missing positions are left-padded with `<PAD>`; every word is
	/// resolved through the vocabulary, so unseen words become `<UNK>`.
	pub fn from_words<S: AsRef<str>>(words: &[S], length: usize, vocabulary: &Vocabulary) -> Self {
		let ids = Self::padded_words(words, length)
			.into_iter()
			.map(|word| vocabulary.id_of(word))
			.collect();
		Self { ids }
	}

	/// Returns the last `length` words of `words`, left-padded with `<PAD>`.
	///
	/// Example with `length = 3`: `["нар"]` → `["<PAD>", "<PAD>", "нар"]`
	pub fn padded_words<S: AsRef<str>>(words: &[S], length: usize) -> Vec<&str> {
		let start = words.len().saturating_sub(length);
		let tail = &words[start..];

		let mut padded = Vec::with_capacity(length);
		padded.extend(std::iter::repeat_n(PAD_TOKEN, length - tail.len()));
		padded.extend(tail.iter().map(|word| word.as_ref()));
		padded
	}

	/// Appends `id` and drops the oldest entry.
	pub fn push(&mut self, id: usize) {
		if let Some(last) = self.ids.len().checked_sub(1) {
			self.ids.rotate_left(1);
			self.ids[last] = id;
		}
	}

	pub fn ids(&self) -> &[usize] {
		&self.ids
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}
