/// Number of words generated when the request does not give a usable count.
pub const DEFAULT_NUM_WORDS: usize = 10;

/// Upper bound applied to the requested word count by default.
pub const DEFAULT_MAX_WORDS: usize = 200;

/// Reply sent when the seed phrase is empty.
pub const EMPTY_SEED_MESSAGE: &str = "Please enter a start text.";

/// Validated input of a single generation request.
///
/// Built from raw form fields; everything reaching the generator is
/// already defaulted and bounded.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
	/// Trimmed, non-empty seed phrase.
	pub seed: String,

	/// Number of words to append, in `0..=max_words`.
	pub num_words: usize,
}

impl GenerationRequest {
	/// Builds a request from the `start_seq` and `num_words` form fields.
	///
	/// # Returns
	/// `None` if the seed is missing or blank.
	///
	/// # Behavior
	/// - `num_words` that is missing or not an integer falls back to `DEFAULT_NUM_WORDS`
	/// - negative counts generate nothing
	/// - counts above `max_words` are clamped
	pub fn from_form(start_seq: Option<&str>, num_words: Option<&str>, max_words: usize) -> Option<Self> {
		let seed = start_seq.map(str::trim).filter(|s| !s.is_empty())?;
		let num_words = Self::parse_num_words(num_words).min(max_words);
		Some(Self { seed: seed.to_owned(), num_words })
	}

	fn parse_num_words(raw: Option<&str>) -> usize {
		match raw.map(str::trim).map(str::parse::<i64>) {
			Some(Ok(n)) => usize::try_from(n).unwrap_or(0),
			_ => DEFAULT_NUM_WORDS,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_seed_is_rejected() {
		assert_eq!(GenerationRequest::from_form(None, Some("3"), 200), None);
		assert_eq!(GenerationRequest::from_form(Some("  \t "), Some("3"), 200), None);
	}

	#[test]
	fn seed_is_trimmed_but_not_normalized() {
		let request = GenerationRequest::from_form(Some("  Монгол Улс "), Some("4"), 200).unwrap();
		assert_eq!(request.seed, "Монгол Улс");
		assert_eq!(request.num_words, 4);
	}

	#[test]
	fn invalid_counts_default_to_ten() {
		for raw in [None, Some(""), Some("abc"), Some("2.5")] {
			let request = GenerationRequest::from_form(Some("нар"), raw, 200).unwrap();
			assert_eq!(request.num_words, DEFAULT_NUM_WORDS, "raw = {:?}", raw);
		}
	}

	#[test]
	fn counts_are_bounded() {
		assert_eq!(GenerationRequest::from_form(Some("нар"), Some(" 7 "), 200).unwrap().num_words, 7);
		assert_eq!(GenerationRequest::from_form(Some("нар"), Some("-3"), 200).unwrap().num_words, 0);
		assert_eq!(GenerationRequest::from_form(Some("нар"), Some("5000"), 200).unwrap().num_words, 200);
	}
}
