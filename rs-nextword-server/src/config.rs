use std::path::PathBuf;
use std::str::FromStr;

use log::warn;
use rs_nextword_core::model::request::DEFAULT_MAX_WORDS;

/// Runtime configuration of the HTTP server.
///
/// Defaults match a local deployment; every field can be overridden with
/// a `NEXTWORD_*` environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
	/// Directory holding `tokenizer_meta.json` and `language_model.bin`.
	pub model_dir: PathBuf,
	/// Directory receiving `user_<N>.png` screenshots.
	pub save_dir: PathBuf,
	pub counter_file: PathBuf,
	/// Upper bound on `num_words` per request.
	pub max_words: usize,
	/// Largest accepted request body, in bytes.
	pub max_payload_bytes: usize,
	/// Enables permissive CORS.
	pub cors: bool,
}

impl Default for ServerConfig {
	fn default() -> Self {
		let save_dir = PathBuf::from("./saved_images");
		Self {
			host: "127.0.0.1".to_owned(),
			port: 5000,
			model_dir: PathBuf::from("./data"),
			counter_file: save_dir.join("counter.txt"),
			save_dir,
			max_words: DEFAULT_MAX_WORDS,
			max_payload_bytes: 16 * 1024 * 1024,
			cors: false,
		}
	}
}

impl ServerConfig {
	/// Reads the configuration from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup.
	///
	/// Unparsable values are logged and replaced by their default.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let defaults = Self::default();
		let var = |name: &str| lookup(name).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

		let save_dir = var("NEXTWORD_SAVE_DIR").map(PathBuf::from).unwrap_or(defaults.save_dir);
		let counter_file = var("NEXTWORD_COUNTER_FILE")
			.map(PathBuf::from)
			.unwrap_or_else(|| save_dir.join("counter.txt"));

		Self {
			host: var("NEXTWORD_HOST").unwrap_or(defaults.host),
			port: parse_or(var("NEXTWORD_PORT"), "NEXTWORD_PORT", defaults.port),
			model_dir: var("NEXTWORD_MODEL_DIR").map(PathBuf::from).unwrap_or(defaults.model_dir),
			save_dir,
			counter_file,
			max_words: parse_or(var("NEXTWORD_MAX_WORDS"), "NEXTWORD_MAX_WORDS", defaults.max_words),
			max_payload_bytes: parse_or(var("NEXTWORD_MAX_PAYLOAD"), "NEXTWORD_MAX_PAYLOAD", defaults.max_payload_bytes),
			cors: var("NEXTWORD_CORS")
				.map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
				.unwrap_or(defaults.cors),
		}
	}
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> T {
	match value {
		None => default,
		Some(raw) => raw.parse().unwrap_or_else(|_| {
			warn!("Ignoring invalid {}={:?}, using the default", name, raw);
			default
		}),
	}
}
