use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};

use crate::error::ImageError;
use super::counter::ImageCounter;

const IMAGE_PREFIX: &str = "user_";
const IMAGE_EXTENSION: &str = "png";

/// Decodes the base64 payload of a data URL.
///
/// Example: `data:image/png;base64,iVBORw0KGgo=` → PNG signature bytes.
///
/// # Errors
/// - `ImageError::InvalidData` if there is no `,` separator or the payload is empty
/// - `ImageError::Base64` if the payload is not valid standard base64
pub fn decode_data_url(data: &str) -> Result<Vec<u8>, ImageError> {
	let (_, payload) = data.split_once(',').ok_or(ImageError::InvalidData)?;
	let payload = payload.trim();
	if payload.is_empty() {
		return Err(ImageError::InvalidData);
	}
	Ok(STANDARD.decode(payload)?)
}

/// File name assigned to image number `id`.
pub fn image_filename(id: u64) -> String {
	format!("{}{}.{}", IMAGE_PREFIX, id, IMAGE_EXTENSION)
}

/// Parses the id out of a `user_<N>` file stem.
pub fn parse_image_id(stem: &str) -> Option<u64> {
	stem.strip_prefix(IMAGE_PREFIX)?.parse().ok()
}

/// Directory of sequentially named screenshots.
#[derive(Debug)]
pub struct ImageStore {
	dir: PathBuf,
	counter: ImageCounter,
}

impl ImageStore {
	/// Opens the store, creating `dir` if needed.
	///
	/// # Parameters
	/// - `dir`: Directory receiving `user_<N>.png` files.
	/// - `counter_file`: Path of the persisted counter.
	///
	/// # Notes
	/// Never fails. A directory that cannot be created is logged and
	/// every `save` then reports the underlying error.
	pub fn open<P, Q>(dir: P, counter_file: Q) -> Self
	where
		P: AsRef<Path>,
		Q: AsRef<Path>,
	{
		let dir = dir.as_ref().to_path_buf();
		if let Err(e) = fs::create_dir_all(&dir) {
			warn!("Could not create image directory {}: {}", dir.display(), e);
		}
		let counter = ImageCounter::open(counter_file, &dir);
		Self { dir, counter }
	}

	/// Writes `bytes` under the next sequential name and returns that name.
	pub fn save(&self, bytes: &[u8]) -> Result<String, ImageError> {
		let id = self.counter.next()?;
		let filename = image_filename(id);
		fs::write(self.dir.join(&filename), bytes)?;
		info!("Screenshot saved: {} ({} bytes)", filename, bytes.len());
		Ok(filename)
	}

	/// Last assigned image id.
	pub fn counter(&self) -> u64 {
		self.counter.current()
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}
