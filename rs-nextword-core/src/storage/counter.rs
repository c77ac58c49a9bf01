use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::error::ImageError;
use crate::io::{get_filename, list_files, read_to_string, write_atomic};
use super::image::parse_image_id;

/// Sequential id generator backed by a text file.
///
/// The file holds the last assigned id as a decimal integer. The
/// increment and the write happen under one lock, so concurrent callers
/// never receive the same id.
///
/// # Invariants
/// - Ids handed out by `next` are strictly increasing and start at 1
/// - The file is rewritten before the new id is returned
#[derive(Debug)]
pub struct ImageCounter {
	path: PathBuf,
	last: Mutex<u64>,
}

impl ImageCounter {
	/// Opens the counter stored at `path`.
	///
	/// # Behavior
	/// - If the file holds an integer, that is the last assigned id.
	/// - Otherwise (missing, unreadable, empty or garbage) the id is
	///   recovered from the highest `user_<N>.png` in `image_dir`
	///   (0 when there is none or the directory cannot be listed).
	///
	/// Never fails: storage problems surface on the first `next`.
	pub fn open<P, Q>(path: P, image_dir: Q) -> Self
	where
		P: AsRef<Path>,
		Q: AsRef<Path>,
	{
		let path = path.as_ref().to_path_buf();

		let last = match Self::read_last(&path) {
			Ok(Some(last)) => last,
			Ok(None) => {
				let recovered = Self::recover_or_zero(image_dir.as_ref());
				info!("No counter file at {}, starting after id {}", path.display(), recovered);
				recovered
			}
			Err(e) => {
				let recovered = Self::recover_or_zero(image_dir.as_ref());
				warn!("Ignoring counter file {}: {}; starting after id {}", path.display(), e, recovered);
				recovered
			}
		};

		Self { path, last: Mutex::new(last) }
	}

	/// Value stored in the counter file, `None` if there is no file.
	fn read_last(path: &Path) -> Result<Option<u64>, ImageError> {
		if !path.exists() {
			return Ok(None);
		}
		let contents = read_to_string(path)?;
		contents
			.trim()
			.parse::<u64>()
			.map(Some)
			.map_err(|_| ImageError::Counter(format!("does not hold an integer: {:?}", contents.trim())))
	}

	fn recover_or_zero(dir: &Path) -> u64 {
		Self::recover_from_images(dir).unwrap_or_else(|e| {
			warn!("Could not scan {} for existing images: {}", dir.display(), e);
			0
		})
	}

	/// Highest `user_<N>.png` id in `dir`, or 0.
	fn recover_from_images(dir: &Path) -> Result<u64, ImageError> {
		if !dir.is_dir() {
			return Ok(0);
		}

		let mut highest = 0;
		for file in list_files(dir, "png")? {
			if let Some(id) = parse_image_id(&get_filename(&file)?) {
				highest = highest.max(id);
			}
		}
		Ok(highest)
	}

	/// A poisoned lock still holds a valid integer.
	fn lock(&self) -> MutexGuard<'_, u64> {
		self.last.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Last assigned id (0 before the first one).
	pub fn current(&self) -> u64 {
		*self.lock()
	}

	/// Assigns the next id and persists it.
	///
	/// # Errors
	/// Returns an error if the counter is exhausted or the file cannot be
	/// written. The in-memory value is left unchanged in that case.
	pub fn next(&self) -> Result<u64, ImageError> {
		let mut last = self.lock();
		let next = last
			.checked_add(1)
			.ok_or_else(|| ImageError::Counter(format!("no id left after {}", *last)))?;
		write_atomic(&self.path, next.to_string().as_bytes())?;
		*last = next;
		debug!("Counter advanced to {}", next);
		Ok(next)
	}
}
