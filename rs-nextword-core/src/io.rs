use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Reads a whole UTF-8 text file into a `String`.
pub(crate) fn read_to_string<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Writes `contents` next to `path` first, then renames it over `path`.
///
/// Readers never observe a half-written file.
pub(crate) fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let mut tmp_path = path.as_os_str().to_owned();
	tmp_path.push(".tmp");
	let tmp_path = PathBuf::from(tmp_path);

	let mut file = File::create(&tmp_path)?;
	file.write_all(contents)?;
	file.sync_all()?;
	drop(file);

	fs::rename(&tmp_path, path)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./saved_images/user_3.png"` → `"user_3"`
/// - `"user_3.png"` → `"user_3"`
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths).
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn write_atomic_replaces_contents() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("counter.txt");

		write_atomic(&path, b"1").unwrap();
		write_atomic(&path, b"22").unwrap();

		assert_eq!(read_to_string(&path).unwrap(), "22");
		assert!(!dir.path().join("counter.txt.tmp").exists());
	}

	#[test]
	fn list_files_filters_by_extension() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("user_1.png"), b"x").unwrap();
		fs::write(dir.path().join("counter.txt"), b"1").unwrap();
		fs::create_dir(dir.path().join("nested.png")).unwrap();

		let files = list_files(dir.path(), "png").unwrap();
		assert_eq!(files, vec!["user_1.png".to_owned()]);
	}

	#[test]
	fn get_filename_strips_extension() {
		assert_eq!(get_filename("./saved_images/user_3.png").unwrap(), "user_3");
		assert_eq!(get_filename("model.bin").unwrap(), "model");
	}
}
