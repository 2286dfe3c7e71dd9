use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a whole UTF-8 text file into memory.
pub fn read_text<P: AsRef<Path>>(filepath: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filepath)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds a sibling path with a new extension.
///
/// Example:
/// `data/hamlet.txt` + `"word.bin"` → `data/hamlet.word.bin`
pub fn sibling_with_extension<P: AsRef<Path>>(
	input_path: P,
	extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(extension);

	Ok(output)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/hamlet.txt"` → `"hamlet"`
/// - `"hamlet.txt"` → `"hamlet"`
pub fn file_stem_name<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted for stable listings.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if path.extension() == Some(std::ffi::OsStr::new(extension)) {
				if let Some(name) = path.file_name() {
					files.push(name.to_string_lossy().to_string());
				}
			}
		}
	}

	files.sort();
	Ok(files)
}
