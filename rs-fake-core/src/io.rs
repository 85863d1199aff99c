use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Counts the lines of a stream without keeping them.
///
/// - A last line without a terminator still counts
/// - A trailing terminator does not add an empty line
pub(crate) fn count_lines<R: BufRead>(mut reader: R) -> io::Result<usize> {
	let mut lines = 0;
	let mut buffer = Vec::new();
	loop {
		buffer.clear();
		if reader.read_until(b'\n', &mut buffer)? == 0 {
			return Ok(lines);
		}
		lines += 1;
	}
}

/// Builds the sidecar path holding a dictionary's metadata.
///
/// The suffix is appended to the full file name, so the sidecar never
/// collides with the dictionary whatever its extension.
///
/// Examples:
/// - `data/fa.dic` → `data/fa.dic.lines`
/// - `data/fa.bin` → `data/fa.bin.lines`
pub(crate) fn sidecar_path<P: AsRef<Path>>(dictionary: P) -> io::Result<PathBuf> {
	let dictionary = dictionary.as_ref();
	let file_name = dictionary
		.file_name()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Dictionary path has no filename"))?;

	let mut sidecar = file_name.to_os_string();
	sidecar.push(".lines");
	Ok(dictionary.with_file_name(sidecar))
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/fa.dic"` → `"fa"`
/// - `"fa"` → `"fa"`
pub(crate) fn get_filename<P: AsRef<Path>>(path: P) -> io::Result<String> {
	let stem = path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}
