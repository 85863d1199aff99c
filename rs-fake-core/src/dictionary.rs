use std::fs::{File, Metadata};
use std::io::BufReader;
use std::path::Path;
use std::time::UNIX_EPOCH;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::io::{count_lines, get_filename, sidecar_path};
use crate::source::DictionarySource;

/// Line count of a dictionary file, cached next to it.
///
/// `bytes` and `modified` record the file the count was taken from; a
/// sidecar that no longer matches both is ignored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DictionaryMeta {
	lines: usize,
	bytes: u64,
	/// Modification time in nanoseconds since the Unix epoch, 0 if unknown.
	modified: u64,
}

impl DictionaryMeta {
	fn new(lines: usize, metadata: &Metadata) -> Self {
		let modified = metadata
			.modified()
			.ok()
			.and_then(|time| time.duration_since(UNIX_EPOCH).ok())
			.map(|elapsed| elapsed.as_nanos() as u64)
			.unwrap_or_default();
		Self { lines, bytes: metadata.len(), modified }
	}

	/// Returns `true` if both stamps describe the same file contents.
	fn matches(&self, other: &Self) -> bool {
		self.bytes == other.bytes && self.modified == other.modified
	}
}

/// A dictionary file opened for reading, with its line count.
///
/// # Notes
/// - The file handle is positioned at the first line.
/// - The line count is the maximum jump of generators built from it.
#[derive(Debug)]
pub struct Dictionary {
	name: String,
	file: File,
	lines: usize,
}

impl Dictionary {
	/// Opens a dictionary and establishes its line count.
	///
	/// - Reads the `<file name>.lines` sidecar if it matches the file size
	///   and modification time.
	/// - Otherwise counts the lines once and writes the sidecar for the next run.
	///
	/// # Errors
	/// Returns `SourceUnavailable` if the file cannot be opened or read,
	/// or if it has no lines.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let name = get_filename(path).map_err(Error::SourceUnavailable)?;
		let mut file = File::open(path).map_err(Error::SourceUnavailable)?;
		let current = DictionaryMeta::new(0, &file.metadata().map_err(Error::SourceUnavailable)?);

		let lines = match Self::read_meta(path, &current) {
			Some(meta) => {
				debug!("using cached line count {} for dictionary '{}'", meta.lines, name);
				meta.lines
			}
			None => {
				debug!("counting lines of dictionary '{}'", name);
				let lines = count_lines(BufReader::new(&file)).map_err(Error::SourceUnavailable)?;
				Self::write_meta(path, DictionaryMeta { lines, ..current });
				file.seek_start().map_err(Error::SourceUnavailable)?;
				lines
			}
		};

		if lines == 0 {
			return Err(Error::SourceUnavailable(std::io::Error::new(
				std::io::ErrorKind::InvalidData,
				format!("Dictionary '{}' is empty", name),
			)));
		}

		Ok(Self { name, file, lines })
	}

	/// Opens a dictionary whose line count is already known.
	///
	/// Nothing is scanned and no sidecar is read or written.
	///
	/// # Errors
	/// - `InvalidCount` if `lines` is zero.
	/// - `SourceUnavailable` if the file cannot be opened.
	pub fn with_lines<P: AsRef<Path>>(path: P, lines: usize) -> Result<Self> {
		if lines < 1 {
			return Err(Error::InvalidCount);
		}
		let path = path.as_ref();
		let name = get_filename(path).map_err(Error::SourceUnavailable)?;
		let file = File::open(path).map_err(Error::SourceUnavailable)?;
		Ok(Self { name, file, lines })
	}

	/// Returns the dictionary name (file name without extension).
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the number of lines.
	pub fn lines(&self) -> usize {
		self.lines
	}

	/// Builds a time-seeded generator reading this dictionary.
	pub fn into_generator(self) -> Result<Generator<File>> {
		Generator::new(self.file, self.lines)
	}

	/// Loads the sidecar if it exists, decodes, and matches `current`.
	fn read_meta(path: &Path, current: &DictionaryMeta) -> Option<DictionaryMeta> {
		let sidecar = sidecar_path(path).ok()?;
		let encoded = std::fs::read(sidecar).ok()?;
		let meta: DictionaryMeta = postcard::from_bytes(&encoded).ok()?;
		meta.matches(current).then_some(meta)
	}

	/// Stores the sidecar. Failing to write only costs a recount next time.
	fn write_meta(path: &Path, meta: DictionaryMeta) {
		let stored = sidecar_path(path).and_then(|sidecar| {
			let encoded = postcard::to_stdvec(&meta).map_err(std::io::Error::other)?;
			std::fs::write(sidecar, encoded)
		});
		if let Err(e) = stored {
			warn!("could not cache line count of '{}': {}", path.display(), e);
		}
	}
}
