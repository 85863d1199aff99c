use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::source::DictionarySource;

/// Random-jump word generator over a line-oriented dictionary.
///
/// # Responsibilities
/// - Keep a buffered cursor into the dictionary between calls
/// - Pick words by jumping a random number of lines forward
/// - Compose words into sentences and paragraphs
///
/// # Invariants
/// - `max_jump >= 1`
/// - The cursor and the random source are owned by this generator only
///
/// The whole dictionary is never held in memory: every word costs a scan of
/// at most `max_jump` lines, wrapping around to the first line when the end
/// of the stream is reached.
#[derive(Debug)]
pub struct Generator<S, R = StdRng> {
	/// If true, each call starts from the beginning of the dictionary,
	/// otherwise scanning continues from the last position.
	///
	/// Default is false: restarting on every call favors the first lines
	/// of the dictionary.
	///
	/// A source that cannot seek skips the restart silently, but only the
	/// restart: once such a stream is exhausted, every later call needs a
	/// wraparound and fails.
	pub restart_each_call: bool,

	/// If true, read errors in `generate` return an empty word instead.
	///
	/// Sentences and paragraphs ignore this flag and always fail.
	/// Default is false.
	pub bypass_error: bool,

	/// Upper bound of the jump distance, the dictionary's line count.
	max_jump: usize,

	reader: BufReader<S>,
	random: R,
}

impl Generator<File> {
	/// Opens a dictionary file and builds a generator over it.
	///
	/// The line count comes from `Dictionary::open`.
	///
	/// # Errors
	/// Returns `SourceUnavailable` if the file cannot be opened or measured.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		Dictionary::open(path)?.into_generator()
	}
}

impl<S: DictionarySource> Generator<S> {
	/// Creates a generator seeded from the current time.
	///
	/// # Parameters
	/// - `source`: the dictionary stream, positioned at its first line.
	/// - `lines`: the dictionary's line count, used as the maximum jump.
	///
	/// # Errors
	/// Returns `InvalidCount` if `lines` is zero.
	pub fn new(source: S, lines: usize) -> Result<Self> {
		let seed = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos() as u64)
			.unwrap_or_default();
		Self::with_seed(source, lines, seed)
	}

	/// Creates a generator with a fixed seed, for reproducible output.
	pub fn with_seed(source: S, lines: usize, seed: u64) -> Result<Self> {
		Self::with_rng(source, lines, StdRng::seed_from_u64(seed))
	}
}

impl<S: DictionarySource, R: Rng> Generator<S, R> {
	/// Creates a generator drawing from the given random source.
	///
	/// # Errors
	/// Returns `InvalidCount` if `lines` is zero.
	pub fn with_rng(source: S, lines: usize, random: R) -> Result<Self> {
		if lines < 1 {
			return Err(Error::InvalidCount);
		}
		Ok(Self {
			restart_each_call: false,
			bypass_error: false,
			max_jump: lines,
			reader: BufReader::new(source),
			random,
		})
	}

	/// Returns the maximum jump distance.
	pub fn max_jump(&self) -> usize {
		self.max_jump
	}

	/// Sets the maximum jump distance.
	///
	/// It should match the dictionary's line count. A smaller value leaves
	/// the tail of the dictionary unreachable until the cursor wraps; a larger
	/// one only wraps more often.
	///
	/// # Errors
	/// Returns `InvalidCount` if `lines` is zero.
	pub fn set_max_jump(&mut self, lines: usize) -> Result<()> {
		if lines < 1 {
			return Err(Error::InvalidCount);
		}
		self.max_jump = lines;
		Ok(())
	}

	/// Releases the dictionary source.
	///
	/// # Errors
	/// Returns `CloseFailed` if the source fails to close.
	pub fn close(self) -> Result<()> {
		let mut source = self.reader.into_inner();
		source.close().map_err(Error::CloseFailed)
	}

	/// Generates a random word.
	///
	/// # Errors
	/// Returns `GenerationFailed` on a read error, unless `bypass_error` is
	/// set, in which case the word is empty.
	pub fn generate(&mut self) -> Result<String> {
		match self.next_word() {
			Ok(word) => Ok(word),
			Err(_) if self.bypass_error => Ok(String::new()),
			Err(e) => Err(Error::GenerationFailed(e)),
		}
	}

	/// Generates `count` words joined by single spaces.
	///
	/// # Errors
	/// - `InvalidCount` if `count` is zero.
	/// - `GenerationFailed` if any word fails, whatever `bypass_error` says.
	pub fn sentence(&mut self, count: usize) -> Result<String> {
		if count < 1 {
			return Err(Error::InvalidCount);
		}

		// Grown word by word: `count` is caller input and may be huge
		let mut sentence = String::new();
		for index in 0..count {
			if index > 0 {
				sentence.push(' ');
			}
			sentence.push_str(&self.next_word().map_err(Error::GenerationFailed)?);
		}

		Ok(sentence)
	}

	/// Generates a sentence whose length is drawn from `[min, max]`.
	///
	/// # Errors
	/// - `InvalidCount` if `min` or `max` is zero.
	/// - `InvalidRange` if `max < min`.
	/// - `GenerationFailed` if any word fails.
	pub fn paragraph(&mut self, min: usize, max: usize) -> Result<String> {
		if min < 1 || max < 1 {
			return Err(Error::InvalidCount);
		}
		if max < min {
			return Err(Error::InvalidRange { min, max });
		}

		let count = self.jump(min, max);
		self.sentence(count)
	}

	/// Draws a value uniformly from `[min, max]`.
	fn jump(&mut self, min: usize, max: usize) -> usize {
		self.random.random_range(min..=max)
	}

	/// Moves the cursor back to the first line.
	///
	/// Returns `false` if the source cannot seek; the cursor is left untouched.
	fn rewind(&mut self) -> io::Result<bool> {
		if !self.reader.get_mut().seek_start()? {
			return Ok(false);
		}
		// Bytes still buffered belong to the old position
		let stale = self.reader.buffer().len();
		self.reader.consume(stale);
		Ok(true)
	}

	/// Scans forward a random number of lines and returns the last one read.
	///
	/// The dictionary is treated as a ring: reaching the end of the stream
	/// rewinds it and the remaining distance carries over.
	fn next_word(&mut self) -> io::Result<String> {
		if self.restart_each_call {
			self.rewind()?;
		}

		let mut remaining = self.jump(1, self.max_jump);
		let mut wrapped = false;
		let mut pass_lines = 0;
		let mut line = String::new();

		loop {
			line.clear();
			if self.reader.read_line(&mut line)? == 0 {
				if wrapped && pass_lines == 0 {
					return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "Dictionary is empty"));
				}
				if !self.rewind()? {
					return Err(io::Error::new(
						io::ErrorKind::Unsupported,
						"Dictionary exhausted and the source cannot seek back",
					));
				}
				trace!("dictionary exhausted with {} lines left to jump, wrapping around", remaining);
				wrapped = true;
				pass_lines = 0;
				continue;
			}

			pass_lines += 1;
			remaining -= 1;
			if remaining == 0 {
				strip_line_ending(&mut line);
				return Ok(line);
			}
		}
	}
}

/// Removes a trailing `\n` or `\r\n`.
fn strip_line_ending(line: &mut String) {
	if line.ends_with('\n') {
		line.pop();
		if line.ends_with('\r') {
			line.pop();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{Cursor, Read};

	const WORDS: &str = "alpha\nbeta\ngamma\n";

	fn sequential(source: &'static str) -> Generator<Cursor<&'static str>> {
		// A jump of 1 walks the dictionary line by line
		Generator::with_seed(Cursor::new(source), 1, 0).unwrap()
	}

	/// Fails every read, closes with an error.
	struct Broken;

	impl Read for Broken {
		fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::other("disk unplugged"))
		}
	}

	impl DictionarySource for Broken {
		fn seek_start(&mut self) -> io::Result<bool> {
			Ok(true)
		}

		fn close(&mut self) -> io::Result<()> {
			Err(io::Error::other("already closed"))
		}
	}

	#[test]
	fn test_zero_lines_is_invalid() {
		assert!(matches!(Generator::with_seed(Cursor::new(WORDS), 0, 1), Err(Error::InvalidCount)));
		let mut generator = sequential(WORDS);
		assert!(matches!(generator.set_max_jump(0), Err(Error::InvalidCount)));
		generator.set_max_jump(3).unwrap();
		assert_eq!(generator.max_jump(), 3);
	}

	#[test]
	fn test_defaults() {
		let generator = Generator::new(Cursor::new(WORDS), 3).unwrap();
		assert!(!generator.restart_each_call);
		assert!(!generator.bypass_error);
		assert_eq!(generator.max_jump(), 3);
	}

	#[test]
	fn test_continue_mode_walks_and_wraps() {
		let mut generator = sequential(WORDS);
		let words: Vec<String> = (0..7).map(|_| generator.generate().unwrap()).collect();
		assert_eq!(words, ["alpha", "beta", "gamma", "alpha", "beta", "gamma", "alpha"]);
	}

	#[test]
	fn test_restart_mode_always_starts_at_top() {
		let mut generator = sequential(WORDS);
		generator.restart_each_call = true;
		for _ in 0..5 {
			assert_eq!(generator.generate().unwrap(), "alpha");
		}
	}

	#[test]
	fn test_jump_longer_than_dictionary_wraps() {
		let mut generator = Generator::with_seed(Cursor::new("one\ntwo\n"), 50, 7).unwrap();
		for _ in 0..20 {
			let word = generator.generate().unwrap();
			assert!(word == "one" || word == "two", "unexpected word {word:?}");
		}
	}

	#[test]
	fn test_line_endings_are_stripped() {
		let mut generator = sequential("a\r\nb\nc");
		let words: Vec<String> = (0..4).map(|_| generator.generate().unwrap()).collect();
		assert_eq!(words, ["a", "b", "c", "a"]);
	}

	#[test]
	fn test_same_seed_same_words() {
		let mut first = Generator::with_seed(Cursor::new(WORDS), 3, 42).unwrap();
		let mut second = Generator::with_seed(Cursor::new(WORDS), 3, 42).unwrap();
		for _ in 0..16 {
			assert_eq!(first.generate().unwrap(), second.generate().unwrap());
		}
	}

	#[test]
	fn test_invalid_utf8_fails() {
		let mut generator = Generator::with_seed(Cursor::new(vec![0xff, 0xfe, b'\n']), 1, 0).unwrap();
		assert!(matches!(generator.generate(), Err(Error::GenerationFailed(_))));
	}

	#[test]
	fn test_bypass_returns_empty_word() {
		let mut generator = Generator::with_seed(Broken, 3, 0).unwrap();
		generator.bypass_error = true;
		assert_eq!(generator.generate().unwrap(), "");
	}

	#[test]
	fn test_compositions_ignore_bypass() {
		let mut generator = Generator::with_seed(Broken, 3, 0).unwrap();
		generator.bypass_error = true;
		assert!(matches!(generator.sentence(3), Err(Error::GenerationFailed(_))));
		assert!(matches!(generator.paragraph(1, 3), Err(Error::GenerationFailed(_))));
	}

	#[test]
	fn test_empty_dictionary_fails_instead_of_spinning() {
		let mut generator = Generator::with_seed(Cursor::new(""), 3, 0).unwrap();
		match generator.generate() {
			Err(Error::GenerationFailed(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
			other => panic!("expected GenerationFailed, got {other:?}"),
		}
	}

	#[test]
	fn test_unseekable_wraparound_fails() {
		let source: &[u8] = b"alpha\n";
		let mut generator = Generator::with_seed(source, 1, 0).unwrap();
		assert_eq!(generator.generate().unwrap(), "alpha");
		match generator.generate() {
			Err(Error::GenerationFailed(e)) => assert_eq!(e.kind(), io::ErrorKind::Unsupported),
			other => panic!("expected GenerationFailed, got {other:?}"),
		}
	}

	#[test]
	fn test_unseekable_restart_is_skipped() {
		let source: &[u8] = b"alpha\nbeta\n";
		let mut generator = Generator::with_seed(source, 1, 0).unwrap();
		generator.restart_each_call = true;
		assert_eq!(generator.generate().unwrap(), "alpha");
		assert_eq!(generator.generate().unwrap(), "beta");
	}

	#[test]
	fn test_sentence() {
		let mut generator = sequential(WORDS);
		assert_eq!(generator.sentence(4).unwrap(), "alpha beta gamma alpha");
		assert!(matches!(generator.sentence(0), Err(Error::InvalidCount)));
	}

	#[test]
	fn test_paragraph_bounds() {
		let mut generator = Generator::with_seed(Cursor::new(WORDS), 3, 9).unwrap();
		assert!(matches!(generator.paragraph(0, 3), Err(Error::InvalidCount)));
		assert!(matches!(generator.paragraph(3, 0), Err(Error::InvalidCount)));
		assert!(matches!(generator.paragraph(4, 2), Err(Error::InvalidRange { min: 4, max: 2 })));
		assert_eq!(generator.paragraph(5, 5).unwrap().split(' ').count(), 5);
		for _ in 0..32 {
			let words = generator.paragraph(2, 6).unwrap().split(' ').count();
			assert!((2..=6).contains(&words), "{words} words out of range");
		}
	}

	#[test]
	fn test_huge_counts_fail_on_first_word() {
		let mut generator = Generator::with_seed(Broken, 3, 0).unwrap();
		assert!(matches!(generator.sentence(usize::MAX), Err(Error::GenerationFailed(_))));
		assert!(matches!(generator.paragraph(1, usize::MAX), Err(Error::GenerationFailed(_))));
		assert!(matches!(generator.paragraph(usize::MAX, usize::MAX), Err(Error::GenerationFailed(_))));
	}

	#[test]
	fn test_unseekable_restart_fails_once_exhausted() {
		let source: &[u8] = b"alpha\n";
		let mut generator = Generator::with_seed(source, 1, 0).unwrap();
		generator.restart_each_call = true;
		assert_eq!(generator.generate().unwrap(), "alpha");
		for _ in 0..3 {
			match generator.generate() {
				Err(Error::GenerationFailed(e)) => assert_eq!(e.kind(), io::ErrorKind::Unsupported),
				other => panic!("expected GenerationFailed, got {other:?}"),
			}
		}
	}

	#[test]
	fn test_close() {
		assert!(sequential(WORDS).close().is_ok());
		let generator = Generator::with_seed(Broken, 1, 0).unwrap();
		assert!(matches!(generator.close(), Err(Error::CloseFailed(_))));
	}
}
