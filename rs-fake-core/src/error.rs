//! Error types for the fake-text generator.
//!
//! ## Error Cases
//! - `SourceUnavailable`: the dictionary could not be opened or measured.
//! - `CloseFailed`: releasing the dictionary source failed.
//! - `GenerationFailed`: a read error occurred while scanning for a word.
//! - `InvalidCount`: a count, bound or line count is below 1.
//! - `InvalidRange`: a range where `max < min`.

use std::io;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the generator.
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// The dictionary source could not be opened.
	#[error("Dictionary source unavailable: {0}")]
	SourceUnavailable(#[source] io::Error),

	/// Releasing the dictionary source failed.
	#[error("Failed to close dictionary source: {0}")]
	CloseFailed(#[source] io::Error),

	/// A read error occurred while scanning for the target line.
	#[error("Failed to generate word: {0}")]
	GenerationFailed(#[source] io::Error),

	/// A requested count is below 1.
	#[error("Count must be at least 1")]
	InvalidCount,

	/// The upper bound is smaller than the lower bound.
	#[error("Invalid range: max ({max}) is smaller than min ({min})")]
	InvalidRange { min: usize, max: usize },
}

impl Error {
	/// Returns `true` for errors caused by the caller's arguments rather than I/O.
	pub fn is_invalid_input(&self) -> bool {
		matches!(self, Error::InvalidCount | Error::InvalidRange { .. })
	}
}
