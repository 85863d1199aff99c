//! Streaming fake-text generation library.
//!
//! This crate picks random entries from a large line-oriented word list
//! without loading it into memory, including:
//! - Random-jump word selection over any readable stream
//! - Restart-from-top or continue-where-left-off cursor modes
//! - Sentence and paragraph composition
//! - Dictionary files with a cached line count
//!
//! The internal I/O helpers are kept private; everything else is
//! reachable through the modules below.

/// Error type shared by every fallible operation.
pub mod error;

/// Dictionary sources: readable streams that may seek back to their start.
pub mod source;

/// Dictionary files and their line count.
///
/// Opens a word list from disk and establishes the number of lines
/// once, caching it next to the file.
pub mod dictionary;

/// The random-jump generator (words, sentences, paragraphs).
pub mod generator;

/// I/O utilities (line counting, sidecar paths).
///
/// Not exposed
pub(crate) mod io;

pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use generator::Generator;
pub use source::DictionarySource;
