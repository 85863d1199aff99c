use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration for the `rs-fake-server` binary.
///
/// All values are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
	name = "rs-fake-server",
	version,
	about = "An HTTP service generating fake words, sentences and paragraphs"
)]
pub struct CliArgs {
	/// Dictionary file, one word per line.
	///
	/// Environment variable: `DICTIONARY`
	#[arg(long, env = "DICTIONARY", default_value = "./data/fa.dic")]
	pub dictionary: PathBuf,

	/// Number of lines in the dictionary.
	///
	/// When omitted, the lines are counted once and cached next to the
	/// dictionary file.
	///
	/// Environment variable: `DICTIONARY_LINES`
	#[arg(long, env = "DICTIONARY_LINES")]
	pub lines: Option<usize>,

	/// Address to listen on.
	///
	/// Environment variable: `HOST`
	#[arg(long, env = "HOST", default_value_t = String::from("127.0.0.1"))]
	pub host: String,

	/// Port to listen on.
	///
	/// Environment variable: `PORT`
	#[arg(long, env = "PORT", default_value_t = 5000)]
	pub port: u16,

	/// Restart from the first line of the dictionary before every word.
	///
	/// Environment variable: `RESTART_EACH_CALL`
	#[arg(long, env = "RESTART_EACH_CALL")]
	pub restart_each_call: bool,

	/// Return empty words instead of read errors for single words.
	///
	/// Environment variable: `BYPASS_ERROR`
	#[arg(long, env = "BYPASS_ERROR")]
	pub bypass_error: bool,

	/// Largest sentence or paragraph a request may ask for, in words.
	///
	/// Larger `count` or `max` values are rejected with `400`; the shared
	/// generator is locked for the whole composition.
	///
	/// Environment variable: `MAX_WORDS`
	#[arg(long, env = "MAX_WORDS", default_value_t = 1000)]
	pub max_words: usize,

	/// Number of HTTP worker threads. Defaults to the number of CPUs.
	///
	/// Environment variable: `WORKERS`
	#[arg(long, env = "WORKERS")]
	pub workers: Option<usize>,
}

impl CliArgs {
	/// Returns the worker count, at least 1.
	pub fn workers(&self) -> usize {
		self.workers.unwrap_or_else(num_cpus::get).max(1)
	}
}
