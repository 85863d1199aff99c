use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// A readable stream of newline-delimited dictionary entries.
///
/// The generator reads the stream line by line and, when it runs past the
/// end, asks the source to go back to its first byte. Sources that cannot
/// seek report it instead of failing, so the generator can degrade.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use rs_fake_core::source::DictionarySource;
///
/// let mut source = Cursor::new(b"alpha\nbeta\n".to_vec());
/// assert!(source.seek_start().unwrap());
///
/// let mut stream: &[u8] = b"alpha\nbeta\n";
/// assert!(!stream.seek_start().unwrap());
/// ```
pub trait DictionarySource: Read {
	/// Moves the stream back to its first byte.
	///
	/// Returns `Ok(false)` when the stream cannot seek.
	fn seek_start(&mut self) -> io::Result<bool>;

	/// Releases the underlying handle.
	///
	/// The default does nothing; handles are also released on drop.
	fn close(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl DictionarySource for File {
	fn seek_start(&mut self) -> io::Result<bool> {
		self.seek(SeekFrom::Start(0)).map(|_| true)
	}
}

impl<T: AsRef<[u8]>> DictionarySource for Cursor<T> {
	fn seek_start(&mut self) -> io::Result<bool> {
		self.set_position(0);
		Ok(true)
	}
}

/// A byte slice is consumed as it is read and never comes back.
impl DictionarySource for &[u8] {
	fn seek_start(&mut self) -> io::Result<bool> {
		Ok(false)
	}
}

impl<S: DictionarySource + ?Sized> DictionarySource for Box<S> {
	fn seek_start(&mut self) -> io::Result<bool> {
		(**self).seek_start()
	}

	fn close(&mut self) -> io::Result<()> {
		(**self).close()
	}
}

/// Adapter for any `Read + Seek` stream.
#[derive(Debug)]
pub struct Seekable<R>(pub R);

impl<R: Read> Read for Seekable<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.0.read(buf)
	}
}

impl<R: Read + Seek> DictionarySource for Seekable<R> {
	fn seek_start(&mut self) -> io::Result<bool> {
		self.0.seek(SeekFrom::Start(0)).map(|_| true)
	}
}

/// Adapter for forward-only streams (pipes, sockets, decompressors).
#[derive(Debug)]
pub struct Unseekable<R>(pub R);

impl<R: Read> Read for Unseekable<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.0.read(buf)
	}
}

impl<R: Read> DictionarySource for Unseekable<R> {
	fn seek_start(&mut self) -> io::Result<bool> {
		Ok(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn read_all<S: DictionarySource>(source: &mut S) -> String {
		let mut out = String::new();
		source.read_to_string(&mut out).unwrap();
		out
	}

	#[test]
	fn test_cursor_seeks_back() {
		let mut source = Cursor::new("a\nb\n");
		assert_eq!(read_all(&mut source), "a\nb\n");
		assert!(source.seek_start().unwrap());
		assert_eq!(read_all(&mut source), "a\nb\n");
	}

	#[test]
	fn test_slice_is_not_seekable() {
		let mut source: &[u8] = b"a\nb\n";
		assert_eq!(read_all(&mut source), "a\nb\n");
		assert!(!source.seek_start().unwrap());
		assert_eq!(read_all(&mut source), "");
	}

	#[test]
	fn test_adapters() {
		let mut seekable = Seekable(Cursor::new(b"x\n".to_vec()));
		assert_eq!(read_all(&mut seekable), "x\n");
		assert!(seekable.seek_start().unwrap());
		assert_eq!(read_all(&mut seekable), "x\n");

		let mut forward = Unseekable(Cursor::new(b"x\n".to_vec()));
		assert_eq!(read_all(&mut forward), "x\n");
		assert!(!forward.seek_start().unwrap());
		assert_eq!(read_all(&mut forward), "");
	}

	#[test]
	fn test_boxed_source_delegates() {
		let mut boxed: Box<dyn DictionarySource> = Box::new(Cursor::new("w\n"));
		assert_eq!(read_all(&mut boxed), "w\n");
		assert!(boxed.seek_start().unwrap());
		assert!(boxed.close().is_ok());
	}
}
