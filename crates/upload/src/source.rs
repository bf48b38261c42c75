//! Content sources: the byte streams an upload reads from.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// A seekable byte source with a fixed length and a display name.
///
/// The transfer engine borrows a source exclusively (`&mut`) for the duration
/// of one upload call and owns its seek position while borrowed. The length
/// must not change during the upload; a source that shrinks mid-transfer
/// surfaces as a read error.
pub trait ContentSource: Read + Seek + Send {
    /// Total length in bytes.
    fn len(&self) -> u64;

    /// Returns `true` if the source has no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name used when the caller supplies none: the filesystem path for file
    /// sources, the declared original filename for everything else.
    fn display_name(&self) -> &str;
}

/// A video file on disk.
pub struct FileSource {
    file: File,
    len: u64,
    name: String,
}

impl FileSource {
    /// Opens `path` for upload. The length is captured at open time.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            len,
            name: path.to_string_lossy().into_owned(),
        })
    }
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl ContentSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// In-memory video bytes with a declared original filename.
///
/// Covers content that never touched the local filesystem, e.g. bytes
/// received from an upstream client that only carried a filename attribute.
pub struct BytesSource {
    cursor: Cursor<Vec<u8>>,
    name: String,
}

impl BytesSource {
    /// Wraps `data` with its original filename.
    pub fn new(data: Vec<u8>, original_filename: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(data),
            name: original_filename.into(),
        }
    }
}

impl Read for BytesSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for BytesSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl ContentSource for BytesSource {
    fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
