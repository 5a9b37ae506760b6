use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

/// A readable handle that can report its total size in bytes.
pub trait SizedRead: Read {
    fn byte_len(&self) -> io::Result<u64>;
}

impl SizedRead for File {
    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// The narrow file contract persistence depends on.
///
/// Handles are closed by dropping them, so every exit path releases them.
pub trait FileProvider: Debug {
    type Reader: SizedRead;
    type Writer: Write;

    /// Open an existing file read-only.
    fn open_read(&self, path: &Path) -> io::Result<Self::Reader>;

    /// Open a file for writing, creating it or truncating any old contents.
    fn open_write(&self, path: &Path) -> io::Result<Self::Writer>;
}

/// Provider backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileProvider for LocalFs {
    type Reader = File;
    type Writer = File;

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn open_write(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }
}
