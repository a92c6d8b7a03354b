//! Memory-mapped access to source files on disk.
//!
//! [`crate::file::physical::Physical`] maps a file into the address space so that the
//! encoder can hash and compress it straight from the page cache without copying it into a
//! heap buffer first. This backs [`crate::EmbeddedText::from_file`] and the batch embedding
//! of [`crate::documents::DebugDocumentsBuilder::embed_files`].
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use dotembed::file::Physical;
//!
//! let physical = Physical::new("src/Program.cs")?;
//! println!("{} bytes", physical.len());
//! # Ok::<(), dotembed::Error>(())
//! ```

use crate::{Error::FileError, Result};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A read-only memory mapping of a file.
#[derive(Debug)]
pub struct Physical {
    data: Mmap,
}

impl Physical {
    /// Map the file at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = fs::File::open(path).map_err(FileError)?;

        // The mapping is read-only and lives no longer than `Physical`. Concurrent truncation
        // of the file by another process is outside what this crate can guard against.
        let mmap = unsafe { Mmap::map(&file) }.map_err(FileError)?;

        Ok(Physical { data: mmap })
    }

    /// The mapped content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Length of the mapped file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for an empty file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use super::*;

    #[test]
    fn physical_maps_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"class Program { }").unwrap();
        file.flush().unwrap();

        let physical = Physical::new(file.path()).unwrap();
        assert_eq!(physical.len(), 17);
        assert_eq!(physical.data(), b"class Program { }");
    }

    #[test]
    fn physical_invalid_file_path() {
        let result = Physical::new(PathBuf::from("/nonexistent/path/to/file.cs"));
        match result.unwrap_err() {
            FileError(io_error) => {
                assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileError"),
        }
    }

    #[test]
    fn physical_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let physical = Physical::new(file.path()).unwrap();
        assert!(physical.is_empty());
        assert_eq!(physical.data().len(), 0);
    }
}
