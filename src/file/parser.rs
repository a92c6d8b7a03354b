//! Cursor-based reader over blob bytes.
//!
//! [`crate::file::parser::Parser`] keeps a position into a byte slice and offers bounds-checked
//! little-endian reads. The embedded source reader uses it to consume the 4-byte
//! discriminator and hand the rest of the blob to the payload decoder.
//!
//! # Usage Examples
//!
//! ```rust
//! use dotembed::Parser;
//!
//! let blob = [0x00, 0x00, 0x00, 0x00, b'h', b'i'];
//! let mut parser = Parser::new(&blob);
//!
//! let discriminator = parser.read_le::<i32>()?;
//! assert_eq!(discriminator, 0);
//! assert_eq!(parser.remaining(), b"hi");
//! # Ok::<(), dotembed::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, BlobIO},
    Error::OutOfBounds,
    Result,
};

/// A bounds-checked cursor over a byte slice.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if unread bytes remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current position within the data.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The complete underlying data, independent of the position.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The unread part of the data.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Move the cursor to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies past the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Read a `T` in little-endian byte order and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
    pub fn read_le<T: BlobIO>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_advance() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_le::<u32>().unwrap(), 0x04030201);
        assert_eq!(parser.pos(), 4);
        assert!(parser.has_more_data());
        assert_eq!(parser.remaining(), &[0x05, 0x06]);
    }

    #[test]
    fn read_past_end() {
        let data = [0x01, 0x02];
        let mut parser = Parser::new(&data);

        assert!(matches!(parser.read_le::<i32>(), Err(OutOfBounds)));
        assert_eq!(parser.pos(), 0);
    }

    #[test]
    fn seek_bounds() {
        let data = [0u8; 4];
        let mut parser = Parser::new(&data);

        assert!(parser.seek(4).is_ok());
        assert!(!parser.has_more_data());
        assert!(parser.remaining().is_empty());
        assert!(parser.seek(5).is_err());
    }

    #[test]
    fn empty_parser() {
        let parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert_eq!(parser.len(), 0);
    }
}
