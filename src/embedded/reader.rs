//! Parsing and decoding of embedded source blobs written by any PDB producer.

use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::{file::Parser, Result};

/// Upper bound on the buffer reserved ahead of inflating, regardless of the header value.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// A parsed embedded source blob, borrowing the payload from the input.
///
/// # Examples
///
/// ```rust
/// use dotembed::EmbeddedSourceBlob;
///
/// let blob = EmbeddedSourceBlob::parse(&[0, 0, 0, 0, b'h', b'i'])?;
/// assert!(!blob.is_compressed());
/// assert_eq!(blob.decode()?, b"hi");
/// # Ok::<(), dotembed::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedSourceBlob<'a> {
    format: i32,
    payload: &'a [u8],
}

impl<'a> EmbeddedSourceBlob<'a> {
    /// Parse the header of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `data` is shorter than the 4-byte header or the
    /// header holds a negative value.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(malformed_error!(
                "Embedded source blob too short - {} bytes",
                data.len()
            ));
        }

        let mut parser = Parser::new(data);
        let format = parser.read_le::<i32>()?;
        if format < 0 {
            return Err(malformed_error!(
                "Embedded source blob has invalid format {}",
                format
            ));
        }

        Ok(EmbeddedSourceBlob {
            format,
            payload: parser.remaining(),
        })
    }

    /// Whether the payload is deflate-compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.format > 0
    }

    /// The header value: `0` for verbatim content, the uncompressed length otherwise.
    #[must_use]
    pub fn format(&self) -> i32 {
        self.format
    }

    /// Length of the content once decoded.
    #[must_use]
    pub fn uncompressed_len(&self) -> usize {
        if self.is_compressed() {
            self.format as usize
        } else {
            self.payload.len()
        }
    }

    /// The bytes following the header.
    #[must_use]
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Decode the original content.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a compressed payload fails to inflate or
    /// inflates to a length other than the one in the header.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if !self.is_compressed() {
            return Ok(self.payload.to_vec());
        }

        let expected = self.format as usize;
        let mut content = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
        DeflateDecoder::new(self.payload)
            .take(expected as u64 + 1)
            .read_to_end(&mut content)
            .map_err(|e| malformed_error!("Embedded source payload failed to inflate - {}", e))?;

        if content.len() != expected {
            return Err(malformed_error!(
                "Embedded source payload inflated to {} bytes, header declares {}",
                content.len(),
                expected
            ));
        }

        Ok(content)
    }
}
