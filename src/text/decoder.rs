//! Decoding of raw source files into [`SourceText`].
//!
//! The encoding is detected from the byte order mark. Without one, the content is decoded as
//! UTF-8 if it is valid UTF-8 and with [`DecoderOptions::fallback_encoding`] otherwise. The
//! checksum always covers the raw bytes exactly as they were read.
//!
//! When [`DecoderOptions::can_be_embedded`] is set, the embedding blob is computed from the
//! same raw bytes and attached to the text, so embedding it later reproduces the file
//! byte-for-byte without encoding it again.

use std::io::{Read, Seek, SeekFrom};

use log::trace;

use crate::{
    checksum::{compute_checksum, SourceHashAlgorithm},
    embedded::encoder::{blob_from_bytes, stream_length},
    text::{PrecomputedEmbedding, SourceText, TextEncoding},
    Error, Result,
};

/// Upper bound on the buffer reserved from a stream's reported length.
const MAX_PREALLOCATION: usize = 16 * 1024 * 1024;

/// Options controlling [`decode_source`] and [`decode_source_stream`].
///
/// # Examples
///
/// ```rust
/// use dotembed::{text::DecoderOptions, SourceHashAlgorithm, TextEncoding};
///
/// let options = DecoderOptions::embedding()
///     .with_checksum_algorithm(SourceHashAlgorithm::Sha256)
///     .with_fallback_encoding(TextEncoding::Ascii);
/// assert!(options.can_be_embedded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Encoding used when no byte order mark is present and the content is not valid UTF-8
    pub fallback_encoding: TextEncoding,
    /// Algorithm of the checksum attached to the decoded text
    pub checksum_algorithm: SourceHashAlgorithm,
    /// Reject content containing two consecutive NUL characters
    pub detect_binary: bool,
    /// Precompute the embedding blob from the raw bytes
    pub can_be_embedded: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            fallback_encoding: TextEncoding::Latin1,
            checksum_algorithm: SourceHashAlgorithm::Sha1,
            detect_binary: true,
            can_be_embedded: false,
        }
    }
}

impl DecoderOptions {
    /// Default options with embedding enabled.
    #[must_use]
    pub fn embedding() -> Self {
        DecoderOptions {
            can_be_embedded: true,
            ..Self::default()
        }
    }

    /// Set the encoding used for content that is neither marked nor valid UTF-8.
    #[must_use]
    pub fn with_fallback_encoding(mut self, encoding: TextEncoding) -> Self {
        self.fallback_encoding = encoding;
        self
    }

    /// Set the checksum algorithm.
    #[must_use]
    pub fn with_checksum_algorithm(mut self, algorithm: SourceHashAlgorithm) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// Enable or disable binary content detection.
    #[must_use]
    pub fn with_binary_detection(mut self, enabled: bool) -> Self {
        self.detect_binary = enabled;
        self
    }

    /// Enable or disable precomputing the embedding blob.
    #[must_use]
    pub fn with_embedding(mut self, enabled: bool) -> Self {
        self.can_be_embedded = enabled;
        self
    }
}

/// Detect the encoding declared by a byte order mark at the start of `bytes`.
#[must_use]
pub fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    [
        TextEncoding::Utf8Bom,
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
    ]
    .into_iter()
    .find(|encoding| bytes.starts_with(encoding.preamble()))
}

/// Decode raw file content.
///
/// # Errors
/// Returns [`crate::Error::Decoding`] if content marked as UTF-8 or UTF-16 is invalid,
/// and [`crate::Error::BinaryContent`] if binary detection is enabled and the content
/// contains two consecutive NUL characters.
///
/// # Examples
///
/// ```rust
/// use dotembed::text::{decode_source, DecoderOptions};
/// use dotembed::TextEncoding;
///
/// let text = decode_source(b"\xEF\xBB\xBFclass C {}", &DecoderOptions::default())?;
/// assert_eq!(text.as_str(), "class C {}");
/// assert_eq!(text.encoding(), Some(TextEncoding::Utf8Bom));
/// # Ok::<(), dotembed::Error>(())
/// ```
pub fn decode_source(bytes: &[u8], options: &DecoderOptions) -> Result<SourceText> {
    let (encoding, strict) = match detect_bom(bytes) {
        Some(encoding) => (encoding, true),
        None if std::str::from_utf8(bytes).is_ok() => (TextEncoding::Utf8, true),
        None => (options.fallback_encoding, false),
    };
    trace!("decoding {} bytes as {}", bytes.len(), encoding);

    let content = encoding.decode(&bytes[encoding.preamble().len()..])?;
    if options.detect_binary && content.contains("\0\0") {
        return Err(Error::BinaryContent);
    }

    // Strict decodes fail instead of substituting, so only the fallback can lose bytes.
    let lossless = strict || encoding.encode(&content) == bytes;

    let algorithm = options.checksum_algorithm;
    let checksum = compute_checksum(bytes, algorithm);
    let mut text = SourceText::new(content, Some(encoding), algorithm).with_checksum(checksum.clone());
    if !lossless {
        trace!("{encoding} does not reproduce the source bytes");
        text = text.into_lossy();
    }

    if options.can_be_embedded {
        let blob = blob_from_bytes(bytes)?;
        text = text.with_precomputed_embedding(PrecomputedEmbedding::new(blob, checksum, algorithm));
    }

    Ok(text)
}

/// Decode the whole content of a seekable stream.
///
/// The stream is read from its start regardless of its current position.
///
/// # Errors
/// Returns [`crate::Error::InputTooLarge`] for streams longer than `i32::MAX` bytes,
/// [`crate::Error::EndOfData`] if the stream yields fewer bytes than its reported length,
/// and any error of [`decode_source`].
pub fn decode_source_stream<R: Read + Seek + ?Sized>(
    stream: &mut R,
    options: &DecoderOptions,
) -> Result<SourceText> {
    let length = stream_length(stream)? as u64;
    stream.seek(SeekFrom::Start(0))?;

    let mut bytes = Vec::with_capacity((length as usize).min(MAX_PREALLOCATION));
    stream.take(length).read_to_end(&mut bytes)?;
    if bytes.len() as u64 != length {
        return Err(Error::EndOfData {
            expected: length,
            actual: bytes.len() as u64,
        });
    }

    decode_source(&bytes, options)
}
