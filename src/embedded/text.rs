//! [`EmbeddedText`], a document's content prepared for embedding together with its checksum.

use std::{
    fmt,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use log::debug;

use crate::{
    checksum::{compute_checksum, compute_checksum_reader, SourceHashAlgorithm},
    customdebuginformation::CustomDebugKind,
    embedded::{
        encoder::{blob_from_bytes, blob_from_reader, blob_from_text, stream_length},
        EmbeddedSourceBlob,
    },
    file::Physical,
    text::SourceText,
    Error::{self, EndOfData, InvalidArgument},
    Result,
};

/// Source content prepared for embedding into a portable PDB.
///
/// An `EmbeddedText` is immutable once constructed. It holds the document path, the checksum
/// of the original content, the algorithm that produced it, and the encoded blob that becomes
/// the value of the `EmbeddedSource` custom debug information record.
///
/// # Examples
///
/// ```rust
/// use dotembed::{EmbeddedText, SourceHashAlgorithm};
///
/// let text = EmbeddedText::from_bytes("Program.cs", b"class C {}", SourceHashAlgorithm::Sha256)?;
/// assert_eq!(text.file_path(), "Program.cs");
/// assert_eq!(text.checksum().len(), 32);
/// assert!(!text.is_compressed());
/// assert_eq!(text.content()?, b"class C {}");
/// # Ok::<(), dotembed::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EmbeddedText {
    file_path: String,
    checksum_algorithm: SourceHashAlgorithm,
    checksum: Vec<u8>,
    blob: Vec<u8>,
}

impl EmbeddedText {
    /// Embed a decoded source text.
    ///
    /// A precomputed embedding attached to `text` is reused verbatim. Its checksum is reused
    /// when it was computed with `checksum_algorithm` and recomputed from the text otherwise.
    /// Without a precomputed embedding the text is encoded through its declared encoding,
    /// preamble included, and the checksum covers exactly those bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an empty `file_path` or a text that
    /// [cannot be embedded](SourceText::can_be_embedded).
    pub fn from_text(
        file_path: impl Into<String>,
        text: &SourceText,
        checksum_algorithm: SourceHashAlgorithm,
    ) -> Result<Self> {
        let file_path = validate_file_path(file_path.into())?;

        let (checksum, blob) = match (text.precomputed_embedding(), text.encoding()) {
            (Some(embedding), _) => {
                let checksum = if embedding.algorithm() == checksum_algorithm {
                    embedding.checksum().to_vec()
                } else {
                    text.checksum_with(checksum_algorithm)
                };
                (checksum, embedding.blob().to_vec())
            }
            (None, Some(encoding)) if text.can_be_embedded() => (
                text.checksum_with(checksum_algorithm),
                blob_from_text(text.as_str(), text.len_utf16(), encoding)?,
            ),
            (None, Some(_)) => {
                return Err(InvalidArgument(format!(
                    "source text of '{file_path}' does not round-trip through its encoding"
                )))
            }
            (None, None) => {
                return Err(InvalidArgument(format!(
                    "source text of '{file_path}' has no encoding and cannot be embedded"
                )))
            }
        };

        Ok(Self::assemble(file_path, checksum_algorithm, checksum, blob))
    }

    /// Embed the whole content of a seekable stream.
    ///
    /// The length is determined by seeking to the end before anything is read, the content
    /// is hashed from the start, and the stream is rewound once more for encoding.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an empty `file_path`,
    /// [`crate::Error::InputTooLarge`] for streams longer than `i32::MAX` bytes, and
    /// [`crate::Error::EndOfData`] if the stream yields fewer bytes than its length.
    pub fn from_stream<R: Read + Seek + ?Sized>(
        file_path: impl Into<String>,
        stream: &mut R,
        checksum_algorithm: SourceHashAlgorithm,
    ) -> Result<Self> {
        let file_path = validate_file_path(file_path.into())?;

        let length = stream_length(stream)? as u64;
        stream.seek(SeekFrom::Start(0))?;

        let (checksum, hashed) =
            compute_checksum_reader(&mut (&mut *stream).take(length), checksum_algorithm)?;
        if hashed != length {
            return Err(EndOfData {
                expected: length,
                actual: hashed,
            });
        }

        stream.seek(SeekFrom::Start(0))?;
        let blob = blob_from_reader(stream, length)?;

        Ok(Self::assemble(file_path, checksum_algorithm, checksum, blob))
    }

    /// Embed an in-memory byte sequence.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] for an empty `file_path` and
    /// [`crate::Error::InputTooLarge`] for content longer than `i32::MAX` bytes.
    pub fn from_bytes(
        file_path: impl Into<String>,
        bytes: &[u8],
        checksum_algorithm: SourceHashAlgorithm,
    ) -> Result<Self> {
        let file_path = validate_file_path(file_path.into())?;

        let blob = blob_from_bytes(bytes)?;
        let checksum = compute_checksum(bytes, checksum_algorithm);

        Ok(Self::assemble(file_path, checksum_algorithm, checksum, blob))
    }

    /// Embed a file from disk, using its path as given as the document path.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, plus any error of
    /// [`EmbeddedText::from_bytes`].
    pub fn from_file(path: impl AsRef<Path>, checksum_algorithm: SourceHashAlgorithm) -> Result<Self> {
        let path = path.as_ref();
        let file_path = path.to_string_lossy().into_owned();
        let length = std::fs::metadata(path)?.len();

        // Mapping an empty file fails on some platforms.
        if length == 0 {
            return Self::from_bytes(file_path, &[], checksum_algorithm);
        }

        let physical = Physical::new(path)?;
        Self::from_bytes(file_path, physical.data(), checksum_algorithm)
    }

    fn assemble(
        file_path: String,
        checksum_algorithm: SourceHashAlgorithm,
        checksum: Vec<u8>,
        blob: Vec<u8>,
    ) -> Self {
        let text = EmbeddedText {
            file_path,
            checksum_algorithm,
            checksum,
            blob,
        };

        debug!(
            "embedded '{}': {} bytes {} into {} byte blob, {} checksum",
            text.file_path,
            text.uncompressed_len(),
            if text.is_compressed() { "deflated" } else { "stored" },
            text.blob.len(),
            text.checksum_algorithm
        );

        text
    }

    /// The document path the content is recorded under.
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// The algorithm [`EmbeddedText::checksum`] was computed with.
    #[must_use]
    pub fn checksum_algorithm(&self) -> SourceHashAlgorithm {
        self.checksum_algorithm
    }

    /// Checksum of the original content.
    #[must_use]
    pub fn checksum(&self) -> &[u8] {
        &self.checksum
    }

    /// The encoded blob.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Consume the value and return the encoded blob.
    #[must_use]
    pub fn into_blob(self) -> Vec<u8> {
        self.blob
    }

    /// Whether the blob payload is compressed.
    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.header() > 0
    }

    /// Length of the original content.
    #[must_use]
    pub fn uncompressed_len(&self) -> usize {
        match self.header() {
            0 => self.blob.len().saturating_sub(4),
            length => length as usize,
        }
    }

    /// Decode the blob back into the original content.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the blob cannot be decoded.
    pub fn content(&self) -> Result<Vec<u8>> {
        EmbeddedSourceBlob::parse(&self.blob)?.decode()
    }

    /// The custom debug information record kind and value that carry this content.
    #[must_use]
    pub fn to_custom_debug_info(&self) -> (CustomDebugKind, &[u8]) {
        (CustomDebugKind::EmbeddedSource, &self.blob)
    }

    fn header(&self) -> i32 {
        // Every constructor writes the 4-byte header.
        crate::file::io::read_le::<i32>(&self.blob).unwrap_or(0)
    }
}

impl fmt::Debug for EmbeddedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedText")
            .field("file_path", &self.file_path)
            .field("checksum_algorithm", &self.checksum_algorithm)
            .field("checksum", &HexBytes(&self.checksum))
            .field("blob_len", &self.blob.len())
            .finish()
    }
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn validate_file_path(file_path: String) -> Result<String> {
    if file_path.is_empty() {
        return Err(Error::InvalidArgument(
            "file path must not be empty".to_string(),
        ));
    }
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        test::{ShortStream, UnreadableHugeStream},
        text::{PrecomputedEmbedding, TextEncoding},
    };

    #[test]
    fn empty_path_is_rejected_first() {
        let mut stream = UnreadableHugeStream::default();
        assert!(matches!(
            EmbeddedText::from_stream("", &mut stream, SourceHashAlgorithm::Sha1),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(stream.seeks, 0);

        let text = SourceText::new("x", Some(TextEncoding::Utf8), SourceHashAlgorithm::Sha1);
        assert!(matches!(
            EmbeddedText::from_text("", &text, SourceHashAlgorithm::Sha1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn huge_stream_is_rejected_without_reading() {
        let mut stream = UnreadableHugeStream::default();
        match EmbeddedText::from_stream("big.cs", &mut stream, SourceHashAlgorithm::Sha1) {
            Err(Error::InputTooLarge(length)) => assert_eq!(length, i32::MAX as u64 + 1),
            other => panic!("expected InputTooLarge, got {other:?}"),
        }
        assert_eq!(stream.reads, 0);
    }

    #[test]
    fn short_stream_is_end_of_data() {
        let mut stream = ShortStream::new(vec![b'a'; 40], 100);
        assert!(matches!(
            EmbeddedText::from_stream("short.cs", &mut stream, SourceHashAlgorithm::Sha1),
            Err(Error::EndOfData {
                expected: 100,
                actual: 40
            })
        ));
    }

    #[test]
    fn stream_and_bytes_agree() {
        let content = b"public static void Main() { }\n".repeat(12);
        let mut stream = Cursor::new(content.clone());
        stream.set_position(17);

        let from_stream =
            EmbeddedText::from_stream("a.cs", &mut stream, SourceHashAlgorithm::Sha256).unwrap();
        let from_bytes =
            EmbeddedText::from_bytes("a.cs", &content, SourceHashAlgorithm::Sha256).unwrap();

        assert_eq!(from_stream, from_bytes);
        assert!(from_bytes.is_compressed());
        assert_eq!(from_bytes.uncompressed_len(), content.len());
    }

    #[test]
    fn text_without_encoding_is_rejected() {
        let text = SourceText::new("class C {}", None, SourceHashAlgorithm::Sha1);
        assert!(matches!(
            EmbeddedText::from_text("a.cs", &text, SourceHashAlgorithm::Sha1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn precomputed_blob_is_reused() {
        let blob = vec![0, 0, 0, 0, b'r', b'a', b'w'];
        let checksum = vec![0xAA; 20];
        let text = SourceText::new("raw", None, SourceHashAlgorithm::Sha1)
            .with_precomputed_embedding(PrecomputedEmbedding::new(
                blob.clone(),
                checksum.clone(),
                SourceHashAlgorithm::Sha1,
            ));

        let embedded = EmbeddedText::from_text("raw.cs", &text, SourceHashAlgorithm::Sha1).unwrap();
        assert_eq!(embedded.blob(), blob.as_slice());
        assert_eq!(embedded.checksum(), checksum.as_slice());

        // Another algorithm keeps the blob and recomputes the checksum.
        let embedded =
            EmbeddedText::from_text("raw.cs", &text, SourceHashAlgorithm::Sha256).unwrap();
        assert_eq!(embedded.blob(), blob.as_slice());
        assert_eq!(
            embedded.checksum(),
            compute_checksum(b"raw", SourceHashAlgorithm::Sha256).as_slice()
        );
    }

    #[test]
    fn text_checksum_matches_bytes_form() {
        let text = SourceText::new("class C {}", Some(TextEncoding::Utf8Bom), SourceHashAlgorithm::Sha1);
        let from_text = EmbeddedText::from_text("c.cs", &text, SourceHashAlgorithm::Sha1).unwrap();
        let from_bytes =
            EmbeddedText::from_bytes("c.cs", b"\xEF\xBB\xBFclass C {}", SourceHashAlgorithm::Sha1)
                .unwrap();

        assert_eq!(from_text, from_bytes);
    }

    #[test]
    fn custom_debug_record() {
        let embedded = EmbeddedText::from_bytes("x.cs", b"x", SourceHashAlgorithm::Sha1).unwrap();
        let (kind, value) = embedded.to_custom_debug_info();
        assert_eq!(kind, CustomDebugKind::EmbeddedSource);
        assert_eq!(value, embedded.blob());
    }

    #[test]
    fn debug_output_hides_blob() {
        let embedded = EmbeddedText::from_bytes("x.cs", b"abc", SourceHashAlgorithm::Sha1).unwrap();
        let debug = format!("{embedded:?}");
        assert!(debug.contains("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert!(debug.contains("blob_len: 7"));
    }
}
