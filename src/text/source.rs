use std::{fmt, sync::OnceLock};

use crate::{
    checksum::{ChecksumHasher, SourceHashAlgorithm},
    text::encoding::{utf16_len, TextEncoding},
};

/// An embedding blob computed ahead of time, together with the checksum of the content it
/// was computed from.
///
/// Stream decoders that already hold the raw bytes of a file attach one of these to the
/// resulting [`SourceText`] so that embedding the text later does not encode it a second time.
#[derive(Clone, PartialEq, Eq)]
pub struct PrecomputedEmbedding {
    blob: Vec<u8>,
    checksum: Vec<u8>,
    algorithm: SourceHashAlgorithm,
}

impl PrecomputedEmbedding {
    /// Bundle an already encoded blob with its content checksum.
    #[must_use]
    pub fn new(blob: Vec<u8>, checksum: Vec<u8>, algorithm: SourceHashAlgorithm) -> Self {
        PrecomputedEmbedding {
            blob,
            checksum,
            algorithm,
        }
    }

    /// The encoded embedded source blob.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Checksum of the original content.
    #[must_use]
    pub fn checksum(&self) -> &[u8] {
        &self.checksum
    }

    /// Algorithm of [`PrecomputedEmbedding::checksum`].
    #[must_use]
    pub fn algorithm(&self) -> SourceHashAlgorithm {
        self.algorithm
    }
}

impl fmt::Debug for PrecomputedEmbedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecomputedEmbedding")
            .field("blob_len", &self.blob.len())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Decoded source content with the encoding it is stored in.
///
/// The checksum is computed on first use over the encoded form (preamble included) and
/// cached. Texts produced by [`crate::text::decode_source`] carry the checksum of the raw
/// input bytes instead, which is the same value for every input that decodes losslessly.
#[derive(Debug, Clone)]
pub struct SourceText {
    content: String,
    encoding: Option<TextEncoding>,
    checksum_algorithm: SourceHashAlgorithm,
    checksum: OnceLock<Vec<u8>>,
    embedding: Option<PrecomputedEmbedding>,
    lossless: bool,
}

impl SourceText {
    /// Create a text from its content and declared encoding.
    ///
    /// A text without an encoding can still be hashed (as UTF-8) but cannot be embedded
    /// unless a precomputed embedding is attached.
    pub fn new(
        content: impl Into<String>,
        encoding: Option<TextEncoding>,
        checksum_algorithm: SourceHashAlgorithm,
    ) -> Self {
        SourceText {
            content: content.into(),
            encoding,
            checksum_algorithm,
            checksum: OnceLock::new(),
            embedding: None,
            lossless: true,
        }
    }

    /// Attach an embedding computed ahead of time.
    #[must_use]
    pub fn with_precomputed_embedding(mut self, embedding: PrecomputedEmbedding) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub(crate) fn with_checksum(self, checksum: Vec<u8>) -> Self {
        let _ = self.checksum.set(checksum);
        self
    }

    /// Mark the content as not reproducing its source bytes when encoded.
    pub(crate) fn into_lossy(mut self) -> Self {
        self.lossless = false;
        self
    }

    /// The decoded content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Length of the content in UTF-16 code units.
    #[must_use]
    pub fn len_utf16(&self) -> usize {
        utf16_len(&self.content)
    }

    /// The declared encoding, if any.
    #[must_use]
    pub fn encoding(&self) -> Option<TextEncoding> {
        self.encoding
    }

    /// The algorithm [`SourceText::checksum`] uses.
    #[must_use]
    pub fn checksum_algorithm(&self) -> SourceHashAlgorithm {
        self.checksum_algorithm
    }

    /// The attached precomputed embedding, if any.
    #[must_use]
    pub fn precomputed_embedding(&self) -> Option<&PrecomputedEmbedding> {
        self.embedding.as_ref()
    }

    /// Whether [`crate::EmbeddedText::from_text`] accepts this text.
    ///
    /// Decoded texts whose encoding could not represent every source byte are only
    /// embeddable through a precomputed embedding.
    #[must_use]
    pub fn can_be_embedded(&self) -> bool {
        self.embedding.is_some() || (self.encoding.is_some() && self.lossless)
    }

    /// Whether encoding the content reproduces the bytes it was decoded from.
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.lossless
    }

    /// Checksum of the encoded content with the text's own algorithm.
    pub fn checksum(&self) -> &[u8] {
        self.checksum
            .get_or_init(|| self.compute_checksum(self.checksum_algorithm))
    }

    /// Checksum of the encoded content with `algorithm`, reusing the cached value when the
    /// algorithm matches the text's own.
    #[must_use]
    pub fn checksum_with(&self, algorithm: SourceHashAlgorithm) -> Vec<u8> {
        if algorithm == self.checksum_algorithm {
            self.checksum().to_vec()
        } else {
            self.compute_checksum(algorithm)
        }
    }

    /// The content encoded with the declared encoding (UTF-8 when none is declared),
    /// preamble included.
    #[must_use]
    pub fn encoded_bytes(&self) -> Vec<u8> {
        self.effective_encoding().encode(&self.content)
    }

    fn effective_encoding(&self) -> TextEncoding {
        self.encoding.unwrap_or(TextEncoding::Utf8)
    }

    fn compute_checksum(&self, algorithm: SourceHashAlgorithm) -> Vec<u8> {
        let mut hasher = ChecksumHasher::new(algorithm);
        // The hasher's writer never fails.
        let _ = self
            .effective_encoding()
            .encode_to(&self.content, &mut hasher);
        hasher.finalize()
    }
}
