//! # dotembed Prelude
//!
//! Import this module to get quick access to the types needed for embedding source documents
//! and reading embedded source blobs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotembed operations
pub use crate::Error;

/// The result type used throughout dotembed
pub use crate::Result;

// ================================================================================================
// Embedding
// ================================================================================================

/// Content prepared for embedding and the size threshold for compression
pub use crate::{EmbeddedText, COMPRESSION_THRESHOLD};

/// Reader for embedded source blobs
pub use crate::EmbeddedSourceBlob;

// ================================================================================================
// Checksums
// ================================================================================================

/// Checksum algorithms and helpers
pub use crate::checksum::{compute_checksum, ChecksumHasher, SourceHashAlgorithm};

// ================================================================================================
// Source Texts
// ================================================================================================

/// Decoded texts, encodings and the raw file decoder
pub use crate::text::{
    decode_source, decode_source_stream, DecoderOptions, PrecomputedEmbedding, SourceText,
    TextEncoding,
};

// ================================================================================================
// PDB Records
// ================================================================================================

/// Custom debug information records
pub use crate::customdebuginformation::{parse_custom_debug_blob, CustomDebugInfo, CustomDebugKind};

/// Debug document table assembly
pub use crate::documents::{DebugDocumentsBuilder, DebugSourceDocument};
