//! Source text model.
//!
//! # Key Components
//!
//! - [`TextEncoding`] - Declared encodings and their preambles
//! - [`SourceText`] - Decoded content with encoding, checksum and optional precomputed blob
//! - [`decode_source`] / [`decode_source_stream`] - Turn raw file bytes into a [`SourceText`]

mod decoder;
pub mod encoding;
mod source;

pub use decoder::{decode_source, decode_source_stream, detect_bom, DecoderOptions};
pub use encoding::{utf16_len, TextEncoding};
pub use source::{PrecomputedEmbedding, SourceText};
