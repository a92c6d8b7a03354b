//! Embedded source blobs for portable PDBs.
//!
//! Portable PDBs can carry the full text of a source document as the value of an
//! `EmbeddedSource` custom debug information record. The value is a small self-describing
//! blob:
//!
//! ```text
//! +----------------------+--------------------------------------------+
//! | i32 format (LE)      | payload                                    |
//! +----------------------+--------------------------------------------+
//! | 0                    | the content, verbatim                      |
//! | N > 0                | raw deflate stream inflating to N bytes    |
//! | N < 0                | reserved, rejected by readers              |
//! +----------------------+--------------------------------------------+
//! ```
//!
//! Content below [`COMPRESSION_THRESHOLD`] bytes is stored verbatim, larger content is
//! compressed at the highest level. For decoded texts the decision is made from a
//! worst-case size estimate of the encoded text, see
//! [`crate::TextEncoding::max_byte_count`].
//!
//! # Key Components
//!
//! - [`EmbeddedText`] - Builds blobs from texts, streams, byte slices or files
//! - [`EmbeddedSourceBlob`] - Parses and decodes blobs produced by any PDB writer
//!
//! # Examples
//!
//! ```rust
//! use dotembed::{EmbeddedText, SourceHashAlgorithm, COMPRESSION_THRESHOLD};
//!
//! let content = vec![b'a'; COMPRESSION_THRESHOLD];
//! let text = EmbeddedText::from_bytes("big.cs", &content, SourceHashAlgorithm::Sha1)?;
//!
//! assert_eq!(&text.blob()[..4], &200i32.to_le_bytes());
//! assert!(text.is_compressed());
//! assert_eq!(text.content()?, content);
//! # Ok::<(), dotembed::Error>(())
//! ```

pub(crate) mod encoder;
mod reader;
mod text;

pub use encoder::COMPRESSION_THRESHOLD;
pub use reader::EmbeddedSourceBlob;
pub use text::EmbeddedText;
