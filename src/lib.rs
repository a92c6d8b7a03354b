// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # dotembed
//!
//! [![Crates.io](https://img.shields.io/crates/v/dotembed.svg)](https://crates.io/crates/dotembed)
//! [![Documentation](https://docs.rs/dotembed/badge.svg)](https://docs.rs/dotembed)
//! [![License](https://img.shields.io/badge/license-Apache--2.0-blue.svg)](https://github.com/BinFlip/dotembed/blob/main/LICENSE-APACHE)
//!
//! Source embedding for .NET portable PDBs, in pure Rust.
//!
//! Portable PDBs can carry the complete text of every source document so that debuggers
//! show the exact code a binary was built from. `dotembed` produces the `EmbeddedSource`
//! blobs compilers write for that purpose, computes the document checksums that go next to
//! them, and reads such blobs back.
//!
//! ## Features
//!
//! - **Byte-exact blobs** - Same format and compression policy as the .NET compilers
//! - **Three content sources** - Decoded texts, seekable streams and in-memory bytes
//! - **SHA-1 and SHA-256 checksums** - With the document table GUIDs of both algorithms
//! - **Blob reader** - Validates and decodes blobs from any PDB writer
//! - **Parallel document collection** - Embed many files at once with `rayon`
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! dotembed = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use dotembed::prelude::*;
//!
//! let text = EmbeddedText::from_bytes("Program.cs", b"class Program {}", SourceHashAlgorithm::Sha256)?;
//! println!("{} byte blob, checksum {:02x?}", text.blob().len(), text.checksum());
//! # Ok::<(), dotembed::Error>(())
//! ```
//!
//! ### Embedding a decoded text
//!
//! ```rust
//! use dotembed::{EmbeddedText, SourceHashAlgorithm, SourceText, TextEncoding};
//!
//! let source = SourceText::new("class C { }", Some(TextEncoding::Utf8Bom), SourceHashAlgorithm::Sha1);
//! let text = EmbeddedText::from_text("C.cs", &source, SourceHashAlgorithm::Sha1)?;
//!
//! // The byte order mark is part of the embedded content.
//! assert_eq!(&text.content()?[..3], &[0xEF, 0xBB, 0xBF]);
//! # Ok::<(), dotembed::Error>(())
//! ```
//!
//! ### Reading a blob back
//!
//! ```rust
//! use dotembed::EmbeddedSourceBlob;
//!
//! let blob = EmbeddedSourceBlob::parse(&[0, 0, 0, 0, b'o', b'k'])?;
//! assert_eq!(blob.decode()?, b"ok");
//! # Ok::<(), dotembed::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Failures surface synchronously to the
//! caller; nothing is retried and no partial blob is ever returned.
//!
//! ## Logging
//!
//! Diagnostics are emitted through the [`log`](https://docs.rs/log) facade at `debug` and
//! `trace` level. Install any logger, such as `env_logger`, to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use dotembed::prelude::*;
///
/// let text = EmbeddedText::from_bytes("a.cs", b"", SourceHashAlgorithm::Sha1)?;
/// assert_eq!(text.blob(), &[0, 0, 0, 0]);
/// # Ok::<(), dotembed::Error>(())
/// ```
pub mod prelude;

/// Output buffers for blob assembly
///
/// [`blob::BlobBuilder`] is a contiguous byte sink that supports reserving a fixed-size
/// region and patching it later, which is how blob headers are written before the size they
/// describe is known. [`blob::PooledBlobBuilder`] borrows its buffer from a per-thread pool.
pub mod blob;

/// Source checksums and the supported hash algorithms
pub mod checksum;

/// Custom debug information records of portable PDBs
pub mod customdebuginformation;

/// Debug document table assembly
pub mod documents;

/// The embedded source blob format, its encoder and its reader
pub mod embedded;

/// Low-level byte access: little-endian helpers, a cursor-style parser and memory-mapped files
pub mod file;

/// Source texts, their encodings and the raw file decoder
pub mod text;

/// `dotembed` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use dotembed::{EmbeddedText, Result, SourceHashAlgorithm};
///
/// fn embed(bytes: &[u8]) -> Result<Vec<u8>> {
///     Ok(EmbeddedText::from_bytes("a.cs", bytes, SourceHashAlgorithm::Sha1)?.into_blob())
/// }
/// # assert!(embed(b"x").is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dotembed` Error type
///
/// Every fallible operation returns this type; see its variants for the failure categories.
pub use error::Error;

/// Content prepared for embedding, the main entry point.
pub use embedded::EmbeddedText;

/// Reader for embedded source blobs.
pub use embedded::EmbeddedSourceBlob;

/// Content size below which blobs are stored uncompressed.
pub use embedded::COMPRESSION_THRESHOLD;

/// Supported checksum algorithms and one-shot checksum helpers.
pub use checksum::{compute_checksum, SourceHashAlgorithm};

/// Decoded source texts and their encodings.
pub use text::{SourceText, TextEncoding};

/// Low-level parsing and file access.
pub use file::{Parser, Physical};
