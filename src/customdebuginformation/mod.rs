//! Custom debug information records of portable PDBs.
//!
//! Each record of the `CustomDebugInformation` table pairs a kind GUID with a blob value.
//! This module classifies the kinds relevant to source documents and parses their values,
//! including `EmbeddedSource` records as produced by [`crate::EmbeddedText`].
//!
//! # Key Components
//!
//! - [`CustomDebugKind`] - GUID-based classification of records
//! - [`CustomDebugInfo`] - Parsed record values
//! - [`parse_custom_debug_blob`] - Parse a record value of a given kind

mod parser;
mod types;

pub use parser::parse_custom_debug_blob;
pub use types::{debug_guids, CustomDebugInfo, CustomDebugKind};
