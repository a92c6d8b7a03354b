//! Low-level byte access used by the encoder and the blob reader.
//!
//! - [`io`] - Little-endian read/write primitives with bounds checking
//! - [`parser`] - A cursor over blob bytes
//! - [`physical`] - Memory-mapped source files

pub mod io;
pub mod parser;
pub mod physical;

pub use parser::Parser;
pub use physical::Physical;
