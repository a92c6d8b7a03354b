//! Blob assembly primitives.
//!
//! - [`BlobBuilder`] / [`PooledBlobBuilder`] - Contiguous output buffer with reserve-then-patch
//! - [`CountingWriter`] - Counts the uncompressed bytes handed to the compressor

mod builder;
mod counting;

pub use builder::{BlobBuilder, PooledBlobBuilder, Reservation};
pub use counting::CountingWriter;
