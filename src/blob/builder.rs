//! Growable blob buffer with reserve-then-patch support.
//!
//! The compressed branch of the embedded source format writes a 4-byte header whose value
//! is only known once the payload is complete. [`BlobBuilder`] keeps the whole blob in one
//! contiguous `Vec<u8>`, so a [`Reservation`] is simply an offset and length into it that can
//! be patched after later appends.
//!
//! Encoding runs once per source file in a build, so [`PooledBlobBuilder`] hands out buffers
//! from a small per-thread pool and returns them when the guard drops, whether the encode
//! succeeded or failed.
//!
//! # Examples
//!
//! ```rust
//! use dotembed::blob::BlobBuilder;
//!
//! let mut builder = BlobBuilder::new();
//! let header = builder.reserve(4);
//! builder.write_bytes(b"payload");
//! builder.patch_i32_le(header, 7)?;
//!
//! assert_eq!(&builder.as_bytes()[..4], &[7, 0, 0, 0]);
//! # Ok::<(), dotembed::Error>(())
//! ```

use std::{
    cell::RefCell,
    io::{self, Read},
    ops::{Deref, DerefMut},
};

use crate::{
    file::io::write_le,
    Error::{FileError, OutOfBounds},
    Result,
};

/// Number of idle buffers kept per thread.
const POOL_CAPACITY: usize = 4;

/// Buffers that grew beyond this are dropped instead of pooled.
const MAX_POOLED_CAPACITY: usize = 1024 * 1024;

thread_local! {
    static BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

/// A region of a [`BlobBuilder`] set aside for later patching.
///
/// Obtained from [`BlobBuilder::reserve`]; only meaningful for the builder that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    offset: usize,
    len: usize,
}

impl Reservation {
    /// Offset of the reserved region within the blob.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the reserved region.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-length reservation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// An append-only byte buffer that can patch regions it reserved earlier.
#[derive(Debug, Default)]
pub struct BlobBuilder {
    buffer: Vec<u8>,
}

impl BlobBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        BlobBuilder { buffer: Vec::new() }
    }

    /// Create an empty builder with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BlobBuilder {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far, including reservations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Append a little-endian `i32`.
    pub fn write_i32_le(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Append `len` zero bytes and return a handle for patching them later.
    pub fn reserve(&mut self, len: usize) -> Reservation {
        let offset = self.buffer.len();
        self.buffer.resize(offset + len, 0);

        Reservation { offset, len }
    }

    /// Overwrite the start of a reserved region with a little-endian `i32`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the reservation is shorter than 4 bytes or does
    /// not lie within this builder.
    pub fn patch_i32_le(&mut self, reservation: Reservation, value: i32) -> Result<()> {
        let end = reservation
            .offset
            .checked_add(reservation.len)
            .ok_or(OutOfBounds)?;
        if end > self.buffer.len() {
            return Err(OutOfBounds);
        }

        write_le(&mut self.buffer[reservation.offset..end], value)
    }

    /// Copy up to `max` bytes from `reader`, stopping early at end of input.
    ///
    /// Returns the number of bytes appended. Bytes that were read before an I/O error stay
    /// in the builder.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if reading fails.
    pub fn write_from_reader<R: Read + ?Sized>(&mut self, reader: &mut R, max: u64) -> Result<u64> {
        let copied = io::copy(&mut reader.take(max), &mut self.buffer).map_err(FileError)?;
        Ok(copied)
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the builder and return its buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Discard the content but keep the allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl io::Write for BlobBuilder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.buffer.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A [`BlobBuilder`] borrowed from the per-thread pool.
///
/// Dereferences to the builder. Dropping the guard clears the buffer and returns it to the
/// pool, so the final blob has to be copied out with [`PooledBlobBuilder::to_vec`].
#[derive(Debug)]
pub struct PooledBlobBuilder {
    builder: BlobBuilder,
}

impl PooledBlobBuilder {
    /// Take a builder from the current thread's pool, or allocate a new one.
    #[must_use]
    pub fn get() -> Self {
        let buffer = BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();

        PooledBlobBuilder {
            builder: BlobBuilder { buffer },
        }
    }

    /// Copy the written bytes into an exactly-sized vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.builder.buffer.clone()
    }
}

impl Deref for PooledBlobBuilder {
    type Target = BlobBuilder;

    fn deref(&self) -> &BlobBuilder {
        &self.builder
    }
}

impl DerefMut for PooledBlobBuilder {
    fn deref_mut(&mut self) -> &mut BlobBuilder {
        &mut self.builder
    }
}

impl Drop for PooledBlobBuilder {
    fn drop(&mut self) {
        let mut buffer = std::mem::take(&mut self.builder.buffer);
        if buffer.capacity() > MAX_POOLED_CAPACITY {
            return;
        }

        buffer.clear();
        // `try_with` because the pool may already be gone during thread teardown.
        let _ = BUFFER_POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < POOL_CAPACITY {
                pool.push(buffer);
            }
        });
    }
}
