//! Byte-counting writer adapter.
//!
//! The compressed embedded source header carries the number of uncompressed bytes that went
//! into the deflate stream. [`CountingWriter`] sits in front of the compressor and counts every
//! byte the inner writer accepts.
//!
//! Only the synchronous [`std::io::Write`] trait is implemented. The count is exact only when
//! each write completes before the next one starts, so no asynchronous write path exists on
//! this type.

use std::io::{self, Write};

/// A writer that forwards to `W` and counts the bytes it accepted.
#[derive(Debug)]
pub struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap `inner` with a zero count.
    pub fn new(inner: W) -> Self {
        CountingWriter { inner, written: 0 }
    }

    /// Number of bytes accepted by the inner writer so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Shared access to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the adapter, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = self.inner.write(buf)?;
        self.written += accepted as u64;
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
