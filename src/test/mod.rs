//! Shared helpers for unit tests.

use std::io::{self, Read, Seek, SeekFrom, Write};

use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

/// Inflate a raw deflate payload.
pub(crate) fn inflate_payload(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    DeflateDecoder::new(payload).read_to_end(&mut out).unwrap();
    out
}

/// Deflate `data` at the default level.
pub(crate) fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// A stream that reports a length above `i32::MAX` and records every access.
#[derive(Debug, Default)]
pub(crate) struct UnreadableHugeStream {
    pub(crate) reads: usize,
    pub(crate) seeks: usize,
}

impl Read for UnreadableHugeStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        buf.fill(0);
        Ok(buf.len())
    }
}

impl Seek for UnreadableHugeStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seeks += 1;
        match pos {
            SeekFrom::End(_) => Ok(i32::MAX as u64 + 1),
            _ => Ok(0),
        }
    }
}

/// A stream whose reported length exceeds the data it yields.
#[derive(Debug)]
pub(crate) struct ShortStream {
    data: io::Cursor<Vec<u8>>,
    reported: u64,
}

impl ShortStream {
    pub(crate) fn new(data: Vec<u8>, reported: u64) -> Self {
        ShortStream {
            data: io::Cursor::new(data),
            reported,
        }
    }
}

impl Read for ShortStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Seek for ShortStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::End(_) => Ok(self.reported),
            other => self.data.seek(other),
        }
    }
}
