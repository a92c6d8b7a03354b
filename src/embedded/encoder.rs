//! Blob encoding for the three content shapes.
//!
//! All shapes share one policy: content whose (estimated) size is below
//! [`COMPRESSION_THRESHOLD`] is stored verbatim behind a zero header; anything larger is
//! deflated behind a header holding the uncompressed byte count. The header of the compressed
//! branch is reserved up front and patched once the compressor has been drained.

use std::io::{self, Read, Seek, SeekFrom};

use flate2::{write::DeflateEncoder, Compression};

use crate::{
    blob::{CountingWriter, PooledBlobBuilder},
    text::TextEncoding,
    Error::{EndOfData, InputTooLarge},
    Result,
};

/// Content below this many bytes is stored without compression.
///
/// Below this size the deflate overhead outweighs what compression saves on typical source
/// files.
pub const COMPRESSION_THRESHOLD: usize = 200;

/// Level used for every compressed blob.
const COMPRESSION_LEVEL: Compression = Compression::best();

/// Convert a content length into the blob's header type.
pub(crate) fn checked_length(length: u64) -> Result<i32> {
    i32::try_from(length).map_err(|_| InputTooLarge(length))
}

/// Determine the length of a seekable stream without reading from it.
pub(crate) fn stream_length<S: Seek + ?Sized>(stream: &mut S) -> Result<i32> {
    let length = stream.seek(SeekFrom::End(0))?;
    checked_length(length)
}

/// Encode a byte slice.
pub(crate) fn blob_from_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut reader = bytes;
    blob_from_reader(&mut reader, bytes.len() as u64)
}

/// Encode exactly `expected` bytes read from the current position of `reader`.
///
/// # Errors
/// Returns [`crate::Error::InputTooLarge`] if `expected` does not fit the header and
/// [`crate::Error::EndOfData`] if `reader` ends early.
pub(crate) fn blob_from_reader<R: Read + ?Sized>(reader: &mut R, expected: u64) -> Result<Vec<u8>> {
    let length = checked_length(expected)?;
    let mut builder = PooledBlobBuilder::get();

    if expected < COMPRESSION_THRESHOLD as u64 {
        builder.write_i32_le(0);
        let copied = builder.write_from_reader(reader, expected)?;
        if copied != expected {
            return Err(EndOfData {
                expected,
                actual: copied,
            });
        }
    } else {
        let header = builder.reserve(4);

        let mut deflater =
            CountingWriter::new(DeflateEncoder::new(&mut *builder, COMPRESSION_LEVEL));
        io::copy(&mut reader.take(expected), &mut deflater)?;
        let consumed = deflater.bytes_written();
        deflater.into_inner().finish()?;

        if consumed != expected {
            return Err(EndOfData {
                expected,
                actual: consumed,
            });
        }

        builder.patch_i32_le(header, length)?;
    }

    Ok(builder.to_vec())
}

/// Encode decoded text through its declared encoding.
///
/// The branch is chosen from the encoding's worst-case size estimate rather than the exact
/// encoded size, so short texts in wide encodings may be compressed even though their exact
/// size is below the threshold.
pub(crate) fn blob_from_text(text: &str, utf16_len: usize, encoding: TextEncoding) -> Result<Vec<u8>> {
    let max_byte_count = encoding.max_byte_count(utf16_len);
    let mut builder = PooledBlobBuilder::get();

    if max_byte_count < COMPRESSION_THRESHOLD {
        builder.write_i32_le(0);
        encoding.encode_to(text, &mut *builder)?;
    } else {
        let header = builder.reserve(4);

        let mut deflater =
            CountingWriter::new(DeflateEncoder::new(&mut *builder, COMPRESSION_LEVEL));
        encoding.encode_to(text, &mut deflater)?;
        let consumed = deflater.bytes_written();
        deflater.into_inner().finish()?;

        builder.patch_i32_le(header, checked_length(consumed)?)?;
    }

    Ok(builder.to_vec())
}
