//! Declared text encodings of source files.
//!
//! A source text remembers the encoding it was read with so that the exact bytes can be
//! reproduced when the file is embedded or hashed. Encoding a text writes the encoding's
//! preamble (byte order mark) first, followed by the encoded characters.
//!
//! The worst-case size estimate [`TextEncoding::max_byte_count`] counts UTF-16 code units and
//! reserves room for one extra unit, matching the estimate compilers use for the embedding
//! threshold decision.

use std::io::{self, Write};

use strum::{Display, EnumIter};
use widestring::U16Str;

use crate::{Error, Result};

/// Chunk size used when transcoding into a writer.
const TRANSCODE_CHUNK: usize = 4096;

/// Encodings a [`crate::SourceText`] can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TextEncoding {
    /// UTF-8 without byte order mark
    #[strum(serialize = "utf-8")]
    Utf8,
    /// UTF-8 with the `EF BB BF` byte order mark
    #[strum(serialize = "utf-8-bom")]
    Utf8Bom,
    /// UTF-16 little-endian with the `FF FE` byte order mark
    #[strum(serialize = "utf-16le")]
    Utf16Le,
    /// UTF-16 big-endian with the `FE FF` byte order mark
    #[strum(serialize = "utf-16be")]
    Utf16Be,
    /// ISO-8859-1; characters above U+00FF are replaced with `?`
    #[strum(serialize = "iso-8859-1")]
    Latin1,
    /// 7-bit ASCII; characters above U+007F are replaced with `?`
    #[strum(serialize = "us-ascii")]
    Ascii,
}

impl TextEncoding {
    /// The byte order mark written before the encoded characters.
    #[must_use]
    pub const fn preamble(self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            TextEncoding::Utf16Le => &[0xFF, 0xFE],
            TextEncoding::Utf16Be => &[0xFE, 0xFF],
            TextEncoding::Utf8 | TextEncoding::Latin1 | TextEncoding::Ascii => &[],
        }
    }

    const fn max_bytes_per_unit(self) -> u64 {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => 3,
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
            TextEncoding::Latin1 | TextEncoding::Ascii => 1,
        }
    }

    /// Upper bound on the encoded size of `utf16_len` UTF-16 code units, excluding the
    /// preamble.
    ///
    /// The bound is `(utf16_len + 1) * bytes_per_unit`, clamped to `i32::MAX` when it does not
    /// fit the blob's length field.
    #[must_use]
    pub fn max_byte_count(self, utf16_len: usize) -> usize {
        let bound = (utf16_len as u64)
            .saturating_add(1)
            .saturating_mul(self.max_bytes_per_unit());

        usize::try_from(bound.min(i32::MAX as u64)).unwrap_or(i32::MAX as usize)
    }

    /// Write the preamble and the encoded `text` to `writer`.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    /// Propagates any error returned by `writer`.
    pub fn encode_to<W: Write + ?Sized>(self, text: &str, writer: &mut W) -> io::Result<u64> {
        let preamble = self.preamble();
        writer.write_all(preamble)?;
        let mut written = preamble.len() as u64;

        written += match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => {
                writer.write_all(text.as_bytes())?;
                text.len() as u64
            }
            TextEncoding::Utf16Le => {
                write_chunked(writer, text.encode_utf16().flat_map(u16::to_le_bytes))?
            }
            TextEncoding::Utf16Be => {
                write_chunked(writer, text.encode_utf16().flat_map(u16::to_be_bytes))?
            }
            TextEncoding::Latin1 => write_chunked(
                writer,
                text.chars().map(|c| u8::try_from(c).unwrap_or(b'?')),
            )?,
            TextEncoding::Ascii => write_chunked(
                writer,
                text.chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' }),
            )?,
        };

        Ok(written)
    }

    /// Encode `text` including the preamble.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(self.preamble().len() + text.len());
        // Writing into a Vec cannot fail.
        let _ = self.encode_to(text, &mut encoded);
        encoded
    }

    /// Decode `bytes`, which must not start with the preamble.
    ///
    /// # Errors
    /// Returns [`crate::Error::Decoding`] if the bytes are invalid UTF-8 or UTF-16.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| Error::Decoding(e.to_string())),
            TextEncoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => Ok(bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
                .collect()),
        }
    }
}

/// Number of UTF-16 code units `text` occupies.
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

fn write_chunked<W, I>(writer: &mut W, bytes: I) -> io::Result<u64>
where
    W: Write + ?Sized,
    I: Iterator<Item = u8>,
{
    let mut chunk = Vec::with_capacity(TRANSCODE_CHUNK);
    let mut written = 0u64;

    for byte in bytes {
        chunk.push(byte);
        if chunk.len() == TRANSCODE_CHUNK {
            writer.write_all(&chunk)?;
            written += chunk.len() as u64;
            chunk.clear();
        }
    }

    if !chunk.is_empty() {
        writer.write_all(&chunk)?;
        written += chunk.len() as u64;
    }

    Ok(written)
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::Decoding(format!(
            "UTF-16 content has odd length {}",
            bytes.len()
        )));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    U16Str::from_slice(&units)
        .to_string()
        .map_err(|e| Error::Decoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn max_byte_count_estimates() {
        assert_eq!(TextEncoding::Utf8.max_byte_count(0), 3);
        assert_eq!(TextEncoding::Utf8.max_byte_count(65), 198);
        assert_eq!(TextEncoding::Utf8.max_byte_count(66), 201);
        assert_eq!(TextEncoding::Utf16Le.max_byte_count(10), 22);
        assert_eq!(TextEncoding::Latin1.max_byte_count(198), 199);
        assert_eq!(TextEncoding::Ascii.max_byte_count(199), 200);
    }

    #[test]
    fn max_byte_count_clamps() {
        assert_eq!(
            TextEncoding::Utf8.max_byte_count(usize::MAX),
            i32::MAX as usize
        );
        assert_eq!(
            TextEncoding::Utf16Be.max_byte_count(i32::MAX as usize),
            i32::MAX as usize
        );
    }

    #[test]
    fn preambles() {
        assert!(TextEncoding::Utf8.preamble().is_empty());
        assert_eq!(TextEncoding::Utf8Bom.preamble(), &[0xEF, 0xBB, 0xBF]);
        assert_eq!(TextEncoding::Utf16Le.preamble(), &[0xFF, 0xFE]);
        assert_eq!(TextEncoding::Utf16Be.preamble(), &[0xFE, 0xFF]);
    }

    #[test]
    fn encode_utf16_with_bom() {
        assert_eq!(
            TextEncoding::Utf16Le.encode("A\u{e9}"),
            vec![0xFF, 0xFE, 0x41, 0x00, 0xE9, 0x00]
        );
        assert_eq!(
            TextEncoding::Utf16Be.encode("A"),
            vec![0xFE, 0xFF, 0x00, 0x41]
        );
    }

    #[test]
    fn encode_single_byte_replacement() {
        assert_eq!(TextEncoding::Latin1.encode("\u{e9}\u{20ac}"), vec![0xE9, b'?']);
        assert_eq!(TextEncoding::Ascii.encode("a\u{e9}"), vec![b'a', b'?']);
    }

    #[test]
    fn encode_to_reports_length() {
        let text = "x".repeat(TRANSCODE_CHUNK + 17);
        let mut out = Vec::new();

        let written = TextEncoding::Utf16Le.encode_to(&text, &mut out).unwrap();
        assert_eq!(written, out.len() as u64);
        assert_eq!(out.len(), 2 + 2 * text.len());
    }

    #[test]
    fn decode_round_trip() {
        let text = "int main() { return '\u{e9}'; }";
        for encoding in TextEncoding::iter() {
            let encoded = encoding.encode(text);
            let body = &encoded[encoding.preamble().len()..];
            let decoded = encoding.decode(body).unwrap();

            match encoding {
                TextEncoding::Ascii => assert_eq!(decoded, "int main() { return '?'; }"),
                _ => assert_eq!(decoded, text),
            }
        }
    }

    #[test]
    fn decode_invalid_input() {
        assert!(matches!(
            TextEncoding::Utf8.decode(&[0xC3]),
            Err(Error::Decoding(_))
        ));
        assert!(matches!(
            TextEncoding::Utf16Le.decode(&[0x41]),
            Err(Error::Decoding(_))
        ));
        // Lone high surrogate
        assert!(matches!(
            TextEncoding::Utf16Le.decode(&[0x00, 0xD8]),
            Err(Error::Decoding(_))
        ));
    }

    #[test]
    fn utf16_length_counts_surrogates() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("\u{1F600}"), 2);
    }
}
