//! Source checksum algorithms and hashing.
//!
//! Portable PDB documents identify the algorithm of their content hash by GUID. A debugger
//! recomputes the hash over the file it finds on disk (or over the embedded copy) and
//! compares it with the stored value before trusting breakpoints in that document.
//!
//! # Key Components
//!
//! - [`SourceHashAlgorithm`] - The supported algorithms with their names, GUIDs and digest sizes
//! - [`ChecksumHasher`] - Incremental hasher that also accepts data through [`std::io::Write`]
//! - [`compute_checksum`] / [`compute_checksum_reader`] - One-shot helpers
//!
//! # Examples
//!
//! ```rust
//! use dotembed::{compute_checksum, SourceHashAlgorithm};
//!
//! let algorithm = SourceHashAlgorithm::from_name("sha256")?;
//! let checksum = compute_checksum(b"class C { }", algorithm);
//! assert_eq!(checksum.len(), algorithm.digest_len());
//! # Ok::<(), dotembed::Error>(())
//! ```

use std::{
    io::{self, Read},
    str::FromStr,
};

use sha1::{Digest, Sha1};
use sha2::Sha256;
use strum::{Display, EnumIter, EnumString};
use uguid::{guid, Guid};

use crate::{Error, Result};

/// Checksum algorithms accepted for debug documents.
///
/// Anything outside this set is rejected when its name or GUID is parsed, so a value of this
/// type is always usable for hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum SourceHashAlgorithm {
    /// SHA-1, 20-byte digest
    #[strum(serialize = "SHA1")]
    Sha1,
    /// SHA-256, 32-byte digest
    #[strum(serialize = "SHA256")]
    Sha256,
}

impl SourceHashAlgorithm {
    /// Document hash algorithm GUID for SHA-1
    pub const SHA1_GUID: Guid = guid!("ff1816ec-aa5e-4d10-87f7-6f4963833460");

    /// Document hash algorithm GUID for SHA-256
    pub const SHA256_GUID: Guid = guid!("8829d00f-11b8-4213-878b-770e8597ac16");

    /// Parse an algorithm name such as `"sha1"` or `"SHA256"` (case-insensitive).
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedHashAlgorithm`] for any other name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::UnsupportedHashAlgorithm(name.to_string()))
    }

    /// Resolve the algorithm from a Portable PDB document hash algorithm GUID.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnsupportedHashAlgorithm`] for an unknown GUID.
    pub fn from_guid(guid: Guid) -> Result<Self> {
        if guid == Self::SHA1_GUID {
            Ok(SourceHashAlgorithm::Sha1)
        } else if guid == Self::SHA256_GUID {
            Ok(SourceHashAlgorithm::Sha256)
        } else {
            Err(Error::UnsupportedHashAlgorithm(guid.to_string()))
        }
    }

    /// The GUID written to the Document table's `HashAlgorithm` column.
    #[must_use]
    pub const fn guid(self) -> Guid {
        match self {
            SourceHashAlgorithm::Sha1 => Self::SHA1_GUID,
            SourceHashAlgorithm::Sha256 => Self::SHA256_GUID,
        }
    }

    /// Size of the digest in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            SourceHashAlgorithm::Sha1 => 20,
            SourceHashAlgorithm::Sha256 => 32,
        }
    }

    /// Create a fresh incremental hasher for this algorithm.
    #[must_use]
    pub fn hasher(self) -> ChecksumHasher {
        ChecksumHasher::new(self)
    }
}

enum HasherState {
    Sha1(Sha1),
    Sha256(Sha256),
}

/// Incremental checksum computation.
///
/// The [`std::io::Write`] implementation never fails and consumes every byte, so the hasher
/// can be the target of [`std::io::copy`] or of a text encoder.
pub struct ChecksumHasher {
    algorithm: SourceHashAlgorithm,
    state: HasherState,
}

impl ChecksumHasher {
    /// Create a hasher for `algorithm`.
    #[must_use]
    pub fn new(algorithm: SourceHashAlgorithm) -> Self {
        let state = match algorithm {
            SourceHashAlgorithm::Sha1 => HasherState::Sha1(Sha1::new()),
            SourceHashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
        };

        ChecksumHasher { algorithm, state }
    }

    /// The algorithm this hasher computes.
    #[must_use]
    pub fn algorithm(&self) -> SourceHashAlgorithm {
        self.algorithm
    }

    /// Feed `data` into the hash.
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha1(hasher) => hasher.update(data),
            HasherState::Sha256(hasher) => hasher.update(data),
        }
    }

    /// Consume the hasher and return the digest.
    #[must_use]
    pub fn finalize(self) -> Vec<u8> {
        match self.state {
            HasherState::Sha1(hasher) => hasher.finalize().to_vec(),
            HasherState::Sha256(hasher) => hasher.finalize().to_vec(),
        }
    }
}

impl io::Write for ChecksumHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hash `data` with `algorithm`.
#[must_use]
pub fn compute_checksum(data: &[u8], algorithm: SourceHashAlgorithm) -> Vec<u8> {
    let mut hasher = ChecksumHasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything `reader` yields until end of input.
///
/// Returns the digest and the number of bytes hashed.
///
/// # Errors
/// Returns [`crate::Error::FileError`] if reading fails.
pub fn compute_checksum_reader<R: Read + ?Sized>(
    reader: &mut R,
    algorithm: SourceHashAlgorithm,
) -> Result<(Vec<u8>, u64)> {
    let mut hasher = ChecksumHasher::new(algorithm);
    let hashed = io::copy(reader, &mut hasher)?;

    Ok((hasher.finalize(), hashed))
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn sha1_known_digest() {
        // SHA-1("abc")
        let expected = [
            0xa9, 0x99, 0x3e, 0x36, 0x47, 0x06, 0x81, 0x6a, 0xba, 0x3e, 0x25, 0x71, 0x78, 0x50,
            0xc2, 0x6c, 0x9c, 0xd0, 0xd8, 0x9d,
        ];
        assert_eq!(compute_checksum(b"abc", SourceHashAlgorithm::Sha1), expected);
    }

    #[test]
    fn sha256_known_digest() {
        // SHA-256("abc")
        let expected = [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad,
        ];
        assert_eq!(
            compute_checksum(b"abc", SourceHashAlgorithm::Sha256),
            expected
        );
    }

    #[test]
    fn digest_lengths() {
        for algorithm in SourceHashAlgorithm::iter() {
            assert_eq!(
                compute_checksum(b"", algorithm).len(),
                algorithm.digest_len()
            );
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!(
            SourceHashAlgorithm::from_name("sha1").unwrap(),
            SourceHashAlgorithm::Sha1
        );
        assert_eq!(
            SourceHashAlgorithm::from_name("SHA256").unwrap(),
            SourceHashAlgorithm::Sha256
        );
        assert_eq!(
            SourceHashAlgorithm::from_name("Sha256").unwrap(),
            SourceHashAlgorithm::Sha256
        );
        assert_eq!(SourceHashAlgorithm::Sha1.to_string(), "SHA1");
    }

    #[test]
    fn reject_unknown_names() {
        for name in ["md5", "", "sha512", "sha-1"] {
            match SourceHashAlgorithm::from_name(name) {
                Err(Error::UnsupportedHashAlgorithm(rejected)) => assert_eq!(rejected, name),
                other => panic!("expected UnsupportedHashAlgorithm for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn guid_round_trip() {
        for algorithm in SourceHashAlgorithm::iter() {
            assert_eq!(
                SourceHashAlgorithm::from_guid(algorithm.guid()).unwrap(),
                algorithm
            );
        }

        assert!(matches!(
            SourceHashAlgorithm::from_guid(Guid::ZERO),
            Err(Error::UnsupportedHashAlgorithm(_))
        ));
    }

    #[test]
    fn sha1_guid_bytes_are_mixed_endian() {
        assert_eq!(
            SourceHashAlgorithm::SHA1_GUID.to_bytes(),
            [
                0xec, 0x16, 0x18, 0xff, 0x5e, 0xaa, 0x10, 0x4d, 0x87, 0xf7, 0x6f, 0x49, 0x63, 0x83,
                0x34, 0x60
            ]
        );
    }

    #[test]
    fn incremental_matches_one_shot() {
        let data = b"namespace Demo { class Program { static void Main() { } } }";

        let mut hasher = SourceHashAlgorithm::Sha256.hasher();
        hasher.write_all(&data[..10]).unwrap();
        hasher.write_all(&data[10..]).unwrap();

        assert_eq!(
            hasher.finalize(),
            compute_checksum(data, SourceHashAlgorithm::Sha256)
        );
    }

    #[test]
    fn reader_checksum_counts_bytes() {
        let data = vec![0x5Au8; 1000];
        let mut cursor = Cursor::new(&data);

        let (digest, hashed) =
            compute_checksum_reader(&mut cursor, SourceHashAlgorithm::Sha1).unwrap();
        assert_eq!(hashed, 1000);
        assert_eq!(digest, compute_checksum(&data, SourceHashAlgorithm::Sha1));
    }
}
