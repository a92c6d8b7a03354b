//! Little-endian reading and writing helpers for blob construction and parsing.
//!
//! The embedded source format stores its only header field as a little-endian `i32`, and
//! the blob builder patches that field after the payload has been written. This module
//! provides the bounds-checked primitives both sides use.
//!
//! # Key Components
//!
//! - [`crate::file::io::BlobIO`] - Trait tying a primitive to its fixed-size byte array
//! - [`crate::file::io::read_le`] / [`crate::file::io::read_le_at`] - Read values in little-endian
//! - [`crate::file::io::write_le`] / [`crate::file::io::write_le_at`] - Write values in little-endian
//!
//! # Usage Examples
//!
//! ```rust
//! use dotembed::file::io::{read_le_at, write_le_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_le_at(&mut data, &mut offset, 200i32)?;
//! write_le_at(&mut data, &mut offset, 7u16)?;
//! assert_eq!(data, [0xC8, 0x00, 0x00, 0x00, 0x07, 0x00]);
//!
//! offset = 0;
//! let length: i32 = read_le_at(&data, &mut offset)?;
//! assert_eq!(length, 200);
//! assert_eq!(offset, 4);
//! # Ok::<(), dotembed::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All functions return [`crate::Error::OutOfBounds`] if the buffer does not hold enough
//! bytes at the requested offset. The offset is only advanced on success.

use crate::{Error::OutOfBounds, Result};

/// Trait for primitives that can be read from and written to little-endian byte buffers.
///
/// Each implementation names the fixed-size array that holds its encoded form, e.g.
/// `[u8; 4]` for `i32`.
pub trait BlobIO: Sized {
    /// Byte array representation of this type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Decode a value from little-endian bytes
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Encode a value into little-endian bytes
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_blob_io {
    ($($ty:ty),*) => {
        $(
            impl BlobIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_blob_io!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Reads a value of type `T` in little-endian byte order from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_le<T: BlobIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value of type `T` in little-endian byte order at `offset`, advancing the offset
/// past the value.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: BlobIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let end = offset
        .checked_add(std::mem::size_of::<T>())
        .ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let bytes = T::Bytes::try_from(&data[*offset..end]).map_err(|_| OutOfBounds)?;
    *offset = end;

    Ok(T::from_le_bytes(bytes))
}

/// Writes `value` in little-endian byte order to the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn write_le<T: BlobIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_le_at(data, &mut offset, value)
}

/// Writes `value` in little-endian byte order at `offset`, advancing the offset past the
/// written bytes.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn write_le_at<T: BlobIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let end = offset
        .checked_add(std::mem::size_of::<T>())
        .ok_or(OutOfBounds)?;
    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_i32() {
        let result = read_le::<i32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x04030201);
    }

    #[test]
    fn read_le_negative_i32() {
        let result = read_le::<i32>(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(result, -1);
    }

    #[test]
    fn read_le_u64() {
        let result = read_le::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807060504030201);
    }

    #[test]
    fn read_le_from_offset() {
        let mut offset = 2_usize;
        let result = read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(result, 0x0403);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_le_out_of_bounds() {
        let mut offset = 6_usize;
        let result = read_le_at::<i32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_le_offset_overflow() {
        let mut offset = usize::MAX;
        let result = read_le_at::<u8>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
    }

    #[test]
    fn write_le_i32() {
        let mut data = [0u8; 4];
        write_le(&mut data, 200i32).unwrap();
        assert_eq!(data, [0xC8, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn write_le_sequential() {
        let mut data = [0u8; 7];
        let mut offset = 0;
        write_le_at(&mut data, &mut offset, 0x11u8).unwrap();
        write_le_at(&mut data, &mut offset, 0x2233u16).unwrap();
        write_le_at(&mut data, &mut offset, 0x44556677u32).unwrap();
        assert_eq!(offset, 7);
        assert_eq!(data, [0x11, 0x33, 0x22, 0x77, 0x66, 0x55, 0x44]);
    }

    #[test]
    fn write_le_out_of_bounds() {
        let mut data = [0u8; 3];
        let result = write_le(&mut data, 1i32);
        assert!(matches!(result, Err(OutOfBounds)));
        assert_eq!(data, [0, 0, 0]);
    }
}
