use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every fallible operation in `dotembed` surfaces one of these variants synchronously to its
/// caller. Nothing is retried internally: whether to re-read a file or pick another algorithm
/// is up to the code driving the encoder.
///
/// # Error Categories
///
/// ## Argument Errors
/// - [`Error::InvalidArgument`] - Empty file path or content that cannot be embedded
/// - [`Error::UnsupportedHashAlgorithm`] - Unknown checksum algorithm name or GUID
///
/// ## Size and Data Errors
/// - [`Error::InputTooLarge`] - Content does not fit the blob's 32-bit length field
/// - [`Error::EndOfData`] - The content source produced fewer bytes than it announced
/// - [`Error::Malformed`] - An embedded source blob violates the blob format
/// - [`Error::OutOfBounds`] - A read or write would leave the buffer
///
/// ## Decoding Errors
/// - [`Error::BinaryContent`] - Source bytes look like a binary file
/// - [`Error::Decoding`] - Source bytes are invalid for the selected encoding
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem and stream errors
///
/// # Examples
///
/// ```rust
/// use dotembed::{EmbeddedText, Error, SourceHashAlgorithm};
///
/// match EmbeddedText::from_bytes("", b"class C {}", SourceHashAlgorithm::Sha1) {
///     Err(Error::InvalidArgument(message)) => println!("rejected: {message}"),
///     Err(e) => println!("other error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was rejected before any I/O took place.
    ///
    /// Raised for empty file paths and for source texts that carry neither a declared
    /// encoding nor a precomputed embedding.
    #[error("Invalid argument - {0}")]
    InvalidArgument(String),

    /// The requested checksum algorithm is not one of the supported set.
    ///
    /// The associated value is the name or GUID that failed to parse.
    #[error("Unsupported checksum algorithm - {0}")]
    UnsupportedHashAlgorithm(String),

    /// The content is longer than the blob's signed 32-bit length field can express.
    ///
    /// The associated value is the length that was reported by the content source.
    #[error("Input of {0} bytes is too large to embed")]
    InputTooLarge(u64),

    /// The content source ended before delivering the announced number of bytes.
    ///
    /// This usually means a stream reported a length it could not back with data.
    #[error("Unexpected end of data - expected {expected} bytes, got {actual}")]
    EndOfData {
        /// The number of bytes the source announced
        expected: u64,
        /// The number of bytes that could actually be read
        actual: u64,
    },

    /// The blob is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted.
    #[error("Out of Bound access would have occurred!")]
    OutOfBounds,

    /// The source bytes look like a binary file rather than text.
    #[error("Content appears to be binary")]
    BinaryContent,

    /// The source bytes could not be decoded with the selected encoding.
    #[error("Decoding failed - {0}")]
    Decoding(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors from reading files, streams and from the compressor.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}
