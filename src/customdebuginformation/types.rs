//! Custom debug information kinds and parsed record values.

use uguid::{guid, Guid};

use crate::text::TextEncoding;

/// GUIDs of the well-known custom debug information kinds.
pub mod debug_guids {
    use super::{guid, Guid};

    /// Source Link JSON document
    pub const SOURCE_LINK: Guid = guid!("cc110556-a091-4d38-9fec-25ab9a351a6a");
    /// Embedded source document content
    pub const EMBEDDED_SOURCE: Guid = guid!("0e8a571b-6926-466e-b4ad-8ab04611f5fe");
    /// Compilation metadata references
    pub const COMPILATION_METADATA: Guid = guid!("b5feec05-8cd0-4a83-96da-466284bb4bd8");
    /// Compiler options
    pub const COMPILATION_OPTIONS: Guid = guid!("b1c2abe1-8bf0-497a-a9b1-02fa8571e544");
}

/// Kind of a custom debug information record, identified by GUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomDebugKind {
    /// Source Link mapping of documents to URLs
    SourceLink,
    /// Embedded source document content
    EmbeddedSource,
    /// References used by the compilation
    CompilationMetadata,
    /// Options the compiler was invoked with
    CompilationOptions,
    /// Any other kind
    Unknown(Guid),
}

impl CustomDebugKind {
    /// Classify a record kind GUID.
    #[must_use]
    pub fn from_guid(guid: Guid) -> Self {
        [
            CustomDebugKind::SourceLink,
            CustomDebugKind::EmbeddedSource,
            CustomDebugKind::CompilationMetadata,
            CustomDebugKind::CompilationOptions,
        ]
        .into_iter()
        .find(|kind| kind.guid() == guid)
        .unwrap_or(CustomDebugKind::Unknown(guid))
    }

    /// Classify a record kind from the 16 bytes of its GUID heap entry.
    #[must_use]
    pub fn from_guid_bytes(bytes: [u8; 16]) -> Self {
        Self::from_guid(Guid::from_bytes(bytes))
    }

    /// The GUID identifying this kind.
    #[must_use]
    pub const fn guid(&self) -> Guid {
        match self {
            CustomDebugKind::SourceLink => debug_guids::SOURCE_LINK,
            CustomDebugKind::EmbeddedSource => debug_guids::EMBEDDED_SOURCE,
            CustomDebugKind::CompilationMetadata => debug_guids::COMPILATION_METADATA,
            CustomDebugKind::CompilationOptions => debug_guids::COMPILATION_OPTIONS,
            CustomDebugKind::Unknown(guid) => *guid,
        }
    }
}

/// A parsed custom debug information record value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomDebugInfo {
    /// Source Link mapping information
    SourceLink {
        /// JSON document
        document: String,
    },

    /// Embedded source document
    EmbeddedSource {
        /// Decoded document text
        content: String,
        /// Encoding detected in the decoded bytes
        encoding: TextEncoding,
        /// Whether the blob payload was deflate-compressed
        was_compressed: bool,
    },

    /// Compilation metadata, kept as raw bytes
    CompilationMetadata {
        /// Raw record value
        data: Vec<u8>,
    },

    /// Compiler options as name/value pairs
    CompilationOptions {
        /// Options in record order
        options: Vec<(String, String)>,
    },

    /// Record of a kind without a dedicated parser
    Unknown {
        /// Record kind
        kind: CustomDebugKind,
        /// Raw record value
        data: Vec<u8>,
    },
}

impl CustomDebugInfo {
    /// The kind of this record.
    #[must_use]
    pub fn kind(&self) -> CustomDebugKind {
        match self {
            CustomDebugInfo::SourceLink { .. } => CustomDebugKind::SourceLink,
            CustomDebugInfo::EmbeddedSource { .. } => CustomDebugKind::EmbeddedSource,
            CustomDebugInfo::CompilationMetadata { .. } => CustomDebugKind::CompilationMetadata,
            CustomDebugInfo::CompilationOptions { .. } => CustomDebugKind::CompilationOptions,
            CustomDebugInfo::Unknown { kind, .. } => *kind,
        }
    }

    /// Whether this is a record kind understood by the parser.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, CustomDebugInfo::Unknown { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_source_guid_heap_bytes() {
        let kind = CustomDebugKind::from_guid_bytes([
            0x1B, 0x57, 0x8A, 0x0E, 0x26, 0x69, 0x6E, 0x46, 0xB4, 0xAD, 0x8A, 0xB0, 0x46, 0x11,
            0xF5, 0xFE,
        ]);
        assert_eq!(kind, CustomDebugKind::EmbeddedSource);
    }

    #[test]
    fn kinds_round_trip_through_guid() {
        for kind in [
            CustomDebugKind::SourceLink,
            CustomDebugKind::EmbeddedSource,
            CustomDebugKind::CompilationMetadata,
            CustomDebugKind::CompilationOptions,
        ] {
            assert_eq!(CustomDebugKind::from_guid(kind.guid()), kind);
        }
    }

    #[test]
    fn unknown_guid_is_preserved() {
        let guid = guid!("01234567-89ab-cdef-0123-456789abcdef");
        let kind = CustomDebugKind::from_guid(guid);
        assert_eq!(kind, CustomDebugKind::Unknown(guid));
        assert_eq!(kind.guid(), guid);
    }
}
