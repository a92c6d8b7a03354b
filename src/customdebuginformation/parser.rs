//! Value parsers for custom debug information records.

use crate::{
    customdebuginformation::types::{CustomDebugInfo, CustomDebugKind},
    embedded::EmbeddedSourceBlob,
    text::{decode_source, DecoderOptions},
    Result,
};

/// Parse the value of a custom debug information record of the given kind.
///
/// `EmbeddedSource` values are decoded through the embedded source blob format and the
/// resulting bytes are decoded as text with BOM detection. Compiler options are split into
/// name/value pairs at NUL separators.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the value violates the format of its kind, and
/// [`crate::Error::Decoding`] if embedded content is marked as UTF-8 or UTF-16 but invalid.
///
/// # Examples
///
/// ```rust
/// use dotembed::customdebuginformation::{parse_custom_debug_blob, CustomDebugInfo, CustomDebugKind};
///
/// let info = parse_custom_debug_blob(&[0, 0, 0, 0, b'x'], CustomDebugKind::EmbeddedSource)?;
/// assert!(matches!(info, CustomDebugInfo::EmbeddedSource { ref content, was_compressed: false, .. } if content == "x"));
/// # Ok::<(), dotembed::Error>(())
/// ```
pub fn parse_custom_debug_blob(data: &[u8], kind: CustomDebugKind) -> Result<CustomDebugInfo> {
    match kind {
        CustomDebugKind::SourceLink => Ok(CustomDebugInfo::SourceLink {
            document: utf8(data, "Source Link document")?,
        }),
        CustomDebugKind::EmbeddedSource => parse_embedded_source(data),
        CustomDebugKind::CompilationMetadata => Ok(CustomDebugInfo::CompilationMetadata {
            data: data.to_vec(),
        }),
        CustomDebugKind::CompilationOptions => parse_compilation_options(data),
        CustomDebugKind::Unknown(_) => Ok(CustomDebugInfo::Unknown {
            kind,
            data: data.to_vec(),
        }),
    }
}

fn parse_embedded_source(data: &[u8]) -> Result<CustomDebugInfo> {
    let blob = EmbeddedSourceBlob::parse(data)?;
    let bytes = blob.decode()?;

    let options = DecoderOptions::default().with_binary_detection(false);
    let text = decode_source(&bytes, &options)?;
    let encoding = text
        .encoding()
        .unwrap_or(options.fallback_encoding);

    Ok(CustomDebugInfo::EmbeddedSource {
        content: text.as_str().to_string(),
        encoding,
        was_compressed: blob.is_compressed(),
    })
}

fn parse_compilation_options(data: &[u8]) -> Result<CustomDebugInfo> {
    let body = data.strip_suffix(&[0]).unwrap_or(data);
    if body.is_empty() {
        return Ok(CustomDebugInfo::CompilationOptions {
            options: Vec::new(),
        });
    }

    let parts: Vec<&[u8]> = body.split(|&b| b == 0).collect();
    if parts.len() % 2 != 0 {
        return Err(malformed_error!(
            "Compilation options hold {} NUL-separated strings, expected name/value pairs",
            parts.len()
        ));
    }

    let options = parts
        .chunks_exact(2)
        .map(|pair| {
            Ok((
                utf8(pair[0], "compilation option name")?,
                utf8(pair[1], "compilation option value")?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CustomDebugInfo::CompilationOptions { options })
}

fn utf8(data: &[u8], what: &str) -> Result<String> {
    String::from_utf8(data.to_vec())
        .map_err(|e| malformed_error!("Invalid UTF-8 in {} - {}", what, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{text::TextEncoding, EmbeddedText, Error, SourceHashAlgorithm};

    #[test]
    fn source_link_document() {
        let info =
            parse_custom_debug_blob(br#"{"documents":{}}"#, CustomDebugKind::SourceLink).unwrap();
        assert_eq!(
            info,
            CustomDebugInfo::SourceLink {
                document: r#"{"documents":{}}"#.to_string()
            }
        );
    }

    #[test]
    fn embedded_source_compressed() {
        let content = "// generated\n".repeat(40);
        let embedded =
            EmbeddedText::from_bytes("gen.cs", content.as_bytes(), SourceHashAlgorithm::Sha1)
                .unwrap();

        let info = parse_custom_debug_blob(embedded.blob(), CustomDebugKind::EmbeddedSource)
            .unwrap();
        match info {
            CustomDebugInfo::EmbeddedSource {
                content: decoded,
                encoding,
                was_compressed,
            } => {
                assert_eq!(decoded, content);
                assert_eq!(encoding, TextEncoding::Utf8);
                assert!(was_compressed);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn embedded_source_with_bom() {
        let mut blob = vec![0, 0, 0, 0];
        blob.extend_from_slice(&TextEncoding::Utf16Le.encode("x"));

        let info = parse_custom_debug_blob(&blob, CustomDebugKind::EmbeddedSource).unwrap();
        assert!(matches!(
            info,
            CustomDebugInfo::EmbeddedSource { ref content, encoding: TextEncoding::Utf16Le, .. } if content == "x"
        ));
    }

    #[test]
    fn embedded_source_malformed() {
        assert!(matches!(
            parse_custom_debug_blob(&[0xFF, 0xFF, 0xFF, 0xFF], CustomDebugKind::EmbeddedSource),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn compilation_options_pairs() {
        let info = parse_custom_debug_blob(
            b"language\0C#\0optimization\0release\0",
            CustomDebugKind::CompilationOptions,
        )
        .unwrap();

        assert_eq!(
            info,
            CustomDebugInfo::CompilationOptions {
                options: vec![
                    ("language".to_string(), "C#".to_string()),
                    ("optimization".to_string(), "release".to_string()),
                ]
            }
        );

        assert!(matches!(
            parse_custom_debug_blob(b"language\0", CustomDebugKind::CompilationOptions),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_kind_keeps_data() {
        let kind = CustomDebugKind::from_guid(uguid::guid!("00000000-0000-0000-0000-000000000001"));
        let info = parse_custom_debug_blob(&[1, 2, 3], kind).unwrap();

        assert_eq!(info.kind(), kind);
        assert!(!info.is_known());
    }
}
