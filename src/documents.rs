//! Debug document table assembly.
//!
//! A PDB writer records one document per source path, each with the checksum of the content
//! and optionally its embedded content. [`DebugDocumentsBuilder`] collects these entries,
//! keyed by normalized path, in the order they are first added. An embedded document and a
//! plain document for the same path collapse into one entry that carries the embedding.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use log::debug;
use rayon::prelude::*;
use uguid::Guid;

use crate::{checksum::SourceHashAlgorithm, EmbeddedText, Result};

/// One entry of the debug document table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSourceDocument {
    path: String,
    hash_algorithm: SourceHashAlgorithm,
    checksum: Vec<u8>,
    embedded: Option<Vec<u8>>,
}

impl DebugSourceDocument {
    /// Normalized document path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checksum algorithm of the document.
    #[must_use]
    pub fn hash_algorithm(&self) -> SourceHashAlgorithm {
        self.hash_algorithm
    }

    /// GUID recorded in the document table for the checksum algorithm.
    #[must_use]
    pub fn hash_algorithm_guid(&self) -> Guid {
        self.hash_algorithm.guid()
    }

    /// Checksum of the document content.
    #[must_use]
    pub fn checksum(&self) -> &[u8] {
        &self.checksum
    }

    /// The embedded source blob, if the content is embedded.
    #[must_use]
    pub fn embedded_blob(&self) -> Option<&[u8]> {
        self.embedded.as_deref()
    }

    /// Whether the content is embedded.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }
}

/// Collects debug documents keyed by normalized path.
///
/// # Examples
///
/// ```rust
/// use dotembed::{documents::DebugDocumentsBuilder, EmbeddedText, SourceHashAlgorithm};
///
/// let mut builder = DebugDocumentsBuilder::new(None);
/// let text = EmbeddedText::from_bytes("a.cs", b"class A {}", SourceHashAlgorithm::Sha256)?;
///
/// assert!(builder.add_embedded(text.clone()));
/// assert!(!builder.add_embedded(text));
/// assert_eq!(builder.len(), 1);
/// # Ok::<(), dotembed::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct DebugDocumentsBuilder {
    base_directory: Option<PathBuf>,
    documents: Vec<DebugSourceDocument>,
    index: HashMap<String, usize>,
}

impl DebugDocumentsBuilder {
    /// Create an empty builder resolving relative paths against `base_directory`.
    #[must_use]
    pub fn new(base_directory: Option<PathBuf>) -> Self {
        DebugDocumentsBuilder {
            base_directory,
            documents: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Normalize a document path.
    ///
    /// Relative paths are joined to the base directory when one is set. `.` components are
    /// dropped and `..` components remove their parent where one exists.
    #[must_use]
    pub fn normalize_path(&self, path: &str) -> String {
        let candidate = Path::new(path);
        let joined = match &self.base_directory {
            Some(base) if candidate.is_relative() => base.join(candidate),
            _ => candidate.to_path_buf(),
        };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    let popped = matches!(
                        normalized.components().next_back(),
                        Some(Component::Normal(_))
                    ) && normalized.pop();
                    if !popped && !normalized.has_root() {
                        normalized.push("..");
                    }
                }
                other => normalized.push(other.as_os_str()),
            }
        }

        normalized.to_string_lossy().into_owned()
    }

    /// Add an embedded document.
    ///
    /// Returns `false` if a document with the same normalized path was already embedded. A
    /// plain document previously added for the path is upgraded to carry the embedding.
    pub fn add_embedded(&mut self, text: EmbeddedText) -> bool {
        let path = self.normalize_path(text.file_path());

        if let Some(&slot) = self.index.get(&path) {
            let existing = &mut self.documents[slot];
            if existing.is_embedded() {
                return false;
            }

            debug!("upgrading document '{path}' to embedded");
            existing.hash_algorithm = text.checksum_algorithm();
            existing.checksum = text.checksum().to_vec();
            existing.embedded = Some(text.into_blob());
            return true;
        }

        let document = DebugSourceDocument {
            path: path.clone(),
            hash_algorithm: text.checksum_algorithm(),
            checksum: text.checksum().to_vec(),
            embedded: Some(text.into_blob()),
        };
        self.insert(path, document);
        true
    }

    /// Add a plain document.
    ///
    /// Returns `false` if a document with the same normalized path already exists; an
    /// existing entry, embedded or not, is left untouched.
    pub fn add_document(
        &mut self,
        path: &str,
        hash_algorithm: SourceHashAlgorithm,
        checksum: Vec<u8>,
    ) -> bool {
        let path = self.normalize_path(path);
        if self.index.contains_key(&path) {
            return false;
        }

        let document = DebugSourceDocument {
            path: path.clone(),
            hash_algorithm,
            checksum,
            embedded: None,
        };
        self.insert(path, document);
        true
    }

    /// Read and embed files in parallel.
    ///
    /// Files are encoded concurrently and added in the order of `paths`. Returns the number
    /// of documents that were newly embedded.
    ///
    /// # Errors
    /// Returns the first error in `paths` order; no document is added in that case.
    pub fn embed_files<P>(&mut self, paths: &[P], algorithm: SourceHashAlgorithm) -> Result<usize>
    where
        P: AsRef<Path> + Sync,
    {
        let texts = paths
            .par_iter()
            .map(|path| EmbeddedText::from_file(path, algorithm))
            .collect::<Vec<Result<EmbeddedText>>>()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(texts
            .into_iter()
            .map(|text| self.add_embedded(text))
            .filter(|added| *added)
            .count())
    }

    /// Look up a document by path; the path is normalized first.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&DebugSourceDocument> {
        self.index
            .get(&self.normalize_path(path))
            .map(|&slot| &self.documents[slot])
    }

    /// All documents in insertion order.
    #[must_use]
    pub fn documents(&self) -> &[DebugSourceDocument] {
        &self.documents
    }

    /// Documents that carry embedded content.
    pub fn embedded_documents(&self) -> impl Iterator<Item = &DebugSourceDocument> {
        self.documents.iter().filter(|document| document.is_embedded())
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Consume the builder, returning the documents in insertion order.
    #[must_use]
    pub fn into_documents(self) -> Vec<DebugSourceDocument> {
        self.documents
    }

    fn insert(&mut self, path: String, document: DebugSourceDocument) {
        self.index.insert(path, self.documents.len());
        self.documents.push(document);
    }
}
