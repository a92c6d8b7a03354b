use std::path::{Path, PathBuf};

use anyhow::Context;
use dotembed::{
    documents::{DebugDocumentsBuilder, DebugSourceDocument},
    EmbeddedSourceBlob, SourceHashAlgorithm,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    output::{hex, print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct EmbeddedEntry {
    path: String,
    algorithm: String,
    checksum: String,
    size: usize,
    blob_size: usize,
    compressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EmbedOutput {
    documents: Vec<EmbeddedEntry>,
    count: usize,
}

pub fn run(
    paths: &[PathBuf],
    algorithm: SourceHashAlgorithm,
    output_dir: Option<&Path>,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let mut builder = DebugDocumentsBuilder::new(None);
    builder
        .embed_files(paths, algorithm)
        .context("failed to embed source files")?;

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    }

    let mut documents = Vec::with_capacity(builder.len());
    for document in builder.documents() {
        documents.push(describe(document, output_dir)?);
    }

    let output = EmbedOutput {
        count: documents.len(),
        documents,
    };

    print_output(&output, opts, |out| {
        let mut table = TabWriter::new(vec![
            ("Path", Align::Left),
            ("Size", Align::Right),
            ("Blob", Align::Right),
            ("Compressed", Align::Left),
            ("Checksum", Align::Left),
        ]);
        for entry in &out.documents {
            table.row(vec![
                entry.path.clone(),
                entry.size.to_string(),
                entry.blob_size.to_string(),
                if entry.compressed { "yes" } else { "no" }.to_string(),
                format!("{}:{}", entry.algorithm, entry.checksum),
            ]);
        }
        table.print();
        println!();
        println!("{} document(s) embedded", out.count);
    })
}

fn describe(
    document: &DebugSourceDocument,
    output_dir: Option<&Path>,
) -> anyhow::Result<EmbeddedEntry> {
    let blob = document.embedded_blob().unwrap_or_default();
    let parsed = EmbeddedSourceBlob::parse(blob)
        .with_context(|| format!("invalid blob produced for {}", document.path()))?;

    let written = match output_dir {
        Some(dir) => Some(write_blob(dir, document.path(), blob)?),
        None => None,
    };

    Ok(EmbeddedEntry {
        path: document.path().to_string(),
        algorithm: document.hash_algorithm().to_string(),
        checksum: hex(document.checksum()),
        size: parsed.uncompressed_len(),
        blob_size: blob.len(),
        compressed: parsed.is_compressed(),
        written,
    })
}

fn write_blob(dir: &Path, document_path: &str, blob: &[u8]) -> anyhow::Result<PathBuf> {
    let name = Path::new(document_path)
        .file_name()
        .map_or_else(|| "document".into(), |n| n.to_string_lossy().into_owned());
    let target = dir.join(format!("{name}.blob"));

    std::fs::write(&target, blob)
        .with_context(|| format!("failed to write blob: {}", target.display()))?;
    log::debug!("wrote {}", target.display());
    Ok(target)
}
