use std::path::Path;

use anyhow::Context;
use dotembed::EmbeddedSourceBlob;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct InspectOutput {
    format: i32,
    compressed: bool,
    payload_size: usize,
    decoded_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    extracted_to: Option<String>,
}

pub fn run(path: &Path, extract: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read blob: {}", path.display()))?;
    let blob = EmbeddedSourceBlob::parse(&data)
        .with_context(|| format!("not an embedded source blob: {}", path.display()))?;
    let content = blob
        .decode()
        .with_context(|| format!("failed to decode blob: {}", path.display()))?;

    if let Some(target) = extract {
        std::fs::write(target, &content)
            .with_context(|| format!("failed to write content: {}", target.display()))?;
    }

    let output = InspectOutput {
        format: blob.format(),
        compressed: blob.is_compressed(),
        payload_size: blob.payload().len(),
        decoded_size: content.len(),
        extracted_to: extract.map(|p| p.display().to_string()),
    };

    print_output(&output, opts, |out| {
        let mut table = TabWriter::new(vec![("Field", Align::Left), ("Value", Align::Right)]);
        table.row(vec!["Format".into(), out.format.to_string()]);
        table.row(vec![
            "Compressed".into(),
            if out.compressed { "yes" } else { "no" }.into(),
        ]);
        table.row(vec!["Payload".into(), out.payload_size.to_string()]);
        table.row(vec!["Decoded".into(), out.decoded_size.to_string()]);
        table.print();

        if let Some(target) = &out.extracted_to {
            println!();
            println!("Content written to {target}");
        }
    })
}
