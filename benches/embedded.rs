extern crate dotembed;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dotembed::{EmbeddedSourceBlob, EmbeddedText, SourceHashAlgorithm, SourceText, TextEncoding};
use std::hint::black_box;

/// Synthetic C# source of roughly `size` bytes.
fn source_of_size(size: usize) -> String {
    let line = "    public int Property { get; set; } // generated member\n";
    line.repeat(size / line.len() + 1)[..size].to_string()
}

fn bench_from_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed_bytes");
    for size in [128usize, 4 * 1024, 256 * 1024] {
        let content = source_of_size(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| {
                EmbeddedText::from_bytes(
                    "Bench.cs",
                    black_box(content.as_bytes()),
                    SourceHashAlgorithm::Sha256,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_from_text(c: &mut Criterion) {
    let content = source_of_size(64 * 1024);
    let mut group = c.benchmark_group("embed_text");
    group.throughput(Throughput::Bytes(content.len() as u64));

    for encoding in [TextEncoding::Utf8, TextEncoding::Utf16Le] {
        let text = SourceText::new(content.clone(), Some(encoding), SourceHashAlgorithm::Sha1);
        group.bench_function(encoding.to_string(), |b| {
            b.iter(|| {
                EmbeddedText::from_text("Bench.cs", black_box(&text), SourceHashAlgorithm::Sha1)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let content = source_of_size(256 * 1024);
    let text =
        EmbeddedText::from_bytes("Bench.cs", content.as_bytes(), SourceHashAlgorithm::Sha1).unwrap();

    let mut group = c.benchmark_group("decode_blob");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("inflate", |b| {
        b.iter(|| {
            let blob = EmbeddedSourceBlob::parse(black_box(text.blob())).unwrap();
            black_box(blob.decode().unwrap())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_from_bytes, bench_from_text, bench_decode);
criterion_main!(benches);
