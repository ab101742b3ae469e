//! Benchmarks for the chunked codec and text classification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jobmatch::classifier::TextClassifier;
use jobmatch::codec::BinaryTextCodec;

fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.7\n".to_vec();
    bytes.extend((0..len.saturating_sub(bytes.len())).map(|i| (i % 251) as u8));
    bytes
}

fn codec_benchmark(c: &mut Criterion) {
    let codec = BinaryTextCodec::new();
    let mut group = c.benchmark_group("codec");

    for size in [16 * 1024, 1024 * 1024] {
        let bytes = pdf_bytes(size);
        let blob = codec.encode(&bytes).unwrap_or_else(|e| panic!("encode failed: {e}"));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &bytes, |b, bytes| {
            b.iter(|| codec.encode(black_box(bytes)));
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &blob, |b, blob| {
            b.iter(|| codec.decode_blob(black_box(blob)));
        });
    }
    group.finish();
}

fn classifier_benchmark(c: &mut Criterion) {
    let classifier = TextClassifier::new();
    let fragments = [
        "Develop dashboards for the finance team",
        "At least 3 years of experience in data analysis",
        "負責管理團隊日常運作",
        "APPLY NOW",
    ];

    c.bench_function("classify", |b| {
        b.iter(|| {
            for fragment in &fragments {
                black_box(classifier.classify(black_box(fragment)));
            }
        });
    });
}

criterion_group!(benches, codec_benchmark, classifier_benchmark);
criterion_main!(benches);
