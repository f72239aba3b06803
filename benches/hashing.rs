//! Hashing Engine Benchmarks
//!
//! Compares single-read and chunked hashing over in-memory sources.
//!
//! Run with: `cargo bench --bench hashing`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hashpdf::hashing::{compute_digest, digest_bytes, HashOptions, MemorySource};

const SIZES: [usize; 3] = [64 * 1024, 4 * 1024 * 1024, 16 * 1024 * 1024];

fn bench_chunk_sizes(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("compute_digest");
    group.sample_size(20);

    for size in SIZES {
        let source = MemorySource::new(vec![0xA5u8; size]);
        group.throughput(Throughput::Bytes(size as u64));

        for chunk_size in [256 * 1024, 2 * 1024 * 1024] {
            let options = HashOptions::default().with_chunk_size(chunk_size);
            group.bench_with_input(
                BenchmarkId::new(format!("chunk_{}k", chunk_size / 1024), size),
                &options,
                |b, options| {
                    b.to_async(&runtime)
                        .iter(|| async { compute_digest(black_box(&source), options, None).await });
                },
            );
        }
    }

    group.finish();
}

fn bench_whole_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest_bytes");
    for size in SIZES {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| digest_bytes(black_box(data)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chunk_sizes, bench_whole_buffer);
criterion_main!(benches);
