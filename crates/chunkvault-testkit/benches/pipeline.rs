//! Benchmarks for chunking, ingest, and reconstruction.

use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tokio::runtime::Runtime;

use chunkvault::Chunker;
use chunkvault_testkit::{memory_vault, random_content};

const SIZES: &[usize] = &[
    64 * 1024,       // 64 KB
    1024 * 1024,     // 1 MB
    4 * 1024 * 1024, // 4 MB
];

const CHUNK_SIZE: usize = 64 * 1024;

fn bench_chunk(c: &mut Criterion) {
    let chunker = Chunker::new(CHUNK_SIZE).unwrap();

    let mut group = c.benchmark_group("chunk_and_hash");
    for &size in SIZES {
        let data = bytes::Bytes::from(random_content(size as u64, size));
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| chunker.chunk(data.clone()));
        });
    }
    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("ingest");
    for &size in SIZES {
        let data = random_content(size as u64, size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("fresh", size), &data, |b, data| {
            b.to_async(&rt).iter_custom(|iters| {
                let data = data.clone();
                async move {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let (vault, _, _) = memory_vault(CHUNK_SIZE).await;
                        let start = Instant::now();
                        vault.ingest("bench.bin", data.clone()).await.unwrap();
                        total += start.elapsed();
                    }
                    total
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("deduplicated", size), &data, |b, data| {
            b.to_async(&rt).iter_custom(|iters| {
                let data = data.clone();
                async move {
                    let (vault, _, _) = memory_vault(CHUNK_SIZE).await;
                    vault.ingest("seed.bin", data.clone()).await.unwrap();
                    let start = Instant::now();
                    for _ in 0..iters {
                        vault.ingest("bench.bin", data.clone()).await.unwrap();
                    }
                    start.elapsed()
                }
            });
        });
    }
    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("reconstruct");
    for &size in SIZES {
        let data = random_content(size as u64, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.to_async(&rt).iter_custom(|iters| {
                let data = data.clone();
                async move {
                    let (vault, _, _) = memory_vault(CHUNK_SIZE).await;
                    vault.ingest("bench.bin", data).await.unwrap();
                    let start = Instant::now();
                    for _ in 0..iters {
                        vault.reconstruct("bench.bin").await.unwrap();
                    }
                    start.elapsed()
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_chunk, bench_ingest, bench_reconstruct);
criterion_main!(benches);
