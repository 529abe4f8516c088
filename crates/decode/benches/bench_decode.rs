//! Benchmark for decoding JobRequest accounts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use jobscope_decoder::{
    decode_record,
    layouts::{job_request_shape, JobRequest},
};

fn test_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("jobscope_decoder");

    for verifiers in [1usize, 8, 64] {
        let shape = job_request_shape(verifiers).expect("valid shape");
        let data = vec![0u8; shape.size()];

        group.sample_size(100);
        group.bench_with_input(BenchmarkId::new("record", verifiers), &data, |b, data| {
            b.iter(|| decode_record(&shape, data).expect("should decode"));
        });
        group.bench_with_input(BenchmarkId::new("typed", verifiers), &data, |b, data| {
            b.iter(|| JobRequest::decode_with(&shape, data).expect("should decode"));
        });
    }
    group.finish();
}

criterion_group!(benches, test_decode);
criterion_main!(benches);
