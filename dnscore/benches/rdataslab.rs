use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use dnscore::rdata::{RData, RecordType};
use dnscore::rdataslab::RdataSlab;
use std::net::Ipv4Addr;

fn a_records_from(n: usize, start: usize) -> Vec<RData> {
    (0..n)
        .map(|i| {
            let v = start + i;
            RData::A(dnscore::rdata::records::A {
                address: Ipv4Addr::new(192, 0, (v / 256 % 256) as u8, (v % 256) as u8),
            })
        })
        .collect()
}

fn a_records(n: usize) -> Vec<RData> {
    a_records_from(n, 0)
}

#[allow(non_snake_case)]
fn bench__from_rdataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("rdataslab/from_rdataset");
    for size in [1, 16, 256] {
        let records = a_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter_batched(
                || records.clone(),
                |records| RdataSlab::from_rdataset(records.into_iter(), RecordType::A),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

#[allow(non_snake_case)]
fn bench__merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("rdataslab/merge");
    for size in [1, 16, 256] {
        let base = RdataSlab::from_rdataset(a_records(size).into_iter(), RecordType::A);
        let incoming = RdataSlab::from_rdataset(a_records_from(size, size).into_iter(), RecordType::A);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(base, incoming), |b, (base, incoming)| {
            b.iter(|| black_box(base).merge(black_box(incoming), false).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench__from_rdataset, bench__merge);
criterion_main!(benches);
