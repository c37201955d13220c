use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dnscore::name::Name;
use dnscore::rbt::{FindCallbackResult, FindOptions, Rbt};

fn populated(n: usize) -> (Rbt, Vec<Name>) {
    let mut tree = Rbt::new();
    let mut names = Vec::with_capacity(n);
    for i in 0..n {
        let name = Name::from_text(&format!("host{i}.example.com."), None).unwrap();
        tree.add_node(&name);
        names.push(name);
    }
    (tree, names)
}

#[allow(non_snake_case)]
fn bench__find_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbt/find_exact");
    for size in [16, 256, 4096] {
        let (tree, names) = populated(size);
        let target = names[size / 2].clone();
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &target, |b, target| {
            b.iter(|| tree.find_node(black_box(target), FindOptions::default(), |_| FindCallbackResult::Continue));
        });
    }
    group.finish();
}

#[allow(non_snake_case)]
fn bench__add_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbt/add_node");
    for size in [16, 256, 4096] {
        let (_, names) = populated(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            b.iter(|| {
                let mut tree = Rbt::new();
                for name in names {
                    tree.add_node(black_box(name));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench__find_exact, bench__add_node);
criterion_main!(benches);
