use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fatvec::{ErasedVec, FatVec};

fn bench_sequential_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_push");

    for size in [100, 1000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("typed_u64", size), size, |b, &size| {
            b.iter(|| {
                let mut vec: FatVec<u64> = FatVec::new();
                for i in 0..size as u64 {
                    vec.push(black_box(i));
                }
                black_box(vec.len())
            });
        });
        group.bench_with_input(BenchmarkId::new("erased_16_bytes", size), size, |b, &size| {
            let item = [7u8; 16];
            b.iter(|| {
                let mut vec = ErasedVec::new(16);
                for _ in 0..size {
                    vec.push(black_box(&item));
                }
                black_box(vec.len())
            });
        });
    }
    group.finish();
}

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_access");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("get_operations", size), size, |b, &size| {
            let mut vec = ErasedVec::with_capacity(8, size);
            for i in 0..size as u64 {
                vec.push(&i.to_le_bytes());
            }

            b.iter(|| {
                for i in 0..size {
                    black_box(vec.get(i));
                }
            });
        });
    }
    group.finish();
}

fn bench_insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("front", size), size, |b, &size| {
            b.iter(|| {
                let mut vec: FatVec<u32> = FatVec::with_capacity(size);
                for i in 0..size as u32 {
                    vec.insert(0, i);
                }
                for _ in 0..size {
                    black_box(vec.remove(0));
                }
            });
        });
    }
    group.finish();
}

fn bench_push_pop_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack");

    for size in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("push_pop_cycle", size), size, |b, &size| {
            let mut vec: FatVec<u64> = FatVec::new();
            b.iter(|| {
                for i in 0..size as u64 {
                    vec.push(i);
                }
                for _ in 0..size {
                    black_box(vec.pop());
                }
            });
        });
    }
    group.finish();
}

fn bench_duplicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate");

    for element_size in [64, 4096].iter() {
        group.throughput(Throughput::Bytes(*element_size as u64 * 100));
        group.bench_with_input(
            BenchmarkId::new("hundred_items", element_size),
            element_size,
            |b, &element_size| {
                let mut vec = ErasedVec::with_capacity(element_size, 100);
                let item = vec![b'x'; element_size];
                for _ in 0..100 {
                    vec.push(&item);
                }

                b.iter(|| black_box(vec.duplicate()));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sequential_push,
    bench_random_access,
    bench_insert_remove,
    bench_push_pop_cycle,
    bench_duplicate
);
criterion_main!(benches);
