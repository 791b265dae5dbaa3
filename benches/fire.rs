//! Performance benchmarks for a3s-signal
//!
//! Run with: cargo bench

use a3s_signal::{Event, Mut, Subscription, Val};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_fire_empty(c: &mut Criterion) {
    let event: Event<()> = Event::new();
    c.bench_function("fire/empty", |b| {
        b.iter(|| event.fire(()));
    });
}

fn bench_fire_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("fire_throughput");
    for count in [1, 10, 100, 1000] {
        let event: Event<(Val<u64>, Mut<u64>)> = Event::new();
        let subs: Vec<Subscription> = (0..count)
            .map(|_| event.bind(|(step, total): (u64, &mut u64)| *total += step))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            let mut total = 0u64;
            b.iter(|| event.fire((black_box(1), &mut total)));
        });

        drop(subs);
    }
    group.finish();
}

fn bench_bind_release(c: &mut Criterion) {
    let event: Event<()> = Event::new();
    for _ in 0..100 {
        event.permanent_bind(|_| {});
    }

    c.bench_function("bind+release", |b| {
        b.iter(|| {
            let sub = event.bind(|_| {});
            black_box(sub.release())
        });
    });
}

criterion_group!(
    benches,
    bench_fire_empty,
    bench_fire_throughput,
    bench_bind_release,
);
criterion_main!(benches);
