use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tidings_dispatcher::{Dispatcher, event_map};

#[event_map]
pub enum Bench {
    Tick(u64),
    Quiet,
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit");

    for listeners in [1usize, 8, 64] {
        let dispatcher = Dispatcher::<Bench>::builder()
            .listener_warn_threshold(None)
            .trace_emissions(false)
            .build()
            .unwrap();
        let total = Arc::new(AtomicU64::new(0));
        for _ in 0..listeners {
            let total = Arc::clone(&total);
            dispatcher.on::<bench::Tick>(move |n| {
                total.fetch_add(*n, Ordering::Relaxed);
            });
        }

        group.throughput(Throughput::Elements(listeners as u64));
        group.bench_with_input(BenchmarkId::new("fan_out", listeners), &dispatcher, |b, d| {
            b.iter(|| d.emit::<bench::Tick>(black_box(1)));
        });
    }

    let dispatcher = Dispatcher::<Bench>::new();
    group.bench_function("no_listeners", |b| {
        b.iter(|| dispatcher.notify::<bench::Quiet>());
    });

    group.finish();
}

fn bench_subscribe(c: &mut Criterion) {
    let dispatcher = Dispatcher::<Bench>::builder().listener_warn_threshold(None).build().unwrap();

    c.bench_function("on_then_unsubscribe", |b| {
        b.iter(|| {
            let subscription = dispatcher.on::<bench::Tick>(|n| {
                black_box(n);
            });
            subscription.unsubscribe()
        });
    });
}

criterion_group!(benches, bench_emit, bench_subscribe);
criterion_main!(benches);
