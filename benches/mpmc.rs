//! Benchmarks for the blocking MPMC queue.
//!
//! Compares handoff's BlockingQueue against crossbeam-channel's bounded
//! channel. Not an apples-to-apples race — the channel parks senders on a
//! full buffer where BlockingQueue rejects — but it anchors the numbers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use handoff::mpmc::BlockingQueue;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Uncontended push/pop
// ============================================================================

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    group.bench_function("handoff_blocking/u64", |b| {
        let q = BlockingQueue::<u64>::bounded(1024);
        b.iter(|| {
            q.push(black_box(42)).unwrap();
            black_box(q.pop().unwrap())
        });
    });

    group.bench_function("crossbeam_channel/u64", |b| {
        let (tx, rx) = crossbeam_channel::bounded::<u64>(1024);
        b.iter(|| {
            tx.try_send(black_box(42)).unwrap();
            black_box(rx.try_recv().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Contended multi-producer multi-consumer exchange
// ============================================================================

fn bench_mpmc_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc_exchange");

    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 25_000;
    const TOTAL: usize = PRODUCERS * PER_PRODUCER;
    group.throughput(Throughput::Elements(TOTAL as u64));

    group.bench_function("handoff_blocking", |b| {
        b.iter(|| {
            let queue = Arc::new(BlockingQueue::<u64>::unbounded());
            let mut handles = Vec::new();

            for p in 0..PRODUCERS {
                let queue = Arc::clone(&queue);
                handles.push(thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        queue.push((p * TOTAL + i) as u64).unwrap();
                    }
                }));
            }

            for _ in 0..CONSUMERS {
                let queue = Arc::clone(&queue);
                handles.push(thread::spawn(move || {
                    for _ in 0..TOTAL / CONSUMERS {
                        black_box(queue.take().unwrap());
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.bench_function("crossbeam_channel", |b| {
        b.iter(|| {
            let (tx, rx) = crossbeam_channel::unbounded::<u64>();
            let mut handles = Vec::new();

            for p in 0..PRODUCERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        tx.send((p * TOTAL + i) as u64).unwrap();
                    }
                }));
            }

            for _ in 0..CONSUMERS {
                let rx = rx.clone();
                handles.push(thread::spawn(move || {
                    for _ in 0..TOTAL / CONSUMERS {
                        black_box(rx.recv().unwrap());
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Batch append vs element-at-a-time
// ============================================================================

fn bench_batch_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_append");

    for batch_size in [100usize, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(
            BenchmarkId::new("push_all", batch_size),
            &batch_size,
            |b, &n| {
                let queue = BlockingQueue::<u64>::unbounded();
                b.iter(|| {
                    black_box(queue.push_all((0..n).map(|i| i as u64)));
                    queue.drain_with(|v| {
                        black_box(v);
                    });
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("push_each", batch_size),
            &batch_size,
            |b, &n| {
                let queue = BlockingQueue::<u64>::unbounded();
                b.iter(|| {
                    for i in 0..n {
                        queue.push(i as u64).unwrap();
                    }
                    queue.drain_with(|v| {
                        black_box(v);
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_uncontended,
    bench_mpmc_exchange,
    bench_batch_append,
);

criterion_main!(benches);
