//! One-way latency probe for the SPSC ring buffer.
//!
//! Two rings, one message in flight: an echo thread bounces every value
//! straight back, and the main thread times the round trip. Half the RTT
//! approximates one-way hop latency. Pin the two threads to separate
//! physical cores for stable numbers.
//!
//! Run: cargo bench --bench latency

use std::thread;
use std::time::Instant;

use handoff::spsc;

const ROUNDS: usize = 200_000;
const WARMUP: usize = 20_000;

fn main() {
    let (mut request_tx, mut request_rx) = spsc::ring_buffer::<u64>(8);
    let (mut reply_tx, mut reply_rx) = spsc::ring_buffer::<u64>(8);

    let echo = thread::spawn(move || {
        for _ in 0..ROUNDS {
            let value = loop {
                match request_rx.pop() {
                    Some(v) => break v,
                    None => std::hint::spin_loop(),
                }
            };
            while reply_tx.push(value).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let mut hop_nanos = Vec::with_capacity(ROUNDS - WARMUP);

    for round in 0..ROUNDS {
        let start = Instant::now();

        while request_tx.push(round as u64).is_err() {
            std::hint::spin_loop();
        }
        while reply_rx.pop().is_none() {
            std::hint::spin_loop();
        }

        if round >= WARMUP {
            hop_nanos.push(start.elapsed().as_nanos() as u64 / 2);
        }
    }

    echo.join().unwrap();

    hop_nanos.sort_unstable();
    println!(
        "handoff spsc one-way latency: p50={}ns p90={}ns p99={}ns p99.9={}ns max={}ns",
        percentile(&hop_nanos, 0.50),
        percentile(&hop_nanos, 0.90),
        percentile(&hop_nanos, 0.99),
        percentile(&hop_nanos, 0.999),
        hop_nanos.last().copied().unwrap_or(0),
    );
}

fn percentile(sorted: &[u64], p: f64) -> u64 {
    let index = ((sorted.len() - 1) as f64 * p) as usize;
    sorted[index]
}
