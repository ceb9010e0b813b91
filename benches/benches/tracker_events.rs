// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use reveal_tracker::observer::{ObserverEvent, ScriptedObserver};
use reveal_tracker::options::TrackerOptions;
use reveal_tracker::tracker::ScrollTracker;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

// Random visibility flips over a long transcript, as produced by jittery scrolling.
fn gen_reports(count: usize, messages: usize, seed: u64) -> Vec<(usize, bool)> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| (rng.below(messages), rng.next_u64() & 1 == 0))
        .collect()
}

fn bench_direct_reports(c: &mut Criterion) {
    let reports = gen_reports(10_000, 500, 0xCAFE_F00D_DEAD_BEEF);
    let mut group = c.benchmark_group("tracker_direct");
    group.throughput(Throughput::Elements(reports.len() as u64));
    group.bench_function("10k_reports_500_messages", |b| {
        b.iter_batched(
            || {
                let mut t = ScrollTracker::new(TrackerOptions::default());
                t.on_turn6_reached(|| {});
                t.on_end_reached(|| {});
                t.set_message_count(500);
                t.mark_user_scrolled();
                t
            },
            |mut t| {
                for &(i, v) in &reports {
                    black_box(t.track_message_visibility(i, v));
                }
                black_box(t.reached());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_pumped_reports(c: &mut Criterion) {
    let reports = gen_reports(10_000, 500, 0xBADC_F00D_1234_5678);
    let mut group = c.benchmark_group("tracker_pump");
    group.throughput(Throughput::Elements(reports.len() as u64 + 1));
    group.bench_function("scripted_observer", |b| {
        b.iter_batched(
            || {
                let mut obs = ScriptedObserver::new();
                obs.scrolled();
                for &(index, is_visible) in &reports {
                    obs.push(ObserverEvent::Visibility { index, is_visible });
                }
                let mut t = ScrollTracker::with_observer(TrackerOptions::default(), obs);
                t.set_message_count(500);
                t.start_tracking();
                t
            },
            |mut t| black_box(t.pump()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_direct_reports, bench_pumped_reports);
criterion_main!(benches);
