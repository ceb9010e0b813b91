// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use reveal_benches::column_layout;
use reveal_tracker::options::TrackerOptions;
use reveal_tracker::tracker::ScrollTracker;
use reveal_tracker::types::Milestones;
use reveal_viewport::IntersectionObserver;

const ROW_H: f64 = 48.0;
const WIDTH: f64 = 720.0;

fn bench_observer_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_observer");
    for &n in &[100_usize, 1_000] {
        let layout = column_layout(n, ROW_H, WIDTH);
        let steps = 200_u64;
        group.throughput(Throughput::Elements(steps));
        group.bench_function(format!("scroll_{n}_messages"), |b| {
            b.iter_batched(
                || {
                    let mut o = IntersectionObserver::new(0.1);
                    o.observe(layout.clone(), Rect::new(0.0, 0.0, WIDTH, 800.0));
                    let _ = o.take_changes();
                    o
                },
                |mut o| {
                    for s in 0..steps {
                        o.set_scroll_offset(Vec2::new(0.0, s as f64 * 16.0));
                        black_box(o.take_changes());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_full_transcript_read(c: &mut Criterion) {
    let n = 400_usize;
    let layout = column_layout(n, ROW_H, WIDTH);
    let opts = TrackerOptions::default();
    let mut group = c.benchmark_group("viewport_tracker");
    group.bench_function("read_400_messages_top_to_bottom", |b| {
        b.iter_batched(
            || {
                let mut t = ScrollTracker::with_viewport(opts, Rect::new(0.0, 0.0, WIDTH, 800.0));
                t.on_end_reached(|| {});
                t.set_message_count(n);
                t.start_tracking();
                t.observe(|a| a.setup(layout.clone(), None));
                t
            },
            |mut t| {
                let mut y = 0.0;
                while !t.reached().contains(Milestones::END) {
                    y += 120.0;
                    t.observe(|a| a.scroll_to(Vec2::new(0.0, y)));
                }
                black_box(y);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_observer_scroll, bench_full_transcript_read);
criterion_main!(benches);
