// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::time::Duration;
use understory_gesture::{
    AnyGesture, DragGesture, Gesture, GestureExt, GestureHost, GestureState, LongPressGesture,
    PointerEvent, TapGesture,
};

/// A down, `moves` evenly spaced moves along x, and an up.
fn drag_stroke(moves: usize) -> Vec<PointerEvent> {
    let ms = |t: usize| Duration::from_millis(t as u64);
    let mut events = Vec::with_capacity(moves + 2);
    events.push(PointerEvent::down((0.0, 0.0), ms(0)));
    for i in 1..=moves {
        events.push(PointerEvent::moved((i as f64, 0.0), ms(i)));
    }
    events.push(PointerEvent::up((moves as f64, 0.0), ms(moves + 1)));
    events
}

fn bench_recognizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/recognizers");

    for moves in [16_usize, 256, 4_096] {
        let events = drag_stroke(moves);
        group.throughput(Throughput::Elements(events.len() as u64));

        group.bench_with_input(BenchmarkId::new("drag", moves), &events, |b, events| {
            b.iter_batched(
                DragGesture::default,
                |mut drag| {
                    for event in events {
                        let _ = drag.handle_event(event);
                    }
                    black_box(drag.phase());
                },
                BatchSize::SmallInput,
            );
        });

        // Moves past the slop fail a long press early; the rest are skipped.
        group.bench_with_input(
            BenchmarkId::new("long_press", moves),
            &events,
            |b, events| {
                b.iter_batched(
                    LongPressGesture::default,
                    |mut press| {
                        for event in events {
                            let _ = press.handle_event(event);
                        }
                        black_box(press.phase());
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_combinators(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/combinators");
    let events = drag_stroke(1_024);
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("simultaneous(drag, long_press)", |b| {
        b.iter_batched(
            || DragGesture::default().simultaneously(LongPressGesture::default()),
            |mut both| {
                for event in &events {
                    let _ = both.handle_event(event);
                }
                black_box(both.phase());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("exclusive(tap, drag)", |b| {
        b.iter_batched(
            || TapGesture::default().exclusively(DragGesture::default()),
            |mut either| {
                for event in &events {
                    let _ = either.handle_event(event);
                }
                black_box(either.phase());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("boxed(updating(drag))", |b| {
        b.iter_batched(
            || {
                let offset = GestureState::new(kurbo::Vec2::ZERO);
                let drag: AnyGesture<_> = DragGesture::default()
                    .updating(&offset, |value| value.translation)
                    .boxed();
                (drag, offset)
            },
            |(mut drag, offset)| {
                for event in &events {
                    let _ = drag.handle_event(event);
                }
                black_box(offset.get());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_host(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture/host");
    let events = drag_stroke(256);

    for nodes in [16_u32, 256, 4_096] {
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("dispatch_to_node", nodes),
            &nodes,
            |b, &nodes| {
                b.iter_batched(
                    || {
                        let mut host = GestureHost::new();
                        for node in 0..nodes {
                            host.attach(node, TapGesture::default());
                            host.attach(node, DragGesture::default());
                        }
                        host
                    },
                    |mut host| {
                        let target = nodes / 2;
                        let mut count = 0;
                        for event in &events {
                            count += host.dispatch_to_node(&target, event).len();
                        }
                        black_box(count);
                    },
                    BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(BenchmarkId::new("poll", nodes), &nodes, |b, &nodes| {
            b.iter_batched(
                || {
                    let mut host = GestureHost::new();
                    for node in 0..nodes {
                        let press = host.attach(node, LongPressGesture::default());
                        let down = PointerEvent::down((0.0, 0.0), Duration::ZERO);
                        let _ = host.dispatch(press, &down);
                    }
                    host
                },
                |mut host| {
                    black_box(host.poll(Duration::from_millis(600)).len());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_recognizers, bench_combinators, bench_host);
criterion_main!(benches);
