// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_control_tree::{
    ControlDesc, ControlFlags, ControlId, ControlTree, MouseButtons, Plain, ScreenId, UniRect,
};

const CELL: f64 = 40.0;

/// An `n` x `n` grid of overlapping windows, each holding a row of buttons.
fn gen_window_grid(n: usize) -> (ControlTree, ScreenId, Vec<ControlId>) {
    let mut tree = ControlTree::new();
    let side = n as f64 * CELL + CELL;
    let screen = tree.create_screen(Size::new(side, side));
    let root = tree.screen_root(screen).unwrap();
    let mut windows = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let w = tree
                .create_child(
                    root,
                    ControlDesc::new(UniRect::absolute(
                        x as f64 * CELL,
                        y as f64 * CELL,
                        CELL * 1.5,
                        CELL * 1.5,
                    ))
                    .with_flags(ControlFlags::AFFECTS_ORDERING),
                    Plain,
                )
                .unwrap();
            for i in 0..4 {
                tree.create_child(
                    w,
                    ControlDesc::new(UniRect::absolute(i as f64 * 12.0, 4.0, 10.0, 10.0)),
                    Plain,
                )
                .unwrap();
            }
            windows.push(w);
        }
    }
    (tree, screen, windows)
}

/// A chain of `depth` nested controls, each inset by one unit from its parent.
fn gen_deep_chain(depth: usize) -> (ControlTree, ScreenId) {
    let mut tree = ControlTree::new();
    let side = depth as f64 * 2.0 + 10.0;
    let screen = tree.create_screen(Size::new(side, side));
    let mut parent = tree.screen_root(screen).unwrap();
    for i in 0..depth {
        let extent = side - 2.0 * (i as f64 + 1.0);
        parent = tree
            .create_child(
                parent,
                ControlDesc::new(UniRect::absolute(1.0, 1.0, extent, extent)),
                Plain,
            )
            .unwrap();
    }
    (tree, screen)
}

fn gen_sweep(n: usize, steps: usize) -> Vec<Point> {
    let side = n as f64 * CELL;
    (0..steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Point::new(t * side, (1.0 - t) * side)
        })
        .collect()
}

fn bench_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer");
    for &n in &[4_usize, 16, 32] {
        let sweep = gen_sweep(n, 256);
        group.throughput(Throughput::Elements(sweep.len() as u64));
        group.bench_function(format!("move_sweep_n{}", n), |b| {
            b.iter_batched(
                || gen_window_grid(n),
                |(mut tree, screen, _)| {
                    for &p in &sweep {
                        tree.inject_mouse_move(screen, black_box(p)).unwrap();
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture");
    for &n in &[4_usize, 16, 32] {
        let sweep = gen_sweep(n, 64);
        group.throughput(Throughput::Elements(sweep.len() as u64));
        group.bench_function(format!("click_sweep_n{}", n), |b| {
            b.iter_batched(
                || gen_window_grid(n),
                |(mut tree, screen, _)| {
                    for &p in &sweep {
                        tree.inject_mouse_move(screen, p).unwrap();
                        let claimed = tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap();
                        black_box(claimed);
                        tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep");
    for &depth in &[8_usize, 64, 256] {
        let center = Point::new(depth as f64 + 5.0, depth as f64 + 5.0);
        group.bench_function(format!("move_press_release_d{}", depth), |b| {
            b.iter_batched(
                || gen_deep_chain(depth),
                |(mut tree, screen)| {
                    tree.inject_mouse_move(screen, black_box(center)).unwrap();
                    tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap();
                    tree.inject_mouse_move(screen, Point::ORIGIN).unwrap();
                    tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
                    tree
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_structure(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure");
    let n = 32;
    let (tree, screen, windows) = gen_window_grid(n);
    let probes = gen_sweep(n, 256);
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("hit_test_screen_n32", |b| {
        b.iter(|| {
            for &p in &probes {
                black_box(tree.hit_test_screen(screen, black_box(p)));
            }
        });
    });
    group.bench_function("bring_to_front_n32", |b| {
        b.iter_batched(
            || gen_window_grid(n),
            |(mut tree, _, windows)| {
                for &w in windows.iter().step_by(7) {
                    tree.bring_to_front(w).unwrap();
                }
                tree
            },
            BatchSize::LargeInput,
        );
    });
    black_box(windows);
    group.finish();
}

criterion_group!(
    benches,
    bench_pointer,
    bench_capture,
    bench_deep,
    bench_structure
);
criterion_main!(benches);
