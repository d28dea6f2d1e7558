// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging overlapping windows by their title bars.
//!
//! Each title bar records pointer deltas while it holds the mouse; the host applies them to
//! the window bounds after each dispatch call, since hooks cannot mutate the tree.
//!
//! Run:
//! - `cargo run -p understory_demos --example window_drag`
//! - `RUST_LOG=understory_control_tree=trace cargo run -p understory_demos --example window_drag`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_control_tree::{
    ControlDesc, ControlFlags, ControlId, ControlTree, InputTarget, MouseButtons, UniRect,
};

/// Drag deltas reported by title bars, applied by the host.
type Moves = Rc<RefCell<Vec<(ControlId, Vec2)>>>;

struct TitleBar {
    window: ControlId,
    last: Point,
    grab: Option<Point>,
    moves: Moves,
}

impl InputTarget for TitleBar {
    fn on_mouse_pressed(&mut self, button: MouseButtons) -> bool {
        if button != MouseButtons::LEFT {
            return false;
        }
        self.grab = Some(self.last);
        true
    }

    fn on_mouse_released(&mut self, _button: MouseButtons) {
        self.grab = None;
    }

    // The window follows the pointer, so the grab point stays fixed in local space.
    fn on_mouse_moved(&mut self, position: Point) {
        if let Some(grab) = self.grab {
            self.moves.borrow_mut().push((self.window, position - grab));
        }
        self.last = position;
    }

    fn on_mouse_left(&mut self) {
        println!("  title bar of {:?}: pointer left", self.window);
    }
}

struct Window(&'static str);

impl InputTarget for Window {
    fn on_mouse_entered(&mut self) {
        println!("  {}: entered", self.0);
    }

    fn on_mouse_left(&mut self) {
        println!("  {}: left", self.0);
    }
}

fn spawn_window(
    tree: &mut ControlTree,
    parent: ControlId,
    name: &'static str,
    at: Point,
    moves: &Moves,
) -> ControlId {
    let window = tree
        .create_child(
            parent,
            ControlDesc::new(UniRect::absolute(at.x, at.y, 200.0, 150.0))
                .named(name)
                .with_flags(ControlFlags::AFFECTS_ORDERING),
            Window(name),
        )
        .unwrap();
    tree.create_child(
        window,
        ControlDesc::new(UniRect::absolute(0.0, 0.0, 200.0, 20.0)).named("title"),
        TitleBar {
            window,
            last: Point::ORIGIN,
            grab: None,
            moves: moves.clone(),
        },
    )
    .unwrap();
    window
}

fn apply_moves(tree: &mut ControlTree, moves: &Moves) {
    for (window, delta) in moves.borrow_mut().drain(..) {
        let Some(bounds) = tree.bounds(window).copied() else {
            continue;
        };
        let mut next = bounds;
        next.location.x.offset += delta.x;
        next.location.y.offset += delta.y;
        tree.set_bounds(window, next).unwrap();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("understory_control_tree=debug")),
        )
        .init();

    let moves = Moves::default();
    let mut tree: ControlTree = ControlTree::new();
    let screen = tree.create_screen(Size::new(800.0, 600.0));
    let desktop = tree.screen_root(screen).unwrap();

    let back = spawn_window(&mut tree, desktop, "back", Point::new(50.0, 50.0), &moves);
    let front = spawn_window(&mut tree, desktop, "front", Point::new(150.0, 100.0), &moves);
    println!("== Initial order ==\n  {:?}", tree.children(desktop));

    // Grab the back window's title bar where the front window does not cover it.
    println!("== Press on back title bar ==");
    tree.inject_mouse_move(screen, Point::new(60.0, 60.0)).unwrap();
    let claimed = tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap();
    assert!(claimed);
    assert_eq!(tree.children(desktop), &[front, back], "back window raised");

    println!("== Drag ==");
    for step in 1..=5 {
        let p = Point::new(60.0 + 40.0 * f64::from(step), 60.0 + 20.0 * f64::from(step));
        tree.inject_mouse_move(screen, p).unwrap();
        apply_moves(&mut tree, &moves);
    }
    tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();

    let moved = tree.absolute_bounds(back).unwrap();
    println!("== Back window now at {:?} ==", moved.origin());
    assert_eq!(moved.origin(), Point::new(250.0, 150.0));
    assert_eq!(tree.hit_test_screen(screen, Point::new(300.0, 200.0)), Some(back));

    // Drag past the screen edge: the gesture keeps going.
    println!("== Drag past the edge ==");
    tree.inject_mouse_move(screen, Point::new(260.0, 160.0)).unwrap();
    tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap();
    tree.inject_mouse_move(screen, Point::new(900.0, 160.0)).unwrap();
    apply_moves(&mut tree, &moves);
    tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
    println!(
        "  back window at {:?}",
        tree.absolute_bounds(back).unwrap().origin()
    );
}
