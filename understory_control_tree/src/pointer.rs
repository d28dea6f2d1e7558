// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer routing: hover tracking, move delivery, and the wheel.
//!
//! ## Hover
//!
//! Each control records which of its children the pointer rests over (or itself). A move
//! recomputes that record with the same front-to-back rule as
//! [`ControlTree::hit_test`], then recurses into the hovered child. Changing the record
//! makes the old child leave (recursively, innermost first) before the new one enters.
//!
//! Hover is independent of capture: a control that holds the mouse keeps receiving moves
//! through its capture chain after the pointer has left it, while hover moves on. The move
//! reaches the capture holder before any leave or enter notification of the same pass.

use kurbo::{Point, Size};

use crate::bounds::BoundsResolver;
use crate::error::ControlError;
use crate::state::Pointer;
use crate::tree::ControlTree;
use crate::types::ControlId;

impl<R: BoundsResolver> ControlTree<R> {
    /// Route a pointer position through the subtree rooted at `id`.
    ///
    /// `point` is in the coordinate space of `id`'s container, which has size `container`.
    /// Hooks receive positions in their own local space.
    pub fn process_mouse_move(
        &mut self,
        id: ControlId,
        container: Size,
        point: Point,
    ) -> Result<(), ControlError> {
        self.live(id)?;
        if !point.is_finite() {
            return Err(ControlError::InvalidArgument("pointer position must be finite"));
        }
        tracing::trace!(?id, ?point, "mouse move");
        self.move_at(id, container, point)
    }

    /// Report that the pointer left the subtree rooted at `id`.
    ///
    /// Every control on the hover path receives a leave notification, innermost first.
    /// Calling this again without an intervening move does nothing.
    pub fn process_mouse_leave(&mut self, id: ControlId) -> Result<(), ControlError> {
        self.live(id)?;
        tracing::trace!(?id, "mouse leave");
        self.leave(id);
        Ok(())
    }

    /// Route a wheel rotation: to the mouse capture target, else the hover target, else the
    /// control itself.
    pub fn process_mouse_wheel(&mut self, id: ControlId, ticks: f64) -> Result<(), ControlError> {
        self.live(id)?;
        if !ticks.is_finite() {
            return Err(ControlError::InvalidArgument("wheel ticks must be finite"));
        }
        let mut current = id;
        loop {
            let state = &self.node(current).state;
            match state.mouse.or(state.hovered) {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        tracing::trace!(target = ?current, ticks, "mouse wheel");
        self.node_mut(current).target.on_mouse_wheel(ticks);
        Ok(())
    }

    fn move_at(&mut self, id: ControlId, container: Size, point: Point) -> Result<(), ControlError> {
        let own = self.resolve_in(id, container);
        let local = point - own.origin().to_vec2();
        let hovered_child = self.child_at(id, own.size(), local);
        let hovered = hovered_child.or_else(|| own.contains(point).then_some(id));

        // The capture holder sees the move before any hover change. A captured child that
        // is also hovered gets it from the recursion below instead.
        let captured = self.node(id).state.mouse;
        match captured {
            Some(c) if c == id => self.node_mut(id).target.on_mouse_moved(local),
            Some(c) if hovered_child != Some(c) => self.drag_at(c, own.size(), local)?,
            _ => {}
        }

        match hovered {
            Some(h) => {
                self.switch_hover(id, h);
                self.node_mut(id).state.pointer = Some(Pointer {
                    container,
                    position: point,
                });
            }
            None => self.leave(id),
        }

        match hovered_child {
            Some(child) => self.move_at(child, own.size(), local)?,
            None if hovered == Some(id) && captured != Some(id) => {
                self.node_mut(id).target.on_mouse_moved(local);
            }
            None => {}
        }
        Ok(())
    }

    /// Deliver a move along the mouse capture chain starting at `id`, ignoring geometry.
    fn drag_at(
        &mut self,
        mut id: ControlId,
        mut container: Size,
        mut point: Point,
    ) -> Result<(), ControlError> {
        loop {
            let own = self.resolve_in(id, container);
            let local = point - own.origin().to_vec2();
            match self.node(id).state.mouse {
                Some(c) if c == id => {
                    self.node_mut(id).target.on_mouse_moved(local);
                    return Ok(());
                }
                Some(c) => {
                    id = c;
                    container = own.size();
                    point = local;
                }
                None => return self.violation("mouse capture chain ends without a target"),
            }
        }
    }

    fn switch_hover(&mut self, id: ControlId, new: ControlId) {
        let old = self.node(id).state.hovered;
        if old == Some(new) {
            return;
        }
        if let Some(o) = old
            && o != id
        {
            self.leave(o);
        }
        self.node_mut(id).state.hovered = Some(new);
        if old.is_none() {
            self.node_mut(id).target.on_mouse_entered();
        }
    }

    fn leave(&mut self, id: ControlId) {
        let state = &mut self.node_mut(id).state;
        let hovered = state.hovered.take();
        state.pointer = None;
        if let Some(h) = hovered {
            if h != id {
                self.leave(h);
            }
            self.node_mut(id).target.on_mouse_left();
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Point;

    use crate::error::ControlError;
    use crate::input::MouseButtons;
    use crate::recorder::{Call, Recorder, fixture, rect, take};

    #[test]
    fn hover_moves_between_siblings() {
        let (mut tree, screen, root, log) = fixture();
        let a = tree
            .create_child(root, rect(0.0, 0.0, 100.0, 100.0), Recorder::new("a", &log))
            .unwrap();
        let b = tree
            .create_child(root, rect(200.0, 0.0, 100.0, 100.0), Recorder::new("b", &log))
            .unwrap();

        tree.inject_mouse_move(screen, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![("a", Call::Entered), ("a", Call::Moved(Point::new(50.0, 50.0)))]
        );
        assert_eq!(tree.hovered(root), Some(a));
        assert_eq!(tree.hovered(a), Some(a));

        tree.inject_mouse_move(screen, Point::new(250.0, 50.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("a", Call::Left),
                ("b", Call::Entered),
                ("b", Call::Moved(Point::new(50.0, 50.0))),
            ]
        );
        assert_eq!(tree.hovered(root), Some(b));
        assert_eq!(tree.hovered(a), None);

        // Bare desktop.
        tree.inject_mouse_move(screen, Point::new(150.0, 50.0)).unwrap();
        assert_eq!(take(&log), vec![("b", Call::Left)]);
        assert_eq!(tree.hovered(root), Some(root));
    }

    #[test]
    fn leave_cascades_innermost_first_and_is_idempotent() {
        let (mut tree, screen, root, log) = fixture();
        let panel = tree
            .create_child(root, rect(0.0, 0.0, 200.0, 200.0), Recorder::new("panel", &log))
            .unwrap();
        let inner = tree
            .create_child(panel, rect(10.0, 10.0, 50.0, 50.0), Recorder::new("inner", &log))
            .unwrap();

        tree.inject_mouse_move(screen, Point::new(20.0, 20.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("panel", Call::Entered),
                ("inner", Call::Entered),
                ("inner", Call::Moved(Point::new(10.0, 10.0))),
            ]
        );
        assert_eq!(tree.hovered(panel), Some(inner));

        tree.inject_mouse_leave(screen).unwrap();
        assert_eq!(take(&log), vec![("inner", Call::Left), ("panel", Call::Left)]);
        assert_eq!(tree.hovered(root), None);
        assert_eq!(tree.hovered(panel), None);

        tree.inject_mouse_leave(screen).unwrap();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn moving_within_a_child_only_moves() {
        let (mut tree, screen, root, log) = fixture();
        tree.create_child(root, rect(100.0, 100.0, 100.0, 100.0), Recorder::new("a", &log))
            .unwrap();

        tree.inject_mouse_move(screen, Point::new(110.0, 110.0)).unwrap();
        let _ = take(&log);
        tree.inject_mouse_move(screen, Point::new(120.0, 130.0)).unwrap();
        assert_eq!(take(&log), vec![("a", Call::Moved(Point::new(20.0, 30.0)))]);
    }

    #[test]
    fn wheel_follows_capture_then_hover() {
        let (mut tree, screen, root, log) = fixture();
        let a = tree
            .create_child(root, rect(0.0, 0.0, 100.0, 100.0), Recorder::new("a", &log))
            .unwrap();
        tree.create_child(root, rect(200.0, 0.0, 100.0, 100.0), Recorder::new("b", &log))
            .unwrap();

        tree.inject_mouse_move(screen, Point::new(50.0, 50.0)).unwrap();
        tree.inject_mouse_wheel(screen, 1.0).unwrap();
        assert_eq!(take(&log).last(), Some(&("a", Call::Wheel(1.0))));

        // Drag from a onto b: a keeps the wheel while it holds the mouse.
        assert!(tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap());
        tree.inject_mouse_move(screen, Point::new(250.0, 50.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("a", Call::Pressed(MouseButtons::LEFT)),
                ("a", Call::Moved(Point::new(250.0, 50.0))),
                ("a", Call::Left),
                ("b", Call::Entered),
                ("b", Call::Moved(Point::new(50.0, 50.0))),
            ]
        );
        assert_eq!(tree.captured_mouse(root), Some(a));
        tree.inject_mouse_wheel(screen, -2.0).unwrap();
        assert_eq!(take(&log), vec![("a", Call::Wheel(-2.0))]);

        tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
        tree.inject_mouse_wheel(screen, 3.0).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("a", Call::Released(MouseButtons::LEFT)),
                ("b", Call::Wheel(3.0)),
            ]
        );

        assert_eq!(
            tree.inject_mouse_wheel(screen, f64::NAN),
            Err(ControlError::InvalidArgument("wheel ticks must be finite"))
        );
    }

    #[test]
    fn hover_follows_bounds_changes_on_next_move() {
        let (mut tree, screen, root, log) = fixture();
        let a = tree
            .create_child(root, rect(0.0, 0.0, 100.0, 100.0), Recorder::new("a", &log))
            .unwrap();
        tree.inject_mouse_move(screen, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(tree.hovered(root), Some(a));

        tree.set_bounds(a, crate::bounds::UniRect::absolute(200.0, 0.0, 100.0, 100.0)).unwrap();
        tree.inject_mouse_move(screen, Point::new(50.0, 50.0)).unwrap();
        assert_eq!(tree.hovered(root), Some(root));
        assert_eq!(take(&log).last(), Some(&("a", Call::Left)));
    }

    #[test]
    fn capture_holder_moves_before_hover_changes() {
        let (mut tree, screen, root, log) = fixture();
        let panel = tree
            .create_child(root, rect(0.0, 0.0, 200.0, 100.0), Recorder::new("panel", &log))
            .unwrap();
        tree.create_child(panel, rect(0.0, 0.0, 50.0, 50.0), Recorder::new("a", &log))
            .unwrap();
        tree.create_child(panel, rect(100.0, 0.0, 50.0, 50.0), Recorder::new("b", &log))
            .unwrap();

        tree.inject_mouse_move(screen, Point::new(10.0, 10.0)).unwrap();
        assert!(tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap());
        let _ = take(&log);

        // The holder is neither hovered nor under the pointer after this move.
        tree.inject_mouse_move(screen, Point::new(110.0, 10.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("a", Call::Moved(Point::new(110.0, 10.0))),
                ("a", Call::Left),
                ("b", Call::Entered),
                ("b", Call::Moved(Point::new(10.0, 10.0))),
            ]
        );

        // Back over the holder: still one move, still ahead of its own enter.
        tree.inject_mouse_move(screen, Point::new(20.0, 20.0)).unwrap();
        assert_eq!(
            take(&log),
            vec![
                ("b", Call::Left),
                ("a", Call::Moved(Point::new(20.0, 20.0))),
                ("a", Call::Entered),
            ]
        );
        tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
    }
}
