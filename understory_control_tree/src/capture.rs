// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capture: routing presses to a claimant and keeping that claimant for the whole gesture.
//!
//! ## Claiming
//!
//! With no capture at a control, a press looks for a claimant:
//!
//! - Mouse presses use the last pointer position the control was given. Children containing
//!   it are offered the press front to back; the control's own hook is asked last, and only
//!   if the position is inside the control.
//! - Key and gamepad presses ask the control's own hook first, then every child front to
//!   back.
//!
//! Among children flagged [`AFFECTS_ORDERING`](crate::ControlFlags::AFFECTS_ORDERING), only
//! the frontmost candidate is offered a given press, so input does not leak to a window
//! behind another one. Ordinary children are still offered the press.
//!
//! Each control on the path from the entry control to the claimant records a link to the next
//! control on that path. A window that takes a mouse press through one of its descendants is
//! brought to the front.
//!
//! ## Holding
//!
//! While a link is set, presses of that class follow the links to the claimant regardless of
//! the pointer position. Mouse captures track the set of held buttons; key and gamepad
//! captures track a count. The links are cleared when the last held input is released.
//!
//! A release with nothing held at the entry control is a rogue notification, for example a
//! button pressed over the window border and released over the UI. It is ignored.

use alloc::vec::Vec;

use kurbo::{Point, Size};

use crate::bounds::BoundsResolver;
use crate::error::ControlError;
use crate::input::{GamepadButtons, InputTarget, Key, MouseButtons, is_single_known};
use crate::state::{Activation, Counted, DispatchState};
use crate::tree::ControlTree;
use crate::types::{ControlFlags, ControlId};

/// A key or gamepad button, dispatched through a counted capture.
#[derive(Copy, Clone, Debug)]
enum Stroke {
    Key(Key),
    Button(GamepadButtons),
}

impl Stroke {
    fn class(self) -> Counted {
        match self {
            Self::Key(_) => Counted::Keyboard,
            Self::Button(_) => Counted::Gamepad,
        }
    }

    fn press(self, target: &mut dyn InputTarget) -> bool {
        match self {
            Self::Key(key) => target.on_key_pressed(key),
            Self::Button(button) => target.on_button_pressed(button),
        }
    }

    fn release(self, target: &mut dyn InputTarget) {
        match self {
            Self::Key(key) => target.on_key_released(key),
            Self::Button(button) => target.on_button_released(button),
        }
    }
}

fn check_mouse(button: MouseButtons) -> Result<(), ControlError> {
    let known = u32::from(MouseButtons::all().bits());
    if is_single_known(u32::from(button.bits()), known) {
        Ok(())
    } else {
        Err(ControlError::InvalidArgument(
            "expected exactly one known mouse button",
        ))
    }
}

fn check_gamepad(button: GamepadButtons) -> Result<(), ControlError> {
    if is_single_known(button.bits(), GamepadButtons::all().bits()) {
        Ok(())
    } else {
        Err(ControlError::InvalidArgument(
            "expected exactly one known gamepad button",
        ))
    }
}

impl<R: BoundsResolver> ControlTree<R> {
    /// Route a mouse button press into the subtree rooted at `id`.
    ///
    /// Returns whether a control claimed the press. An unclaimed press changes no state.
    pub fn process_mouse_press(
        &mut self,
        id: ControlId,
        button: MouseButtons,
    ) -> Result<bool, ControlError> {
        self.live(id)?;
        check_mouse(button)?;
        if self.node(id).state.mouse.is_some() {
            return self.press_captured_mouse(id, button);
        }
        let Some(pointer) = self.node(id).state.pointer else {
            tracing::trace!(?id, ?button, "mouse press with no pointer over the control");
            return Ok(false);
        };
        let claimed = self.claim_mouse(id, button, pointer.container, pointer.position);
        if !claimed {
            tracing::debug!(?id, ?button, "mouse press unclaimed");
        }
        Ok(claimed)
    }

    /// Route a mouse button release along the mouse capture chain of `id`.
    pub fn process_mouse_release(
        &mut self,
        id: ControlId,
        button: MouseButtons,
    ) -> Result<(), ControlError> {
        self.live(id)?;
        check_mouse(button)?;
        if !self.node(id).state.held_mouse.contains(button) {
            tracing::debug!(?id, ?button, "rogue mouse release ignored");
            return Ok(());
        }
        let Some(chain) =
            self.capture_chain(id, |s| s.mouse.filter(|_| s.held_mouse.contains(button)))
        else {
            return self.violation("mouse release does not follow a capture chain");
        };
        for &n in &chain {
            let state = &mut self.node_mut(n).state;
            state.held_mouse.remove(button);
            if state.held_mouse.is_empty() {
                state.mouse = None;
            }
        }
        if let Some(&target) = chain.last() {
            tracing::trace!(?target, ?button, "mouse release");
            if self.node(id).state.mouse.is_none() {
                tracing::debug!(?id, ?target, "mouse capture released");
            }
            self.node_mut(target).target.on_mouse_released(button);
        }
        Ok(())
    }

    /// Route a key press or auto-repeat into the subtree rooted at `id`.
    ///
    /// Returns whether a control claimed the key. A repeat delivered through an existing
    /// capture does not add to the held count.
    pub fn process_key_press(
        &mut self,
        id: ControlId,
        key: Key,
        repeat: bool,
    ) -> Result<bool, ControlError> {
        self.live(id)?;
        self.press_counted(id, Stroke::Key(key), repeat)
    }

    /// Route a key release along the keyboard capture chain of `id`.
    pub fn process_key_release(&mut self, id: ControlId, key: Key) -> Result<(), ControlError> {
        self.live(id)?;
        self.release_counted(id, Stroke::Key(key))
    }

    /// Route a gamepad button press into the subtree rooted at `id`.
    ///
    /// Returns whether a control claimed the button.
    pub fn process_button_press(
        &mut self,
        id: ControlId,
        button: GamepadButtons,
    ) -> Result<bool, ControlError> {
        self.live(id)?;
        check_gamepad(button)?;
        self.press_counted(id, Stroke::Button(button), false)
    }

    /// Route a gamepad button release along the gamepad capture chain of `id`.
    pub fn process_button_release(
        &mut self,
        id: ControlId,
        button: GamepadButtons,
    ) -> Result<(), ControlError> {
        self.live(id)?;
        check_gamepad(button)?;
        self.release_counted(id, Stroke::Button(button))
    }

    /// Controls from `id` to the claimant, following `next`.
    ///
    /// Returns `None` if a link is missing before a control links to itself.
    fn capture_chain(
        &self,
        id: ControlId,
        next: impl Fn(&DispatchState) -> Option<ControlId>,
    ) -> Option<Vec<ControlId>> {
        let mut chain = Vec::new();
        let mut current = id;
        loop {
            chain.push(current);
            match next(&self.node(current).state)? {
                n if n == current => return Some(chain),
                n => current = n,
            }
        }
    }

    fn press_captured_mouse(
        &mut self,
        id: ControlId,
        button: MouseButtons,
    ) -> Result<bool, ControlError> {
        let Some(chain) = self.capture_chain(id, |s| s.mouse) else {
            self.violation("mouse capture chain ends without a target")?;
            // A capture is still set here, so the press is not unclaimed.
            return Ok(true);
        };
        for &n in &chain {
            self.node_mut(n).state.held_mouse.insert(button);
        }
        if let Some(&target) = chain.last() {
            tracing::trace!(?target, ?button, "mouse press through capture");
            // Already captured; the hook cannot decline.
            let _ = self.node_mut(target).target.on_mouse_pressed(button);
        }
        Ok(true)
    }

    fn claim_mouse(
        &mut self,
        id: ControlId,
        button: MouseButtons,
        container: Size,
        point: Point,
    ) -> bool {
        let own = self.resolve_in(id, container);
        let local = point - own.origin().to_vec2();
        let children = self.node(id).children.clone();
        let mut ordering_offered = false;
        for child in children.into_iter().rev() {
            if !self.resolve_in(child, own.size()).contains(local) {
                continue;
            }
            let ordering = self.node(child).flags.contains(ControlFlags::AFFECTS_ORDERING);
            if ordering {
                if ordering_offered {
                    tracing::trace!(?child, "press withheld from window behind another");
                    continue;
                }
                ordering_offered = true;
            }
            if self.claim_mouse(child, button, own.size(), local) {
                let state = &mut self.node_mut(id).state;
                state.mouse = Some(child);
                state.held_mouse = button;
                if ordering {
                    self.raise(child);
                }
                return true;
            }
        }

        if !own.contains(point) || !self.node_mut(id).target.on_mouse_pressed(button) {
            return false;
        }
        let state = &mut self.node_mut(id).state;
        state.mouse = Some(id);
        state.held_mouse = button;
        tracing::debug!(?id, ?button, "mouse captured");
        if self.node(id).flags.contains(ControlFlags::FOCUSABLE)
            && let Some(screen) = self.node(id).screen
        {
            self.screens[screen.idx()].focused = Some(id);
            tracing::debug!(?screen, ?id, "focus moved to claimant");
        }
        true
    }

    fn press_counted(
        &mut self,
        id: ControlId,
        stroke: Stroke,
        repeat: bool,
    ) -> Result<bool, ControlError> {
        let class = stroke.class();
        if self.node(id).state.counted(class).target.is_none() {
            let claimed = self.claim_counted(id, stroke);
            if !claimed {
                tracing::trace!(?id, ?stroke, "press unclaimed");
            }
            return Ok(claimed);
        }

        let Some(chain) = self.capture_chain(id, |s| s.counted(class).target) else {
            self.violation("capture chain ends without a target")?;
            return Ok(true);
        };
        if !repeat {
            for &n in &chain {
                let held = &mut self.node_mut(n).state.counted_mut(class).held;
                *held = held.saturating_add(1);
            }
        }
        if let Some(&target) = chain.last() {
            tracing::trace!(?target, ?stroke, repeat, "press through capture");
            let _ = stroke.press(&mut *self.node_mut(target).target);
        }
        Ok(true)
    }

    fn claim_counted(&mut self, id: ControlId, stroke: Stroke) -> bool {
        let class = stroke.class();
        if stroke.press(&mut *self.node_mut(id).target) {
            *self.node_mut(id).state.counted_mut(class) = Activation {
                target: Some(id),
                held: 1,
            };
            tracing::debug!(?id, ?stroke, "captured");
            return true;
        }

        let children = self.node(id).children.clone();
        let mut ordering_offered = false;
        for child in children.into_iter().rev() {
            if self.node(child).flags.contains(ControlFlags::AFFECTS_ORDERING) {
                if ordering_offered {
                    continue;
                }
                ordering_offered = true;
            }
            if self.claim_counted(child, stroke) {
                *self.node_mut(id).state.counted_mut(class) = Activation {
                    target: Some(child),
                    held: 1,
                };
                return true;
            }
        }
        false
    }

    fn release_counted(&mut self, id: ControlId, stroke: Stroke) -> Result<(), ControlError> {
        let class = stroke.class();
        if self.node(id).state.counted(class).held == 0 {
            tracing::debug!(?id, ?stroke, "rogue release ignored");
            return Ok(());
        }
        let Some(chain) = self.capture_chain(id, |s| {
            let a = s.counted(class);
            a.target.filter(|_| a.held > 0)
        }) else {
            return self.violation("release does not follow a capture chain");
        };
        for &n in &chain {
            let a = self.node_mut(n).state.counted_mut(class);
            a.held -= 1;
            if a.held == 0 {
                a.target = None;
            }
        }
        if let Some(&target) = chain.last() {
            tracing::trace!(?target, ?stroke, "release");
            if self.node(id).state.counted(class).target.is_none() {
                tracing::debug!(?id, ?target, ?class, "capture released");
            }
            stroke.release(&mut *self.node_mut(target).target);
        }
        Ok(())
    }
}
