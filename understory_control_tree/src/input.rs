// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input enumerants and the per-control hook contract.
//!
//! ## Hooks
//!
//! Every control carries a boxed [`InputTarget`]. The dispatcher calls into it and never
//! looks at the concrete type. All hooks have defaults, so a control only overrides what it
//! reacts to.
//!
//! The three `*_pressed` hooks report whether the control claims the press. A claimed press
//! captures that input class: the control receives every following press and the matching
//! releases of that class until all of them have been released, wherever the pointer is.
//!
//! ```
//! use understory_control_tree::{InputTarget, Key, MouseButtons};
//!
//! /// Accepts Enter while it holds the mouse.
//! #[derive(Default)]
//! struct Button {
//!     pressed: bool,
//! }
//!
//! impl InputTarget for Button {
//!     fn on_mouse_pressed(&mut self, button: MouseButtons) -> bool {
//!         self.pressed |= button == MouseButtons::LEFT;
//!         true
//!     }
//!     fn on_mouse_released(&mut self, _button: MouseButtons) {
//!         self.pressed = false;
//!     }
//!     fn on_key_pressed(&mut self, key: Key) -> bool {
//!         self.pressed && key == Key(13)
//!     }
//! }
//! ```

use kurbo::Point;

bitflags::bitflags! {
    /// Mouse buttons. A set of these is the held-button mask of a control.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT   = 0b0000_0001;
        /// Secondary button.
        const RIGHT  = 0b0000_0010;
        /// Wheel button.
        const MIDDLE = 0b0000_0100;
        /// First extended button.
        const X1     = 0b0000_1000;
        /// Second extended button.
        const X2     = 0b0001_0000;
    }
}

bitflags::bitflags! {
    /// Gamepad buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GamepadButtons: u32 {
        /// Bottom face button.
        const A              = 1 << 0;
        /// Right face button.
        const B              = 1 << 1;
        /// Left face button.
        const X              = 1 << 2;
        /// Top face button.
        const Y              = 1 << 3;
        /// Left shoulder.
        const LEFT_SHOULDER  = 1 << 4;
        /// Right shoulder.
        const RIGHT_SHOULDER = 1 << 5;
        /// Left trigger, as a digital button.
        const LEFT_TRIGGER   = 1 << 6;
        /// Right trigger, as a digital button.
        const RIGHT_TRIGGER  = 1 << 7;
        /// Left stick click.
        const LEFT_STICK     = 1 << 8;
        /// Right stick click.
        const RIGHT_STICK    = 1 << 9;
        /// Start.
        const START          = 1 << 10;
        /// Back / select.
        const BACK           = 1 << 11;
        /// D-pad up.
        const DPAD_UP        = 1 << 12;
        /// D-pad down.
        const DPAD_DOWN      = 1 << 13;
        /// D-pad left.
        const DPAD_LEFT      = 1 << 14;
        /// D-pad right.
        const DPAD_RIGHT     = 1 << 15;
    }
}

/// Platform key code.
///
/// The tree does not interpret key codes; they are passed through to the hooks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Key(pub u32);

/// Returns true if `bits` is exactly one of the flags in `known`.
pub(crate) fn is_single_known(bits: u32, known: u32) -> bool {
    bits.count_ones() == 1 && bits & !known == 0
}

/// Hooks a control implements to react to routed input.
///
/// The dispatcher owns routing and capture bookkeeping; hooks only report whether they
/// claim a press and observe everything else. Hooks must not mutate the control tree.
pub trait InputTarget {
    /// A mouse button was pressed over this control, or while it holds the mouse.
    ///
    /// Return `true` to claim the press. The default claims it: a control under the
    /// pointer swallows clicks unless it opts out. The return value is ignored for presses
    /// delivered through an existing capture.
    fn on_mouse_pressed(&mut self, button: MouseButtons) -> bool {
        let _ = button;
        true
    }

    /// A mouse button claimed by this control was released.
    fn on_mouse_released(&mut self, button: MouseButtons) {
        let _ = button;
    }

    /// The pointer moved, in this control's local coordinates.
    fn on_mouse_moved(&mut self, position: Point) {
        let _ = position;
    }

    /// The pointer entered this control.
    fn on_mouse_entered(&mut self) {}

    /// The pointer left this control.
    fn on_mouse_left(&mut self) {}

    /// The wheel was rotated by `ticks` notches; positive is away from the user.
    fn on_mouse_wheel(&mut self, ticks: f64) {
        let _ = ticks;
    }

    /// A key was pressed. Return `true` to claim it.
    fn on_key_pressed(&mut self, key: Key) -> bool {
        let _ = key;
        false
    }

    /// A key claimed by this control was released.
    fn on_key_released(&mut self, key: Key) {
        let _ = key;
    }

    /// A gamepad button was pressed. Return `true` to claim it.
    fn on_button_pressed(&mut self, button: GamepadButtons) -> bool {
        let _ = button;
        false
    }

    /// A gamepad button claimed by this control was released.
    fn on_button_released(&mut self, button: GamepadButtons) {
        let _ = button;
    }
}

/// A target that keeps every default hook.
#[derive(Copy, Clone, Debug, Default)]
pub struct Plain;

impl InputTarget for Plain {}

/// Target used for screen roots.
///
/// Declines mouse presses, so a click on bare desktop is reported as unclaimed and can be
/// handled by the host (for example, the game world behind the UI).
#[derive(Copy, Clone, Debug, Default)]
pub struct Desktop;

impl InputTarget for Desktop {
    fn on_mouse_pressed(&mut self, _button: MouseButtons) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_known_bit() {
        let known = u32::from(MouseButtons::all().bits());
        assert!(is_single_known(u32::from(MouseButtons::LEFT.bits()), known));
        assert!(is_single_known(u32::from(MouseButtons::X2.bits()), known));
        assert!(!is_single_known(0, known), "empty set is not a button");
        assert!(!is_single_known(
            u32::from((MouseButtons::LEFT | MouseButtons::RIGHT).bits()),
            known
        ));
        assert!(!is_single_known(0b1000_0000, known), "unknown bit");
    }

    #[test]
    fn defaults_claim_mouse_only() {
        let mut p = Plain;
        assert!(p.on_mouse_pressed(MouseButtons::LEFT));
        assert!(!p.on_key_pressed(Key(1)));
        assert!(!p.on_button_pressed(GamepadButtons::A));
        assert!(!Desktop.on_mouse_pressed(MouseButtons::LEFT));
    }
}
