// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-control dispatch state: capture links, held counts, and hover.
//!
//! Every control keeps its own copy of this state, describing only its own subtree.
//! A capture link points at the control itself or at one of its direct children, so the
//! full capture path of an input class is found by following links down from the root.

use kurbo::{Point, Size};

use crate::input::MouseButtons;
use crate::types::ControlId;

/// Last pointer position a control was given, in its container's space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Pointer {
    pub(crate) container: Size,
    pub(crate) position: Point,
}

/// Capture link and held count for a counted input class (keys, gamepad buttons).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Activation {
    pub(crate) target: Option<ControlId>,
    pub(crate) held: u32,
}

/// Input classes captured with a held count rather than a mask.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Counted {
    Keyboard,
    Gamepad,
}

/// Capture links, cut along the whole chain when a control is detached from under them.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    Mouse,
    Keyboard,
    Gamepad,
}

impl Link {
    pub(crate) const ALL: [Self; 3] = [Self::Mouse, Self::Keyboard, Self::Gamepad];
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DispatchState {
    pub(crate) mouse: Option<ControlId>,
    pub(crate) held_mouse: MouseButtons,
    pub(crate) keyboard: Activation,
    pub(crate) gamepad: Activation,
    pub(crate) hovered: Option<ControlId>,
    pub(crate) pointer: Option<Pointer>,
}

impl DispatchState {
    pub(crate) fn counted(&self, class: Counted) -> &Activation {
        match class {
            Counted::Keyboard => &self.keyboard,
            Counted::Gamepad => &self.gamepad,
        }
    }

    pub(crate) fn counted_mut(&mut self, class: Counted) -> &mut Activation {
        match class {
            Counted::Keyboard => &mut self.keyboard,
            Counted::Gamepad => &mut self.gamepad,
        }
    }

    /// Clear `link` if it points at `child`, returning whether it did.
    ///
    /// Clearing a capture link also drops its held count; the releases that would have
    /// balanced it become rogue and are ignored.
    pub(crate) fn cut(&mut self, link: Link, child: ControlId) -> bool {
        match link {
            Link::Mouse if self.mouse == Some(child) => {
                self.mouse = None;
                self.held_mouse = MouseButtons::empty();
                true
            }
            Link::Keyboard if self.keyboard.target == Some(child) => {
                self.keyboard = Activation::default();
                true
            }
            Link::Gamepad if self.gamepad.target == Some(child) => {
                self.gamepad = Activation::default();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_only_matching_link() {
        let a = ControlId::new(1, 1);
        let b = ControlId::new(2, 1);
        let mut s = DispatchState {
            mouse: Some(a),
            held_mouse: MouseButtons::LEFT,
            keyboard: Activation {
                target: Some(b),
                held: 2,
            },
            hovered: Some(a),
            ..Default::default()
        };
        assert!(!s.cut(Link::Mouse, b));
        assert_eq!(s.mouse, Some(a));
        assert!(s.cut(Link::Mouse, a));
        assert_eq!(s.mouse, None);
        assert!(s.held_mouse.is_empty());
        assert!(s.cut(Link::Keyboard, b));
        assert_eq!(s.counted(Counted::Keyboard), &Activation::default());
        assert!(!s.cut(Link::Gamepad, b));
        assert_eq!(s.hovered, Some(a), "hover is not a capture link");
    }
}
