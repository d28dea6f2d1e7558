// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screens: top-level containers that own a root control, a size, and keyboard focus.
//!
//! The `inject_*` methods are the entry points a host calls once per input sample. They feed
//! the screen's root with the screen size as container and apply the screen-level policies
//! from [`DispatchConfig`](crate::DispatchConfig).

use kurbo::{Point, Size};

use crate::bounds::BoundsResolver;
use crate::config::UnclaimedPress;
use crate::error::ControlError;
use crate::input::{GamepadButtons, Key, MouseButtons};
use crate::tree::ControlTree;
use crate::types::{ControlId, ScreenId};

#[derive(Clone, Debug)]
pub(crate) struct Screen {
    pub(crate) root: ControlId,
    pub(crate) size: Size,
    pub(crate) focused: Option<ControlId>,
}

impl Screen {
    pub(crate) fn new(root: ControlId, size: Size) -> Self {
        Self {
            root,
            size,
            focused: None,
        }
    }
}

impl<R: BoundsResolver> ControlTree<R> {
    fn screen(&self, screen: ScreenId) -> Result<&Screen, ControlError> {
        self.screens
            .get(screen.idx())
            .ok_or(ControlError::ScreenNotFound(screen))
    }

    fn screen_mut(&mut self, screen: ScreenId) -> Result<&mut Screen, ControlError> {
        self.screens
            .get_mut(screen.idx())
            .ok_or(ControlError::ScreenNotFound(screen))
    }

    /// Root control of a screen.
    pub fn screen_root(&self, screen: ScreenId) -> Option<ControlId> {
        self.screens.get(screen.idx()).map(|s| s.root)
    }

    /// Size of a screen.
    pub fn screen_size(&self, screen: ScreenId) -> Option<Size> {
        self.screens.get(screen.idx()).map(|s| s.size)
    }

    /// Resize a screen. Fractional bounds follow on the next query or pointer move.
    pub fn set_screen_size(&mut self, screen: ScreenId, size: Size) -> Result<(), ControlError> {
        self.screen_mut(screen)?.size = size;
        Ok(())
    }

    /// Control that currently has keyboard focus on a screen.
    pub fn focused(&self, screen: ScreenId) -> Option<ControlId> {
        self.screens.get(screen.idx())?.focused
    }

    /// Move keyboard focus to `control`, or clear it with `None`.
    ///
    /// The control must be attached to `screen`.
    pub fn set_focused(
        &mut self,
        screen: ScreenId,
        control: Option<ControlId>,
    ) -> Result<(), ControlError> {
        self.screen(screen)?;
        if let Some(id) = control
            && self.live(id)?.screen != Some(screen)
        {
            return Err(ControlError::Detached(id));
        }
        self.screens[screen.idx()].focused = control;
        tracing::debug!(?screen, ?control, "focus changed");
        Ok(())
    }

    /// Deepest control under `point` on a screen.
    pub fn hit_test_screen(&self, screen: ScreenId, point: Point) -> Option<ControlId> {
        let s = self.screens.get(screen.idx())?;
        self.hit_test(s.root, s.size, point)
    }

    /// Feed a pointer position, in screen coordinates.
    pub fn inject_mouse_move(&mut self, screen: ScreenId, point: Point) -> Result<(), ControlError> {
        let s = self.screen(screen)?;
        let (root, size) = (s.root, s.size);
        self.process_mouse_move(root, size, point)
    }

    /// Report that the pointer left the screen.
    pub fn inject_mouse_leave(&mut self, screen: ScreenId) -> Result<(), ControlError> {
        let root = self.screen(screen)?.root;
        self.process_mouse_leave(root)
    }

    /// Feed a mouse button press. Returns whether any control claimed it.
    ///
    /// An unclaimed press is dropped without touching capture state; the screen's focus is
    /// then handled per [`UnclaimedPress`].
    pub fn inject_mouse_press(
        &mut self,
        screen: ScreenId,
        button: MouseButtons,
    ) -> Result<bool, ControlError> {
        let root = self.screen(screen)?.root;
        let claimed = self.process_mouse_press(root, button)?;
        if !claimed && self.config.unclaimed_press == UnclaimedPress::ClearFocus {
            let s = &mut self.screens[screen.idx()];
            if let Some(old) = s.focused.take() {
                tracing::debug!(?screen, control = ?old, "unclaimed press cleared focus");
            }
        }
        Ok(claimed)
    }

    /// Feed a mouse button release.
    pub fn inject_mouse_release(
        &mut self,
        screen: ScreenId,
        button: MouseButtons,
    ) -> Result<(), ControlError> {
        let root = self.screen(screen)?.root;
        self.process_mouse_release(root, button)
    }

    /// Feed a wheel rotation.
    pub fn inject_mouse_wheel(&mut self, screen: ScreenId, ticks: f64) -> Result<(), ControlError> {
        let root = self.screen(screen)?.root;
        self.process_mouse_wheel(root, ticks)
    }

    /// Feed a key press or auto-repeat. Returns whether any control claimed it.
    pub fn inject_key_press(
        &mut self,
        screen: ScreenId,
        key: Key,
        repeat: bool,
    ) -> Result<bool, ControlError> {
        let root = self.screen(screen)?.root;
        self.process_key_press(root, key, repeat)
    }

    /// Feed a key release.
    pub fn inject_key_release(&mut self, screen: ScreenId, key: Key) -> Result<(), ControlError> {
        let root = self.screen(screen)?.root;
        self.process_key_release(root, key)
    }

    /// Feed a gamepad button press. Returns whether any control claimed it.
    pub fn inject_button_press(
        &mut self,
        screen: ScreenId,
        button: GamepadButtons,
    ) -> Result<bool, ControlError> {
        let root = self.screen(screen)?.root;
        self.process_button_press(root, button)
    }

    /// Feed a gamepad button release.
    pub fn inject_button_release(
        &mut self,
        screen: ScreenId,
        button: GamepadButtons,
    ) -> Result<(), ControlError> {
        let root = self.screen(screen)?.root;
        self.process_button_release(root, button)
    }
}
