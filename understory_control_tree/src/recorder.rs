// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook recorder shared by the dispatch tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Size};

use crate::bounds::UniRect;
use crate::input::{GamepadButtons, InputTarget, Key, MouseButtons};
use crate::tree::ControlTree;
use crate::types::{ControlDesc, ControlFlags, ControlId, ScreenId};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Pressed(MouseButtons),
    Released(MouseButtons),
    Moved(Point),
    Entered,
    Left,
    Wheel(f64),
    KeyPressed(Key),
    KeyReleased(Key),
    ButtonPressed(GamepadButtons),
    ButtonReleased(GamepadButtons),
}

pub(crate) type Log = Rc<RefCell<Vec<(&'static str, Call)>>>;

/// Records every hook call under a name and claims according to its switches.
pub(crate) struct Recorder {
    name: &'static str,
    log: Log,
    pub(crate) mouse: bool,
    pub(crate) keys: bool,
    pub(crate) buttons: bool,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            mouse: true,
            keys: false,
            buttons: false,
        }
    }

    pub(crate) fn declining(mut self) -> Self {
        self.mouse = false;
        self
    }

    pub(crate) fn claiming_input(mut self) -> Self {
        self.keys = true;
        self.buttons = true;
        self
    }

    fn push(&self, call: Call) {
        self.log.borrow_mut().push((self.name, call));
    }
}

impl InputTarget for Recorder {
    fn on_mouse_pressed(&mut self, button: MouseButtons) -> bool {
        self.push(Call::Pressed(button));
        self.mouse
    }
    fn on_mouse_released(&mut self, button: MouseButtons) {
        self.push(Call::Released(button));
    }
    fn on_mouse_moved(&mut self, position: Point) {
        self.push(Call::Moved(position));
    }
    fn on_mouse_entered(&mut self) {
        self.push(Call::Entered);
    }
    fn on_mouse_left(&mut self) {
        self.push(Call::Left);
    }
    fn on_mouse_wheel(&mut self, ticks: f64) {
        self.push(Call::Wheel(ticks));
    }
    fn on_key_pressed(&mut self, key: Key) -> bool {
        self.push(Call::KeyPressed(key));
        self.keys
    }
    fn on_key_released(&mut self, key: Key) {
        self.push(Call::KeyReleased(key));
    }
    fn on_button_pressed(&mut self, button: GamepadButtons) -> bool {
        self.push(Call::ButtonPressed(button));
        self.buttons
    }
    fn on_button_released(&mut self, button: GamepadButtons) {
        self.push(Call::ButtonReleased(button));
    }
}

pub(crate) fn rect(x: f64, y: f64, w: f64, h: f64) -> ControlDesc<UniRect> {
    ControlDesc::new(UniRect::absolute(x, y, w, h))
}

pub(crate) fn window(x: f64, y: f64, w: f64, h: f64) -> ControlDesc<UniRect> {
    rect(x, y, w, h).with_flags(ControlFlags::AFFECTS_ORDERING)
}

/// A 400x300 screen with an empty log.
pub(crate) fn fixture() -> (ControlTree, ScreenId, ControlId, Log) {
    let mut tree = ControlTree::new();
    let screen = tree.create_screen(Size::new(400.0, 300.0));
    let root = tree.screen_root(screen).unwrap();
    (tree, screen, root, Log::default())
}

/// Drain the log.
pub(crate) fn take(log: &Log) -> Vec<(&'static str, Call)> {
    core::mem::take(&mut *log.borrow_mut())
}
