// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Control Tree: a retained control tree that routes mouse, keyboard, and gamepad
//! input with capture and hover tracking.
//!
//! It is meant for game and tool UIs that keep a tree of controls (windows, panels, buttons)
//! and feed it raw input once per frame.
//!
//! - Controls own their children. Children are kept back to front, and the frontmost child
//!   wins hit tests.
//! - A control that claims a press captures that input class until every held input of the
//!   class is released. Releases and moves follow the capture, wherever the pointer goes.
//! - Hover is tracked separately from capture, with enter and leave notifications.
//! - Windows ([`ControlFlags::AFFECTS_ORDERING`]) are raised when clicked, and only the
//!   frontmost window under the pointer is offered a press.
//!
//! ## Not a layout engine or renderer
//!
//! Controls carry a bounds specification that a [`BoundsResolver`] turns into a rectangle
//! relative to the parent. That is all the geometry the tree needs. Drawing, styling, and
//! layout policies live elsewhere.
//!
//! ## API overview
//!
//! - [`ControlTree`]: arena of controls and screens, with all structural operations and
//!   dispatch entry points.
//! - [`ControlId`] / [`ScreenId`]: handles. Control handles are generational.
//! - [`InputTarget`]: hooks a control implements. All of them have defaults.
//! - [`ControlDesc`] and [`ControlFlags`]: construction data.
//! - [`UniRect`] and [`UniResolver`]: the default bounds model (fraction plus offset).
//! - [`DispatchConfig`]: dispatch policies.
//!
//! Key operations:
//! - [`ControlTree::create_screen`], [`ControlTree::create_child`], [`ControlTree::add_child`]
//! - [`ControlTree::inject_mouse_move`], [`ControlTree::inject_mouse_press`] and the other
//!   `inject_*` methods, fed by the host once per input sample.
//! - [`ControlTree::process_mouse_move`] and the other `process_*` methods, which route input
//!   into any subtree.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::{Point, Size};
//! use understory_control_tree::{
//!     ControlDesc, ControlFlags, ControlTree, MouseButtons, Plain, UniRect,
//! };
//!
//! let mut tree: ControlTree = ControlTree::new();
//! let screen = tree.create_screen(Size::new(800.0, 600.0));
//! let desktop = tree.screen_root(screen).unwrap();
//!
//! let window = tree
//!     .create_child(
//!         desktop,
//!         ControlDesc::new(UniRect::absolute(100.0, 100.0, 300.0, 200.0))
//!             .named("settings")
//!             .with_flags(ControlFlags::AFFECTS_ORDERING),
//!         Plain,
//!     )
//!     .unwrap();
//!
//! // Press inside the window, drag outside the screen, release.
//! tree.inject_mouse_move(screen, Point::new(150.0, 150.0)).unwrap();
//! assert!(tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap());
//! tree.inject_mouse_move(screen, Point::new(900.0, 700.0)).unwrap();
//! assert_eq!(tree.captured_mouse(desktop), Some(window));
//! tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
//! assert_eq!(tree.captured_mouse(desktop), None);
//!
//! // Presses on bare desktop are left to the host.
//! tree.inject_mouse_move(screen, Point::new(700.0, 500.0)).unwrap();
//! assert!(!tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap());
//! ```
//!
//! ## Reentrancy
//!
//! Hooks run while the tree is mutably borrowed, so they cannot change the tree. Collect the
//! changes a hook wants (closing a window, reparenting a control) and apply them after the
//! dispatch call returns.
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`.

#![no_std]

extern crate alloc;

mod bounds;
mod capture;
mod config;
mod error;
mod input;
mod pointer;
#[cfg(test)]
mod recorder;
mod screen;
mod state;
mod tree;
mod types;

pub use bounds::{BoundsResolver, UniRect, UniResolver, UniScalar, UniVector};
pub use config::{DispatchConfig, UnclaimedPress};
pub use error::ControlError;
pub use input::{Desktop, GamepadButtons, InputTarget, Key, MouseButtons, Plain};
pub use tree::ControlTree;
pub use types::{ControlDesc, ControlFlags, ControlId, ScreenId};
