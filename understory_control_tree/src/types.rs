// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the control tree: handles, flags, and construction data.

use alloc::string::String;

/// Identifier for a control in a [`ControlTree`](crate::ControlTree).
///
/// This is a small, copyable handle that stays stable while the control is alive and
/// becomes invalid once the control is destroyed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On create, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any existing `ControlId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ControlId`.
///
/// Use [`ControlTree::is_alive`](crate::ControlTree::is_alive) to check whether a handle still
/// refers to a live control. Stale handles never alias a different live control because the
/// generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ControlId(pub(crate) u32, pub(crate) u32);

impl ControlId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a screen registered with a [`ControlTree`](crate::ControlTree).
///
/// Screens are never removed, so this is a plain index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScreenId(pub(crate) u32);

impl ScreenId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-control behavior flags. Fixed when the control is created.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// The control is a floating, window-like container.
        ///
        /// Claiming a mouse press brings it (and its ancestors) to the front, and among
        /// siblings carrying this flag only the frontmost one is offered a given press.
        const AFFECTS_ORDERING = 0b0000_0001;
        /// The control becomes the screen's focused control when it claims a mouse press.
        const FOCUSABLE        = 0b0000_0010;
    }
}

/// Construction data for a control.
///
/// `B` is the bounds specification understood by the tree's
/// [`BoundsResolver`](crate::BoundsResolver).
#[derive(Clone, Debug)]
pub struct ControlDesc<B> {
    /// Bounds specification, resolved against the parent's rectangle.
    pub bounds: B,
    /// Optional name, unique among siblings.
    pub name: Option<String>,
    /// Behavior flags.
    pub flags: ControlFlags,
}

impl<B> ControlDesc<B> {
    /// Construction data with the given bounds, no name, and no flags.
    pub fn new(bounds: B) -> Self {
        Self {
            bounds,
            name: None,
            flags: ControlFlags::empty(),
        }
    }

    /// Set the control's name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the control's flags.
    pub fn with_flags(mut self, flags: ControlFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl<B: Default> Default for ControlDesc<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}
