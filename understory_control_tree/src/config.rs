// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch policies.

/// What a screen does with keyboard focus when no control claims a mouse press.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum UnclaimedPress {
    /// Drop the press and leave focus where it is.
    #[default]
    KeepFocus,
    /// Drop the press and clear the screen's focused control.
    ClearFocus,
}

/// Policies applied by a [`ControlTree`](crate::ControlTree) while dispatching input.
///
/// Set with [`ControlTree::set_config`](crate::ControlTree::set_config).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DispatchConfig {
    /// Focus policy for unclaimed mouse presses injected through a screen.
    pub unclaimed_press: UnclaimedPress,
    /// Report internal contract violations as
    /// [`ControlError::InvariantViolation`](crate::ControlError::InvariantViolation).
    ///
    /// When false, violations are logged and the offending notification is dropped.
    /// Defaults to on in debug builds and off in release builds.
    pub strict_invariants: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            unclaimed_press: UnclaimedPress::default(),
            strict_invariants: cfg!(debug_assertions),
        }
    }
}
