// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree operations and input dispatch.

use alloc::string::String;
use core::fmt;

use crate::types::{ControlId, ScreenId};

/// Error returned by fallible [`ControlTree`](crate::ControlTree) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// The handle is stale or never referred to a control of this tree.
    NodeNotFound(ControlId),
    /// The screen is not registered with this tree.
    ScreenNotFound(ScreenId),
    /// A sibling already carries this name.
    DuplicateName(String),
    /// The control is not attached to a screen and has no absolute coordinate frame.
    Detached(ControlId),
    /// Attaching `child` under `parent` would make the child its own ancestor.
    Cycle {
        /// Requested parent.
        parent: ControlId,
        /// Requested child.
        child: ControlId,
    },
    /// Screen roots cannot be attached to another control.
    ScreenRoot(ControlId),
    /// `child` is not a direct child of `parent`.
    NotAChild {
        /// Expected parent.
        parent: ControlId,
        /// Control that was expected to be a child.
        child: ControlId,
    },
    /// An input value outside the known set reached the dispatcher.
    InvalidArgument(&'static str),
    /// Dispatch state contradicts itself. Only reported with
    /// [`DispatchConfig::strict_invariants`](crate::DispatchConfig::strict_invariants).
    InvariantViolation(&'static str),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "control {id:?} does not exist"),
            Self::ScreenNotFound(id) => write!(f, "screen {id:?} does not exist"),
            Self::DuplicateName(name) => write!(f, "a sibling is already named {name:?}"),
            Self::Detached(id) => write!(f, "control {id:?} is not attached to a screen"),
            Self::Cycle { parent, child } => {
                write!(f, "cannot attach {child:?} under its own descendant {parent:?}")
            }
            Self::ScreenRoot(id) => write!(f, "control {id:?} is a screen root"),
            Self::NotAChild { parent, child } => {
                write!(f, "control {child:?} is not a child of {parent:?}")
            }
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Self::InvariantViolation(what) => write!(f, "dispatch invariant violated: {what}"),
        }
    }
}

impl core::error::Error for ControlError {}
