// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, naming, z-order, and geometry queries.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::bounds::{BoundsResolver, UniResolver, container_rect};
use crate::config::DispatchConfig;
use crate::error::ControlError;
use crate::input::{Desktop, InputTarget, MouseButtons};
use crate::screen::Screen;
use crate::state::{DispatchState, Link};
use crate::types::{ControlDesc, ControlFlags, ControlId, ScreenId};

impl<R: BoundsResolver + Default> Default for ControlTree<R> {
    fn default() -> Self {
        Self::with_resolver(R::default())
    }
}

/// Arena of controls organised into screens.
///
/// Controls are created detached and become part of a screen once attached under a screen's
/// root, directly or through ancestors. Each control owns its children: destroying a control
/// destroys its subtree.
///
/// Children are stored back to front: the last child is drawn last and is the first one
/// considered by hit testing.
pub struct ControlTree<R: BoundsResolver = UniResolver> {
    nodes: Vec<Option<Node<R::Bounds>>>, // slots
    generations: Vec<u32>,               // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    pub(crate) screens: Vec<Screen>,
    pub(crate) resolver: R,
    pub(crate) config: DispatchConfig,
}

impl<R: BoundsResolver> core::fmt::Debug for ControlTree<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("ControlTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("screens", &self.screens)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) struct Node<B> {
    generation: u32,
    pub(crate) parent: Option<ControlId>,
    pub(crate) screen: Option<ScreenId>,
    pub(crate) children: Vec<ControlId>,
    name: Option<String>,
    pub(crate) bounds: B,
    pub(crate) flags: ControlFlags,
    pub(crate) target: Box<dyn InputTarget>,
    pub(crate) state: DispatchState,
}

impl<B> Node<B> {
    fn new(generation: u32, desc: ControlDesc<B>, target: Box<dyn InputTarget>) -> Self {
        Self {
            generation,
            parent: None,
            screen: None,
            children: Vec::new(),
            name: desc.name,
            bounds: desc.bounds,
            flags: desc.flags,
            target,
            state: DispatchState::default(),
        }
    }
}

impl<R: BoundsResolver + Default> ControlTree<R> {
    /// Create an empty tree with the default resolver.
    pub fn new() -> Self {
        Self::with_resolver(R::default())
    }
}

impl<R: BoundsResolver> ControlTree<R> {
    /// Create an empty tree that resolves bounds with `resolver`.
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            screens: Vec::new(),
            resolver,
            config: DispatchConfig::default(),
        }
    }

    /// Replace the dispatch policies, builder style.
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Current dispatch policies.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Replace the dispatch policies.
    pub fn set_config(&mut self, config: DispatchConfig) {
        self.config = config;
    }

    /// Create a detached control.
    pub fn create(
        &mut self,
        desc: ControlDesc<R::Bounds>,
        target: impl InputTarget + 'static,
    ) -> ControlId {
        let target: Box<dyn InputTarget> = Box::new(target);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, desc, target));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ControlId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, desc, target)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ControlId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ControlId::new(idx, generation)
    }

    /// Create a control and attach it as the frontmost child of `parent`.
    ///
    /// Fails like [`add_child`](Self::add_child); nothing is created on failure.
    pub fn create_child(
        &mut self,
        parent: ControlId,
        desc: ControlDesc<R::Bounds>,
        target: impl InputTarget + 'static,
    ) -> Result<ControlId, ControlError> {
        self.live(parent)?;
        let id = self.create(desc, target);
        if let Err(e) = self.add_child(parent, id) {
            self.free_subtree(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Register a new screen of the given size.
    ///
    /// The screen's root fills the screen and uses the [`Desktop`] target, so presses that
    /// land on bare desktop are reported as unclaimed.
    pub fn create_screen(&mut self, size: Size) -> ScreenId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ScreenId uses 32-bit indices by design."
        )]
        let screen = ScreenId(self.screens.len() as u32);
        let fill = self.resolver.fill();
        let root = self.create(ControlDesc::new(fill), Desktop);
        self.node_mut(root).screen = Some(screen);
        self.screens.push(Screen::new(root, size));
        tracing::debug!(?screen, ?root, "created screen");
        screen
    }

    /// Attach `child` as the frontmost child of `parent`.
    ///
    /// If `child` already has a parent it is moved; detaching from the old parent, linking
    /// under the new one, and updating the subtree's screen happen in one step. Fails with no
    /// mutation when either handle is stale, when `child` is `parent` or one of its
    /// ancestors, when `child` is a screen root, or when a sibling already uses `child`'s
    /// name.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<(), ControlError> {
        self.live(parent)?;
        let c = self.live(child)?;
        if c.parent.is_none() && c.screen.is_some() {
            return Err(ControlError::ScreenRoot(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(ControlError::Cycle { parent, child });
        }
        if let Some(name) = &c.name
            && self.sibling_named(parent, name, child).is_some()
        {
            return Err(ControlError::DuplicateName(name.clone()));
        }

        if let Some(old) = c.parent {
            self.unlink_parent(child, old);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        let screen = self.node(parent).screen;
        self.propagate_screen(child, screen);
        tracing::debug!(?parent, ?child, ?screen, "attached control");
        Ok(())
    }

    /// Detach `child` from `parent`. The child's subtree becomes free-floating.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<(), ControlError> {
        self.live(parent)?;
        if self.live(child)?.parent != Some(parent) {
            return Err(ControlError::NotAChild { parent, child });
        }
        self.unlink_parent(child, parent);
        self.propagate_screen(child, None);
        tracing::debug!(?parent, ?child, "detached control");
        Ok(())
    }

    /// Destroy a control and its whole subtree.
    ///
    /// Screen roots cannot be destroyed.
    pub fn destroy(&mut self, id: ControlId) -> Result<(), ControlError> {
        let node = self.live(id)?;
        match (node.parent, node.screen) {
            (Some(parent), _) => {
                self.unlink_parent(id, parent);
                self.propagate_screen(id, None);
            }
            (None, Some(_)) => return Err(ControlError::ScreenRoot(id)),
            (None, None) => {}
        }
        self.free_subtree(id);
        tracing::debug!(?id, "destroyed control");
        Ok(())
    }

    /// Returns true if `id` refers to a live control.
    pub fn is_alive(&self, id: ControlId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Parent of a control, or `None` for detached controls, screen roots, and stale handles.
    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id)?.parent
    }

    /// Children of a control, back to front. Empty for stale handles.
    pub fn children(&self, id: ControlId) -> &[ControlId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Screen the control belongs to, if it is attached to one.
    pub fn screen_of(&self, id: ControlId) -> Option<ScreenId> {
        self.node_opt(id)?.screen
    }

    /// Flags the control was created with.
    pub fn flags(&self, id: ControlId) -> Option<ControlFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Name of the control, if it has one.
    pub fn name(&self, id: ControlId) -> Option<&str> {
        self.node_opt(id)?.name.as_deref()
    }

    /// Rename a control.
    ///
    /// Fails with [`ControlError::DuplicateName`] and leaves the control unchanged when a
    /// sibling already uses the name. Renaming a control to its current name succeeds.
    pub fn set_name(&mut self, id: ControlId, name: Option<String>) -> Result<(), ControlError> {
        let node = self.live(id)?;
        if node.name == name {
            return Ok(());
        }
        if let (Some(parent), Some(new)) = (node.parent, &name)
            && self.sibling_named(parent, new, id).is_some()
        {
            return Err(ControlError::DuplicateName(new.clone()));
        }
        self.node_mut(id).name = name;
        Ok(())
    }

    /// Direct child of `parent` with the given name.
    pub fn child_by_name(&self, parent: ControlId, name: &str) -> Option<ControlId> {
        self.node_opt(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).name.as_deref() == Some(name))
    }

    /// Bounds specification of a control.
    pub fn bounds(&self, id: ControlId) -> Option<&R::Bounds> {
        self.node_opt(id).map(|n| &n.bounds)
    }

    /// Update the bounds specification of a control.
    ///
    /// Hover state catches up with the new geometry on the next pointer move.
    pub fn set_bounds(&mut self, id: ControlId, bounds: R::Bounds) -> Result<(), ControlError> {
        self.node_opt_mut(id).ok_or(ControlError::NodeNotFound(id))?.bounds = bounds;
        Ok(())
    }

    /// Move a control to the front of its siblings, then do the same for each ancestor.
    pub fn bring_to_front(&mut self, id: ControlId) -> Result<(), ControlError> {
        self.live(id)?;
        self.raise(id);
        Ok(())
    }

    /// [`Self::bring_to_front`] for a control known to be live.
    pub(crate) fn raise(&mut self, id: ControlId) {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let children = &mut self.node_mut(parent).children;
            if let Some(pos) = children.iter().position(|&c| c == current) {
                children[pos..].rotate_left(1);
            }
            current = parent;
        }
        tracing::trace!(?id, "brought to front");
    }

    /// Rectangle of a control in screen coordinates.
    ///
    /// Fails with [`ControlError::Detached`] when the control is not attached to a screen.
    pub fn absolute_bounds(&self, id: ControlId) -> Result<Rect, ControlError> {
        let screen = self.live(id)?.screen.ok_or(ControlError::Detached(id))?;
        let mut rect = container_rect(self.screens[screen.idx()].size);
        for n in self.path_to_root(id) {
            rect = self.resolver.resolve(&self.node(n).bounds, rect);
        }
        Ok(rect)
    }

    /// Rectangle of a control relative to its parent's top-left corner.
    ///
    /// Fails with [`ControlError::Detached`] when the control is not attached to a screen.
    pub fn local_bounds(&self, id: ControlId) -> Result<Rect, ControlError> {
        let rect = self.absolute_bounds(id)?;
        match self.parent(id) {
            Some(parent) => Ok(rect - self.absolute_bounds(parent)?.origin().to_vec2()),
            None => Ok(rect),
        }
    }

    /// Deepest control under `point`, starting at `root`.
    ///
    /// `point` is in the coordinate space of `root`'s container, which has size `container`.
    /// Children are searched front to back before the control itself, the same rule hover
    /// tracking uses.
    pub fn hit_test(&self, root: ControlId, container: Size, point: Point) -> Option<ControlId> {
        self.node_opt(root)?;
        let own = self.resolve_in(root, container);
        let local = point - own.origin().to_vec2();
        if let Some(child) = self.child_at(root, own.size(), local) {
            return self.hit_test(child, own.size(), local);
        }
        own.contains(point).then_some(root)
    }

    /// Mouse capture link of a control: itself, one of its children, or `None`.
    pub fn captured_mouse(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id)?.state.mouse
    }

    /// Mouse buttons currently held in a control's subtree.
    pub fn held_mouse_buttons(&self, id: ControlId) -> MouseButtons {
        self.node_opt(id)
            .map(|n| n.state.held_mouse)
            .unwrap_or_default()
    }

    /// Keyboard capture link of a control.
    pub fn captured_keyboard(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id)?.state.keyboard.target
    }

    /// Number of keys currently held in a control's subtree.
    pub fn held_key_count(&self, id: ControlId) -> u32 {
        self.node_opt(id).map_or(0, |n| n.state.keyboard.held)
    }

    /// Gamepad capture link of a control.
    pub fn captured_gamepad(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id)?.state.gamepad.target
    }

    /// Number of gamepad buttons currently held in a control's subtree.
    pub fn held_button_count(&self, id: ControlId) -> u32 {
        self.node_opt(id).map_or(0, |n| n.state.gamepad.held)
    }

    /// Hover link of a control: itself, one of its children, or `None`.
    pub fn hovered(&self, id: ControlId) -> Option<ControlId> {
        self.node_opt(id)?.state.hovered
    }

    // --- internals ---

    /// Rectangle of `id` inside a container of the given size, in the container's space.
    pub(crate) fn resolve_in(&self, id: ControlId, container: Size) -> Rect {
        self.resolver
            .resolve(&self.node(id).bounds, container_rect(container))
    }

    /// Report a contradiction in dispatch state.
    ///
    /// Strict configurations fail; relaxed ones log and let the caller drop the notification.
    pub(crate) fn violation(&self, what: &'static str) -> Result<(), ControlError> {
        if self.config.strict_invariants {
            return Err(ControlError::InvariantViolation(what));
        }
        tracing::warn!(what, "dispatch invariant violated, notification dropped");
        Ok(())
    }

    pub(crate) fn live(&self, id: ControlId) -> Result<&Node<R::Bounds>, ControlError> {
        self.node_opt(id).ok_or(ControlError::NodeNotFound(id))
    }

    /// Access a linked control; panics if `id` is stale.
    pub(crate) fn node(&self, id: ControlId) -> &Node<R::Bounds> {
        self.nodes[id.idx()].as_ref().expect("dangling ControlId")
    }

    /// Access a linked control mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: ControlId) -> &mut Node<R::Bounds> {
        self.nodes[id.idx()].as_mut().expect("dangling ControlId")
    }

    pub(crate) fn node_opt(&self, id: ControlId) -> Option<&Node<R::Bounds>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ControlId) -> Option<&mut Node<R::Bounds>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Frontmost child of `id` whose rectangle contains `local`.
    ///
    /// `size` is `id`'s own size and `local` is in `id`'s local space.
    pub(crate) fn child_at(&self, id: ControlId, size: Size, local: Point) -> Option<ControlId> {
        self.node(id)
            .children
            .iter()
            .rev()
            .copied()
            .find(|&c| self.resolve_in(c, size).contains(local))
    }

    fn sibling_named(&self, parent: ControlId, name: &str, except: ControlId) -> Option<ControlId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| c != except && self.node(c).name.as_deref() == Some(name))
    }

    fn is_ancestor(&self, ancestor: ControlId, mut id: ControlId) -> bool {
        while let Some(parent) = self.node(id).parent {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn path_to_root(&self, mut id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// `id` and all of its descendants, parents before children.
    fn subtree(&self, id: ControlId) -> Vec<ControlId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend_from_slice(&self.node(n).children);
        }
        out
    }

    /// Unlink `id` from `parent`, cutting every capture chain that runs into it.
    ///
    /// A parent hovering `id` falls back to hovering itself, so the next move neither
    /// re-enters it nor misses its leave.
    fn unlink_parent(&mut self, id: ControlId, parent: ControlId) {
        for link in Link::ALL {
            let mut below = id;
            let mut above = Some(parent);
            while let Some(a) = above {
                if !self.node_mut(a).state.cut(link, below) {
                    break;
                }
                tracing::debug!(control = ?a, ?link, "cut link into detached control");
                below = a;
                above = self.node(a).parent;
            }
        }
        let hover = &mut self.node_mut(parent).state.hovered;
        if *hover == Some(id) {
            *hover = Some(parent);
        }
        for n in self.subtree(id) {
            self.node_mut(n).state = DispatchState::default();
        }
        self.node_mut(parent).children.retain(|&c| c != id);
        self.node_mut(id).parent = None;
    }

    /// Set the screen of a whole subtree, dropping focus that leaves its screen.
    fn propagate_screen(&mut self, id: ControlId, screen: Option<ScreenId>) {
        for n in self.subtree(id) {
            let old = self.node(n).screen;
            if old == screen {
                continue;
            }
            if let Some(old) = old {
                let s = &mut self.screens[old.idx()];
                if s.focused == Some(n) {
                    s.focused = None;
                    tracing::debug!(screen = ?old, control = ?n, "focused control left screen");
                }
            }
            self.node_mut(n).screen = screen;
        }
    }

    fn free_subtree(&mut self, id: ControlId) {
        for n in self.subtree(id) {
            self.nodes[n.idx()] = None;
            self.free_list.push(n.idx());
        }
    }
}
