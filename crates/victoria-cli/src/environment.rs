//! Lexical environments, stored in an arena and addressed by [`EnvId`].
//!
//! A frame is created per call and per block; when the block or call exits
//! the frame goes back on the free list unless a closure pinned it. Pinning
//! a frame pins its whole `outer` chain, so a closure never observes a
//! recycled ancestor.
//!
//! A pinned frame that has exited is retained only while something can still
//! reach it: a [`FrameHold`] owned by a closure, or a frame that is still
//! running and has it as an ancestor. [`Environments::sweep`] reclaims the
//! rest. It runs on its own once enough exited frames pile up. A closure
//! stored in the very frame it captures keeps that frame alive for the life
//! of the arena.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::object::Object;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(usize);

/// Exited frames retained before the first sweep.
const MIN_SWEEP_BACKLOG: usize = 64;

/// Keeps a captured frame (and its ancestors) from being swept. Owned by the
/// closure that captured it.
#[derive(Debug, Clone)]
pub struct FrameHold(Rc<()>);

#[derive(Debug, Default)]
struct Environment {
    store: HashMap<String, Object>,
    consts: HashSet<String>,
    outer: Option<EnvId>,
    pinned: bool,
    /// Set when the block or call that owns a pinned frame has returned.
    exited: bool,
    hold: Option<FrameHold>,
}

impl Environment {
    fn held_elsewhere(&self) -> bool {
        self.hold
            .as_ref()
            .is_some_and(|FrameHold(token)| Rc::strong_count(token) > 1)
    }
}

#[derive(Debug)]
pub struct Environments {
    frames: Vec<Option<Environment>>,
    free: Vec<usize>,
    /// Exited frames still allocated, and the count that triggers a sweep.
    exited: usize,
    sweep_at: usize,
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

impl Environments {
    /// An arena holding only the root frame, which is always pinned.
    pub fn new() -> Self {
        let root = Environment {
            pinned: true,
            ..Environment::default()
        };
        Self {
            frames: vec![Some(root)],
            free: Vec::new(),
            exited: 0,
            sweep_at: MIN_SWEEP_BACKLOG,
        }
    }

    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    /// A fresh frame whose lookups fall back to `outer`.
    pub fn child(&mut self, outer: EnvId) -> EnvId {
        let frame = Environment {
            outer: Some(outer),
            ..Environment::default()
        };
        match self.free.pop() {
            Some(slot) => {
                self.frames[slot] = Some(frame);
                EnvId(slot)
            }
            None => {
                self.frames.push(Some(frame));
                EnvId(self.frames.len() - 1)
            }
        }
    }

    fn frame(&self, id: EnvId) -> Option<&Environment> {
        self.frames.get(id.0).and_then(Option::as_ref)
    }

    fn frame_mut(&mut self, id: EnvId) -> Option<&mut Environment> {
        self.frames.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Frame in the chain starting at `id` that binds `name`.
    fn owner(&self, id: EnvId, name: &str) -> Option<EnvId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let frame = self.frame(current)?;
            if frame.store.contains_key(name) {
                return Some(current);
            }
            cursor = frame.outer;
        }
        None
    }

    pub fn get(&self, id: EnvId, name: &str) -> Option<Object> {
        let owner = self.owner(id, name)?;
        self.frame(owner)?.store.get(name).cloned()
    }

    /// Defines `name` in `id` itself, shadowing any outer binding.
    pub fn set(&mut self, id: EnvId, name: &str, value: Object) {
        if let Some(frame) = self.frame_mut(id) {
            frame.consts.remove(name);
            frame.store.insert(name.to_string(), value);
        }
    }

    pub fn set_const(&mut self, id: EnvId, name: &str, value: Object) {
        if let Some(frame) = self.frame_mut(id) {
            frame.store.insert(name.to_string(), value);
            frame.consts.insert(name.to_string());
        }
    }

    /// Rebinds the nearest existing `name` in the chain. Returns `false` when
    /// there is no such binding.
    pub fn update(&mut self, id: EnvId, name: &str, value: Object) -> bool {
        let Some(owner) = self.owner(id, name) else {
            return false;
        };
        match self.frame_mut(owner) {
            Some(frame) => {
                frame.store.insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Whether the binding `name` resolves to is a constant.
    pub fn is_const(&self, id: EnvId, name: &str) -> bool {
        self.owner(id, name)
            .and_then(|owner| self.frame(owner))
            .is_some_and(|frame| frame.consts.contains(name))
    }

    /// Whether `id` itself (not an ancestor) binds `name` as a constant.
    pub fn is_local_const(&self, id: EnvId, name: &str) -> bool {
        self.frame(id)
            .is_some_and(|frame| frame.consts.contains(name))
    }

    /// Keeps `id` and all of its ancestors alive past their exit, for as long
    /// as the returned hold (or a clone of it) exists.
    pub fn pin(&mut self, id: EnvId) -> FrameHold {
        let hold = match self.frame_mut(id) {
            Some(frame) => frame
                .hold
                .get_or_insert_with(|| FrameHold(Rc::new(())))
                .clone(),
            None => FrameHold(Rc::new(())),
        };
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(frame) = self.frame_mut(current) else {
                break;
            };
            if frame.pinned {
                break;
            }
            frame.pinned = true;
            cursor = frame.outer;
        }
        hold
    }

    /// Called when the block or call owning `id` returns. Unpinned frames go
    /// straight back to the free list; pinned ones wait for a sweep.
    pub fn release(&mut self, id: EnvId) {
        if id == self.root() {
            return;
        }
        let Some(frame) = self.frame_mut(id) else {
            return;
        };
        if !frame.pinned {
            self.frames[id.0] = None;
            self.free.push(id.0);
            return;
        }
        if !frame.exited {
            frame.exited = true;
            self.exited += 1;
            if self.exited >= self.sweep_at {
                self.sweep();
            }
        }
    }

    /// Frees every exited frame that no hold and no running frame can reach.
    pub fn sweep(&mut self) {
        let mut live = vec![false; self.frames.len()];
        live[self.root().0] = true;
        for slot in 0..self.frames.len() {
            let needed = self.frames[slot]
                .as_ref()
                .is_some_and(|frame| !frame.exited || frame.held_elsewhere());
            if !needed {
                continue;
            }
            let mut cursor = Some(EnvId(slot));
            while let Some(current) = cursor {
                if live[current.0] && current.0 != slot {
                    break;
                }
                live[current.0] = true;
                cursor = self.frame(current).and_then(|frame| frame.outer);
            }
        }

        let mut freed = 0;
        for (slot, alive) in live.iter().enumerate() {
            if !alive && self.frames[slot].is_some() {
                self.frames[slot] = None;
                self.free.push(slot);
                freed += 1;
            }
        }
        self.exited -= freed;
        self.sweep_at = (self.exited * 2).max(MIN_SWEEP_BACKLOG);
        tracing::trace!(freed, retained = self.exited, "swept environments");
    }

    /// Number of frames currently allocated.
    pub fn live_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.is_some()).count()
    }
}
