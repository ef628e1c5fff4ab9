//! Test doubles for the overlay manager and listing presenter.

use crate::listing::Presenter;
use crate::overlay::{OverlayHooks, OverlayId};
use crate::tile::{Tile, TileId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    /// `on_open` fired
    Opened(OverlayId),
    /// `on_close` fired
    Closed(OverlayId),
}

impl HookCall {
    /// Shorthand for [`HookCall::Opened`].
    #[must_use]
    pub fn open(id: &str) -> Self {
        Self::Opened(id.into())
    }

    /// Shorthand for [`HookCall::Closed`].
    #[must_use]
    pub fn close(id: &str) -> Self {
        Self::Closed(id.into())
    }
}

/// Hooks that log every call. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    calls: Rc<RefCell<Vec<HookCall>>>,
}

impl RecordingHooks {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl OverlayHooks for RecordingHooks {
    fn on_open(&self, id: &OverlayId) {
        self.calls.borrow_mut().push(HookCall::Opened(id.clone()));
    }

    fn on_close(&self, id: &OverlayId) {
        self.calls.borrow_mut().push(HookCall::Closed(id.clone()));
    }
}

/// Presenter that remembers what it was asked to show.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    visibility: HashMap<TileId, bool>,
    order: Vec<String>,
    applies: usize,
}

impl RecordingPresenter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `apply` calls.
    #[must_use]
    pub const fn apply_count(&self) -> usize {
        self.applies
    }

    /// Visible ids from the most recent reorder.
    #[must_use]
    pub fn last_order(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Last visibility set for a tile, `None` if never presented.
    #[must_use]
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.visibility.get(&TileId::from(id)).copied()
    }
}

impl Presenter for RecordingPresenter {
    fn apply_visibility(&mut self, tile: &Tile, visible: bool) {
        self.visibility.insert(tile.id.clone(), visible);
    }

    fn reorder(&mut self, ids_in_order: &[&TileId]) {
        self.order = ids_in_order.iter().map(|id| id.to_string()).collect();
    }

    fn apply(&mut self, visible: &[&Tile], hidden: &[&Tile]) {
        self.applies += 1;
        for tile in visible {
            self.apply_visibility(tile, true);
        }
        for tile in hidden {
            self.apply_visibility(tile, false);
        }
        let ids: Vec<&TileId> = visible.iter().map(|tile| &tile.id).collect();
        self.reorder(&ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_hooks_share_log() {
        let hooks = RecordingHooks::new();
        let clone = hooks.clone();
        clone.on_open(&"#a".into());
        hooks.on_close(&"#a".into());
        assert_eq!(hooks.calls(), vec![HookCall::open("#a"), HookCall::close("#a")]);
        hooks.clear();
        assert!(clone.calls().is_empty());
    }

    #[test]
    fn test_recording_presenter_defaults() {
        let presenter = RecordingPresenter::new();
        assert_eq!(presenter.apply_count(), 0);
        assert!(presenter.last_order().is_empty());
        assert_eq!(presenter.is_visible("a"), None);
    }
}
