//! DOM implementations of the core's rendering seams.

use folio_core::{AnchorResolver, OverlayHooks, OverlayId, OverlayManager, Presenter, Tile, TileId};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use web_sys::{Document, Element};

/// Class toggled on overlays while open.
pub const ACTIVE_CLASS: &str = "active";
/// Class toggled on tiles filtered out of a listing.
pub const HIDDEN_CLASS: &str = "hidden";

/// Resolves overlay ids as CSS selectors against the document.
#[derive(Debug, Clone)]
pub struct DomAnchorResolver {
    document: Document,
}

impl DomAnchorResolver {
    /// Resolve against `document`.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }
}

impl AnchorResolver for DomAnchorResolver {
    fn resolve(&self, id: &str) -> bool {
        matches!(self.document.query_selector(id), Ok(Some(_)))
    }
}

/// Shows overlays with [`ACTIVE_CLASS`] and optionally locks page scroll
/// while one is open.
///
/// Scroll is only released once `manager` no longer reports a lock, so
/// closing an overlay that is not the open one leaves it in place.
#[derive(Debug, Clone)]
pub struct BodyScrollHooks {
    document: Document,
    lock_scroll: bool,
    manager: Weak<OverlayManager>,
}

impl BodyScrollHooks {
    /// Hooks for overlays of `manager` in `document`.
    #[must_use]
    pub fn new(document: Document, lock_scroll: bool, manager: &Rc<OverlayManager>) -> Self {
        Self {
            document,
            lock_scroll,
            manager: Rc::downgrade(manager),
        }
    }

    fn set_overflow(&self, value: &str) {
        if !self.lock_scroll {
            return;
        }
        if let Some(body) = self.document.body() {
            if let Err(err) = body.style().set_property("overflow", value) {
                tracing::warn!(?err, "failed to set body overflow");
            }
        }
    }

    fn set_active(&self, id: &OverlayId, active: bool) {
        if let Ok(Some(element)) = self.document.query_selector(id) {
            if element
                .class_list()
                .toggle_with_force(ACTIVE_CLASS, active)
                .is_err()
            {
                tracing::warn!(overlay = %id, "failed to toggle overlay class");
            }
        }
    }
}

impl OverlayHooks for BodyScrollHooks {
    fn on_open(&self, id: &OverlayId) {
        self.set_active(id, true);
        self.set_overflow("hidden");
    }

    fn on_close(&self, id: &OverlayId) {
        self.set_active(id, false);
        let still_locked = self
            .manager
            .upgrade()
            .is_some_and(|manager| manager.scroll_locked());
        if !still_locked {
            self.set_overflow("");
        }
    }
}

/// Presents a listing by toggling [`HIDDEN_CLASS`] on tile elements and
/// re-appending visible ones to their container in order.
///
/// Tiles are found by `[{attribute}="{id}"]` inside the container.
#[derive(Debug)]
pub struct DomPresenter {
    container: Element,
    attribute: &'static str,
    nodes: HashMap<TileId, Element>,
}

impl DomPresenter {
    /// Present tiles found under `container` by `attribute`.
    #[must_use]
    pub fn new(container: Element, attribute: &'static str) -> Self {
        Self {
            container,
            attribute,
            nodes: HashMap::new(),
        }
    }

    fn node(&mut self, id: &TileId) -> Option<Element> {
        if let Some(node) = self.nodes.get(id) {
            return Some(node.clone());
        }
        let selector = format!("[{}=\"{}\"]", self.attribute, id);
        let node = self.container.query_selector(&selector).ok().flatten()?;
        self.nodes.insert(id.clone(), node.clone());
        Some(node)
    }
}

impl Presenter for DomPresenter {
    fn apply_visibility(&mut self, tile: &Tile, visible: bool) {
        let Some(node) = self.node(&tile.id) else {
            return;
        };
        if node
            .class_list()
            .toggle_with_force(HIDDEN_CLASS, !visible)
            .is_err()
        {
            tracing::warn!(tile = %tile.id, "failed to toggle tile visibility");
        }
    }

    fn reorder(&mut self, ids_in_order: &[&TileId]) {
        for id in ids_in_order {
            if let Some(node) = self.node(id) {
                if self.container.append_child(&node).is_err() {
                    tracing::warn!(tile = %id, "failed to reorder tile");
                }
            }
        }
    }
}
