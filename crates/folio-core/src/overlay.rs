//! Overlay (modal) manager.
//!
//! The manager is the single authority for which overlay is visible. At most
//! one registered overlay is open at any time; opening a second one closes the
//! first, firing its `on_close` hook before the new overlay's `on_open`.
//!
//! All methods take `&self` so that hooks can hold an `Rc<OverlayManager>`.
//! A hook that tries to drive a state transition while the manager is running
//! it gets [`OverlayError::Reentrant`] instead of undefined ordering.
//!
//! # Example
//!
//! ```
//! use folio_core::{NoHooks, OverlayConfig, OverlayManager};
//!
//! let manager = OverlayManager::new(|_id: &str| true);
//! manager.register("#demo-modal", OverlayConfig::default(), NoHooks);
//! manager.register("#gallery-modal", OverlayConfig::default(), NoHooks);
//!
//! assert!(manager.open("#demo-modal").unwrap());
//! assert!(manager.open("#gallery-modal").unwrap());
//! assert!(!manager.is_open("#demo-modal"));
//! assert_eq!(manager.current().as_deref(), Some("#gallery-modal"));
//! ```

use crate::error::OverlayError;
use crate::event::{ClickTarget, Event, Key};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, warn};

/// Unique key of a registered overlay (typically its DOM selector).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(String);

impl OverlayId {
    /// Create an overlay id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for OverlayId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OverlayId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OverlayId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OverlayId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-overlay behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Close when the backdrop outside the dialog body is clicked
    pub close_on_outside_click: bool,
    /// Lock page scrolling while this overlay is open
    pub lock_scroll: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            close_on_outside_click: true,
            lock_scroll: true,
        }
    }
}

impl OverlayConfig {
    /// Create a config with default behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set close on outside click.
    #[must_use]
    pub const fn close_on_outside_click(mut self, enabled: bool) -> Self {
        self.close_on_outside_click = enabled;
        self
    }

    /// Set scroll locking.
    #[must_use]
    pub const fn lock_scroll(mut self, enabled: bool) -> Self {
        self.lock_scroll = enabled;
        self
    }
}

/// Side effects run when an overlay opens or closes.
///
/// Hooks may query the manager but must not open or close overlays
/// synchronously.
pub trait OverlayHooks {
    /// Called after `id` became the open overlay.
    fn on_open(&self, _id: &OverlayId) {}

    /// Called after `id` was closed.
    fn on_close(&self, _id: &OverlayId) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl OverlayHooks for NoHooks {}

/// Resolves an overlay id to its visual anchor.
pub trait AnchorResolver {
    /// Whether an anchor exists for `id`.
    fn resolve(&self, id: &str) -> bool;
}

impl<F> AnchorResolver for F
where
    F: Fn(&str) -> bool,
{
    fn resolve(&self, id: &str) -> bool {
        self(id)
    }
}

struct Registration {
    config: OverlayConfig,
    hooks: Rc<dyn OverlayHooks>,
}

#[derive(Clone, Copy)]
enum Phase {
    Open,
    Close,
}

/// Resets the manager's hook flag even if a hook panics.
struct HookScope<'a>(&'a Cell<bool>);

impl<'a> HookScope<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for HookScope<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Registry of overlays with an exclusive "currently open" pointer.
pub struct OverlayManager {
    resolver: Box<dyn AnchorResolver>,
    entries: RefCell<BTreeMap<OverlayId, Registration>>,
    current: RefCell<Option<OverlayId>>,
    in_hook: Cell<bool>,
}

impl fmt::Debug for OverlayManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayManager")
            .field("registered", &self.entries.borrow().keys().collect::<Vec<_>>())
            .field("current", &self.current.borrow())
            .field("in_hook", &self.in_hook.get())
            .finish()
    }
}

impl OverlayManager {
    /// Create a manager that checks registrations against `resolver`.
    pub fn new(resolver: impl AnchorResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            entries: RefCell::new(BTreeMap::new()),
            current: RefCell::new(None),
            in_hook: Cell::new(false),
        }
    }

    /// Register an overlay.
    ///
    /// Returns `None` if the anchor for `id` cannot be resolved. Registering
    /// an existing id replaces its entry without closing it.
    pub fn register(
        &self,
        id: impl Into<OverlayId>,
        config: OverlayConfig,
        hooks: impl OverlayHooks + 'static,
    ) -> Option<OverlayId> {
        let id = id.into();
        if !self.resolver.resolve(&id) {
            warn!(overlay = %id, "overlay anchor not found, registration skipped");
            return None;
        }

        let registration = Registration {
            config,
            hooks: Rc::new(hooks),
        };
        if self
            .entries
            .borrow_mut()
            .insert(id.clone(), registration)
            .is_some()
        {
            debug!(overlay = %id, "overlay registration replaced");
        }
        Some(id)
    }

    /// Open `id`, closing whichever overlay is currently open.
    ///
    /// Returns `false` if `id` is unknown or already open.
    pub fn open(&self, id: &str) -> Result<bool, OverlayError> {
        self.check_reentry("open")?;
        let Some(hooks) = self.hooks_for(id) else {
            return Ok(false);
        };
        if self.is_open(id) {
            return Ok(false);
        }

        let previous = self.current.borrow().clone();
        if let Some(previous) = previous {
            self.close_entry(&previous);
        }

        let id = OverlayId::from(id);
        *self.current.borrow_mut() = Some(id.clone());
        debug!(overlay = %id, "overlay opened");
        self.fire(&id, &hooks, Phase::Open);
        Ok(true)
    }

    /// Close `id` and fire its `on_close` hook.
    ///
    /// Returns `false` only if `id` is unknown.
    pub fn close(&self, id: &str) -> Result<bool, OverlayError> {
        self.check_reentry("close")?;
        Ok(self.close_entry(id))
    }

    /// Close whatever overlay is open. No-op if none is.
    pub fn close_current(&self) -> Result<bool, OverlayError> {
        self.check_reentry("close_current")?;
        let current = self.current.borrow().clone();
        Ok(current.is_some_and(|id| self.close_entry(&id)))
    }

    /// Close `id` if it is open, otherwise open it.
    pub fn toggle(&self, id: &str) -> Result<bool, OverlayError> {
        self.check_reentry("toggle")?;
        if self.is_open(id) {
            self.close(id)
        } else {
            self.open(id)
        }
    }

    /// Route a document-level event.
    ///
    /// Escape closes the open overlay. A backdrop click closes its overlay
    /// when configured to; a close-button click always does. Returns whether
    /// an overlay was closed.
    pub fn handle_event(&self, event: &Event) -> Result<bool, OverlayError> {
        self.check_reentry("handle_event")?;
        match event {
            Event::KeyDown { key: Key::Escape } => self.close_current(),
            Event::Click {
                target: ClickTarget::Backdrop(id),
            } => {
                let closes = self
                    .config(id)
                    .is_some_and(|config| config.close_on_outside_click);
                if closes && self.is_open(id) {
                    self.close(id)
                } else {
                    Ok(false)
                }
            }
            Event::Click {
                target: ClickTarget::CloseButton(id),
            } => self.close(id),
            _ => Ok(false),
        }
    }

    /// Close every overlay and discard all registrations.
    ///
    /// Intended for full application teardown.
    pub fn destroy(&self) -> Result<(), OverlayError> {
        self.check_reentry("destroy")?;
        let ids: Vec<OverlayId> = self.entries.borrow().keys().cloned().collect();
        for id in &ids {
            self.close_entry(id);
        }
        self.entries.borrow_mut().clear();
        *self.current.borrow_mut() = None;
        debug!(count = ids.len(), "overlay manager destroyed");
        Ok(())
    }

    /// Whether `id` is the open overlay.
    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.current.borrow().as_deref() == Some(id)
    }

    /// The open overlay, if any.
    #[must_use]
    pub fn current(&self) -> Option<OverlayId> {
        self.current.borrow().clone()
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn is_registered(&self, id: &str) -> bool {
        self.entries.borrow().contains_key(id)
    }

    /// Config of a registered overlay.
    #[must_use]
    pub fn config(&self, id: &str) -> Option<OverlayConfig> {
        self.entries.borrow().get(id).map(|r| r.config)
    }

    /// Number of registered overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no overlays are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether page scrolling should be locked right now.
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.current
            .borrow()
            .as_deref()
            .and_then(|id| self.config(id))
            .is_some_and(|config| config.lock_scroll)
    }

    fn check_reentry(&self, operation: &'static str) -> Result<(), OverlayError> {
        if self.in_hook.get() {
            warn!(operation, "re-entrant overlay call from hook rejected");
            return Err(OverlayError::Reentrant { operation });
        }
        Ok(())
    }

    fn hooks_for(&self, id: &str) -> Option<Rc<dyn OverlayHooks>> {
        self.entries.borrow().get(id).map(|r| Rc::clone(&r.hooks))
    }

    fn close_entry(&self, id: &str) -> bool {
        let Some(hooks) = self.hooks_for(id) else {
            return false;
        };
        if self.is_open(id) {
            *self.current.borrow_mut() = None;
        }
        let id = OverlayId::from(id);
        debug!(overlay = %id, "overlay closed");
        self.fire(&id, &hooks, Phase::Close);
        true
    }

    // No RefCell borrow may be held across this call.
    fn fire(&self, id: &OverlayId, hooks: &Rc<dyn OverlayHooks>, phase: Phase) {
        let _scope = HookScope::enter(&self.in_hook);
        match phase {
            Phase::Open => hooks.on_open(id),
            Phase::Close => hooks.on_close(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HookCall, RecordingHooks};

    fn manager_with(ids: &[&str]) -> (OverlayManager, RecordingHooks) {
        let manager = OverlayManager::new(|_: &str| true);
        let hooks = RecordingHooks::new();
        for id in ids {
            manager.register(*id, OverlayConfig::default(), hooks.clone());
        }
        (manager, hooks)
    }

    #[test]
    fn test_overlay_config_default() {
        let config = OverlayConfig::default();
        assert!(config.close_on_outside_click);
        assert!(config.lock_scroll);
    }

    #[test]
    fn test_overlay_config_builder() {
        let config = OverlayConfig::new()
            .close_on_outside_click(false)
            .lock_scroll(false);
        assert!(!config.close_on_outside_click);
        assert!(!config.lock_scroll);
    }

    #[test]
    fn test_register_returns_id() {
        let manager = OverlayManager::new(|_: &str| true);
        let id = manager.register("#demo", OverlayConfig::default(), NoHooks);
        assert_eq!(id, Some(OverlayId::from("#demo")));
        assert!(manager.is_registered("#demo"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_register_unresolved_anchor() {
        let manager = OverlayManager::new(|id: &str| id != "#missing");
        assert!(manager
            .register("#missing", OverlayConfig::default(), NoHooks)
            .is_none());
        assert!(!manager.is_registered("#missing"));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_reregister_does_not_close() {
        let (manager, hooks) = manager_with(&["#a"]);
        manager.open("#a").unwrap();
        manager.register("#a", OverlayConfig::default(), NoHooks);
        assert!(manager.is_open("#a"));
        assert_eq!(hooks.calls(), vec![HookCall::open("#a")]);
    }

    #[test]
    fn test_open_unknown() {
        let (manager, hooks) = manager_with(&["#a"]);
        assert!(!manager.open("#nope").unwrap());
        assert!(manager.current().is_none());
        assert!(hooks.calls().is_empty());
    }

    #[test]
    fn test_open_closes_previous_first() {
        let (manager, hooks) = manager_with(&["#a", "#b"]);
        assert!(manager.open("#a").unwrap());
        assert!(manager.open("#b").unwrap());
        assert!(!manager.is_open("#a"));
        assert!(manager.is_open("#b"));
        assert_eq!(
            hooks.calls(),
            vec![
                HookCall::open("#a"),
                HookCall::close("#a"),
                HookCall::open("#b")
            ]
        );
    }

    #[test]
    fn test_open_is_idempotent() {
        let (manager, hooks) = manager_with(&["#a"]);
        assert!(manager.open("#a").unwrap());
        assert!(!manager.open("#a").unwrap());
        assert!(manager.is_open("#a"));
        assert_eq!(hooks.calls(), vec![HookCall::open("#a")]);
    }

    #[test]
    fn test_close_unknown() {
        let (manager, _) = manager_with(&["#a"]);
        assert!(!manager.close("#nope").unwrap());
    }

    #[test]
    fn test_close_known_but_closed_still_fires() {
        let (manager, hooks) = manager_with(&["#a", "#b"]);
        manager.open("#b").unwrap();
        assert!(manager.close("#a").unwrap());
        assert!(manager.is_open("#b"));
        assert_eq!(
            hooks.calls(),
            vec![HookCall::open("#b"), HookCall::close("#a")]
        );
    }

    #[test]
    fn test_close_current() {
        let (manager, _) = manager_with(&["#a"]);
        assert!(!manager.close_current().unwrap());
        manager.open("#a").unwrap();
        assert!(manager.close_current().unwrap());
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_toggle() {
        let (manager, _) = manager_with(&["#a", "#b"]);
        assert!(manager.toggle("#a").unwrap());
        assert!(manager.is_open("#a"));
        assert!(manager.toggle("#b").unwrap());
        assert!(manager.is_open("#b"));
        assert!(manager.toggle("#b").unwrap());
        assert!(manager.current().is_none());
        assert!(!manager.toggle("#nope").unwrap());
    }

    #[test]
    fn test_escape_closes_current() {
        let (manager, hooks) = manager_with(&["#a", "#b"]);
        manager.open("#a").unwrap();
        assert!(manager.handle_event(&Event::key(Key::Escape)).unwrap());
        assert!(manager.current().is_none());
        assert!(!manager.is_open("#b"));
        assert_eq!(
            hooks.calls(),
            vec![HookCall::open("#a"), HookCall::close("#a")]
        );
    }

    #[test]
    fn test_escape_with_nothing_open() {
        let (manager, hooks) = manager_with(&["#a"]);
        assert!(!manager.handle_event(&Event::key(Key::Escape)).unwrap());
        assert!(hooks.calls().is_empty());
    }

    #[test]
    fn test_other_keys_ignored() {
        let (manager, _) = manager_with(&["#a"]);
        manager.open("#a").unwrap();
        assert!(!manager.handle_event(&Event::key(Key::Enter)).unwrap());
        assert!(manager.is_open("#a"));
    }

    #[test]
    fn test_backdrop_click_respects_config() {
        let manager = OverlayManager::new(|_: &str| true);
        manager.register("#soft", OverlayConfig::default(), NoHooks);
        manager.register(
            "#static",
            OverlayConfig::new().close_on_outside_click(false),
            NoHooks,
        );

        manager.open("#static").unwrap();
        let click = Event::click(ClickTarget::Backdrop("#static".into()));
        assert!(!manager.handle_event(&click).unwrap());
        assert!(manager.is_open("#static"));

        manager.open("#soft").unwrap();
        let click = Event::click(ClickTarget::Backdrop("#soft".into()));
        assert!(manager.handle_event(&click).unwrap());
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_close_button_and_content_click() {
        let (manager, _) = manager_with(&["#a"]);
        manager.open("#a").unwrap();
        let inside = Event::click(ClickTarget::Content("#a".into()));
        assert!(!manager.handle_event(&inside).unwrap());
        assert!(manager.is_open("#a"));

        let close = Event::click(ClickTarget::CloseButton("#a".into()));
        assert!(manager.handle_event(&close).unwrap());
        assert!(!manager.is_open("#a"));
    }

    #[test]
    fn test_scroll_locked() {
        let manager = OverlayManager::new(|_: &str| true);
        manager.register("#locks", OverlayConfig::default(), NoHooks);
        manager.register("#free", OverlayConfig::new().lock_scroll(false), NoHooks);
        assert!(!manager.scroll_locked());
        manager.open("#locks").unwrap();
        assert!(manager.scroll_locked());
        manager.open("#free").unwrap();
        assert!(!manager.scroll_locked());
    }

    #[test]
    fn test_destroy() {
        let (manager, hooks) = manager_with(&["#a", "#b"]);
        manager.open("#b").unwrap();
        manager.destroy().unwrap();
        assert!(manager.is_empty());
        assert!(manager.current().is_none());
        assert_eq!(
            hooks.calls(),
            vec![
                HookCall::open("#b"),
                HookCall::close("#a"),
                HookCall::close("#b")
            ]
        );
        assert!(!manager.open("#a").unwrap());
    }

    struct Reopener {
        manager: RefCell<Option<Rc<OverlayManager>>>,
        result: RefCell<Option<Result<bool, OverlayError>>>,
    }

    impl OverlayHooks for Rc<Reopener> {
        fn on_close(&self, _id: &OverlayId) {
            if let Some(manager) = self.manager.borrow().as_ref() {
                *self.result.borrow_mut() = Some(manager.open("#b"));
            }
        }
    }

    #[test]
    fn test_reentrant_open_from_on_close_is_rejected() {
        let manager = Rc::new(OverlayManager::new(|_: &str| true));
        let reopener = Rc::new(Reopener {
            manager: RefCell::new(Some(Rc::clone(&manager))),
            result: RefCell::new(None),
        });
        manager.register("#a", OverlayConfig::default(), Rc::clone(&reopener));
        manager.register("#b", OverlayConfig::default(), NoHooks);

        manager.open("#a").unwrap();
        assert!(manager.close("#a").unwrap());

        assert_eq!(
            reopener.result.borrow_mut().take(),
            Some(Err(OverlayError::Reentrant { operation: "open" }))
        );
        assert!(manager.current().is_none());

        // The guard is released once the hook returns.
        assert!(manager.open("#b").unwrap());

        // Break the Rc cycle.
        reopener.manager.borrow_mut().take();
    }

    #[test]
    fn test_debug_lists_registrations() {
        let (manager, _) = manager_with(&["#a"]);
        let debug_str = format!("{manager:?}");
        assert!(debug_str.contains("#a"));
    }
}
