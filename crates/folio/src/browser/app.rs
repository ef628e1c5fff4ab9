//! WASM entry point for the portfolio page.

use super::dom::{BodyScrollHooks, DomAnchorResolver, DomPresenter};
use super::format::{format_number, format_relative_time};
use super::social::{
    parse_platform_stats, FetchError, Platform, PlatformStats, StatsCache, StatsFetcher,
};
use super::storage::Storage;
use folio_content::Catalog;
use folio_core::{
    ClickTarget, Event, GalleryStats, Key, Lightbox, LightboxAction, Listing, OverlayConfig, OverlayError,
    OverlayId, OverlayManager, Pager, SortMode,
};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, KeyboardEvent};

/// Attribute identifying project cards.
const PROJECT_ATTRIBUTE: &str = "data-project-id";
/// Attribute identifying gallery items.
const GALLERY_ATTRIBUTE: &str = "data-image-id";
/// Selector of close buttons inside overlays.
const CLOSE_BUTTON_SELECTOR: &str = ".modal-close";

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn log_error(context: &str, err: &impl std::fmt::Display) {
    tracing::warn!(%err, "{context}");
    web_sys::console::error_1(&JsValue::from_str(&format!("{context}: {err}")));
}

fn overlay_result(result: Result<bool, OverlayError>) -> Result<bool, JsValue> {
    result.map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Page-level state: overlays, the two listings, lightbox and stats.
#[wasm_bindgen]
pub struct PortfolioApp {
    document: Document,
    overlays: Rc<OverlayManager>,
    projects: Listing<DomPresenter>,
    gallery: Listing<DomPresenter>,
    lightbox: Lightbox,
    pager: Pager,
    stats: StatsCache,
    storage: Storage,
    keydown_callback: Option<Closure<dyn FnMut(KeyboardEvent)>>,
    click_callbacks: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl PortfolioApp {
    /// Attach to the project and gallery containers by element id.
    ///
    /// `catalog_yaml` replaces the built-in catalog when given.
    #[wasm_bindgen(constructor)]
    pub fn new(
        projects_container: &str,
        gallery_container: &str,
        catalog_yaml: Option<String>,
    ) -> Result<PortfolioApp, JsValue> {
        console_error_panic_hook::set_once();

        let document = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        let container = |id: &str| -> Result<Element, JsValue> {
            document
                .get_element_by_id(id)
                .ok_or_else(|| JsValue::from_str(&format!("Container '{id}' not found")))
        };

        let catalog = match catalog_yaml {
            Some(yaml) => Catalog::from_yaml(&yaml),
            None => folio_content::builtin(),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let projects = Listing::new(
            catalog.projects(),
            DomPresenter::new(container(projects_container)?, PROJECT_ATTRIBUTE),
        );
        let gallery = Listing::new(
            catalog.gallery(),
            DomPresenter::new(container(gallery_container)?, GALLERY_ATTRIBUTE),
        );

        Ok(Self {
            overlays: Rc::new(OverlayManager::new(DomAnchorResolver::new(document.clone()))),
            document,
            projects,
            gallery,
            lightbox: Lightbox::new(),
            pager: Pager::default(),
            stats: StatsCache::new(),
            storage: Storage::local(),
            keydown_callback: None,
            click_callbacks: Vec::new(),
        })
    }

    /// Filter a section by category; `"all"` clears the filter.
    /// Returns the number of visible tiles.
    pub fn set_filter(&mut self, section: &str, category: &str) -> Result<usize, JsValue> {
        let visible = self.listing(section)?.set_category(category).visible.len();
        self.reset_gallery_view(section);
        Ok(visible)
    }

    /// Search a section. Returns the number of visible tiles.
    pub fn set_search(&mut self, section: &str, term: &str) -> Result<usize, JsValue> {
        let visible = self.listing(section)?.set_search_term(term).visible.len();
        self.reset_gallery_view(section);
        Ok(visible)
    }

    /// Sort a section by `newest`, `complexity`, `fun`, `popular` or `date`.
    pub fn set_sort(&mut self, section: &str, mode: &str) -> Result<(), JsValue> {
        let mode = mode
            .parse::<SortMode>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.listing(section)?.set_sort_mode(mode);
        self.reset_gallery_view(section);
        Ok(())
    }

    /// Visible tile ids of a section in display order.
    pub fn visible_ids(&mut self, section: &str) -> Result<Vec<String>, JsValue> {
        Ok(self
            .listing(section)?
            .visible_ids()
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Register an overlay by selector. Returns `false` if no element matches.
    pub fn register_overlay(&mut self, selector: &str, close_on_outside_click: bool, lock_scroll: bool) -> bool {
        let config = OverlayConfig::new()
            .close_on_outside_click(close_on_outside_click)
            .lock_scroll(lock_scroll);
        let hooks = BodyScrollHooks::new(self.document.clone(), lock_scroll, &self.overlays);
        let Some(id) = self.overlays.register(selector, config, hooks) else {
            return false;
        };
        if let Ok(Some(element)) = self.document.query_selector(selector) {
            self.listen_for_clicks(&element, id);
        }
        true
    }

    /// Open an overlay, closing any other.
    pub fn open_overlay(&self, id: &str) -> Result<bool, JsValue> {
        overlay_result(self.overlays.open(id))
    }

    /// Close an overlay.
    pub fn close_overlay(&self, id: &str) -> Result<bool, JsValue> {
        overlay_result(self.overlays.close(id))
    }

    /// Open or close an overlay.
    pub fn toggle_overlay(&self, id: &str) -> Result<bool, JsValue> {
        overlay_result(self.overlays.toggle(id))
    }

    /// The open overlay, if any.
    pub fn current_overlay(&self) -> Option<String> {
        self.overlays.current().map(|id| id.to_string())
    }

    /// Route document key presses: Escape closes the open overlay.
    pub fn install_keyboard(&mut self) {
        let overlays = Rc::clone(&self.overlays);
        let cb = Closure::<dyn FnMut(KeyboardEvent)>::new(move |e: KeyboardEvent| {
            let key = Key::from_dom_key(&e.key());
            if let Err(err) = overlays.handle_event(&Event::key(key)) {
                log_error("overlay key", &err);
            }
        });
        if self
            .document
            .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("failed to attach keydown listener");
        }
        self.keydown_callback = Some(cb);
    }

    /// Open the lightbox on the gallery item at `index` of the visible order.
    pub fn open_lightbox(&mut self, index: usize) -> bool {
        let len = self.gallery.partition().visible.len();
        let opened = self.lightbox.open_at(index, len);
        if opened {
            let id = self.gallery.visible_ids().get(index).map(|id| (*id).to_string());
            if let Some(id) = id {
                self.gallery.record_view(&id);
            }
        }
        opened
    }

    /// Apply a key press to the lightbox. Returns whether it changed.
    pub fn lightbox_key(&mut self, key: &str) -> bool {
        let len = self.gallery.partition().visible.len();
        LightboxAction::from_key(Key::from_dom_key(key))
            .is_some_and(|action| self.lightbox.apply(action, len))
    }

    /// Apply a swipe to the lightbox. Returns whether it changed.
    pub fn lightbox_swipe(&mut self, dx: f32, dy: f32) -> bool {
        let len = self.gallery.partition().visible.len();
        LightboxAction::from_swipe(dx, dy).is_some_and(|action| self.lightbox.apply(action, len))
    }

    /// Id of the gallery item shown in the lightbox.
    pub fn lightbox_item(&self) -> Option<String> {
        let index = self.lightbox.current()?;
        self.gallery.visible_ids().get(index).map(|id| (*id).to_string())
    }

    /// Lightbox position label, e.g. `"3 / 12"`.
    pub fn lightbox_counter(&self) -> Option<String> {
        self.lightbox.counter_label(self.gallery.partition().visible.len())
    }

    /// Like a gallery item. Returns the new like count.
    pub fn like(&mut self, id: &str) -> Option<u32> {
        self.gallery
            .record_like(id)
            .map(|likes| u32::try_from(likes).unwrap_or(u32::MAX))
    }

    /// Number of gallery items to show.
    pub fn gallery_visible_count(&self) -> usize {
        self.pager.visible_count(self.gallery.partition().visible.len())
    }

    /// Show the next page of gallery items. Returns whether more are shown.
    pub fn load_more(&mut self) -> bool {
        self.pager.load_more(self.gallery.partition().visible.len())
    }

    /// Gallery totals as JSON.
    pub fn gallery_stats_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&GalleryStats::compute(self.gallery.tiles()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Social statistics as JSON.
    ///
    /// `fetch(platform)` is called per platform whose figures are not
    /// cached and must return them as a JSON string. Platforms that fail
    /// use figures stored within the last hour, or plausible fallbacks.
    pub fn social_stats_json(&mut self, fetch: js_sys::Function) -> Result<String, JsValue> {
        let snapshot = self.stats.collect(
            &self.storage,
            now_ms(),
            &JsFetcher(fetch),
            &mut rand::thread_rng(),
        );
        serde_json::to_string(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Release overlays and listeners.
    pub fn destroy(&mut self) -> Result<(), JsValue> {
        self.overlays
            .destroy()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.click_callbacks.clear();
        if let Some(cb) = self.keydown_callback.take() {
            let _ = self
                .document
                .remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
        }
        Ok(())
    }
}

impl PortfolioApp {
    fn listing(&mut self, section: &str) -> Result<&mut Listing<DomPresenter>, JsValue> {
        match section {
            "projects" => Ok(&mut self.projects),
            "gallery" => Ok(&mut self.gallery),
            other => Err(JsValue::from_str(&format!("Unknown section '{other}'"))),
        }
    }

    fn reset_gallery_view(&mut self, section: &str) {
        if section == "gallery" {
            self.pager.reset();
            self.lightbox.close();
        }
    }

    fn listen_for_clicks(&mut self, overlay: &Element, id: OverlayId) {
        let overlays = Rc::clone(&self.overlays);
        let overlay_element = overlay.clone();
        let cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |e: web_sys::Event| {
            let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let click = if target == overlay_element {
                ClickTarget::Backdrop(id.clone())
            } else if matches!(target.closest(CLOSE_BUTTON_SELECTOR), Ok(Some(_))) {
                ClickTarget::CloseButton(id.clone())
            } else {
                ClickTarget::Content(id.clone())
            };
            if let Err(err) = overlays.handle_event(&Event::click(click)) {
                log_error("overlay click", &err);
            }
        });
        if overlay
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(overlay = %overlay.id(), "failed to attach click listener");
        }
        self.click_callbacks.push(cb);
    }
}

/// Fetches platform figures through a JS callback.
struct JsFetcher(js_sys::Function);

impl StatsFetcher for JsFetcher {
    fn fetch(&self, platform: Platform) -> Result<PlatformStats, FetchError> {
        let value = self
            .0
            .call1(&JsValue::NULL, &JsValue::from_str(platform.as_str()))
            .map_err(|_| FetchError::Unavailable { platform })?;
        let json = value.as_string().ok_or_else(|| FetchError::Malformed {
            platform,
            reason: "expected a JSON string".to_string(),
        })?;
        parse_platform_stats(platform, &json)
    }
}

/// Compact count, e.g. `"1.2K"`.
#[wasm_bindgen(js_name = formatNumber)]
pub fn format_number_js(n: f64) -> String {
    format_number(n.max(0.0) as u64)
}

/// Age of a timestamp relative to now, e.g. `"5m ago"`.
#[wasm_bindgen(js_name = formatRelativeTime)]
pub fn format_relative_time_js(timestamp_ms: f64) -> String {
    format_relative_time(timestamp_ms.max(0.0) as u64, now_ms())
}
