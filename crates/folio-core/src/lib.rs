//! Core state for the folio portfolio site.
//!
//! This crate holds the parts of the site with real state and invariants,
//! free of any rendering dependency:
//! - Overlays: [`OverlayManager`] keeps at most one modal open
//! - Listings: [`Listing`] filters, searches and stably sorts [`Tile`]s
//! - Viewer: [`Lightbox`] navigation and [`Pager`] "load more"
//! - Summaries: [`GalleryStats`]
//!
//! Rendering is injected through [`Presenter`] and [`AnchorResolver`];
//! side effects of opening and closing overlays through [`OverlayHooks`].

mod error;
mod event;
mod lightbox;
mod listing;
mod overlay;
mod pager;
mod stats;
pub mod testing;
mod tile;

pub use error::OverlayError;
pub use event::{ClickTarget, Event, Key};
pub use lightbox::{Lightbox, LightboxAction, SWIPE_CLOSE_THRESHOLD, SWIPE_NAV_THRESHOLD};
pub use listing::{
    Category, Criteria, Listing, NullPresenter, ParseSortModeError, Partition, Presenter, SortMode,
};
pub use overlay::{AnchorResolver, NoHooks, OverlayConfig, OverlayHooks, OverlayId, OverlayManager};
pub use pager::{Pager, DEFAULT_PER_PAGE};
pub use stats::GalleryStats;
pub use tile::{Counters, SortField, SortKeys, Tile, TileBuilder, TileId};
