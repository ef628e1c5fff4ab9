//! Browser runtime for the portfolio page.
//!
//! Storage, the social stats cache and formatting work on every target so
//! they can be tested natively; the DOM adapters and the `wasm_bindgen`
//! entry point only exist on wasm32.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;

// Cross-platform modules
pub mod format;
pub mod social;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use app::PortfolioApp;
#[cfg(target_arch = "wasm32")]
pub use dom::{BodyScrollHooks, DomAnchorResolver, DomPresenter};
pub use format::{format_number, format_relative_time};
pub use social::{
    load_snapshot, parse_platform_stats, save_snapshot, FetchError, GitHubStats, InstagramStats, Platform,
    PlatformStats, SocialSnapshot, StatsCache, StatsCacheConfig, StatsFetcher, TikTokStats, TwitterStats,
    YouTubeStats, LIVE_TTL_MS, STORAGE_KEY, STORAGE_TTL_MS,
};
pub use storage::{Storage, StorageError};
