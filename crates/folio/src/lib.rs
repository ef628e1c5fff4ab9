//! folio: a portfolio site in Rust and WebAssembly.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { PortfolioApp } from './folio.js';
//!
//! async function main() {
//!     await init();
//!     const app = new PortfolioApp('projects-grid', 'gallery-grid');
//!     app.register_overlay('#gallery-modal', true, true);
//!     app.install_keyboard();
//!     app.set_filter('projects', 'game');
//!     app.set_sort('projects', 'fun');
//! }
//! ```

pub use folio_content as content;
pub use folio_core::*;

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::PortfolioApp;

pub use browser::{SocialSnapshot, StatsCache, Storage};
