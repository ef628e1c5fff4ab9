//! "Load more" pagination over a visible list.

use serde::{Deserialize, Serialize};

/// Default number of items revealed per page.
pub const DEFAULT_PER_PAGE: usize = 12;

/// Reveals a growing prefix of a list, one page at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    per_page: usize,
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Pager {
    /// Create a pager on page 1. A zero page size is treated as 1.
    #[must_use]
    pub const fn new(per_page: usize) -> Self {
        Self {
            per_page: if per_page == 0 { 1 } else { per_page },
            page: 1,
        }
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Current page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// How many of `total` items are revealed.
    #[must_use]
    pub fn visible_count(&self, total: usize) -> usize {
        self.page.saturating_mul(self.per_page).min(total)
    }

    /// Whether some of `total` items are still unrevealed.
    #[must_use]
    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count(total) < total
    }

    /// Reveal one more page. Returns `false` if everything is already shown.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.page += 1;
        true
    }

    /// Back to page 1, e.g. after the criteria changed.
    pub fn reset(&mut self) {
        self.page = 1;
    }
}
