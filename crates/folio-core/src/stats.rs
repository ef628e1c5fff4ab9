//! Summary figures for a gallery header.

use crate::tile::{SortField, Tile, TileId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts over a tile collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryStats {
    /// Number of tiles
    pub total: usize,
    /// Tiles per category
    pub theme_counts: BTreeMap<String, usize>,
    /// Sum of view counters
    pub total_views: u64,
    /// Sum of like counters
    pub total_likes: u64,
    /// First tile with the most views
    pub most_popular: Option<TileId>,
    /// First tile with the latest date
    pub newest: Option<TileId>,
}

impl GalleryStats {
    /// Compute stats for `tiles`.
    #[must_use]
    pub fn compute(tiles: &[Tile]) -> Self {
        let mut stats = Self {
            total: tiles.len(),
            ..Self::default()
        };

        let mut popular: Option<&Tile> = None;
        let mut newest: Option<(f64, &Tile)> = None;
        for tile in tiles {
            *stats.theme_counts.entry(tile.category.clone()).or_default() += 1;
            stats.total_views += tile.counters.views;
            stats.total_likes += tile.counters.likes;

            if popular.map_or(true, |best| tile.counters.views > best.counters.views) {
                popular = Some(tile);
            }
            let date = tile.sort_keys.value(SortField::Date);
            if newest.map_or(true, |(best, _)| date > best) {
                newest = Some((date, tile));
            }
        }

        stats.most_popular = popular.map(|tile| tile.id.clone());
        stats.newest = newest.map(|(_, tile)| tile.id.clone());
        stats
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn theme_total(&self) -> usize {
        self.theme_counts.len()
    }

    /// Count for one category, `0` if absent.
    #[must_use]
    pub fn count_for(&self, theme: &str) -> usize {
        self.theme_counts.get(theme).copied().unwrap_or(0)
    }
}
