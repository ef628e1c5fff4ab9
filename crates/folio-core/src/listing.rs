//! Filter/sort/search pipeline for project and gallery listings.
//!
//! A [`Listing`] owns a fixed collection of tiles and three independently set
//! criteria: category, search term and sort mode. Every setter triggers
//! exactly one [`Listing::recompute`], which partitions the tiles into a
//! stably sorted `visible` list and a `hidden` list in ingestion order and
//! hands both to a [`Presenter`]. The listing itself never touches the
//! rendering layer.
//!
//! # Example
//!
//! ```
//! use folio_core::{Listing, SortField, SortMode, Tile};
//! use folio_core::testing::RecordingPresenter;
//!
//! let tiles = vec![
//!     Tile::builder("web-1", "web").sort_key(SortField::Complexity, "2").build(),
//!     Tile::builder("game-1", "game").sort_key(SortField::Complexity, "9").build(),
//!     Tile::builder("web-2", "web").sort_key(SortField::Complexity, "5").build(),
//! ];
//! let mut listing = Listing::new(tiles, RecordingPresenter::new());
//!
//! listing.set_category("web");
//! listing.set_sort_mode(SortMode::Complexity);
//! assert_eq!(listing.visible_ids(), ["web-2", "web-1"]);
//! assert_eq!(listing.hidden_ids(), ["game-1"]);
//! ```

use crate::tile::{SortField, Tile, TileId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Every tile passes
    #[default]
    All,
    /// Only tiles with exactly this tag pass
    Tag(String),
}

impl Category {
    /// Whether a tile passes this filter.
    #[must_use]
    pub fn matches(&self, tile: &Tile) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => tile.category == *tag,
        }
    }
}

impl From<&str> for Category {
    /// `"all"` maps to [`Category::All`], anything else is a tag.
    fn from(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Tag(value.to_string())
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Tag(value)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Ordering of the visible tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Ingestion order
    #[default]
    Newest,
    /// Descending complexity
    Complexity,
    /// Descending fun rating
    Fun,
    /// Descending view count
    Popular,
    /// Descending publication date
    Date,
}

impl SortMode {
    /// All sort modes.
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::Complexity,
        Self::Fun,
        Self::Popular,
        Self::Date,
    ];

    /// The attribute this mode orders by, `None` for ingestion order.
    #[must_use]
    pub const fn field(self) -> Option<SortField> {
        match self {
            Self::Newest => None,
            Self::Complexity => Some(SortField::Complexity),
            Self::Fun => Some(SortField::Fun),
            Self::Popular => Some(SortField::Views),
            Self::Date => Some(SortField::Date),
        }
    }

    /// Name used in markup (`data-sort`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Complexity => "complexity",
            Self::Fun => "fun",
            Self::Popular => "popular",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort mode: {0}")]
pub struct ParseSortModeError(pub String);

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortModeError(s.to_string()))
    }
}

/// The three criteria a listing is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Active category filter
    pub category: Category,
    /// Search term, already trimmed and lowercased
    search_term: String,
    /// Active sort mode
    pub sort_mode: SortMode,
}

impl Criteria {
    /// Create default criteria: all categories, no search, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the search term.
    #[must_use]
    pub fn search(mut self, term: &str) -> Self {
        self.set_search_term(term);
        self
    }

    /// Set the sort mode.
    #[must_use]
    pub const fn sort(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    /// The normalized search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_lowercase();
    }

    /// Whether a tile is visible under these criteria.
    #[must_use]
    pub fn is_visible(&self, tile: &Tile) -> bool {
        self.category.matches(tile) && tile.matches_term(&self.search_term)
    }
}

/// Result of a recompute, as indices into the listing's tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Visible tiles in presentation order
    pub visible: Vec<usize>,
    /// Hidden tiles in ingestion order
    pub hidden: Vec<usize>,
}

impl Partition {
    /// Compute the partition of `tiles` under `criteria`.
    ///
    /// This is a pure function of its inputs.
    #[must_use]
    pub fn compute(tiles: &[Tile], criteria: &Criteria) -> Self {
        let (mut visible, hidden): (Vec<usize>, Vec<usize>) =
            (0..tiles.len()).partition(|&i| criteria.is_visible(&tiles[i]));

        if let Some(field) = criteria.sort_mode.field() {
            let mut keyed: Vec<(f64, usize)> = visible
                .iter()
                .map(|&i| (tiles[i].sort_keys.value(field), i))
                .collect();
            // Stable: equal keys keep ingestion order.
            keyed.sort_by(|a, b| descending(a.0, b.0));
            visible = keyed.into_iter().map(|(_, i)| i).collect();
        }

        Self { visible, hidden }
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Applies pipeline output to the rendering layer.
pub trait Presenter {
    /// Show or hide one tile.
    fn apply_visibility(&mut self, tile: &Tile, visible: bool);

    /// Place visible tiles in this order.
    fn reorder(&mut self, ids_in_order: &[&TileId]);

    /// Apply a whole recompute result. The default shows/hides every tile
    /// and then reorders the visible ones.
    fn apply(&mut self, visible: &[&Tile], hidden: &[&Tile]) {
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

/// A presenter that ignores all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply_visibility(&mut self, _tile: &Tile, _visible: bool) {}

    fn reorder(&mut self, _ids_in_order: &[&TileId]) {}
}

/// A filterable, searchable, sortable collection of tiles.
#[derive(Debug)]
pub struct Listing<P> {
    tiles: Vec<Tile>,
    criteria: Criteria,
    partition: Partition,
    presenter: P,
    recomputes: u64,
}

impl<P: Presenter> Listing<P> {
    /// Create a listing and present its initial state.
    pub fn new(tiles: Vec<Tile>, presenter: P) -> Self {
        Self::with_criteria(tiles, Criteria::default(), presenter)
    }

    /// Create a listing with non-default starting criteria.
    pub fn with_criteria(tiles: Vec<Tile>, criteria: Criteria, presenter: P) -> Self {
        let mut listing = Self {
            tiles,
            criteria,
            partition: Partition::default(),
            presenter,
            recomputes: 0,
        };
        listing.recompute();
        listing
    }

    /// Set the category filter and recompute.
    pub fn set_category(&mut self, category: impl Into<Category>) -> &Partition {
        self.criteria.category = category.into();
        self.recompute()
    }

    /// Set the search term and recompute.
    pub fn set_search_term(&mut self, term: &str) -> &Partition {
        self.criteria.set_search_term(term);
        self.recompute()
    }

    /// Set the sort mode and recompute.
    pub fn set_sort_mode(&mut self, mode: SortMode) -> &Partition {
        self.criteria.sort_mode = mode;
        self.recompute()
    }

    /// Recompute visibility and order, then hand the result to the presenter.
    pub fn recompute(&mut self) -> &Partition {
        self.partition = Partition::compute(&self.tiles, &self.criteria);
        self.recomputes += 1;

        let visible: Vec<&Tile> = self.partition.visible.iter().map(|&i| &self.tiles[i]).collect();
        let hidden: Vec<&Tile> = self.partition.hidden.iter().map(|&i| &self.tiles[i]).collect();
        debug!(
            category = %self.criteria.category,
            search = self.criteria.search_term(),
            sort = %self.criteria.sort_mode,
            visible = visible.len(),
            hidden = hidden.len(),
            "listing recomputed"
        );
        self.presenter.apply(&visible, &hidden);
        &self.partition
    }
}

impl<P> Listing<P> {
    /// The last computed partition.
    #[must_use]
    pub const fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Active criteria.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// All tiles in ingestion order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile by id.
    #[must_use]
    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id.as_str() == id)
    }

    /// Visible tiles in presentation order.
    pub fn visible_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.partition.visible.iter().map(|&i| &self.tiles[i])
    }

    /// Ids of visible tiles in presentation order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<&str> {
        self.partition
            .visible
            .iter()
            .map(|&i| self.tiles[i].id.as_str())
            .collect()
    }

    /// Ids of hidden tiles in ingestion order.
    #[must_use]
    pub fn hidden_ids(&self) -> Vec<&str> {
        self.partition
            .hidden
            .iter()
            .map(|&i| self.tiles[i].id.as_str())
            .collect()
    }

    /// Number of recomputes so far, including the initial one.
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// The presenter.
    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Count a view of `id`. Does not recompute.
    pub fn record_view(&mut self, id: &str) -> Option<u64> {
        let tile = self.tiles.iter_mut().find(|tile| tile.id.as_str() == id)?;
        tile.counters.views += 1;
        Some(tile.counters.views)
    }

    /// Count a like of `id`. Does not recompute.
    pub fn record_like(&mut self, id: &str) -> Option<u64> {
        let tile = self.tiles.iter_mut().find(|tile| tile.id.as_str() == id)?;
        tile.counters.likes += 1;
        Some(tile.counters.likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingPresenter;

    fn tile(id: &str, category: &str, complexity: &str, fun: &str) -> Tile {
        Tile::builder(id, category)
            .name(id)
            .sort_key(SortField::Complexity, complexity)
            .sort_key(SortField::Fun, fun)
            .build()
    }

    fn sample() -> Vec<Tile> {
        vec![
            tile("cyber-city", "web", "8", "6"),
            tile("cyber-runner", "game", "5", "9"),
            tile("data-dashboard", "web", "6", "3"),
            tile("terminal-quest", "game", "5", "8"),
        ]
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("all"), Category::All);
        assert_eq!(Category::from("web"), Category::Tag("web".to_string()));
        assert_eq!(Category::from("web".to_string()).to_string(), "web");
        assert_eq!(Category::All.to_string(), "all");
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("newest".parse::<SortMode>(), Ok(SortMode::Newest));
        assert_eq!("Complexity".parse::<SortMode>(), Ok(SortMode::Complexity));
        assert_eq!(" fun ".parse::<SortMode>(), Ok(SortMode::Fun));
        assert_eq!("popular".parse::<SortMode>(), Ok(SortMode::Popular));
        assert_eq!("date".parse::<SortMode>(), Ok(SortMode::Date));
        assert_eq!(
            "random".parse::<SortMode>(),
            Err(ParseSortModeError("random".to_string()))
        );
    }

    #[test]
    fn test_sort_mode_display_roundtrip() {
        for mode in SortMode::ALL {
            assert_eq!(mode.to_string().parse::<SortMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_initial_recompute() {
        let listing = Listing::new(sample(), RecordingPresenter::new());
        assert_eq!(listing.recompute_count(), 1);
        assert_eq!(listing.presenter().apply_count(), 1);
        assert_eq!(
            listing.visible_ids(),
            ["cyber-city", "cyber-runner", "data-dashboard", "terminal-quest"]
        );
        assert!(listing.hidden_ids().is_empty());
    }

    #[test]
    fn test_setters_recompute_once_each() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_category("web");
        listing.set_search_term("cyber");
        listing.set_sort_mode(SortMode::Fun);
        assert_eq!(listing.recompute_count(), 4);
        assert_eq!(listing.presenter().apply_count(), 4);
    }

    #[test]
    fn test_filter_by_category() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_category("game");
        assert_eq!(listing.visible_ids(), ["cyber-runner", "terminal-quest"]);
        assert_eq!(listing.hidden_ids(), ["cyber-city", "data-dashboard"]);

        listing.set_category(Category::All);
        assert_eq!(listing.visible_ids().len(), 4);
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_search_term("  CYBER ");
        assert_eq!(listing.criteria().search_term(), "cyber");
        assert_eq!(listing.visible_ids(), ["cyber-city", "cyber-runner"]);
    }

    #[test]
    fn test_category_and_search_combine() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_category("web");
        listing.set_search_term("cyber");
        assert_eq!(listing.visible_ids(), ["cyber-city"]);
        assert_eq!(
            listing.hidden_ids(),
            ["cyber-runner", "data-dashboard", "terminal-quest"]
        );
    }

    #[test]
    fn test_empty_result_is_presented() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        let partition = listing.set_search_term("xyz");
        assert!(partition.is_empty());
        assert_eq!(partition.hidden.len(), 4);
        assert!(listing.presenter().last_order().is_empty());
    }

    #[test]
    fn test_sort_complexity_stable() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Complexity);
        assert_eq!(
            listing.visible_ids(),
            ["cyber-city", "data-dashboard", "cyber-runner", "terminal-quest"]
        );
    }

    #[test]
    fn test_sort_fun() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Fun);
        assert_eq!(
            listing.visible_ids(),
            ["cyber-runner", "terminal-quest", "cyber-city", "data-dashboard"]
        );
    }

    #[test]
    fn test_newest_restores_ingestion_order() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Fun);
        listing.set_sort_mode(SortMode::Newest);
        assert_eq!(
            listing.visible_ids(),
            ["cyber-city", "cyber-runner", "data-dashboard", "terminal-quest"]
        );
    }

    #[test]
    fn test_malformed_sort_key_reads_as_zero() {
        let tiles = vec![
            tile("a", "web", "oops", "0"),
            tile("b", "web", "1", "0"),
            tile("c", "web", "-1", "0"),
        ];
        let mut listing = Listing::new(tiles, RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Complexity);
        assert_eq!(listing.visible_ids(), ["b", "a", "c"]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        let tiles = vec![
            tile("a", "web", "-0", "0"),
            tile("b", "web", "0", "0"),
            tile("c", "web", "0.0", "0"),
        ];
        let mut listing = Listing::new(tiles, RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Complexity);
        assert_eq!(listing.visible_ids(), ["a", "b", "c"]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_sort_mode(SortMode::Complexity);
        let first = listing.partition().clone();
        let second = listing.recompute().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_presenter_receives_visibility_and_order() {
        let mut listing = Listing::new(sample(), RecordingPresenter::new());
        listing.set_category("game");
        let presenter = listing.presenter();
        assert_eq!(presenter.last_order(), ["cyber-runner", "terminal-quest"]);
        assert_eq!(presenter.is_visible("cyber-city"), Some(false));
        assert_eq!(presenter.is_visible("cyber-runner"), Some(true));
    }

    #[test]
    fn test_with_criteria() {
        let criteria = Criteria::new().category("web").sort(SortMode::Complexity);
        let listing = Listing::with_criteria(sample(), criteria, NullPresenter);
        assert_eq!(listing.visible_ids(), ["cyber-city", "data-dashboard"]);
    }

    #[test]
    fn test_record_view_and_like_do_not_recompute() {
        let mut listing = Listing::new(sample(), NullPresenter);
        assert_eq!(listing.record_view("cyber-city"), Some(1));
        assert_eq!(listing.record_view("cyber-city"), Some(2));
        assert_eq!(listing.record_like("cyber-city"), Some(1));
        assert_eq!(listing.record_view("missing"), None);
        assert_eq!(listing.recompute_count(), 1);
        assert_eq!(listing.tile("cyber-city").map(|t| t.counters.views), Some(2));
    }

    #[test]
    fn test_visible_tiles_iter() {
        let mut listing = Listing::new(sample(), NullPresenter);
        listing.set_category("web");
        let names: Vec<&str> = listing.visible_tiles().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["cyber-city", "data-dashboard"]);
    }
}
