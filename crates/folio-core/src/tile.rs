//! Tile records: one project card or gallery image.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of a tile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    /// Create a tile id.
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

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for TileId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric attributes used only for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Project complexity rating
    Complexity,
    /// Project fun rating
    Fun,
    /// View count at ingestion
    Views,
    /// Publication date as `YYYYMMDD`
    Date,
}

/// Raw sort attributes of a tile.
///
/// Values are kept as given; anything that does not parse as a number reads
/// as `0` so that sorting stays total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKeys(BTreeMap<SortField, String>);

impl SortKeys {
    /// Create an empty key set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value.
    #[must_use]
    pub fn with(mut self, field: SortField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a raw value in place.
    pub fn insert(&mut self, field: SortField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// The raw value of a field.
    #[must_use]
    pub fn raw(&self, field: SortField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Numeric value of a field, `0.0` if missing or malformed.
    #[must_use]
    pub fn value(&self, field: SortField) -> f64 {
        self.raw(field)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            // -0 must tie with 0
            .map(|v| if v == 0.0 { 0.0 } else { v })
            .unwrap_or(0.0)
    }
}

/// Cosmetic view/like counters. Never part of filtering or ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Times opened
    pub views: u64,
    /// Times liked
    pub likes: u64,
}

/// One listing entry.
///
/// Deserialized tiles go through [`TileBuilder`], so searchable text is
/// always case-folded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TileRecord")]
pub struct Tile {
    /// Stable identifier
    pub id: TileId,
    /// Display name
    pub name: String,
    /// Category or theme tag used for filtering
    pub category: String,
    /// Case-folded name, description and tags
    searchable_text: String,
    /// Ordering attributes
    pub sort_keys: SortKeys,
    /// Cosmetic counters
    #[serde(default)]
    pub counters: Counters,
}

impl Tile {
    /// Start building a tile.
    pub fn builder(id: impl Into<TileId>, category: impl Into<String>) -> TileBuilder {
        TileBuilder::new(id, category)
    }

    /// The case-folded text search terms are matched against.
    #[must_use]
    pub fn searchable_text(&self) -> &str {
        &self.searchable_text
    }

    /// Whether this tile matches an already case-folded search term.
    #[must_use]
    pub fn matches_term(&self, folded_term: &str) -> bool {
        folded_term.is_empty() || self.searchable_text.contains(folded_term)
    }
}

/// Wire form of a [`Tile`]. `searchable_text` is optional and replaces the
/// text derived from name, description and tags when present.
#[derive(Deserialize)]
struct TileRecord {
    id: TileId,
    #[serde(default)]
    name: String,
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    searchable_text: String,
    #[serde(default)]
    sort_keys: SortKeys,
    #[serde(default)]
    counters: Counters,
}

impl From<TileRecord> for Tile {
    fn from(record: TileRecord) -> Self {
        let mut tile = TileBuilder::new(record.id, record.category)
            .name(record.name)
            .description(record.description)
            .tags(record.tags)
            .build();
        if !record.searchable_text.is_empty() {
            tile.searchable_text = record.searchable_text.to_lowercase();
        }
        tile.sort_keys = record.sort_keys;
        tile.counters = record.counters;
        tile
    }
}

/// Builder for [`Tile`].
///
/// Searchable text is folded to lowercase once in [`TileBuilder::build`].
#[derive(Debug, Clone)]
pub struct TileBuilder {
    id: TileId,
    category: String,
    name: String,
    description: String,
    tags: Vec<String>,
    sort_keys: SortKeys,
    counters: Counters,
}

impl TileBuilder {
    /// Create a builder.
    pub fn new(id: impl Into<TileId>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: String::new(),
            description: String::new(),
            tags: Vec::new(),
            sort_keys: SortKeys::new(),
            counters: Counters::default(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a technology or tag label.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add several labels.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set a sort attribute.
    #[must_use]
    pub fn sort_key(mut self, field: SortField, value: impl Into<String>) -> Self {
        self.sort_keys.insert(field, value);
        self
    }

    /// Set the starting counters.
    #[must_use]
    pub const fn counters(mut self, views: u64, likes: u64) -> Self {
        self.counters = Counters { views, likes };
        self
    }

    /// Finish the tile.
    #[must_use]
    pub fn build(self) -> Tile {
        let mut parts = Vec::with_capacity(self.tags.len() + 2);
        for part in [&self.name, &self.description].into_iter().chain(&self.tags) {
            if !part.is_empty() {
                parts.push(part.as_str());
            }
        }
        let searchable_text = parts.join(" ").to_lowercase();

        Tile {
            id: self.id,
            name: self.name,
            category: self.category,
            searchable_text,
            sort_keys: self.sort_keys,
            counters: self.counters,
        }
    }
}
