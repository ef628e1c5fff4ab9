//! Catalog manifest: the static projects and gallery content.

use crate::error::CatalogError;
use folio_core::{SortField, Tile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Which list of the catalog an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Project cards
    Projects,
    /// Gallery images
    Gallery,
}

impl Section {
    /// Name used in manifests and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number or string as written in the manifest.
///
/// Authors write `complexity: 7` and `complexity: "7"` interchangeably, and
/// ids may be numeric. Anything non-numeric reads as 0 when sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free text
    Text(String),
}

impl Scalar {
    /// Value as a count: fractions are truncated, negative or non-numeric
    /// values read as `0`.
    #[must_use]
    pub fn as_count(&self) -> u64 {
        match self {
            Self::Int(v) => u64::try_from(*v).unwrap_or(0),
            Self::Float(v) => float_count(*v),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .unwrap_or_else(|_| s.parse::<f64>().map_or(0, float_count))
            }
        }
    }
}

fn float_count(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v as u64
    } else {
        0
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One project or gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable identifier
    pub id: Scalar,
    /// Display name (`title` in gallery manifests)
    #[serde(alias = "title")]
    pub name: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Category tag (`theme` in gallery manifests)
    #[serde(alias = "theme")]
    pub category: String,
    /// Technology or tag labels
    #[serde(default, alias = "techs")]
    pub tags: Vec<String>,
    /// Complexity rating
    #[serde(default)]
    pub complexity: Option<Scalar>,
    /// Fun rating
    #[serde(default)]
    pub fun: Option<Scalar>,
    /// Starting view count
    #[serde(default)]
    pub views: Option<Scalar>,
    /// Starting like count
    #[serde(default)]
    pub likes: Option<Scalar>,
    /// Publication date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Image source
    #[serde(default)]
    pub src: Option<String>,
    /// Source code link
    #[serde(default)]
    pub url: Option<String>,
    /// Highlighted entry
    #[serde(default)]
    pub featured: bool,
}

impl Entry {
    /// The id as a string.
    #[must_use]
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// Convert into a listing tile.
    #[must_use]
    pub fn to_tile(&self) -> Tile {
        let views = self.views.as_ref().map_or(0, Scalar::as_count);
        let likes = self.likes.as_ref().map_or(0, Scalar::as_count);

        let mut builder = Tile::builder(self.id_string(), self.category.clone())
            .name(self.name.clone())
            .description(self.description.clone())
            .tags(self.tags.iter().cloned())
            .counters(views, likes);
        if let Some(complexity) = &self.complexity {
            builder = builder.sort_key(SortField::Complexity, complexity.to_string());
        }
        if let Some(fun) = &self.fun {
            builder = builder.sort_key(SortField::Fun, fun.to_string());
        }
        if let Some(views) = &self.views {
            builder = builder.sort_key(SortField::Views, views.to_string());
        }
        if let Some(date) = &self.date {
            builder = builder.sort_key(SortField::Date, date_key(date));
        }
        builder.build()
    }
}

/// `2025-12-26` becomes `20251226`; malformed dates pass through unchanged
/// and read as 0 when sorted.
fn date_key(date: &str) -> String {
    let digits: String = date.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 && date.chars().all(|c| c.is_ascii_digit() || c == '-') {
        digits
    } else {
        date.to_string()
    }
}

/// The site's static content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Project cards in display order
    #[serde(default)]
    pub projects: Vec<Entry>,
    /// Gallery images in display order
    #[serde(default)]
    pub gallery: Vec<Entry>,
}

impl Catalog {
    /// Parse a YAML manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml_ng::from_str(yaml)?;
        catalog.validate()?;
        debug!(
            projects = catalog.projects.len(),
            gallery = catalog.gallery.len(),
            "catalog loaded from YAML"
        );
        Ok(catalog)
    }

    /// Parse a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        debug!(
            projects = catalog.projects.len(),
            gallery = catalog.gallery.len(),
            "catalog loaded from JSON"
        );
        Ok(catalog)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Entries of one section.
    #[must_use]
    pub fn entries(&self, section: Section) -> &[Entry] {
        match section {
            Section::Projects => &self.projects,
            Section::Gallery => &self.gallery,
        }
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn entry(&self, section: Section, id: &str) -> Option<&Entry> {
        self.entries(section).iter().find(|e| e.id_string() == id)
    }

    /// Project tiles in ingestion order.
    #[must_use]
    pub fn projects(&self) -> Vec<Tile> {
        self.projects.iter().map(Entry::to_tile).collect()
    }

    /// Gallery tiles in ingestion order.
    #[must_use]
    pub fn gallery(&self) -> Vec<Tile> {
        self.gallery.iter().map(Entry::to_tile).collect()
    }

    /// Distinct categories of a section in first-seen order.
    #[must_use]
    pub fn themes(&self, section: Section) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries(section)
            .iter()
            .map(|e| e.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Check ids, names and categories.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for section in [Section::Projects, Section::Gallery] {
            let mut ids = HashSet::new();
            for (index, entry) in self.entries(section).iter().enumerate() {
                let id = entry.id_string();
                let missing = if id.trim().is_empty() {
                    Some("id")
                } else if entry.name.trim().is_empty() {
                    Some("name")
                } else if entry.category.trim().is_empty() {
                    Some("category")
                } else {
                    None
                };
                if let Some(field) = missing {
                    return Err(CatalogError::MissingField {
                        section: section.as_str(),
                        index,
                        field,
                    });
                }
                if !ids.insert(id.clone()) {
                    return Err(CatalogError::DuplicateId {
                        section: section.as_str(),
                        id,
                    });
                }
            }
        }
        Ok(())
    }
}
