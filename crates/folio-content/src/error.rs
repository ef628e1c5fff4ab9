//! Error types for catalog parsing.

use thiserror::Error;

/// Error type for catalog parsing.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Required field present but empty
    #[error("Missing required field: {field} (entry {index} of {section})")]
    MissingField {
        /// Section name
        section: &'static str,
        /// Position within the section
        index: usize,
        /// Field name
        field: &'static str,
    },
    /// Two entries of one section share an id
    #[error("Duplicate id '{id}' in {section}")]
    DuplicateId {
        /// Section name
        section: &'static str,
        /// The repeated id
        id: String,
    },
}
