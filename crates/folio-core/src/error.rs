//! Error types for folio-core.

use thiserror::Error;

/// Errors raised by the overlay manager.
///
/// Unknown ids are not errors; those calls return `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// An `on_open`/`on_close` hook called a state transition on the
    /// manager that is currently running it.
    #[error("overlay manager re-entered from a hook during `{operation}`")]
    Reentrant {
        /// The rejected operation.
        operation: &'static str,
    },
}
