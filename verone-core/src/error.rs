//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::{EntityKind, Section};

// Re-export library error type
pub use verone_store::{PostgrestError, StoreError};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Field update attempted on a section that is not being edited
    #[error("Section '{0}' is not being edited")]
    NotEditing(Section),

    /// Field update attempted while the section's save is in flight
    #[error("Section '{0}' is being saved")]
    SaveInProgress(Section),

    /// Editor constructed without any record id
    #[error("No product, organisation, contact or order id supplied")]
    NoTarget,

    /// The record changed since the edit started
    #[error("The {entity} {id} was modified by someone else, please reload it")]
    StaleRecord { entity: EntityKind, id: String },

    /// The record does not exist (or is not visible)
    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: EntityKind, id: String },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Backing store error (converting from library)
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, concurrent edit, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::NotEditing(_)
            | Self::SaveInProgress(_)
            | Self::StaleRecord { .. }
            | Self::RecordNotFound { .. }
            | Self::ValidationError(_) => true,
            Self::Store(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
