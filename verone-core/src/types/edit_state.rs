//! 区块编辑状态

use serde::{Deserialize, Serialize};

use super::Draft;

/// Field carrying a record's version token for optimistic concurrency.
pub const VERSION_FIELD: &str = "updated_at";

/// Why a section's last save failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveErrorKind {
    /// The backing store rejected or could not perform the update.
    Persistence,
    /// Someone else changed the record since the edit started; reload needed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionError {
    pub kind: SaveErrorKind,
    pub message: String,
}

impl SectionError {
    pub fn new(kind: SaveErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Edit state of one section of one record.
///
/// `Default` is the state of a section nobody touched: not editing, no draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEditState {
    pub is_editing: bool,
    pub edited_data: Option<Draft>,
    pub is_saving: bool,
    pub error: Option<SectionError>,
    pub has_changes: bool,
    /// `updated_at` of the record when the edit started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Edit session id; changes on every `start_edit`.
    #[serde(skip)]
    pub session: u64,
}

impl SectionEditState {
    /// Fresh editing state around a copy of the initial data.
    #[must_use]
    pub fn editing(initial_data: &Draft, session: u64) -> Self {
        Self {
            is_editing: true,
            edited_data: Some(initial_data.clone()),
            is_saving: false,
            error: None,
            has_changes: false,
            version: initial_data.get_str(VERSION_FIELD).map(str::to_string),
            session,
        }
    }
}
