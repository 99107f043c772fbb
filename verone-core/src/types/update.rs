use serde::{Deserialize, Serialize};

use super::Draft;

/// One partial update sent to a backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Fields to write.
    pub fields: Draft,
    /// Precondition: the record's current `updated_at` must equal this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<String>,
}

impl UpdateRequest {
    #[must_use]
    pub fn new(fields: Draft, expected_version: Option<String>) -> Self {
        Self {
            fields,
            expected_version,
        }
    }
}

/// Result of clearing a product's stock alerts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedAlerts {
    pub deleted_count: u64,
}
