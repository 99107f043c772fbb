//! Backing store abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{DeletedAlerts, Record, UpdateRequest};

/// Remote store holding the records that inline edits write to
///
/// Each update writes only `request.fields`. When `request.expected_version`
/// is set, the write must only happen if the record's `updated_at` still has
/// that value, otherwise `CoreError::StaleRecord` is returned.
///
/// Platform implementation:
/// - `SupabaseBackingStore` (`verone-app`, `PostgREST`)
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Update a product
    ///
    /// # Arguments
    /// * `id` - Product ID
    /// * `request` - Fields and optional version precondition
    async fn update_product(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record>;

    /// Delete every outstanding stock alert of a product
    ///
    /// # Arguments
    /// * `product_id` - Product ID
    async fn delete_stock_alerts(&self, product_id: &str) -> CoreResult<DeletedAlerts>;

    /// Update an organisation (customer, supplier, partner)
    async fn update_organisation(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record>;

    /// Update a contact
    async fn update_contact(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record>;

    /// Update a sales order
    async fn update_sales_order(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record>;

    /// Update a purchase order
    async fn update_purchase_order(&self, id: &str, request: &UpdateRequest)
        -> CoreResult<Record>;
}
