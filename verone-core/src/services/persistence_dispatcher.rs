//! 持久化分发：把区块草稿写到对应实体

use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreResult;
use crate::traits::BackingStore;
use crate::types::{BackingTarget, Draft, Record, Section, UpdateRequest, VERSION_FIELD};

/// Product statuses for which stock is no longer replenished.
const STOCK_CLEARING_STATUSES: &[&str] = &["preorder", "discontinued"];

/// Pre-split organisation address columns, superseded by `billing_*` / `shipping_*`.
const LEGACY_ADDRESS_FIELDS: &[&str] = &[
    "address_line1",
    "address_line2",
    "postal_code",
    "city",
    "region",
    "country",
];

/// What a successful dispatch wrote.
#[derive(Debug, Clone)]
pub struct Persisted {
    /// Fields sent to the store, after entity rules were applied.
    pub payload: Draft,
    /// Record as returned by the store.
    pub record: Record,
}

/// Routes a section save to the editor's record, applying per-entity rules.
pub struct PersistenceDispatcher {
    store: Arc<dyn BackingStore>,
    target: BackingTarget,
}

impl PersistenceDispatcher {
    #[must_use]
    pub fn new(store: Arc<dyn BackingStore>, target: BackingTarget) -> Self {
        Self { store, target }
    }

    #[must_use]
    pub fn target(&self) -> &BackingTarget {
        &self.target
    }

    /// Write `draft` with exactly one update call on the target record.
    ///
    /// The version token never travels as a field; it becomes the update's
    /// precondition.
    pub async fn dispatch(
        &self,
        section: Section,
        mut draft: Draft,
        expected_version: Option<String>,
    ) -> CoreResult<Persisted> {
        draft.remove(VERSION_FIELD);

        let (request, record) = match &self.target {
            BackingTarget::Product(id) => {
                if section == Section::Stock && clears_stock_minimum(&draft) {
                    draft.insert("min_stock", Value::from(0));
                    self.clear_stock_alerts(id).await;
                }
                let request = UpdateRequest::new(draft, expected_version);
                let record = self.store.update_product(id, &request).await?;
                (request, record)
            }
            BackingTarget::Organisation(id) => {
                let stripped = draft.strip_fields(LEGACY_ADDRESS_FIELDS);
                if stripped > 0 {
                    log::debug!("Dropped {stripped} legacy address field(s) for organisation {id}");
                }
                draft.normalize_empty_strings();
                let request = UpdateRequest::new(draft, expected_version);
                let record = self.store.update_organisation(id, &request).await?;
                (request, record)
            }
            BackingTarget::Contact(id) => {
                draft.normalize_empty_strings();
                let request = UpdateRequest::new(draft, expected_version);
                let record = self.store.update_contact(id, &request).await?;
                (request, record)
            }
            BackingTarget::SalesOrder(id) => {
                draft.normalize_empty_strings();
                let request = UpdateRequest::new(draft, expected_version);
                let record = self.store.update_sales_order(id, &request).await?;
                (request, record)
            }
            BackingTarget::PurchaseOrder(id) => {
                draft.normalize_empty_strings();
                let request = UpdateRequest::new(draft, expected_version);
                let record = self.store.update_purchase_order(id, &request).await?;
                (request, record)
            }
        };

        Ok(Persisted {
            payload: request.fields,
            record,
        })
    }

    /// Best effort: a failure is logged and the save goes on.
    async fn clear_stock_alerts(&self, product_id: &str) {
        match self.store.delete_stock_alerts(product_id).await {
            Ok(deleted) => log::info!(
                "Deleted {} stock alert(s) of product {product_id}",
                deleted.deleted_count
            ),
            Err(e) => log::warn!("Failed to delete stock alerts of product {product_id}: {e}"),
        }
    }
}

fn clears_stock_minimum(draft: &Draft) -> bool {
    draft
        .get_str("product_status")
        .is_some_and(|status| STOCK_CLEARING_STATUSES.contains(&status))
}
