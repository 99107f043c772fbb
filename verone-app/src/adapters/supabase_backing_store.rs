//! `BackingStore` implementation over Supabase (`PostgREST`).

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use verone_core::error::{CoreError, CoreResult};
use verone_core::traits::BackingStore;
use verone_core::types::{DeletedAlerts, EntityKind, Record, UpdateRequest, VERSION_FIELD};
use verone_store::{Filter, Row, SupabaseClient, SupabaseConfig};

/// Outstanding low-stock alerts, one row per product and alert type.
const STOCK_ALERTS_TABLE: &str = "stock_alert_tracking";

/// Table holding each entity kind.
pub(crate) fn table_for(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Product => "products",
        EntityKind::Organisation => "organisations",
        EntityKind::Contact => "contacts",
        EntityKind::SalesOrder => "sales_orders",
        EntityKind::PurchaseOrder => "purchase_orders",
    }
}

/// `id = …`, plus `updated_at = …` when the write is conditional.
pub(crate) fn update_filters(id: &str, request: &UpdateRequest) -> Vec<Filter> {
    let mut filters = vec![Filter::eq("id", id)];
    if let Some(version) = &request.expected_version {
        filters.push(Filter::eq(VERSION_FIELD, version));
    }
    filters
}

/// Request fields with a fresh `updated_at` stamp.
pub(crate) fn stamped_fields(request: &UpdateRequest, now: &str) -> Row {
    let mut fields = request.fields.as_map().clone();
    fields.insert(VERSION_FIELD.to_string(), Value::from(now));
    fields
}

/// The updated row, or why nothing was updated.
///
/// With a version precondition an empty result is reported as stale: the
/// record was changed (or removed) since the edit started.
pub(crate) fn updated_row(
    rows: Vec<Row>,
    entity: EntityKind,
    id: &str,
    request: &UpdateRequest,
) -> CoreResult<Record> {
    if rows.len() > 1 {
        log::warn!("{} rows updated for {entity} {id}", rows.len());
    }
    rows.into_iter().next().ok_or_else(|| {
        if request.expected_version.is_some() {
            CoreError::StaleRecord {
                entity,
                id: id.to_string(),
            }
        } else {
            CoreError::RecordNotFound {
                entity,
                id: id.to_string(),
            }
        }
    })
}

/// Supabase-backed record store.
pub struct SupabaseBackingStore {
    client: SupabaseClient,
}

impl SupabaseBackingStore {
    /// Connect to the project described by `config`.
    pub fn new(config: SupabaseConfig) -> CoreResult<Self> {
        Ok(Self {
            client: SupabaseClient::new(config)?,
        })
    }

    #[must_use]
    pub fn from_client(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn update_entity(
        &self,
        entity: EntityKind,
        id: &str,
        request: &UpdateRequest,
    ) -> CoreResult<Record> {
        let table = table_for(entity);
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let fields = stamped_fields(request, &now);

        log::debug!(
            "Updating {entity} {id}: {} field(s), conditional={}",
            request.fields.len(),
            request.expected_version.is_some()
        );

        let rows = self
            .client
            .update_rows(table, &update_filters(id, request), &fields)
            .await?;
        updated_row(rows, entity, id, request)
    }
}

#[async_trait]
impl BackingStore for SupabaseBackingStore {
    async fn update_product(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update_entity(EntityKind::Product, id, request).await
    }

    async fn delete_stock_alerts(&self, product_id: &str) -> CoreResult<DeletedAlerts> {
        let rows = self
            .client
            .delete_rows(STOCK_ALERTS_TABLE, &[Filter::eq("product_id", product_id)])
            .await?;
        Ok(DeletedAlerts {
            deleted_count: rows.len() as u64,
        })
    }

    async fn update_organisation(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update_entity(EntityKind::Organisation, id, request)
            .await
    }

    async fn update_contact(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update_entity(EntityKind::Contact, id, request).await
    }

    async fn update_sales_order(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update_entity(EntityKind::SalesOrder, id, request)
            .await
    }

    async fn update_purchase_order(
        &self,
        id: &str,
        request: &UpdateRequest,
    ) -> CoreResult<Record> {
        self.update_entity(EntityKind::PurchaseOrder, id, request)
            .await
    }
}
