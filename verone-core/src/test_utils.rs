//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Notify, RwLock};

use crate::error::{CoreError, CoreResult, StoreError};
use crate::services::{InlineEditService, ServiceContext};
use crate::traits::{BackingStore, EditHooks};
use crate::types::{
    BackingTarget, DeletedAlerts, Draft, EntityKind, Record, Section, UpdateRequest,
    VERSION_FIELD,
};

// ===== MockBackingStore =====

/// One call received by the mock store.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub id: String,
    pub request: Option<UpdateRequest>,
}

#[derive(Default)]
struct Gate {
    started: Notify,
    release: Notify,
}

pub struct MockBackingStore {
    calls: RwLock<Vec<RecordedCall>>,
    /// 如果 Some，update 时返回此错误
    update_error: RwLock<Option<String>>,
    /// 如果 Some，删除库存提醒时返回此错误
    alert_error: RwLock<Option<String>>,
    /// 记录 id -> 当前 `updated_at`
    versions: RwLock<HashMap<String, String>>,
    gate: RwLock<Option<Arc<Gate>>>,
}

impl MockBackingStore {
    pub fn new() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            update_error: RwLock::new(None),
            alert_error: RwLock::new(None),
            versions: RwLock::new(HashMap::new()),
            gate: RwLock::new(None),
        }
    }

    pub async fn set_update_error(&self, err: Option<String>) {
        *self.update_error.write().await = err;
    }

    pub async fn set_alert_error(&self, err: Option<String>) {
        *self.alert_error.write().await = err;
    }

    pub async fn set_version(&self, id: &str, version: &str) {
        self.versions
            .write()
            .await
            .insert(id.to_string(), version.to_string());
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn calls_of(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub async fn last_request(&self, operation: &str) -> Option<UpdateRequest> {
        self.calls_of(operation)
            .await
            .into_iter()
            .rev()
            .find_map(|c| c.request)
    }

    async fn update(
        &self,
        operation: &'static str,
        entity: EntityKind,
        id: &str,
        request: &UpdateRequest,
    ) -> CoreResult<Record> {
        self.calls.write().await.push(RecordedCall {
            operation,
            id: id.to_string(),
            request: Some(request.clone()),
        });

        let gate = self.gate.read().await.clone();
        if let Some(gate) = gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        if let Some(ref msg) = *self.update_error.read().await {
            return Err(transport_error(&entity.to_string(), msg));
        }

        let mut versions = self.versions.write().await;
        let current = versions.get(id).cloned();
        if let Some(expected) = &request.expected_version {
            if current.as_deref().is_some_and(|c| c != expected) {
                return Err(CoreError::StaleRecord {
                    entity,
                    id: id.to_string(),
                });
            }
        }

        let mut record = request.fields.clone().into_map();
        record.insert("id".to_string(), Value::from(id));
        if let Some(current) = current {
            let next = bump_version(&current);
            record.insert(VERSION_FIELD.to_string(), Value::from(next.clone()));
            versions.insert(id.to_string(), next);
        }
        Ok(record)
    }
}

fn transport_error(table: &str, detail: &str) -> CoreError {
    CoreError::Store(StoreError::NetworkError {
        table: table.to_string(),
        detail: detail.to_string(),
    })
}

fn bump_version(version: &str) -> String {
    match version.strip_prefix('v').and_then(|n| n.parse::<u64>().ok()) {
        Some(n) => format!("v{}", n + 1),
        None => format!("{version}.1"),
    }
}

#[async_trait]
impl BackingStore for MockBackingStore {
    async fn update_product(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update("update_product", EntityKind::Product, id, request)
            .await
    }

    async fn delete_stock_alerts(&self, product_id: &str) -> CoreResult<DeletedAlerts> {
        self.calls.write().await.push(RecordedCall {
            operation: "delete_stock_alerts",
            id: product_id.to_string(),
            request: None,
        });
        if let Some(ref msg) = *self.alert_error.read().await {
            return Err(transport_error("stock_alerts", msg));
        }
        Ok(DeletedAlerts { deleted_count: 1 })
    }

    async fn update_organisation(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update("update_organisation", EntityKind::Organisation, id, request)
            .await
    }

    async fn update_contact(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update("update_contact", EntityKind::Contact, id, request)
            .await
    }

    async fn update_sales_order(&self, id: &str, request: &UpdateRequest) -> CoreResult<Record> {
        self.update("update_sales_order", EntityKind::SalesOrder, id, request)
            .await
    }

    async fn update_purchase_order(
        &self,
        id: &str,
        request: &UpdateRequest,
    ) -> CoreResult<Record> {
        self.update("update_purchase_order", EntityKind::PurchaseOrder, id, request)
            .await
    }
}

/// Holds every update of the mock store until released.
pub struct BlockedSave {
    gate: Arc<Gate>,
}

impl BlockedSave {
    pub async fn install(store: &MockBackingStore) -> Self {
        let gate = Arc::new(Gate::default());
        *store.gate.write().await = Some(gate.clone());
        Self { gate }
    }

    /// Wait until an update reached the store.
    pub async fn wait_started(&self) {
        self.gate.started.notified().await;
    }

    pub fn release(&self) {
        self.gate.release.notify_one();
    }
}

// ===== RecordingHooks =====

#[derive(Default)]
pub struct RecordingHooks {
    updates: Mutex<Vec<(Section, Draft)>>,
    errors: Mutex<Vec<(Section, String)>>,
}

impl RecordingHooks {
    pub fn updates(&self) -> Vec<(Section, Draft)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<(Section, String)> {
        self.errors.lock().unwrap().clone()
    }
}

impl EditHooks for RecordingHooks {
    fn on_update(&self, section: Section, updated: &Draft) {
        self.updates.lock().unwrap().push((section, updated.clone()));
    }

    fn on_error(&self, section: Section, message: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((section, message.to_string()));
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockBackingStore>) {
    let store = Arc::new(MockBackingStore::new());
    let ctx = Arc::new(ServiceContext::new(store.clone()));
    (ctx, store)
}

/// 创建测试用 `InlineEditService`
pub fn create_test_editor(
    target: BackingTarget,
) -> (
    InlineEditService,
    Arc<MockBackingStore>,
    Arc<RecordingHooks>,
) {
    let (ctx, store) = create_test_context();
    let hooks = Arc::new(RecordingHooks::default());
    let editor = InlineEditService::new(&ctx, target, hooks.clone());
    (editor, store, hooks)
}
