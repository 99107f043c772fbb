//! 业务逻辑服务层

mod inline_edit_service;
mod persistence_dispatcher;
mod section_state_store;

pub use inline_edit_service::InlineEditService;
pub use persistence_dispatcher::{Persisted, PersistenceDispatcher};
pub use section_state_store::SectionStateStore;

use std::sync::Arc;

use crate::traits::BackingStore;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// 记录存储
    pub backing_store: Arc<dyn BackingStore>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(backing_store: Arc<dyn BackingStore>) -> Self {
        Self { backing_store }
    }

    /// Shared handle on the backing store.
    #[must_use]
    pub fn backing_store(&self) -> Arc<dyn BackingStore> {
        Arc::clone(&self.backing_store)
    }
}
