//! Application bootstrap for the Vérone inline editor.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection) and `AppConfig` (TOML file plus environment overrides).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use verone_core::error::{CoreError, CoreResult};
use verone_core::services::{InlineEditService, ServiceContext};
use verone_core::traits::{BackingStore, EditHooks};
use verone_core::types::{BackingTarget, EntityIds};

pub use config::AppConfig;

use adapters::SupabaseBackingStore;

/// Application state.
///
/// Holds the `ServiceContext` shared by every editor. Frontends construct
/// this once at startup, then open one editor per record page.
pub struct AppState {
    /// Service context (holds the storage adapter)
    pub ctx: Arc<ServiceContext>,
}

impl AppState {
    /// Wire the Supabase adapter described by `config`.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let store = SupabaseBackingStore::new(config.supabase_config()?)?;
        AppStateBuilder::new().backing_store(Arc::new(store)).build()
    }

    /// Open an inline editor on one record.
    ///
    /// The editor's lifetime is the caller's: drop it when the page closes.
    #[must_use]
    pub fn open_editor(&self, target: BackingTarget, hooks: Arc<dyn EditHooks>) -> InlineEditService {
        log::debug!("Opening editor for {target}");
        InlineEditService::new(&self.ctx, target, hooks)
    }

    /// Open an editor from the optional ids a page carries.
    ///
    /// # Errors
    /// Returns `CoreError::NoTarget` if no id is set.
    pub fn open_editor_for_ids(
        &self,
        ids: EntityIds,
        hooks: Arc<dyn EditHooks>,
    ) -> CoreResult<InlineEditService> {
        InlineEditService::from_ids(&self.ctx, ids, hooks)
    }
}

/// Builder for constructing `AppState` with a platform-specific store.
///
/// # Required adapters
/// - `backing_store` - where records are written
pub struct AppStateBuilder {
    backing_store: Option<Arc<dyn BackingStore>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backing_store: None,
        }
    }

    #[must_use]
    pub fn backing_store(mut self, store: Arc<dyn BackingStore>) -> Self {
        self.backing_store = Some(store);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if the backing store is missing.
    pub fn build(self) -> CoreResult<AppState> {
        let backing_store = self.backing_store.ok_or_else(|| {
            CoreError::ValidationError("backing_store is required".to_string())
        })?;

        Ok(AppState {
            ctx: Arc::new(ServiceContext::new(backing_store)),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
