//! 行内编辑协调服务

use std::sync::Arc;

use super::persistence_dispatcher::PersistenceDispatcher;
use super::section_state_store::{SaveAttempt, SectionStateStore};
use super::ServiceContext;
use crate::error::{CoreError, CoreResult};
use crate::traits::EditHooks;
use crate::types::{
    BackingTarget, Draft, EntityIds, SaveErrorKind, Section, SectionEditState, SectionError,
    VERSION_FIELD,
};

/// Inline editor of one record.
///
/// Each section is edited and saved independently; the caller learns about
/// saves through its [`EditHooks`].
pub struct InlineEditService {
    state: SectionStateStore,
    dispatcher: PersistenceDispatcher,
    hooks: Arc<dyn EditHooks>,
}

impl InlineEditService {
    /// 创建编辑器
    #[must_use]
    pub fn new(ctx: &ServiceContext, target: BackingTarget, hooks: Arc<dyn EditHooks>) -> Self {
        Self {
            state: SectionStateStore::new(),
            dispatcher: PersistenceDispatcher::new(ctx.backing_store(), target),
            hooks,
        }
    }

    /// 从页面提供的可选 ID 创建编辑器
    pub fn from_ids(
        ctx: &ServiceContext,
        ids: EntityIds,
        hooks: Arc<dyn EditHooks>,
    ) -> CoreResult<Self> {
        let target = BackingTarget::from_ids(ids)?;
        Ok(Self::new(ctx, target, hooks))
    }

    #[must_use]
    pub fn target(&self) -> &BackingTarget {
        self.dispatcher.target()
    }

    // ===== Edit lifecycle =====

    /// Enter edit mode on `section` with a copy of `initial_data`.
    pub async fn start_edit(&self, section: Section, initial_data: &Draft) {
        let session = self.state.begin_edit(section, initial_data).await;
        log::debug!("Editing {section} of {} (session {session})", self.target());
    }

    /// Leave edit mode, dropping the draft.
    pub async fn cancel_edit(&self, section: Section) {
        self.state.reset(section).await;
    }

    /// Merge `partial` into the section's draft.
    ///
    /// # Errors
    /// - `NotEditing` if the section is not in edit mode
    /// - `SaveInProgress` while the section's save is in flight
    pub async fn update_edited_data(&self, section: Section, partial: Draft) -> CoreResult<()> {
        self.state.merge(section, partial).await
    }

    /// Persist the section's draft.
    ///
    /// Returns `true` when the record was written. Failures never escape: they
    /// are recorded on the section and reported through `on_error`.
    pub async fn save_changes(&self, section: Section) -> bool {
        let ticket = match self.state.try_begin_save(section).await {
            SaveAttempt::Ready(ticket) => ticket,
            SaveAttempt::NothingToSave => {
                log::debug!("Nothing to save in {section} of {}", self.target());
                return false;
            }
            SaveAttempt::AlreadySaving => {
                log::warn!("Save of {section} already in progress for {}", self.target());
                return false;
            }
        };

        match self
            .dispatcher
            .dispatch(section, ticket.draft, ticket.version)
            .await
        {
            Ok(persisted) => {
                let mut updated = persisted.payload;
                // Hand the fresh version token back so the next edit starts from it
                if let Some(version) = persisted.record.get(VERSION_FIELD).filter(|v| !v.is_null())
                {
                    updated.insert(VERSION_FIELD, version.clone());
                }

                log::info!("Saved {section} of {}", self.target());
                self.hooks.on_update(section, &updated);

                if !self.state.complete_success(section, ticket.session).await {
                    log::debug!("Section {section} changed during its save, keeping newer state");
                }
                true
            }
            Err(e) => {
                let kind = match e {
                    CoreError::StaleRecord { .. } => SaveErrorKind::Stale,
                    _ => SaveErrorKind::Persistence,
                };
                let message = e.to_string();
                if e.is_expected() {
                    log::warn!("Failed to save {section} of {}: {message}", self.target());
                } else {
                    log::error!("Failed to save {section} of {}: {message}", self.target());
                }

                self.state
                    .complete_failure(section, ticket.session, SectionError::new(kind, &message))
                    .await;
                self.hooks.on_error(section, &message);
                false
            }
        }
    }

    // ===== Getters =====

    pub async fn is_editing(&self, section: Section) -> bool {
        self.state.is_editing(section).await
    }

    pub async fn is_saving(&self, section: Section) -> bool {
        self.state.is_saving(section).await
    }

    pub async fn has_changes(&self, section: Section) -> bool {
        self.state.has_changes(section).await
    }

    pub async fn get_error(&self, section: Section) -> Option<String> {
        self.state.get_error(section).await
    }

    pub async fn error_kind(&self, section: Section) -> Option<SaveErrorKind> {
        self.state.error_kind(section).await
    }

    pub async fn get_edited_data(&self, section: Section) -> Option<Draft> {
        self.state.get_edited_data(section).await
    }

    pub async fn section_state(&self, section: Section) -> SectionEditState {
        self.state.snapshot(section).await
    }

    pub async fn editing_sections(&self) -> Vec<Section> {
        self.state.editing_sections().await
    }

    /// 是否有未保存的修改（离开页面前提示）
    pub async fn has_unsaved_changes(&self) -> bool {
        self.state.has_unsaved_changes().await
    }
}
