//! 区块状态存储

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{Draft, SaveErrorKind, Section, SectionEditState, SectionError};

/// Snapshot handed to the dispatcher when a save starts.
#[derive(Debug, Clone)]
pub(crate) struct SaveTicket {
    pub session: u64,
    pub draft: Draft,
    pub version: Option<String>,
}

#[derive(Debug)]
pub(crate) enum SaveAttempt {
    Ready(SaveTicket),
    NothingToSave,
    AlreadySaving,
}

/// Per-section edit state of one editor.
///
/// A section with no entry is in the default state; resetting a section
/// removes its entry.
#[derive(Debug, Default)]
pub struct SectionStateStore {
    sections: RwLock<HashMap<Section, SectionEditState>>,
    next_session: AtomicU64,
}

impl SectionStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Getters =====

    pub async fn is_editing(&self, section: Section) -> bool {
        self.read(section, |s| s.is_editing).await
    }

    pub async fn is_saving(&self, section: Section) -> bool {
        self.read(section, |s| s.is_saving).await
    }

    pub async fn has_changes(&self, section: Section) -> bool {
        self.read(section, |s| s.has_changes).await
    }

    /// Last failure message of the section.
    pub async fn get_error(&self, section: Section) -> Option<String> {
        self.read(section, |s| s.error.as_ref().map(|e| e.message.clone()))
            .await
    }

    pub async fn error_kind(&self, section: Section) -> Option<SaveErrorKind> {
        self.read(section, |s| s.error.as_ref().map(|e| e.kind)).await
    }

    /// Owned copy of the draft.
    pub async fn get_edited_data(&self, section: Section) -> Option<Draft> {
        self.read(section, |s| s.edited_data.clone()).await
    }

    /// Full state of a section (default when untouched).
    pub async fn snapshot(&self, section: Section) -> SectionEditState {
        self.read(section, SectionEditState::clone).await
    }

    /// Sections currently in edit mode, sorted.
    pub async fn editing_sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = self
            .sections
            .read()
            .await
            .iter()
            .filter(|(_, s)| s.is_editing)
            .map(|(section, _)| *section)
            .collect();
        sections.sort();
        sections
    }

    /// Whether any section holds changes that were not saved yet.
    pub async fn has_unsaved_changes(&self) -> bool {
        self.sections.read().await.values().any(|s| s.has_changes)
    }

    async fn read<T>(&self, section: Section, f: impl FnOnce(&SectionEditState) -> T) -> T {
        let sections = self.sections.read().await;
        match sections.get(&section) {
            Some(state) => f(state),
            None => f(&SectionEditState::default()),
        }
    }

    // ===== Transitions =====

    /// Enter edit mode with a copy of `initial_data`, discarding any previous draft.
    pub(crate) async fn begin_edit(&self, section: Section, initial_data: &Draft) -> u64 {
        let session = self.next_session.fetch_add(1, Ordering::Relaxed) + 1;
        let state = SectionEditState::editing(initial_data, session);

        let previous = self.sections.write().await.insert(section, state);
        if previous.is_some_and(|p| p.has_changes) {
            log::debug!("Unsaved changes of section {section} discarded by a new edit");
        }
        session
    }

    /// Back to the default state. Idempotent.
    pub(crate) async fn reset(&self, section: Section) {
        self.sections.write().await.remove(&section);
    }

    /// Shallow-merge `partial` into the draft.
    pub(crate) async fn merge(&self, section: Section, partial: Draft) -> CoreResult<()> {
        let mut sections = self.sections.write().await;
        let state = sections
            .get_mut(&section)
            .filter(|s| s.is_editing)
            .ok_or(CoreError::NotEditing(section))?;

        if state.is_saving {
            return Err(CoreError::SaveInProgress(section));
        }

        state
            .edited_data
            .get_or_insert_with(Draft::new)
            .merge(partial);
        state.has_changes = true;
        Ok(())
    }

    /// Check-and-set of the in-flight flag, under a single write lock.
    pub(crate) async fn try_begin_save(&self, section: Section) -> SaveAttempt {
        let mut sections = self.sections.write().await;
        let Some(state) = sections.get_mut(&section) else {
            return SaveAttempt::NothingToSave;
        };
        let (Some(draft), true) = (state.edited_data.clone(), state.has_changes) else {
            return SaveAttempt::NothingToSave;
        };
        if state.is_saving {
            return SaveAttempt::AlreadySaving;
        }

        state.is_saving = true;
        state.error = None;
        SaveAttempt::Ready(SaveTicket {
            session: state.session,
            draft,
            version: state.version.clone(),
        })
    }

    /// Clear the section after a successful save.
    ///
    /// Returns `false` when the section was cancelled or restarted meanwhile;
    /// its newer state is left alone.
    pub(crate) async fn complete_success(&self, section: Section, session: u64) -> bool {
        let mut sections = self.sections.write().await;
        if sections.get(&section).is_some_and(|s| s.session == session) {
            sections.remove(&section);
            true
        } else {
            false
        }
    }

    /// Record a failed save, keeping the draft for a retry.
    pub(crate) async fn complete_failure(
        &self,
        section: Section,
        session: u64,
        error: SectionError,
    ) -> bool {
        let mut sections = self.sections.write().await;
        match sections.get_mut(&section).filter(|s| s.session == session) {
            Some(state) => {
                state.is_saving = false;
                state.error = Some(error);
                true
            }
            None => false,
        }
    }
}
