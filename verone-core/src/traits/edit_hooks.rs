use crate::types::{Draft, Section};

/// Callbacks an editor fires towards its owner (usually a detail page).
///
/// `on_update` is required; `on_error` defaults to doing nothing since the
/// error is also kept on the section's state.
pub trait EditHooks: Send + Sync {
    /// A section was saved. `updated` holds the fields that were written.
    fn on_update(&self, section: Section, updated: &Draft);

    /// A section failed to save.
    fn on_error(&self, _section: Section, _message: &str) {}
}
