//! Storage and caller abstraction trait definitions

mod backing_store;
mod edit_hooks;

pub use backing_store::BackingStore;
pub use edit_hooks::EditHooks;
