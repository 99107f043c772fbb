//! Vérone Inline Edit Core Library
//!
//! Section-by-section editing of back-office records (products,
//! organisations, contacts, sales and purchase orders):
//! - Section state store (draft, saving flag, last error per section)
//! - Inline edit service (start / update / cancel / save)
//! - Persistence dispatcher (per-entity business rules, one update per save)
//!
//! The remote store is abstracted behind the [`BackingStore`] trait, so the
//! same editor runs against Supabase or an in-memory mock.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{InlineEditService, ServiceContext};
pub use traits::{BackingStore, EditHooks};
pub use types::{BackingTarget, Draft, EntityIds, EntityKind, Section};
