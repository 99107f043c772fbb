//! Storage adapters for the inline editor.

mod supabase_backing_store;

pub use supabase_backing_store::SupabaseBackingStore;
