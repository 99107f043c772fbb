//! # verone-store
//!
//! Supabase / `PostgREST` client used by the Vérone back office to persist
//! inline edits of products, organisations, contacts and orders.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)* - Use rustls.
//! - **`native-tls`** - Use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use verone_store::{Filter, Row, SupabaseClient, SupabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SupabaseClient::new(SupabaseConfig::new(
//!         "https://abcd.supabase.co",
//!         "service-role-key",
//!     ))?;
//!
//!     let mut fields = Row::new();
//!     fields.insert("email".to_string(), serde_json::Value::Null);
//!
//!     let rows = client
//!         .update_rows("contacts", &[Filter::eq("id", "c-42")], &fields)
//!         .await?;
//!     println!("{} row(s) updated", rows.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, StoreError>`](StoreError). `PostgREST`
//! error bodies (`code`, `message`, `details`, `hint`) are mapped onto
//! structured variants whose `Display` folds message, details and hint into a
//! single line. Transient errors are retried with exponential backoff;
//! updates are only sent again when the server cannot have processed them
//! (`ConnectFailed`, `RateLimited`, `ServiceUnavailable`).

mod client;
mod error;
mod http_client;
mod types;
mod utils;

pub use client::SupabaseClient;
pub use error::{PostgrestError, Result, StoreError};
pub use types::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS, Filter, Row,
    SupabaseConfig, filters_to_query,
};
pub use utils::log_sanitizer;
