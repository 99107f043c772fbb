//! Shared helpers for the Supabase client tests

#![allow(dead_code, clippy::expect_used)]

pub mod stub;

use std::env;

use verone_store::{SupabaseClient, SupabaseConfig};

/// Skip a test when an environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert `Result` is `Ok` and unwrap it, failing the test otherwise.
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// An id that no table row will ever carry.
pub const MISSING_ROW_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Client for a local stub server, with a 1 second request timeout.
pub fn stub_client(url: String, max_retries: u32) -> SupabaseClient {
    let mut config = SupabaseConfig::new(url, "stub-key");
    config.connect_timeout_secs = 1;
    config.request_timeout_secs = 1;
    config.max_retries = max_retries;
    SupabaseClient::new(config).expect("failed to build client")
}

/// Client for the project named by `SUPABASE_URL` / `SUPABASE_SERVICE_KEY`.
pub fn live_client() -> Option<SupabaseClient> {
    let url = env::var("SUPABASE_URL").ok()?;
    let key = env::var("SUPABASE_SERVICE_KEY").ok()?;
    let mut config = SupabaseConfig::new(url, key);
    config.max_retries = 0;
    SupabaseClient::new(config).ok()
}

/// Client for the same project with a key the gateway must reject.
pub fn client_with_bad_key() -> Option<SupabaseClient> {
    let url = env::var("SUPABASE_URL").ok()?;
    let mut config = SupabaseConfig::new(url, "not-a-valid-key");
    config.max_retries = 0;
    SupabaseClient::new(config).ok()
}
