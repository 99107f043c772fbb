use serde::{Deserialize, Serialize};

/// A table row as returned by `PostgREST` (`Prefer: return=representation`).
pub type Row = serde_json::Map<String, serde_json::Value>;

// ============ Client configuration ============

/// Default connect timeout (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

/// Connection settings for a Supabase project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    pub url: String,
    /// Anon or service-role key. Sent as `apikey` and as bearer token.
    pub api_key: String,
    /// Postgres schema, sent as `Accept-Profile` / `Content-Profile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Retries for network errors, timeouts and rate limiting. `0` disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl SupabaseConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            schema: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// REST endpoint for a table: `{url}/rest/v1/{table}`.
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url.trim_end_matches('/'))
    }
}

// ============ Filters ============

/// A horizontal filter on a `PostgREST` request.
///
/// Only equality is needed by the back office; it renders as `column=eq.value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Query-string fragment, URL-encoded.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "{}=eq.{}",
            urlencoding::encode(&self.column),
            urlencoding::encode(&self.value)
        )
    }
}

/// Join filters into a query string (without the leading `?`).
#[must_use]
pub fn filters_to_query(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(Filter::to_query)
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_trims_trailing_slash() {
        let cfg = SupabaseConfig::new("https://abcd.supabase.co/", "key");
        assert_eq!(
            cfg.table_url("products"),
            "https://abcd.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn filter_renders_eq() {
        assert_eq!(Filter::eq("id", "p-1").to_query(), "id=eq.p-1");
    }

    #[test]
    fn filter_encodes_timestamp() {
        let f = Filter::eq("updated_at", "2025-01-02T10:00:00+00:00");
        assert_eq!(f.to_query(), "updated_at=eq.2025-01-02T10%3A00%3A00%2B00%3A00");
    }

    #[test]
    fn filters_joined_with_ampersand() {
        let q = filters_to_query(&[Filter::eq("id", "1"), Filter::eq("updated_at", "x")]);
        assert_eq!(q, "id=eq.1&updated_at=eq.x");
        assert_eq!(filters_to_query(&[]), "");
    }

    #[test]
    fn config_defaults_when_deserialized() {
        let cfg: SupabaseConfig =
            serde_json::from_str(r#"{"url":"https://x.supabase.co","api_key":"k"}"#).unwrap();
        assert_eq!(cfg.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(cfg.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(cfg.schema.is_none());
    }
}
