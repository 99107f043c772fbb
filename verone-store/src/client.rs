//! Supabase REST client

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::error::{PostgrestError, Result, StoreError};
use crate::http_client::{HttpUtils, RetryPolicy};
use crate::types::{Filter, Row, SupabaseConfig, filters_to_query};
use crate::utils::log_sanitizer::{redact_secret, truncate_for_log};

/// Pseudo table name used for errors raised before any table is involved.
const CLIENT_SCOPE: &str = "supabase";

/// Thin `PostgREST` client bound to one Supabase project.
pub struct SupabaseClient {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Build a client with the configured timeouts.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::NetworkError {
                table: CLIENT_SCOPE.to_string(),
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        log::debug!(
            "Supabase client ready: url={}, key={}, schema={:?}",
            config.url,
            redact_secret(&config.api_key),
            config.schema
        );

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// `PATCH` the rows matching `filters` and return their new representation.
    ///
    /// An empty result means no row matched. A request that may have reached
    /// the server is not sent again: the caller's filters can stop matching
    /// once the first attempt is applied.
    pub async fn update_rows(&self, table: &str, filters: &[Filter], fields: &Row) -> Result<Vec<Row>> {
        if filters.is_empty() {
            return Err(StoreError::MissingFilter {
                table: table.to_string(),
            });
        }

        let body = serde_json::to_vec(fields).map_err(|e| StoreError::SerializationError {
            table: table.to_string(),
            detail: e.to_string(),
        })?;

        let request = self
            .with_headers(self.client.patch(self.request_url(table, filters)), true)
            .header("Prefer", "return=representation")
            .body(body);

        self.send_for_rows(request, table, "PATCH", RetryPolicy::Undelivered)
            .await
    }

    /// `DELETE` the rows matching `filters` and return what was removed.
    pub async fn delete_rows(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>> {
        if filters.is_empty() {
            return Err(StoreError::MissingFilter {
                table: table.to_string(),
            });
        }

        let request = self
            .with_headers(self.client.delete(self.request_url(table, filters)), false)
            .header("Prefer", "return=representation");

        self.send_for_rows(request, table, "DELETE", RetryPolicy::Transient)
            .await
    }

    fn request_url(&self, table: &str, filters: &[Filter]) -> String {
        format!("{}?{}", self.config.table_url(table), filters_to_query(filters))
    }

    fn with_headers(&self, builder: RequestBuilder, has_body: bool) -> RequestBuilder {
        let mut builder = builder
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json");

        if has_body {
            builder = builder.header("Content-Type", "application/json");
        }

        if let Some(schema) = &self.config.schema {
            builder = builder
                .header("Accept-Profile", schema)
                .header("Content-Profile", schema);
        }

        builder
    }

    async fn send_for_rows(
        &self,
        request: RequestBuilder,
        table: &str,
        method_name: &str,
        policy: RetryPolicy,
    ) -> Result<Vec<Row>> {
        let (status, text) = HttpUtils::execute_request_with_retry(
            request,
            table,
            method_name,
            self.config.max_retries,
            policy,
        )
        .await?;

        if !(200..300).contains(&status) {
            let err = map_api_error(table, status, &text);
            if err.is_expected() {
                log::warn!("{method_name} failed: {err}");
            } else {
                log::error!("{method_name} failed: {err}");
            }
            return Err(err);
        }

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        HttpUtils::parse_json(&text, table)
    }
}

/// Map a non-2xx `PostgREST` response to a [`StoreError`].
///
/// The SQLSTATE code is checked before the HTTP status: `PostgREST` answers
/// 409 for both unique and foreign-key violations.
pub(crate) fn map_api_error(table: &str, status: u16, body: &str) -> StoreError {
    let error = serde_json::from_str::<PostgrestError>(body).unwrap_or_else(|_| {
        if body.trim().is_empty() {
            PostgrestError::new(format!("HTTP {status}"))
        } else {
            PostgrestError::new(truncate_for_log(body))
        }
    });
    let table = table.to_string();

    match error.code.as_deref() {
        Some("PGRST301" | "PGRST302") => StoreError::Unauthorized { table, error },
        Some("42501") => StoreError::PermissionDenied { table, error },
        Some("23505") => StoreError::Conflict { table, error },
        // foreign key, not null, check, invalid text representation, value too long,
        // unknown column
        Some("23503" | "23502" | "23514" | "22P02" | "22001" | "PGRST204") => {
            StoreError::InvalidData { table, error }
        }
        _ => match status {
            401 => StoreError::Unauthorized { table, error },
            403 => StoreError::PermissionDenied { table, error },
            409 => StoreError::Conflict { table, error },
            _ => StoreError::Api {
                table,
                status,
                error,
            },
        },
    }
}
