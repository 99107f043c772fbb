//! Generic HTTP request helpers
//!
//! Sending, logging and reading responses live here; turning `PostgREST` error
//! bodies into [`StoreError`] variants is left to the client.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::StoreError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text.
    ///
    /// HTTP 429 becomes [`StoreError::RateLimited`], 503 becomes
    /// [`StoreError::ServiceUnavailable`], 502 and 504 become
    /// [`StoreError::NetworkError`]; every other status is returned as-is.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        table: &str,
        method_name: &str,
    ) -> Result<(u16, String), StoreError> {
        log::debug!("[{table}] {method_name}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_connect() {
                StoreError::ConnectFailed {
                    table: table.to_string(),
                    detail: e.to_string(),
                }
            } else if e.is_timeout() {
                StoreError::Timeout {
                    table: table.to_string(),
                    detail: e.to_string(),
                }
            } else {
                StoreError::NetworkError {
                    table: table.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{table}] Response Status: {status_code}");

        // Read before the body is consumed
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{table}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(StoreError::RateLimited {
                table: table.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if status_code == 503 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{table}] Service unavailable (HTTP 503)");
            return Err(StoreError::ServiceUnavailable {
                table: table.to_string(),
                detail: format!("HTTP 503: {}", truncate_for_log(&body)),
            });
        }

        if matches!(status_code, 502 | 504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{table}] Gateway error (HTTP {status_code})");
            return Err(StoreError::NetworkError {
                table: table.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| StoreError::NetworkError {
                table: table.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{table}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, table: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{table}] JSON parse failed: {e}");
            log::error!("[{table}] Raw response: {}", truncate_for_log(response_text));
            StoreError::ParseError {
                table: table.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request, retrying the failures `policy` allows.
    ///
    /// # Retry strategy
    /// - See [`RetryPolicy`] for which errors are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
    /// - `Retry-After` is honoured for 429 responses (maximum 30 seconds)
    /// - `max_retries == 0` sends the request exactly once
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        table: &str,
        method_name: &str,
        max_retries: u32,
        policy: RetryPolicy,
    ) -> Result<(u16, String), StoreError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, table, method_name).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{table}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, table, method_name).await;
            };

            match Self::execute_request(req, table, method_name).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && policy.allows(&e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        table,
                        method_name,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| StoreError::NetworkError {
            table: table.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Which failures [`HttpUtils::execute_request_with_retry`] sends again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Every transient failure, including timeouts and dropped connections.
    /// For requests whose replay gives the same result, such as a DELETE.
    Transient,
    /// Only failures where the server did not process the request: no
    /// connection, 429 or 503. A conditional PATCH changes the version it
    /// filters on, so replaying one the server already applied matches no row.
    Undelivered,
}

impl RetryPolicy {
    fn allows(self, error: &StoreError) -> bool {
        match error {
            StoreError::ConnectFailed { .. }
            | StoreError::RateLimited { .. }
            | StoreError::ServiceUnavailable { .. } => true,
            StoreError::NetworkError { .. } | StoreError::Timeout { .. } => {
                self == Self::Transient
            }
            _ => false,
        }
    }
}

fn retry_delay(error: &StoreError, attempt: u32) -> Duration {
    if let StoreError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// 100ms, 200ms, 400ms, 800ms, 1.6s, ... capped at 10 seconds
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PostgrestError;

    fn undelivered_errors() -> Vec<StoreError> {
        vec![
            StoreError::ConnectFailed {
                table: "t".into(),
                detail: "refused".into(),
            },
            StoreError::RateLimited {
                table: "t".into(),
                retry_after: None,
                raw_message: None,
            },
            StoreError::ServiceUnavailable {
                table: "t".into(),
                detail: "HTTP 503".into(),
            },
        ]
    }

    fn in_flight_errors() -> Vec<StoreError> {
        vec![
            StoreError::NetworkError {
                table: "t".into(),
                detail: "connection reset".into(),
            },
            StoreError::Timeout {
                table: "t".into(),
                detail: "timed out".into(),
            },
        ]
    }

    #[test]
    fn transient_policy_retries_all_transient_errors() {
        for e in undelivered_errors().iter().chain(&in_flight_errors()) {
            assert!(RetryPolicy::Transient.allows(e), "{e}");
        }
    }

    #[test]
    fn undelivered_policy_skips_errors_after_send() {
        for e in &undelivered_errors() {
            assert!(RetryPolicy::Undelivered.allows(e), "{e}");
        }
        for e in &in_flight_errors() {
            assert!(!RetryPolicy::Undelivered.allows(e), "{e}");
        }
    }

    #[test]
    fn not_retryable_business_errors() {
        let conflict = StoreError::Conflict {
            table: "t".into(),
            error: PostgrestError::new("dup"),
        };
        let parse = StoreError::ParseError {
            table: "t".into(),
            detail: "err".into(),
        };
        for policy in [RetryPolicy::Transient, RetryPolicy::Undelivered] {
            assert!(!policy.allows(&conflict));
            assert!(!policy.allows(&parse));
        }
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn backoff_capped_at_10s() {
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    #[test]
    fn retry_after_honoured_and_capped() {
        let short = StoreError::RateLimited {
            table: "t".into(),
            retry_after: Some(3),
            raw_message: None,
        };
        let long = StoreError::RateLimited {
            table: "t".into(),
            retry_after: Some(600),
            raw_message: None,
        };
        assert_eq!(retry_delay(&short, 0), Duration::from_secs(3));
        assert_eq!(retry_delay(&long, 0), Duration::from_secs(30));
    }

    #[test]
    fn parse_json_rows() {
        let rows: Result<Vec<crate::types::Row>, StoreError> =
            HttpUtils::parse_json(r#"[{"id":"c-1","email":null}]"#, "contacts");
        assert!(matches!(&rows, Ok(r) if r.len() == 1), "unexpected: {rows:?}");
    }

    #[test]
    fn parse_json_invalid() {
        let rows: Result<Vec<crate::types::Row>, StoreError> =
            HttpUtils::parse_json("<html>", "contacts");
        assert!(matches!(&rows, Err(StoreError::ParseError { .. })));
    }
}
