use serde::{Deserialize, Serialize};

/// Error body returned by `PostgREST` (and therefore by Supabase's REST API).
///
/// `PostgREST` forwards Postgres errors with their SQLSTATE in `code`, and its own
/// errors with a `PGRSTxxx` code. `details` and `hint` are frequently `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostgrestError {
    /// SQLSTATE or `PGRST` error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Primary error message.
    #[serde(default)]
    pub message: String,
    /// Additional detail, e.g. the conflicting key of a unique violation.
    #[serde(default)]
    pub details: Option<String>,
    /// Suggested fix, when the server has one.
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Message, details and hint folded into one human-readable line.
    ///
    /// Empty parts are skipped so a bare message stays untouched.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = self.message.trim().to_string();
        let extras = [("details", &self.details), ("hint", &self.hint)];
        for (label, value) in extras {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                if out.is_empty() {
                    out = format!("{label}: {v}");
                } else {
                    out.push_str(&format!(" | {label}: {v}"));
                }
            }
        }
        if out.is_empty() {
            "Unknown error".to_string()
        } else {
            out
        }
    }
}

/// Unified error type for all backing-store operations.
///
/// Each variant carries the `table` the request targeted. All variants are
/// serializable for structured error reporting.
///
/// # Retryable Errors
///
/// - [`ConnectFailed`](Self::ConnectFailed) - no connection, the request was never sent
/// - [`RateLimited`](Self::RateLimited) - API rate limit exceeded
/// - [`ServiceUnavailable`](Self::ServiceUnavailable) - HTTP 503, the request was not processed
/// - [`NetworkError`](Self::NetworkError) - network connectivity issues
/// - [`Timeout`](Self::Timeout) - request timed out
///
/// The built-in HTTP client retries these with exponential backoff. Updates
/// only retry the first three: after a timeout the server may have applied them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum StoreError {
    /// No connection could be established (DNS failure, connection refused).
    ConnectFailed {
        /// Table the request targeted.
        table: String,
        /// Error details.
        detail: String,
    },

    /// The service answered HTTP 503 without processing the request.
    ServiceUnavailable {
        /// Table the request targeted.
        table: String,
        /// Status line and truncated body.
        detail: String,
    },

    /// The connection failed after the request was sent, or a gateway answered 502 or 504.
    NetworkError {
        /// Table the request targeted.
        table: String,
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    Timeout {
        /// Table the request targeted.
        table: String,
        /// Error details.
        detail: String,
    },

    /// HTTP 429 from the gateway.
    RateLimited {
        /// Table the request targeted.
        table: String,
        /// Seconds to wait, from the `Retry-After` header.
        retry_after: Option<u64>,
        /// Raw response body, if any.
        raw_message: Option<String>,
    },

    /// The API key or JWT was rejected.
    Unauthorized {
        /// Table the request targeted.
        table: String,
        /// Error body from the server.
        error: PostgrestError,
    },

    /// Row level security or grants refused the operation.
    PermissionDenied {
        /// Table the request targeted.
        table: String,
        /// Error body from the server.
        error: PostgrestError,
    },

    /// A unique constraint was violated.
    Conflict {
        /// Table the request targeted.
        table: String,
        /// Error body from the server.
        error: PostgrestError,
    },

    /// The payload was rejected by a constraint or type check.
    InvalidData {
        /// Table the request targeted.
        table: String,
        /// Error body from the server.
        error: PostgrestError,
    },

    /// Any other error response.
    Api {
        /// Table the request targeted.
        table: String,
        /// HTTP status code.
        status: u16,
        /// Error body from the server.
        error: PostgrestError,
    },

    /// The response body could not be parsed.
    ParseError {
        /// Table the request targeted.
        table: String,
        /// Error details.
        detail: String,
    },

    /// An update or delete was attempted without any row filter.
    MissingFilter {
        /// Table the request targeted.
        table: String,
    },

    /// The request body could not be serialized.
    SerializationError {
        /// Table the request targeted.
        table: String,
        /// Error details.
        detail: String,
    },
}

impl StoreError {
    /// 是否为预期行为（用户输入、权限等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::PermissionDenied { .. }
                | Self::Conflict { .. }
                | Self::InvalidData { .. }
        )
    }

    /// Table the failing request targeted.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::ConnectFailed { table, .. }
            | Self::ServiceUnavailable { table, .. }
            | Self::NetworkError { table, .. }
            | Self::Timeout { table, .. }
            | Self::RateLimited { table, .. }
            | Self::Unauthorized { table, .. }
            | Self::PermissionDenied { table, .. }
            | Self::Conflict { table, .. }
            | Self::InvalidData { table, .. }
            | Self::Api { table, .. }
            | Self::ParseError { table, .. }
            | Self::MissingFilter { table }
            | Self::SerializationError { table, .. } => table,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectFailed { table, detail } => {
                write!(f, "[{table}] Connection failed: {detail}")
            }
            Self::ServiceUnavailable { table, detail } => {
                write!(f, "[{table}] Service unavailable: {detail}")
            }
            Self::NetworkError { table, detail } => {
                write!(f, "[{table}] Network error: {detail}")
            }
            Self::Timeout { table, detail } => {
                write!(f, "[{table}] Request timeout: {detail}")
            }
            Self::RateLimited {
                table, retry_after, ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{table}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{table}] Rate limited")
                }
            }
            Self::Unauthorized { table, error } => {
                write!(f, "[{table}] Unauthorized: {}", error.summary())
            }
            Self::PermissionDenied { table, error } => {
                write!(f, "[{table}] Permission denied: {}", error.summary())
            }
            Self::Conflict { table, error } => {
                write!(f, "[{table}] Conflict: {}", error.summary())
            }
            Self::InvalidData { table, error } => {
                write!(f, "[{table}] Invalid data: {}", error.summary())
            }
            Self::Api {
                table,
                status,
                error,
            } => {
                write!(f, "[{table}] HTTP {status}: {}", error.summary())
            }
            Self::ParseError { table, detail } => {
                write!(f, "[{table}] Parse error: {detail}")
            }
            Self::MissingFilter { table } => {
                write!(f, "[{table}] Refusing to modify rows without a filter")
            }
            Self::SerializationError { table, detail } => {
                write!(f, "[{table}] Serialization error: {detail}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Convenience type alias for `Result<T, StoreError>`.
pub type Result<T> = std::result::Result<T, StoreError>;
