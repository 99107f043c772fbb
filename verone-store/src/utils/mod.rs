//! Utility modules.

/// Log sanitization utilities to prevent secret and customer data exposure.
pub mod log_sanitizer;
