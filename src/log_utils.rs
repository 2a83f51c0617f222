//! Internal logging utilities for consistent log formatting across the library
//!
//! This module provides macros that adapt log messages based on feature flags:
//! - `tracing`: Enable/disable all logging (enabled by default)
//! - `plain-logs`: When enabled with `tracing`, uses plain text prefixes instead of emojis
//!
//! ## Usage
//!
//! ```toml
//! # Default: tracing enabled with emojis
//! resource-loader = "0.2"
//!
//! # Disable all logging
//! resource-loader = { version = "0.2", default-features = false }
//!
//! # Enable tracing with plain text (no emojis)
//! resource-loader = { version = "0.2", features = ["plain-logs"] }
//! ```

/// Internal debug logging macro that respects the tracing feature flag
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}

/// Logs a new transport fetch being started
#[macro_export]
macro_rules! log_fetch_start {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🆕 [FETCH-START] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[FETCH-START] {}", format!($($arg)*));
    };
}

/// Logs a request joining an in-flight fetch
#[macro_export]
macro_rules! log_fetch_join {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🔄 [FETCH-JOIN] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[FETCH-JOIN] {}", format!($($arg)*));
    };
}

/// Logs a request being detached from its fetch
#[macro_export]
macro_rules! log_fetch_cancel {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🗑️ [FETCH-CANCEL] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[FETCH-CANCEL] {}", format!($($arg)*));
    };
}

/// Logs a redirect splitting a shared fetch
#[macro_export]
macro_rules! log_fetch_split {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("🔀 [FETCH-SPLIT] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[FETCH-SPLIT] {}", format!($($arg)*));
    };
}

/// Logs a fetch completion fanned out to its attached requests
#[macro_export]
macro_rules! log_fetch_complete {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("✅ [FETCH-COMPLETE] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[FETCH-COMPLETE] {}", format!($($arg)*));
    };
}

/// Logs a response rejected because of its HTTP status
#[macro_export]
macro_rules! log_http_reject {
    ($($arg:tt)*) => {
        #[cfg(all(feature = "tracing", not(feature = "plain-logs")))]
        tracing::debug!("❌ [HTTP-REJECT] {}", format!($($arg)*));
        #[cfg(all(feature = "tracing", feature = "plain-logs"))]
        tracing::debug!("[HTTP-REJECT] {}", format!($($arg)*));
    };
}
