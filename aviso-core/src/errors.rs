// aviso-core/src/errors.rs
//! Custom error types for the `aviso-core` library.
//!
//! One variant per failure class of the monitor. Every variant carries a
//! stable display message; none of them is ever fatal to the polling loop,
//! which logs and continues.

use thiserror::Error;

/// Errors that can occur while checking a monitored target.
///
/// `#[non_exhaustive]` signals to consumers that new variants may be added
/// in future versions, so they should not match exhaustively.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MonitorError {
    /// The plain HTTP fetch returned no usable content.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// No fingerprint could be extracted from otherwise valid content.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The portal login did not complete within its bounded wait.
    #[error("portal login failed: {0}")]
    Auth(String),

    /// The headless browser failed to launch or drive a page.
    #[error("browser error: {0}")]
    Browser(String),

    /// The state file could not be read or written.
    #[error("state persistence failed: {0}")]
    Persistence(String),

    /// The browser session did not close cleanly.
    #[error("session teardown failed: {0}")]
    Teardown(String),
}

/// Convenience type alias for aviso-core results.
pub type Result<T> = std::result::Result<T, MonitorError>;
