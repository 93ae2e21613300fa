//! Error types for the vitals reporter
//!
//! The attribution engine itself never fails: missing capabilities degrade to
//! empty or default values. Errors only exist at the edges, where a session is
//! wired up or where captures and configuration are read from disk.

use thiserror::Error;

/// Errors surfaced while wiring up or feeding a reporting session
#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("Web Vitals is not loaded!!")]
    ObserverUnavailable,

    #[error("Invalid reporter configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse page capture: {0}")]
    CaptureFormat(#[from] serde_json::Error),

    #[error("Transport failed to write event '{event}': {source}")]
    Transport {
        event: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for reporter operations
pub type Result<T> = std::result::Result<T, VitalsError>;
