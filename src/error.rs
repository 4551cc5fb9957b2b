//! # Error Types
//!
//! This module defines error types used throughout the bluepos library.

use thiserror::Error;

/// Main error type for bluepos operations
#[derive(Debug, Error)]
pub enum BlueposError {
    /// The BLE link could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// A frame write to the printer characteristic failed
    #[error("Transport write error: {0}")]
    TransportWrite(String),

    /// Request content the encoder cannot represent (e.g. non-ASCII Code128)
    #[error("Encoding precondition failed: {0}")]
    EncodingPrecondition(String),

    /// Request parameter outside the accepted range or vocabulary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing configuration
    #[error("Invalid config: {0}")]
    Config(String),

    /// An operation did not finish within its time budget
    #[error("Timeout: {0}")]
    Timeout(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlueposError {
    /// Whether this error reflects the health of the BLE link rather than
    /// the request itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::TransportWrite(_) | Self::Timeout(_)
        )
    }
}

/// Result type for bluepos operations
pub type Result<T> = std::result::Result<T, BlueposError>;
