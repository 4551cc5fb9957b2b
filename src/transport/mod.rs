//! # Printer Transport Layer
//!
//! This module defines the BLE primitive the printer session talks to and
//! the chunked writer that feeds it.
//!
//! ## Available Transports
//!
//! - [`mock`]: In-memory transport that records writes (tests, dry runs)
//! - [`btle`]: btleplug-backed GATT client (requires the `ble` feature)
//!
//! ## The Primitive
//!
//! A transport only has to connect to an address, report whether the link
//! is up, disconnect, and write bytes to a characteristic. Everything above
//! that (framing, pacing, reconnection) lives in [`chunker`] and
//! [`crate::printer`].

#[cfg(feature = "ble")]
pub mod btle;
pub mod chunker;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use chunker::Chunker;
pub use mock::MockTransport;

#[cfg(feature = "ble")]
pub use btle::BtleTransport;

/// Errors raised by a transport primitive
#[derive(Debug, Error)]
pub enum TransportError {
    /// Operation needs a live link and there is none
    #[error("not connected")]
    NotConnected,

    /// Connection attempt failed
    #[error("connect failed: {0}")]
    Connect(String),

    /// Characteristic write failed
    #[error("write failed: {0}")]
    Write(String),

    /// The peripheral does not expose the write characteristic
    #[error("characteristic {0} not found")]
    CharacteristicNotFound(Uuid),

    /// Bluetooth stack failure (adapter missing, D-Bus error, ...)
    #[error("backend error: {0}")]
    Backend(String),
}

/// # BLE Transport Primitive
///
/// Link-level operations against one peripheral. Implementations do not
/// retry and do not pace writes.
#[async_trait]
pub trait BleTransport: Send + Sync {
    /// Establish a link to the peripheral at `address`.
    async fn connect(&mut self, address: &str) -> Result<(), TransportError>;

    /// Tear the link down. Never fails; problems are only logged.
    async fn disconnect(&mut self);

    /// The live link state as reported by the radio stack.
    async fn is_connected(&self) -> bool;

    /// Write one frame to `characteristic`.
    async fn write(&mut self, characteristic: Uuid, data: &[u8]) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: BleTransport + ?Sized> BleTransport for Box<T> {
    async fn connect(&mut self, address: &str) -> Result<(), TransportError> {
        (**self).connect(address).await
    }

    async fn disconnect(&mut self) {
        (**self).disconnect().await
    }

    async fn is_connected(&self) -> bool {
        (**self).is_connected().await
    }

    async fn write(&mut self, characteristic: Uuid, data: &[u8]) -> Result<(), TransportError> {
        (**self).write(characteristic, data).await
    }
}
