//! # Connection State Manager
//!
//! Tracks the single logical link to one printer.
//!
//! ## State Machine
//!
//! ```text
//!                 ensure_connected() ok
//!   Disconnected ─────────────────────────▶ Connected
//!        ▲                                     │
//!        └─────────────────────────────────────┘
//!          link drop seen by a probe, send failure,
//!          timeout, disconnect()
//! ```
//!
//! The radio link can drop without notice, so the cached state is never
//! trusted alone: `ensure_connected` asks the transport for its live state
//! first and only runs a connect cycle when the link is really down.

use std::fmt;

use tracing::{info, instrument, warn};

use crate::transport::{BleTransport, TransportError};

/// Link state as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        })
    }
}

/// # Connection Manager
///
/// Owns the transport and the connection state for one peripheral address.
/// Not meant for concurrent callers; wrap the owning session in a mutex.
pub struct ConnectionManager<T: BleTransport> {
    transport: T,
    address: String,
    state: ConnectionState,
}

impl<T: BleTransport> ConnectionManager<T> {
    /// Start in `Disconnected`; nothing is attempted until first use.
    pub fn new(transport: T, address: impl Into<String>) -> Self {
        Self {
            transport,
            address: address.into(),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Cached state; may be stale until the next `ensure_connected`.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Mutable access to the transport for writes.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// # Ensure the Link Is Up
    ///
    /// Returns immediately when the transport reports a live link. Otherwise
    /// runs exactly one connect attempt: success moves to `Connected`, any
    /// failure leaves the manager `Disconnected` and returns the cause.
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn ensure_connected(&mut self) -> Result<(), TransportError> {
        if self.transport.is_connected().await {
            self.state = ConnectionState::Connected;
            return Ok(());
        }

        if self.state == ConnectionState::Connected {
            warn!("link dropped, reconnecting");
        }
        self.state = ConnectionState::Disconnected;

        match self.transport.connect(&self.address).await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                info!("connected to printer");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to connect to printer");
                Err(e)
            }
        }
    }

    /// Disconnect if connected; a no-op otherwise.
    ///
    /// The live link is checked too: after `mark_disconnected` the cached
    /// state says `Disconnected` while the radio may still hold the link.
    pub async fn disconnect(&mut self) {
        if self.state == ConnectionState::Connected || self.transport.is_connected().await {
            self.transport.disconnect().await;
            info!(address = %self.address, "disconnected from printer");
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Record a failure seen outside the manager (write error, timeout).
    pub fn mark_disconnected(&mut self) {
        if self.state == ConnectionState::Connected {
            warn!(address = %self.address, "marking printer link as down");
        }
        self.state = ConnectionState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    const ADDR: &str = "AA:BB:CC:DD:EE:FF";

    fn manager() -> (ConnectionManager<MockTransport>, MockTransport) {
        let mock = MockTransport::new();
        (ConnectionManager::new(mock.clone(), ADDR), mock)
    }

    #[test]
    fn test_initial_state() {
        let (manager, _) = manager();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.address(), ADDR);
    }

    #[tokio::test]
    async fn test_ensure_connected_is_idempotent() {
        let (mut manager, mock) = manager();
        manager.ensure_connected().await.unwrap();
        manager.ensure_connected().await.unwrap();

        assert_eq!(mock.connect_attempts(), 1);
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(mock.address().as_deref(), Some(ADDR));
    }

    #[tokio::test]
    async fn test_live_link_is_adopted_without_connecting() {
        let (mut manager, mut mock) = manager();
        mock.connect(ADDR).await.unwrap();

        manager.ensure_connected().await.unwrap();
        assert_eq!(mock.connect_attempts(), 1);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn test_silent_drop_triggers_reconnect() {
        let (mut manager, mock) = manager();
        manager.ensure_connected().await.unwrap();

        mock.drop_link();
        // Cached state has not noticed yet
        assert!(manager.is_connected());

        manager.ensure_connected().await.unwrap();
        assert_eq!(mock.connect_attempts(), 2);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn test_failed_connect_leaves_disconnected() {
        let (mut manager, mock) = manager();
        mock.fail_connect(true);

        let err = manager.ensure_connected().await.unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        // Exactly one attempt per call
        let _ = manager.ensure_connected().await;
        assert_eq!(mock.connect_attempts(), 2);
    }

    #[tokio::test]
    async fn test_disconnect() {
        let (mut manager, mock) = manager();

        // No-op while disconnected
        manager.disconnect().await;
        assert_eq!(mock.disconnects(), 0);

        manager.ensure_connected().await.unwrap();
        manager.disconnect().await;
        assert_eq!(mock.disconnects(), 1);
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        manager.disconnect().await;
        assert_eq!(mock.disconnects(), 1);
    }

    #[tokio::test]
    async fn test_mark_disconnected() {
        let (mut manager, _) = manager();
        manager.ensure_connected().await.unwrap();
        manager.mark_disconnected();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_closes_live_link_after_mark_disconnected() {
        let (mut manager, mock) = manager();
        manager.ensure_connected().await.unwrap();

        // Write failure or timeout: cached state drops, radio link stays up
        manager.mark_disconnected();
        assert!(mock.is_connected().await);

        manager.disconnect().await;
        assert_eq!(mock.disconnects(), 1);
        assert!(!mock.is_connected().await);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
