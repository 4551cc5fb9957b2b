//! # Mock Transport
//!
//! An in-memory [`BleTransport`] that records every connect attempt and
//! frame write. Clones share state, so a test can hand one clone to a
//! session and inspect the other afterwards.
//!
//! Faults can be injected:
//! - [`MockTransport::fail_connect`]: connect attempts fail
//! - [`MockTransport::fail_write_at`]: the n-th write call fails
//! - [`MockTransport::drop_link`]: the link silently goes down
//!
//! The CLI also uses it for `--dry-run`, printing the frames a job would
//! produce without touching the radio.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::time::Instant;
use uuid::Uuid;

use super::{BleTransport, TransportError};

/// One recorded frame write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockWrite {
    pub characteristic: Uuid,
    pub data: Vec<u8>,
    pub at: Instant,
}

#[derive(Debug, Default)]
struct MockState {
    link_up: bool,
    address: Option<String>,
    connect_attempts: usize,
    disconnects: usize,
    write_attempts: usize,
    writes: Vec<MockWrite>,
    fail_connect: bool,
    fail_write_at: Option<usize>,
}

/// In-memory transport with shared, inspectable state
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make subsequent connect attempts fail (or succeed again).
    pub fn fail_connect(&self, fail: bool) {
        self.state().fail_connect = fail;
    }

    /// Fail the write call with zero-based index `n`, counted over the
    /// lifetime of the transport.
    pub fn fail_write_at(&self, n: usize) {
        self.state().fail_write_at = Some(n);
    }

    /// Drop the link without telling the caller.
    pub fn drop_link(&self) {
        self.state().link_up = false;
    }

    pub fn connect_attempts(&self) -> usize {
        self.state().connect_attempts
    }

    pub fn disconnects(&self) -> usize {
        self.state().disconnects
    }

    /// Write calls, successful or not.
    pub fn write_attempts(&self) -> usize {
        self.state().write_attempts
    }

    /// Successful writes, in order.
    pub fn writes(&self) -> Vec<MockWrite> {
        self.state().writes.clone()
    }

    /// All successfully written bytes, concatenated.
    pub fn written_bytes(&self) -> Vec<u8> {
        self.state()
            .writes
            .iter()
            .flat_map(|w| w.data.iter().copied())
            .collect()
    }

    /// Address of the last successful connect.
    pub fn address(&self) -> Option<String> {
        self.state().address.clone()
    }

    /// Forget recorded writes (counters are kept).
    pub fn clear_writes(&self) {
        self.state().writes.clear();
    }
}

#[async_trait]
impl BleTransport for MockTransport {
    async fn connect(&mut self, address: &str) -> Result<(), TransportError> {
        let mut state = self.state();
        state.connect_attempts += 1;
        if state.fail_connect {
            state.link_up = false;
            return Err(TransportError::Connect(format!("{} unreachable", address)));
        }
        state.link_up = true;
        state.address = Some(address.to_string());
        Ok(())
    }

    async fn disconnect(&mut self) {
        let mut state = self.state();
        state.disconnects += 1;
        state.link_up = false;
    }

    async fn is_connected(&self) -> bool {
        self.state().link_up
    }

    async fn write(&mut self, characteristic: Uuid, data: &[u8]) -> Result<(), TransportError> {
        let mut state = self.state();
        let index = state.write_attempts;
        state.write_attempts += 1;

        if !state.link_up {
            return Err(TransportError::NotConnected);
        }
        if state.fail_write_at == Some(index) {
            return Err(TransportError::Write(format!("injected failure on write {}", index)));
        }

        state.writes.push(MockWrite {
            characteristic,
            data: data.to_vec(),
            at: Instant::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAR: Uuid = Uuid::from_u128(0x0000ff02_0000_1000_8000_00805f9b34fb);

    #[tokio::test]
    async fn test_clones_share_state() {
        let probe = MockTransport::new();
        let mut transport = probe.clone();

        transport.connect("AA:BB:CC:DD:EE:FF").await.unwrap();
        transport.write(CHAR, &[1, 2]).await.unwrap();

        assert_eq!(probe.connect_attempts(), 1);
        assert_eq!(probe.written_bytes(), vec![1, 2]);
        assert_eq!(probe.address().as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    }

    #[tokio::test]
    async fn test_write_requires_link() {
        let mut transport = MockTransport::new();
        let err = transport.write(CHAR, &[1]).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let mut transport = MockTransport::new();
        transport.fail_connect(true);
        assert!(transport.connect("x").await.is_err());
        assert!(!transport.is_connected().await);

        transport.fail_connect(false);
        transport.connect("x").await.unwrap();
        transport.drop_link();
        assert!(!transport.is_connected().await);
    }
}
