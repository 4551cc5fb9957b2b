//! # Bluetooth LE Transport (btleplug)
//!
//! GATT client for BLE thermal printers, built on `btleplug`. Enabled with
//! the `ble` cargo feature.
//!
//! ## Platform Setup (Linux)
//!
//! btleplug talks to BlueZ over D-Bus. The printer must be powered on and
//! advertising; pairing is not required for most ESC/POS BLE printers.
//!
//! ```bash
//! # Find the printer's address
//! $ bluetoothctl
//! [bluetooth]# scan on
//! # Note the address, e.g., 66:22:XX:XX:XX:XX
//! ```
//!
//! ## Connection Flow
//!
//! 1. Scan until a peripheral with the requested address shows up
//! 2. Connect and discover services
//! 3. Look up the write characteristic on every write
//!
//! The peripheral handle is kept after a disconnect so reconnecting skips
//! the scan.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    BDAddr, Central, CharPropFlags, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{BleTransport, TransportError};

/// How long to scan for the printer before giving up, unless configured
const SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between peripheral list checks while scanning
const SCAN_POLL: Duration = Duration::from_millis(250);

/// # btleplug Printer Transport
pub struct BtleTransport {
    adapter: Adapter,
    peripheral: Option<Peripheral>,
    scan_timeout: Duration,
}

impl BtleTransport {
    /// Open the first Bluetooth adapter on the system.
    ///
    /// ## Errors
    ///
    /// Returns an error if the Bluetooth stack is unavailable or no adapter
    /// is present.
    pub async fn open_default() -> Result<Self, TransportError> {
        let manager = Manager::new()
            .await
            .map_err(|e| TransportError::Backend(format!("Bluetooth manager: {}", e)))?;
        let adapter = manager
            .adapters()
            .await
            .map_err(|e| TransportError::Backend(format!("Listing adapters: {}", e)))?
            .into_iter()
            .next()
            .ok_or_else(|| TransportError::Backend("no Bluetooth adapter found".to_string()))?;

        Ok(Self {
            adapter,
            peripheral: None,
            scan_timeout: SCAN_TIMEOUT,
        })
    }

    /// Set how long `connect` scans for an unknown peripheral.
    pub fn set_scan_timeout(&mut self, timeout: Duration) {
        self.scan_timeout = timeout;
    }

    async fn find_peripheral(&self, address: BDAddr) -> Result<Peripheral, TransportError> {
        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(|e| TransportError::Backend(format!("Starting scan: {}", e)))?;

        let deadline = Instant::now() + self.scan_timeout;
        let found = loop {
            let peripherals = self
                .adapter
                .peripherals()
                .await
                .map_err(|e| TransportError::Backend(format!("Listing peripherals: {}", e)))?;

            if let Some(p) = peripherals.into_iter().find(|p| p.address() == address) {
                break Some(p);
            }
            if Instant::now() >= deadline {
                break None;
            }
            tokio::time::sleep(SCAN_POLL).await;
        };

        if let Err(e) = self.adapter.stop_scan().await {
            warn!(error = %e, "failed to stop scan");
        }

        found.ok_or_else(|| {
            TransportError::Connect(format!(
                "{} not found after {:?} scan",
                address, self.scan_timeout
            ))
        })
    }
}

async fn establish(peripheral: &Peripheral) -> Result<(), TransportError> {
    peripheral
        .connect()
        .await
        .map_err(|e| TransportError::Connect(e.to_string()))?;
    peripheral
        .discover_services()
        .await
        .map_err(|e| TransportError::Connect(format!("service discovery: {}", e)))
}

#[async_trait]
impl BleTransport for BtleTransport {
    #[instrument(skip(self))]
    async fn connect(&mut self, address: &str) -> Result<(), TransportError> {
        let addr = BDAddr::from_str(address)
            .map_err(|e| TransportError::Connect(format!("invalid address {}: {}", address, e)))?;

        let peripheral = match self.peripheral.take() {
            Some(p) if p.address() == addr => p,
            _ => {
                debug!("scanning for peripheral");
                self.find_peripheral(addr).await?
            }
        };

        // The handle stays cached on failure so the next attempt skips the scan
        let linked = establish(&peripheral).await;
        self.peripheral = Some(peripheral);
        linked?;

        info!("BLE link established");
        Ok(())
    }

    async fn disconnect(&mut self) {
        if let Some(p) = &self.peripheral
            && let Err(e) = p.disconnect().await
        {
            warn!(error = %e, "BLE disconnect failed");
        }
    }

    async fn is_connected(&self) -> bool {
        match &self.peripheral {
            Some(p) => p.is_connected().await.unwrap_or(false),
            None => false,
        }
    }

    async fn write(&mut self, characteristic: Uuid, data: &[u8]) -> Result<(), TransportError> {
        let peripheral = self.peripheral.as_ref().ok_or(TransportError::NotConnected)?;

        let target = peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic)
            .ok_or(TransportError::CharacteristicNotFound(characteristic))?;

        let write_type = if target
            .properties
            .contains(CharPropFlags::WRITE_WITHOUT_RESPONSE)
        {
            WriteType::WithoutResponse
        } else {
            WriteType::WithResponse
        };

        peripheral
            .write(&target, data, write_type)
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }
}
