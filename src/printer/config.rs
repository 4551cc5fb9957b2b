//! # Printer Configuration
//!
//! Connection and delivery settings for one BLE thermal printer.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "name": "Kitchen Printer",
//!   "address": "66:22:4F:10:8A:3C",
//!   "characteristic": "0000ff02-0000-1000-8000-00805f9b34fb",
//!   "frame_size": 20,
//!   "pacing_ms": 50,
//!   "probe_interval_secs": 30,
//!   "scan_timeout_secs": 10,
//!   "operation_timeout_secs": 60
//! }
//! ```
//!
//! Every field except `address` has a default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BlueposError, Result};
use crate::transport::Chunker;
use crate::transport::chunker::{MAX_FRAME_SIZE, PACING_DELAY};

/// Write characteristic used by the common ESC/POS BLE printer modules
pub const DEFAULT_CHARACTERISTIC: Uuid = Uuid::from_u128(0x0000ff02_0000_1000_8000_00805f9b34fb);

/// Default display name
pub const DEFAULT_NAME: &str = "Thermal Printer";

/// Default interval of the background connection probe
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;

/// Default time spent scanning for a peripheral not seen yet
pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 10;

/// Largest frame any BLE stack accepts (ATT MTU 517 minus headers)
pub const FRAME_SIZE_LIMIT: usize = 512;

/// # Printer Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Display name
    pub name: String,

    /// Bluetooth MAC address (`AA:BB:CC:DD:EE:FF`)
    pub address: String,

    /// GATT characteristic the job bytes are written to
    pub characteristic: Uuid,

    /// Maximum bytes per write
    pub frame_size: usize,

    /// Delay between frames in milliseconds
    pub pacing_ms: u64,

    /// Interval of the background connection probe in seconds
    pub probe_interval_secs: u64,

    /// How long a connect scans for the printer before giving up
    pub scan_timeout_secs: u64,

    /// Upper bound for one print operation, if any
    pub operation_timeout_secs: Option<u64>,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            address: String::new(),
            characteristic: DEFAULT_CHARACTERISTIC,
            frame_size: MAX_FRAME_SIZE,
            pacing_ms: PACING_DELAY.as_millis() as u64,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            scan_timeout_secs: DEFAULT_SCAN_TIMEOUT_SECS,
            operation_timeout_secs: None,
        }
    }
}

impl PrinterConfig {
    /// Defaults for the printer at `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Load a JSON config file. The result is not validated yet.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| BlueposError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check every field and normalize the address to upper-case colon form.
    pub fn validate(mut self) -> Result<Self> {
        if self.address.trim().is_empty() {
            return Err(BlueposError::Config("printer address is required".to_string()));
        }
        self.address = normalize_mac(&self.address).ok_or_else(|| {
            BlueposError::Config(format!("invalid MAC address '{}'", self.address))
        })?;

        if !(1..=FRAME_SIZE_LIMIT).contains(&self.frame_size) {
            return Err(BlueposError::Config(format!(
                "frame_size {} is outside 1-{}",
                self.frame_size, FRAME_SIZE_LIMIT
            )));
        }
        if self.probe_interval_secs == 0 {
            return Err(BlueposError::Config(
                "probe_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.scan_timeout_secs == 0 {
            return Err(BlueposError::Config(
                "scan_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.operation_timeout_secs == Some(0) {
            return Err(BlueposError::Config(
                "operation_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_secs.map(Duration::from_secs)
    }

    /// Chunker with this config's frame size and pacing.
    pub fn chunker(&self) -> Chunker {
        Chunker::new(self.frame_size, self.pacing())
    }
}

// ============================================================================
// MAC ADDRESSES
// ============================================================================

/// Validate a Bluetooth MAC address (`XX:XX:XX:XX:XX:XX` or `XX-XX-...`).
pub fn is_valid_mac(mac: &str) -> bool {
    normalize_mac(mac).is_some()
}

/// Normalize a MAC address to upper-case, colon separated form.
///
/// Both `:` and `-` separators are accepted, but not mixed.
///
/// ```
/// use bluepos::printer::config::normalize_mac;
///
/// assert_eq!(normalize_mac("aa-bb-cc-dd-ee-ff").as_deref(), Some("AA:BB:CC:DD:EE:FF"));
/// assert_eq!(normalize_mac("aa:bb-cc:dd:ee:ff"), None);
/// ```
pub fn normalize_mac(mac: &str) -> Option<String> {
    let mac = mac.trim();
    let separator = if mac.contains(':') { ':' } else { '-' };
    let parts: Vec<&str> = mac.split(separator).collect();
    if parts.len() != 6 {
        return None;
    }
    if !parts
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
    {
        return None;
    }
    Some(parts.join(":").to_ascii_uppercase())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mac_addresses() {
        assert!(is_valid_mac("00:11:22:33:44:55"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa:bb:cc:dd:ee:ff"));
        assert!(is_valid_mac("00-11-22-33-44-55"));
    }

    #[test]
    fn test_invalid_mac_addresses() {
        assert!(!is_valid_mac("00:11:22:33:44")); // too short
        assert!(!is_valid_mac("00:11:22:33:44:55:66")); // too long
        assert!(!is_valid_mac("00:11-22:33:44:55")); // mixed separators
        assert!(!is_valid_mac("GG:HH:II:JJ:KK:LL")); // invalid hex
        assert!(!is_valid_mac("001:1:22:33:44:55"));
        assert!(!is_valid_mac("")); // empty
        assert!(!is_valid_mac("not-a-mac")); // garbage
    }

    #[test]
    fn test_defaults() {
        let config = PrinterConfig::default();
        assert_eq!(config.frame_size, 20);
        assert_eq!(config.pacing(), Duration::from_millis(50));
        assert_eq!(config.probe_interval(), Duration::from_secs(30));
        assert_eq!(config.scan_timeout(), Duration::from_secs(10));
        assert_eq!(config.operation_timeout(), None);
        assert_eq!(
            config.characteristic.to_string(),
            "0000ff02-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_validate_normalizes_address() {
        let config = PrinterConfig::new("66-22-4f-10-8a-3c").validate().unwrap();
        assert_eq!(config.address, "66:22:4F:10:8A:3C");
    }

    #[test]
    fn test_validate_rejects() {
        assert!(matches!(
            PrinterConfig::default().validate(),
            Err(BlueposError::Config(_))
        ));
        assert!(PrinterConfig::new("zz").validate().is_err());

        let mut config = PrinterConfig::new("00:11:22:33:44:55");
        config.frame_size = 0;
        assert!(config.clone().validate().is_err());
        config.frame_size = 513;
        assert!(config.validate().is_err());

        let mut config = PrinterConfig::new("00:11:22:33:44:55");
        config.operation_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = PrinterConfig::new("00:11:22:33:44:55");
        config.scan_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_json() {
        let config: PrinterConfig =
            serde_json::from_str(r#"{"address": "00:11:22:33:44:55", "pacing_ms": 80}"#).unwrap();
        assert_eq!(config.pacing_ms, 80);
        assert_eq!(config.frame_size, 20);
        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.chunker(), Chunker::new(20, Duration::from_millis(80)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("bluepos-config-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"name": "Bar", "address": "00:11:22:33:44:55", "operation_timeout_secs": 5, "scan_timeout_secs": 3}"#,
        )
        .unwrap();
        let config = PrinterConfig::from_file(&path).unwrap().validate().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.name, "Bar");
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.scan_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            PrinterConfig::from_file("/nonexistent/bluepos.json"),
            Err(BlueposError::Io(_))
        ));
    }
}
