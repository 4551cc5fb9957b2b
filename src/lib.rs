//! # Bluepos - ESC/POS Printing over Bluetooth LE
//!
//! Bluepos drives small ESC/POS thermal receipt printers that expose a
//! writable GATT characteristic. It provides:
//!
//! - **Protocol implementation**: ESC/POS command builders and CP850 text
//! - **Encoder**: complete byte streams for text, QR, barcode and feed jobs
//! - **Transport**: a BLE primitive, chunked and paced 20-byte writes
//! - **Session**: connection management and the four print operations
//! - **Server**: an HTTP adapter with a background connection probe
//!
//! ## Quick Start
//!
//! ```no_run
//! use bluepos::{
//!     printer::{PrinterConfig, PrinterSession},
//!     protocol::text::{Alignment, FontSize},
//!     transport::MockTransport,
//! };
//!
//! # async fn example() -> bluepos::Result<()> {
//! // Swap in `BtleTransport::open_default().await?` with the `ble` feature
//! let transport = MockTransport::new();
//!
//! let config = PrinterConfig::new("66:22:4F:10:8A:3C").validate()?;
//! let mut printer = PrinterSession::new(transport, &config);
//!
//! printer.print_text("Table 4", FontSize::Large, Alignment::Center, true).await?;
//! printer.print_barcode("ORDER-0042", "CODE128").await?;
//! printer.feed_paper(3).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command builders |
//! | [`encoder`] | Print requests and their byte streams |
//! | [`transport`] | BLE primitive, chunker and backends |
//! | [`printer`] | Config, connection state, print session |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Tested against the common 58mm "MTP"/"PT" style BLE printers that accept
//! raw ESC/POS on characteristic `0000ff02-0000-1000-8000-00805f9b34fb`.
//! Other printers work when their write characteristic is configured.

pub mod encoder;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use encoder::{CommandBuffer, PrintRequest};
pub use error::{BlueposError, Result};
pub use printer::{PrinterConfig, PrinterSession};
pub use transport::{BleTransport, MockTransport};
