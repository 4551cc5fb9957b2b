//! # Printer Module
//!
//! Everything that is about one physical printer rather than about bytes.
//!
//! ## Modules
//!
//! - [`config`]: Address, characteristic and delivery settings
//! - [`connection`]: Connection state machine over a [`BleTransport`](crate::transport::BleTransport)
//! - [`session`]: The four print operations

pub mod config;
pub mod connection;
pub mod session;

pub use config::PrinterConfig;
pub use connection::{ConnectionManager, ConnectionState};
pub use session::{PrinterSession, PrinterStatus};
