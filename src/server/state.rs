//! Server state and configuration.

use tokio::sync::{Mutex, watch};

use crate::printer::{PrinterConfig, PrinterSession, PrinterStatus};
use crate::transport::BleTransport;

/// The session type the server drives; the transport is chosen at startup.
pub type DynSession = PrinterSession<Box<dyn BleTransport>>;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Printer the server drives
    pub printer: PrinterConfig,
}

/// Application state shared across handlers.
///
/// The session sits behind an async mutex: print jobs and the background
/// probe are serialized, so two jobs never interleave their frames on the
/// link. Status reads go through `status` and never wait on that mutex.
pub struct AppState {
    pub config: ServerConfig,
    pub session: Mutex<DynSession>,
    pub status: watch::Receiver<PrinterStatus>,
}

impl AppState {
    pub fn new(config: ServerConfig, transport: Box<dyn BleTransport>) -> Self {
        let session = PrinterSession::new(transport, &config.printer);
        let status = session.watch_status();
        Self {
            config,
            session: Mutex::new(session),
            status,
        }
    }
}
