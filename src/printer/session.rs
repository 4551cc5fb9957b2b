//! # Printer Session
//!
//! The public face of the crate: one method per print operation, each run
//! as validate → encode → ensure connected → chunked send.
//!
//! ```no_run
//! use bluepos::printer::{PrinterConfig, PrinterSession};
//! use bluepos::protocol::text::{Alignment, FontSize};
//! use bluepos::transport::MockTransport;
//!
//! # async fn example() -> bluepos::Result<()> {
//! let config = PrinterConfig::new("66:22:4F:10:8A:3C").validate()?;
//! let mut session = PrinterSession::new(MockTransport::new(), &config);
//!
//! session.print_text("Hello", FontSize::Large, Alignment::Center, true).await?;
//! session.print_qr("https://example.com", 6).await?;
//! session.feed_paper(3).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Operations are independent. The only thing they share is the connection
//! state, and no operation is atomic across a link drop: a failed send
//! leaves the frames already written on the printer.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, instrument};
use uuid::Uuid;

use super::config::PrinterConfig;
use super::connection::{ConnectionManager, ConnectionState};
use crate::encoder::PrintRequest;
use crate::error::{BlueposError, Result};
use crate::protocol::text::{Alignment, FontSize};
use crate::transport::{BleTransport, Chunker};

/// Snapshot reported by status queries and the background probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterStatus {
    pub name: String,
    pub address: String,
    pub connected: bool,
}

/// # Printer Session
///
/// Long-lived; the connection state cycles for the life of the process.
/// All methods take `&mut self`, so at most one operation runs at a time.
///
/// Every operation publishes the resulting [`PrinterStatus`] on a watch
/// channel, so readers can follow the state without waiting for the session.
pub struct PrinterSession<T: BleTransport> {
    name: String,
    connection: ConnectionManager<T>,
    chunker: Chunker,
    characteristic: Uuid,
    status_tx: watch::Sender<PrinterStatus>,
}

impl<T: BleTransport> PrinterSession<T> {
    /// Build a session from a validated config. Does not connect.
    pub fn new(transport: T, config: &PrinterConfig) -> Self {
        let (status_tx, _) = watch::channel(PrinterStatus {
            name: config.name.clone(),
            address: config.address.clone(),
            connected: false,
        });
        Self {
            name: config.name.clone(),
            connection: ConnectionManager::new(transport, config.address.clone()),
            chunker: config.chunker(),
            characteristic: config.characteristic,
            status_tx,
        }
    }

    /// Receiver for the status published after each operation.
    pub fn watch_status(&self) -> watch::Receiver<PrinterStatus> {
        self.status_tx.subscribe()
    }

    fn publish(&self) {
        self.status_tx.send_replace(self.status());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        self.connection.address()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn status(&self) -> PrinterStatus {
        PrinterStatus {
            name: self.name.clone(),
            address: self.connection.address().to_string(),
            connected: self.connection.is_connected(),
        }
    }

    // ------------------------------------------------------------------------
    // Print operations
    // ------------------------------------------------------------------------

    /// Print one line of text.
    pub async fn print_text(
        &mut self,
        content: &str,
        font_size: FontSize,
        alignment: Alignment,
        bold: bool,
    ) -> Result<()> {
        self.print(&PrintRequest::Text {
            content: content.to_string(),
            font_size,
            alignment,
            bold,
        })
        .await
    }

    /// Print a QR code with module size `size` (1-16).
    pub async fn print_qr(&mut self, content: &str, size: u8) -> Result<()> {
        self.print(&PrintRequest::QrCode {
            content: content.to_string(),
            size,
        })
        .await
    }

    /// Print a 1D barcode. Only `CODE128` is implemented.
    pub async fn print_barcode(&mut self, content: &str, symbology: &str) -> Result<()> {
        self.print(&PrintRequest::Barcode {
            content: content.to_string(),
            symbology: symbology.to_string(),
        })
        .await
    }

    /// Advance the paper `line_count` lines (1-10).
    pub async fn feed_paper(&mut self, line_count: u8) -> Result<()> {
        self.print(&PrintRequest::FeedPaper { line_count }).await
    }

    /// # Run One Print Request
    ///
    /// ## Errors
    ///
    /// - `InvalidRequest` / `EncodingPrecondition`: nothing was sent
    /// - `Connection`: the link could not be established, nothing was sent
    /// - `TransportWrite`: a frame failed; earlier frames reached the printer
    ///   and the session is now `Disconnected`
    #[instrument(skip_all, fields(kind = request.kind(), address = %self.connection.address()))]
    pub async fn print(&mut self, request: &PrintRequest) -> Result<()> {
        let result = self.deliver(request).await;
        self.publish();
        result
    }

    async fn deliver(&mut self, request: &PrintRequest) -> Result<()> {
        request.validate()?;
        let buffer = request.encode()?;
        let bytes = buffer.len();

        self.connection
            .ensure_connected()
            .await
            .map_err(|e| BlueposError::Connection(format!("{}: {}", self.connection.address(), e)))?;

        match self
            .chunker
            .send(self.connection.transport_mut(), self.characteristic, buffer)
            .await
        {
            Ok(frames) => {
                info!(bytes, frames, "print job delivered");
                Ok(())
            }
            Err(e) => {
                self.connection.mark_disconnected();
                Err(BlueposError::TransportWrite(e.to_string()))
            }
        }
    }

    /// Like [`print`](Self::print), bounded by `limit` when given.
    ///
    /// An elapsed limit counts as a transport failure: the session moves to
    /// `Disconnected` and `Timeout` is returned. Frames written before the
    /// limit are not rolled back.
    pub async fn print_within(&mut self, request: &PrintRequest, limit: Option<Duration>) -> Result<()> {
        let Some(limit) = limit else {
            return self.print(request).await;
        };

        let outcome = tokio::time::timeout(limit, self.print(request)).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                self.mark_disconnected();
                Err(BlueposError::Timeout(format!(
                    "{} job did not finish within {:?}",
                    request.kind(),
                    limit
                )))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Connection management
    // ------------------------------------------------------------------------

    /// Health probe: reconnect if needed and report the resulting state.
    ///
    /// Meant to be driven on an interval; the caller decides how to log a
    /// failure.
    pub async fn refresh(&mut self) -> Result<PrinterStatus> {
        let result = self.connection.ensure_connected().await;
        self.publish();
        result.map_err(|e| BlueposError::Connection(format!("{}: {}", self.connection.address(), e)))?;
        Ok(self.status())
    }

    /// Connection test: connect, then disconnect again.
    pub async fn check(&mut self) -> Result<()> {
        self.refresh().await?;
        self.disconnect().await;
        Ok(())
    }

    /// Close the link. Also closes a link the cached state already gave up on.
    pub async fn disconnect(&mut self) {
        self.connection.disconnect().await;
        self.publish();
    }

    /// Record a failure observed by the caller (e.g. its own timeout).
    pub fn mark_disconnected(&mut self) {
        self.connection.mark_disconnected();
        self.publish();
    }
}
