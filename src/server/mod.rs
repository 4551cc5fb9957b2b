//! # HTTP Server for Print Jobs
//!
//! Exposes the four print operations and the printer status over HTTP, and
//! keeps the printer link warm with a background probe.
//!
//! ## Usage
//!
//! ```bash
//! bluepos --address 66:22:4F:10:8A:3C serve --listen 0.0.0.0:8080
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | POST | /api/print/text | `{"text", "font_size"?, "alignment"?, "bold"?}` |
//! | POST | /api/print/qr | `{"data", "size"?}` |
//! | POST | /api/print/barcode | `{"data", "barcode_type"?}` |
//! | POST | /api/print/feed | `{"lines"?}` or empty |
//! | GET | /api/status | - |

mod handlers;
mod state;

pub use handlers::print::PrintResponse;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::{BlueposError, Result};
use crate::transport::BleTransport;

/// Build the API router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/print/text", post(handlers::print::text))
        .route("/api/print/qr", post(handlers::print::qr))
        .route("/api/print/barcode", post(handlers::print::barcode))
        .route("/api/print/feed", post(handlers::print::feed))
        .route("/api/status", get(handlers::status::status))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM.
///
/// On shutdown the probe is stopped and the printer link is closed.
///
/// ## Example
///
/// ```no_run
/// use bluepos::printer::PrinterConfig;
/// use bluepos::server::{serve, ServerConfig};
/// use bluepos::transport::MockTransport;
///
/// # async fn example() -> bluepos::Result<()> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     printer: PrinterConfig::new("66:22:4F:10:8A:3C").validate()?,
/// };
///
/// serve(config, Box::new(MockTransport::new())).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, transport: Box<dyn BleTransport>) -> Result<()> {
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config, transport));

    let probe = tokio::spawn(probe_connection(state.clone()));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| BlueposError::Config(format!("failed to bind to {}: {}", listen_addr, e)))?;

    info!(
        listen = %listen_addr,
        printer = %state.config.printer.address,
        "bluepos HTTP server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    probe.abort();
    state.session.lock().await.disconnect().await;
    info!("server stopped");
    Ok(())
}

/// Background task: reconnect and refresh the connection state on a fixed
/// interval. The first tick fires immediately, so the link comes up at
/// startup.
async fn probe_connection(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(state.config.printer.probe_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let mut session = state.session.lock().await;
        match session.refresh().await {
            Ok(status) => debug!(connected = status.connected, "printer probe"),
            Err(e) => warn!(error = %e, "printer probe failed"),
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
