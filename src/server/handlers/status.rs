//! Printer status handler.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::printer::PrinterStatus;

use super::super::state::AppState;

/// Handle GET /api/status - last published connection state.
///
/// Reads the session's status channel, so it answers while a print job
/// holds the session. The background probe keeps the state fresh.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<PrinterStatus> {
    Json(state.status.borrow().clone())
}
