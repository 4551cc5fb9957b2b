//! Print job handlers.
//!
//! Each endpoint turns its JSON form into a [`PrintRequest`] and runs it on
//! the shared session. Numeric fields are accepted as wide integers and
//! narrowed here so out-of-range values get the same 400 as any other
//! invalid parameter. Bodies serde rejects outright (negative numbers,
//! wrong types, broken JSON) come back through [`JsonForm`] as 400 too.

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::encoder::{DEFAULT_FEED_LINES, DEFAULT_QR_SIZE, DEFAULT_SYMBOLOGY, PrintRequest};
use crate::error::{BlueposError, Result};
use crate::protocol::text::{Alignment, FontSize};

use super::super::state::AppState;
use super::{JsonForm, parse_form};

fn default_font_size() -> String {
    "normal".to_string()
}

fn default_alignment() -> String {
    "left".to_string()
}

fn default_qr_size() -> u32 {
    DEFAULT_QR_SIZE as u32
}

fn default_symbology() -> String {
    DEFAULT_SYMBOLOGY.to_string()
}

fn default_feed_lines() -> u32 {
    DEFAULT_FEED_LINES as u32
}

/// Form data for POST /api/print/text.
#[derive(Debug, Deserialize)]
pub struct TextForm {
    #[serde(alias = "content")]
    pub text: String,
    /// `small`, `normal` or `large`
    #[serde(default = "default_font_size")]
    pub font_size: String,
    /// `left`, `center` or `right`
    #[serde(default = "default_alignment")]
    pub alignment: String,
    #[serde(default)]
    pub bold: bool,
}

/// Form data for POST /api/print/qr.
#[derive(Debug, Deserialize)]
pub struct QrForm {
    #[serde(alias = "content")]
    pub data: String,
    #[serde(default = "default_qr_size")]
    pub size: u32,
}

/// Form data for POST /api/print/barcode.
#[derive(Debug, Deserialize)]
pub struct BarcodeForm {
    #[serde(alias = "content")]
    pub data: String,
    #[serde(default = "default_symbology")]
    pub barcode_type: String,
}

/// Form data for POST /api/print/feed.
#[derive(Debug, Deserialize)]
pub struct FeedForm {
    #[serde(default = "default_feed_lines")]
    pub lines: u32,
}

impl Default for FeedForm {
    fn default() -> Self {
        Self {
            lines: default_feed_lines(),
        }
    }
}

/// Body of every successful print response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintResponse {
    pub success: bool,
    pub message: String,
}

fn narrow(field: &str, value: u32) -> Result<u8> {
    u8::try_from(value)
        .map_err(|_| BlueposError::InvalidRequest(format!("{} {} is out of range", field, value)))
}

impl TryFrom<TextForm> for PrintRequest {
    type Error = BlueposError;

    fn try_from(form: TextForm) -> Result<Self> {
        Ok(PrintRequest::Text {
            font_size: form.font_size.parse::<FontSize>()?,
            alignment: form.alignment.parse::<Alignment>()?,
            bold: form.bold,
            content: form.text,
        })
    }
}

impl TryFrom<QrForm> for PrintRequest {
    type Error = BlueposError;

    fn try_from(form: QrForm) -> Result<Self> {
        Ok(PrintRequest::QrCode {
            size: narrow("QR size", form.size)?,
            content: form.data,
        })
    }
}

impl From<BarcodeForm> for PrintRequest {
    fn from(form: BarcodeForm) -> Self {
        PrintRequest::Barcode {
            content: form.data,
            symbology: form.barcode_type,
        }
    }
}

impl TryFrom<FeedForm> for PrintRequest {
    type Error = BlueposError;

    fn try_from(form: FeedForm) -> Result<Self> {
        Ok(PrintRequest::FeedPaper {
            line_count: narrow("feed line count", form.lines)?,
        })
    }
}

/// Handle POST /api/print/text.
pub async fn text(
    State(state): State<Arc<AppState>>,
    JsonForm(form): JsonForm<TextForm>,
) -> Result<Json<PrintResponse>> {
    submit(&state, form.try_into()?).await
}

/// Handle POST /api/print/qr.
pub async fn qr(
    State(state): State<Arc<AppState>>,
    JsonForm(form): JsonForm<QrForm>,
) -> Result<Json<PrintResponse>> {
    submit(&state, form.try_into()?).await
}

/// Handle POST /api/print/barcode.
pub async fn barcode(
    State(state): State<Arc<AppState>>,
    JsonForm(form): JsonForm<BarcodeForm>,
) -> Result<Json<PrintResponse>> {
    submit(&state, form.into()).await
}

/// Handle POST /api/print/feed. An empty body feeds the default length.
pub async fn feed(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<PrintResponse>> {
    let form = if body.iter().all(u8::is_ascii_whitespace) {
        FeedForm::default()
    } else {
        parse_form::<FeedForm>(&body)?
    };
    submit(&state, form.try_into()?).await
}

/// Run one request on the shared session, bounded by the configured
/// operation timeout.
async fn submit(state: &AppState, request: PrintRequest) -> Result<Json<PrintResponse>> {
    let timeout = state.config.printer.operation_timeout();
    let mut session = state.session.lock().await;
    session.print_within(&request, timeout).await?;
    drop(session);

    info!(kind = request.kind(), "print request completed");
    Ok(Json(PrintResponse {
        success: true,
        message: format!("{} job printed", request.kind()),
    }))
}
