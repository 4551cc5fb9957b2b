//! # Print Job Encoder
//!
//! Turns a [`PrintRequest`] into the complete ESC/POS byte stream for one
//! job. Every function here is pure: no I/O, and the same input always
//! produces the same bytes.
//!
//! ## Job Layouts
//!
//! ```text
//! text     INIT ALIGN SIZE [BOLD_ON] <text> LF BOLD_OFF SIZE_NORMAL ALIGN_LEFT
//! qr       INIT ALIGN_CENTER MODEL MODULE_SIZE ECC STORE(len, data) PRINT ALIGN_LEFT
//! barcode  INIT ALIGN_CENTER HEIGHT WIDTH HRI CODE128(len, data) ALIGN_LEFT
//! feed     LF × n
//! ```
//!
//! Formatted jobs always end in the default state (left, normal size, bold
//! off) because the printer carries formatting over into the next job.

use std::ops::RangeInclusive;

use crate::error::{BlueposError, Result};
use crate::protocol::barcode::{
    barcode1d::{self, Symbology},
    qr,
};
use crate::protocol::commands;
use crate::protocol::cp850;
use crate::protocol::text::{self, Alignment, FontSize};

/// Default QR module size in dots
pub const DEFAULT_QR_SIZE: u8 = 6;

/// Accepted QR module sizes
pub const QR_SIZE_RANGE: RangeInclusive<u8> = 1..=16;

/// Default barcode symbology name
pub const DEFAULT_SYMBOLOGY: &str = "CODE128";

/// Default number of lines for a paper feed
pub const DEFAULT_FEED_LINES: u8 = 3;

/// Accepted paper feed line counts
pub const FEED_LINES_RANGE: RangeInclusive<u8> = 1..=10;

// ============================================================================
// COMMAND BUFFER
// ============================================================================

/// # Command Buffer
///
/// Ordered bytes for one fully composed job. A buffer is built once per
/// request and handed to the transport by value, after which nothing can
/// append to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Vec<u8>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command (or raw data) to the end of the buffer.
    pub fn push(&mut self, command: impl AsRef<[u8]>) -> &mut Self {
        self.bytes.extend_from_slice(command.as_ref());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Consecutive views of at most `frame_size` bytes; the last one may be
    /// shorter. A `frame_size` of zero is treated as one.
    ///
    /// ```
    /// use bluepos::encoder::CommandBuffer;
    ///
    /// let buffer = CommandBuffer::from(vec![0u8; 47]);
    /// let sizes: Vec<usize> = buffer.frames(20).map(|f| f.len()).collect();
    /// assert_eq!(sizes, vec![20, 20, 7]);
    /// ```
    pub fn frames(&self, frame_size: usize) -> std::slice::Chunks<'_, u8> {
        self.bytes.chunks(frame_size.max(1))
    }

    /// Number of frames [`frames`](Self::frames) yields for `frame_size`.
    pub fn frame_count(&self, frame_size: usize) -> usize {
        self.bytes.len().div_ceil(frame_size.max(1))
    }
}

impl AsRef<[u8]> for CommandBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for CommandBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

// ============================================================================
// PRINT REQUEST
// ============================================================================

/// One high-level print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintRequest {
    Text {
        content: String,
        font_size: FontSize,
        alignment: Alignment,
        bold: bool,
    },
    QrCode {
        content: String,
        size: u8,
    },
    Barcode {
        content: String,
        symbology: String,
    },
    FeedPaper {
        line_count: u8,
    },
}

impl PrintRequest {
    /// Plain text with default formatting.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            font_size: FontSize::default(),
            alignment: Alignment::default(),
            bold: false,
        }
    }

    /// QR code at the default module size.
    pub fn qr(content: impl Into<String>) -> Self {
        Self::QrCode {
            content: content.into(),
            size: DEFAULT_QR_SIZE,
        }
    }

    /// Barcode with the default symbology.
    pub fn barcode(content: impl Into<String>) -> Self {
        Self::Barcode {
            content: content.into(),
            symbology: DEFAULT_SYMBOLOGY.to_string(),
        }
    }

    /// Paper feed of the default length.
    pub fn feed() -> Self {
        Self::FeedPaper {
            line_count: DEFAULT_FEED_LINES,
        }
    }

    /// Short name used in logs and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::QrCode { .. } => "qr",
            Self::Barcode { .. } => "barcode",
            Self::FeedPaper { .. } => "feed",
        }
    }

    /// Check the numeric ranges of the public surface.
    ///
    /// The encoder itself passes these values through; range checks happen
    /// here, before anything is encoded or sent.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::QrCode { size, .. } if !QR_SIZE_RANGE.contains(size) => {
                Err(BlueposError::InvalidRequest(format!(
                    "QR size {} is outside {}-{}",
                    size,
                    QR_SIZE_RANGE.start(),
                    QR_SIZE_RANGE.end()
                )))
            }
            Self::FeedPaper { line_count } if !FEED_LINES_RANGE.contains(line_count) => {
                Err(BlueposError::InvalidRequest(format!(
                    "feed line count {} is outside {}-{}",
                    line_count,
                    FEED_LINES_RANGE.start(),
                    FEED_LINES_RANGE.end()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Encode this request into its command buffer.
    pub fn encode(&self) -> Result<CommandBuffer> {
        match self {
            Self::Text {
                content,
                font_size,
                alignment,
                bold,
            } => Ok(encode_text(content, *font_size, *alignment, *bold)),
            Self::QrCode { content, size } => encode_qr(content, *size),
            Self::Barcode { content, symbology } => encode_barcode(content, symbology),
            Self::FeedPaper { line_count } => Ok(encode_feed(*line_count)),
        }
    }
}

// ============================================================================
// ENCODERS
// ============================================================================

/// Device reset; the first command of every formatted job.
pub fn encode_init() -> CommandBuffer {
    CommandBuffer::from(commands::init())
}

/// # Encode a Text Job
///
/// Text is encoded as CP850 when every character fits, otherwise the whole
/// string goes out as UTF-8. Content never makes the job fail.
///
/// ## Example
///
/// ```
/// use bluepos::encoder::encode_text;
/// use bluepos::protocol::text::{Alignment, FontSize};
///
/// let job = encode_text("Hi", FontSize::Normal, Alignment::Left, false);
/// assert_eq!(
///     job.as_bytes(),
///     &[
///         0x1B, 0x40, // init
///         0x1B, 0x61, 0x00, // align left
///         0x1D, 0x21, 0x00, // normal size
///         b'H', b'i', 0x0A, // text + LF
///         0x1B, 0x45, 0x00, 0x1D, 0x21, 0x00, 0x1B, 0x61, 0x00, // reset
///     ]
/// );
/// ```
pub fn encode_text(content: &str, font_size: FontSize, alignment: Alignment, bold: bool) -> CommandBuffer {
    let mut buffer = encode_init();
    buffer.push(text::align(alignment)).push(text::size(font_size));
    if bold {
        buffer.push(text::bold_on());
    }

    let (bytes, _) = cp850::encode_with_fallback(content);
    buffer
        .push(bytes)
        .push(commands::line_feed())
        .push(text::reset_formatting());
    buffer
}

/// # Encode a QR Code Job
///
/// `size` is the module size in dots and is not range checked here. The
/// content is stored as UTF-8.
///
/// ## Errors
///
/// [`BlueposError::EncodingPrecondition`] when the UTF-8 content does not fit
/// the 16-bit length field.
pub fn encode_qr(content: &str, size: u8) -> Result<CommandBuffer> {
    let mut buffer = encode_init();
    buffer
        .push(text::align_center())
        .push(qr::set_model())
        .push(qr::set_module_size(size))
        .push(qr::set_error_correction())
        .push(qr::store_data(content.as_bytes())?)
        .push(qr::print())
        .push(text::align_left());
    Ok(buffer)
}

/// # Encode a 1D Barcode Job
///
/// ## Errors
///
/// [`BlueposError::EncodingPrecondition`] when `symbology` is not
/// implemented, or when the content is not ASCII or longer than 255 bytes.
/// Nothing is produced in that case, so a job can never reach the printer
/// as a setup block without a symbol.
pub fn encode_barcode(content: &str, symbology: &str) -> Result<CommandBuffer> {
    let symbol = match symbology.parse::<Symbology>()? {
        Symbology::Code128 => barcode1d::code128(content)?,
    };

    let mut buffer = encode_init();
    buffer
        .push(text::align_center())
        .push(barcode1d::setup())
        .push(symbol)
        .push(text::align_left());
    Ok(buffer)
}

/// Raw paper advance: `line_count` line feeds, nothing else.
pub fn encode_feed(line_count: u8) -> CommandBuffer {
    CommandBuffer::from(commands::feed_lines(line_count as usize))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INIT: [u8; 2] = [0x1B, 0x40];
    const ALIGN_LEFT: [u8; 3] = [0x1B, 0x61, 0x00];
    const ALIGN_CENTER: [u8; 3] = [0x1B, 0x61, 0x01];
    const RESET: [u8; 9] = [0x1B, 0x45, 0x00, 0x1D, 0x21, 0x00, 0x1B, 0x61, 0x00];

    #[test]
    fn test_text_always_ends_with_reset() {
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            for font_size in [FontSize::Normal, FontSize::Large] {
                for bold in [false, true] {
                    let job = encode_text("x", font_size, alignment, bold);
                    assert!(job.as_bytes().starts_with(&INIT));
                    assert!(
                        job.as_bytes().ends_with(&RESET),
                        "{alignment}/{font_size}/{bold} did not end with reset"
                    );
                }
            }
        }
    }

    #[test]
    fn test_text_large_bold_right() {
        let job = encode_text("A", FontSize::Large, Alignment::Right, true);
        let mut expected = INIT.to_vec();
        expected.extend([0x1B, 0x61, 0x02]);
        expected.extend([0x1D, 0x21, 0x11]);
        expected.extend([0x1B, 0x45, 0x01]);
        expected.extend([b'A', 0x0A]);
        expected.extend(RESET);
        assert_eq!(job.into_bytes(), expected);
    }

    #[test]
    fn test_text_bold_off_has_no_bold_on() {
        let job = encode_text("A", FontSize::Normal, Alignment::Left, false);
        // init(2) + align(3) + size(3) then content
        assert_eq!(job.as_bytes()[8], b'A');
    }

    #[test]
    fn test_text_cp850_and_fallback() {
        let job = encode_text("né", FontSize::Normal, Alignment::Left, false);
        assert_eq!(&job.as_bytes()[8..11], &[b'n', 0x82, 0x0A]);

        let job = encode_text("€", FontSize::Normal, Alignment::Left, false);
        assert_eq!(&job.as_bytes()[8..11], "€".as_bytes());
    }

    #[test]
    fn test_qr_layout() {
        let job = encode_qr("hi", 6).unwrap();
        let mut expected = INIT.to_vec();
        expected.extend(ALIGN_CENTER);
        expected.extend([0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);
        expected.extend([0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 0x06]);
        expected.extend([0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 0x30]);
        expected.extend([0x1D, 0x28, 0x6B, 0x05, 0x00, 0x31, 0x50, 0x30, b'h', b'i']);
        expected.extend([0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);
        expected.extend(ALIGN_LEFT);
        assert_eq!(job.into_bytes(), expected);
    }

    /// Offset of pL in a QR job: init(2) + center(3) + model(9) + size(8) + ecc(8) + tag(3)
    const QR_LEN_OFFSET: usize = 33;

    fn qr_length_field(job: &CommandBuffer) -> usize {
        let b = job.as_bytes();
        u16::from_le_bytes([b[QR_LEN_OFFSET], b[QR_LEN_OFFSET + 1]]) as usize
    }

    #[test]
    fn test_qr_length_field() {
        let contents = vec![
            String::new(),
            "a".to_string(),
            "ação".to_string(),
            "z".repeat(256),
            "0123456789".repeat(40),
        ];
        for content in &contents {
            let job = encode_qr(content, 4).unwrap();
            assert_eq!(qr_length_field(&job), content.len() + 3, "content {content:?}");
        }
    }

    #[test]
    fn test_qr_size_not_validated_by_encoder() {
        let job = encode_qr("x", 40).unwrap();
        assert_eq!(job.as_bytes()[21], 40);
    }

    #[test]
    fn test_barcode_code128() {
        let job = encode_barcode("ABC", "Code128").unwrap();
        let mut expected = INIT.to_vec();
        expected.extend(ALIGN_CENTER);
        expected.extend([0x1D, 0x68, 0x64, 0x1D, 0x77, 0x02, 0x1D, 0x48, 0x02]);
        expected.extend([0x1D, 0x6B, 0x49, 0x03]);
        expected.extend(b"ABC");
        expected.extend(ALIGN_LEFT);
        assert_eq!(job.into_bytes(), expected);
    }

    #[test]
    fn test_barcode_unsupported_symbology() {
        let err = encode_barcode("123", "EAN13").unwrap_err();
        assert!(matches!(err, BlueposError::EncodingPrecondition(_)));
    }

    #[test]
    fn test_barcode_non_ascii() {
        let err = encode_barcode("çé", DEFAULT_SYMBOLOGY).unwrap_err();
        assert!(matches!(err, BlueposError::EncodingPrecondition(_)));
    }

    #[test]
    fn test_feed() {
        assert_eq!(encode_feed(5).into_bytes(), vec![0x0A; 5]);
        assert!(encode_feed(0).is_empty());
    }

    #[test]
    fn test_request_defaults() {
        assert_eq!(
            PrintRequest::qr("x"),
            PrintRequest::QrCode {
                content: "x".into(),
                size: 6
            }
        );
        assert_eq!(PrintRequest::feed(), PrintRequest::FeedPaper { line_count: 3 });
        assert_eq!(PrintRequest::barcode("1").kind(), "barcode");
    }

    #[test]
    fn test_request_validate() {
        assert!(PrintRequest::qr("x").validate().is_ok());
        for size in [0, 17] {
            let request = PrintRequest::QrCode {
                content: "x".into(),
                size,
            };
            assert!(matches!(request.validate(), Err(BlueposError::InvalidRequest(_))));
        }
        for line_count in [0, 11] {
            let request = PrintRequest::FeedPaper { line_count };
            assert!(request.validate().is_err());
        }
        assert!(PrintRequest::FeedPaper { line_count: 10 }.validate().is_ok());
    }

    #[test]
    fn test_request_encode_dispatch() {
        let job = PrintRequest::text("Hi").encode().unwrap();
        assert_eq!(job, encode_text("Hi", FontSize::Normal, Alignment::Left, false));
        let job = PrintRequest::FeedPaper { line_count: 2 }.encode().unwrap();
        assert_eq!(job.as_bytes(), &[0x0A, 0x0A]);
    }

    #[test]
    fn test_frames() {
        let buffer = CommandBuffer::from((0..47u8).collect::<Vec<_>>());
        let frames: Vec<&[u8]> = buffer.frames(20).collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2], &[40, 41, 42, 43, 44, 45, 46]);
        assert_eq!(buffer.frame_count(20), 3);
        assert_eq!(CommandBuffer::new().frame_count(20), 0);
        assert_eq!(buffer.frame_count(0), 47);
    }
}
