//! # ESC/POS Barcode Commands
//!
//! This module implements the barcode and QR code command blocks.
//!
//! ## Supported Symbols
//!
//! | Type | Command family | Notes |
//! |------|----------------|-------|
//! | Code128 | GS k 73 | Full ASCII, single-byte length |
//! | QR Code | GS ( k, cn = 49 | Model 2, ECC level L |
//!
//! ## QR Code Usage
//!
//! QR codes are generated in a multi-step process:
//!
//! 1. Configure QR settings (model, module size, error correction)
//! 2. Store the data in the symbol buffer
//! 3. Print the stored symbol
//!
//! ```
//! use bluepos::protocol::barcode::qr;
//!
//! let mut data = Vec::new();
//! data.extend(qr::set_model());
//! data.extend(qr::set_module_size(6));
//! data.extend(qr::set_error_correction());
//! data.extend(qr::store_data(b"https://example.com").unwrap());
//! data.extend(qr::print());
//! ```

use super::commands::GS;

// ============================================================================
// 1D BARCODE COMMANDS (GS k)
// ============================================================================

/// 1D Barcode command builders
pub mod barcode1d {
    use super::GS;
    use crate::error::BlueposError;
    use std::fmt;
    use std::str::FromStr;

    /// Barcode height used for every 1D job, in dots
    pub const DEFAULT_HEIGHT: u8 = 100;

    /// Module (narrow bar) width used for every 1D job
    pub const DEFAULT_WIDTH: u8 = 2;

    /// Implemented 1D symbologies
    ///
    /// Requests name the symbology as an open string; parsing is
    /// case-insensitive and unknown names are rejected rather than printed
    /// as an empty barcode block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Symbology {
        /// Code128 (full ASCII)
        Code128,
    }

    impl FromStr for Symbology {
        type Err = BlueposError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            if s.trim().eq_ignore_ascii_case("code128") {
                Ok(Self::Code128)
            } else {
                Err(BlueposError::EncodingPrecondition(format!(
                    "unsupported barcode symbology '{}'",
                    s
                )))
            }
        }
    }

    impl fmt::Display for Symbology {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Code128 => f.write_str("CODE128"),
            }
        }
    }

    /// HRI (Human Readable Interpretation) position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum HriPosition {
        /// No HRI text printed
        None = 0,
        /// HRI above barcode
        Above = 1,
        /// HRI below barcode (default)
        #[default]
        Below = 2,
        /// HRI both above and below
        Both = 3,
    }

    /// # Set Barcode Height (GS h n)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 68 n |
    pub fn set_height(dots: u8) -> Vec<u8> {
        vec![GS, b'h', dots]
    }

    /// # Set Barcode Module Width (GS w n)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 77 n |
    pub fn set_width(n: u8) -> Vec<u8> {
        vec![GS, b'w', n]
    }

    /// # Set HRI Position (GS H n)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 48 n |
    pub fn set_hri_position(position: HriPosition) -> Vec<u8> {
        vec![GS, b'H', position as u8]
    }

    /// Height, width and HRI setup sent ahead of every 1D barcode.
    ///
    /// ```
    /// use bluepos::protocol::barcode::barcode1d;
    ///
    /// assert_eq!(
    ///     barcode1d::setup(),
    ///     vec![0x1D, 0x68, 0x64, 0x1D, 0x77, 0x02, 0x1D, 0x48, 0x02]
    /// );
    /// ```
    pub fn setup() -> Vec<u8> {
        let mut cmd = set_height(DEFAULT_HEIGHT);
        cmd.extend(set_width(DEFAULT_WIDTH));
        cmd.extend(set_hri_position(HriPosition::Below));
        cmd
    }

    /// # Print Code128 (GS k 73 n data)
    ///
    /// ## Protocol Details
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | ASCII   | GS k I n d1...dn |
    /// | Hex     | 1D 6B 49 n d1...dn |
    ///
    /// `n` is the byte length of the data, so the data must be ASCII and at
    /// most 255 bytes long. Content that breaks either rule is rejected; it is
    /// never transcoded.
    ///
    /// ## Example
    ///
    /// ```
    /// use bluepos::protocol::barcode::barcode1d;
    ///
    /// let cmd = barcode1d::code128("ABC").unwrap();
    /// assert_eq!(cmd, vec![0x1D, 0x6B, 0x49, 0x03, b'A', b'B', b'C']);
    /// ```
    pub fn code128(data: &str) -> Result<Vec<u8>, BlueposError> {
        if !data.is_ascii() {
            return Err(BlueposError::EncodingPrecondition(format!(
                "Code128 content must be ASCII: {:?}",
                data
            )));
        }
        let len = u8::try_from(data.len()).map_err(|_| {
            BlueposError::EncodingPrecondition(format!(
                "Code128 content is {} bytes, the limit is 255",
                data.len()
            ))
        })?;

        let mut cmd = vec![GS, b'k', b'I', len];
        cmd.extend_from_slice(data.as_bytes());
        Ok(cmd)
    }
}

// ============================================================================
// QR CODE COMMANDS (GS ( k)
// ============================================================================

/// QR Code command builders
///
/// All QR functions share the `GS ( k pL pH cn fn ...` layout with
/// `cn = 49` ('1'). `pL pH` is the little-endian count of bytes that follow
/// the two length bytes.
pub mod qr {
    use super::GS;
    use crate::error::BlueposError;

    /// Fixed bytes that follow the length field of the store command
    /// (`cn = '1'`, `fn = 'P'`, `m = '0'`).
    const STORE_MARKER: [u8; 3] = [0x31, 0x50, 0x30];

    /// Largest payload the 16-bit length field can describe.
    pub const MAX_DATA_LEN: usize = u16::MAX as usize - STORE_MARKER.len();

    /// # Select QR Model 2 (GS ( k 04 00 31 41 32 00)
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 04 00 31 41 32 00 |
    pub fn set_model() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]
    }

    /// # Set QR Module Size (GS ( k 03 00 31 43 n)
    ///
    /// `n` is the pixel width of one QR dot. Printers accept 1-16; the value
    /// is passed through unchanged and range checking belongs to the caller.
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B 03 00 31 43 n |
    pub fn set_module_size(n: u8) -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x43, n]
    }

    /// # Set QR Error Correction Level L (GS ( k 03 00 31 45 30)
    pub fn set_error_correction() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x45, 0x30]
    }

    /// # Store QR Data (GS ( k pL pH 31 50 30 data)
    ///
    /// ## Protocol Details
    ///
    /// | Format  | Bytes |
    /// |---------|-------|
    /// | Hex     | 1D 28 6B pL pH 31 50 30 d1...dk |
    ///
    /// `pL + pH * 256 = k + 3`: the data plus the three marker bytes. The
    /// length bytes themselves are not counted.
    ///
    /// ## Example
    ///
    /// ```
    /// use bluepos::protocol::barcode::qr;
    ///
    /// let cmd = qr::store_data(b"hi").unwrap();
    /// assert_eq!(cmd, vec![0x1D, 0x28, 0x6B, 0x05, 0x00, 0x31, 0x50, 0x30, b'h', b'i']);
    /// ```
    pub fn store_data(data: &[u8]) -> Result<Vec<u8>, BlueposError> {
        if data.len() > MAX_DATA_LEN {
            return Err(BlueposError::EncodingPrecondition(format!(
                "QR payload is {} bytes, the limit is {}",
                data.len(),
                MAX_DATA_LEN
            )));
        }
        let len = (data.len() + STORE_MARKER.len()) as u16;

        let mut cmd = vec![GS, b'(', b'k'];
        cmd.extend_from_slice(&len.to_le_bytes());
        cmd.extend_from_slice(&STORE_MARKER);
        cmd.extend_from_slice(data);
        Ok(cmd)
    }

    /// # Print Stored QR Symbol (GS ( k 03 00 31 51 30)
    pub fn print() -> Vec<u8> {
        vec![GS, b'(', b'k', 0x03, 0x00, 0x31, 0x51, 0x30]
    }
}

// ============================================================================
// TESTS
// ============================================================================
