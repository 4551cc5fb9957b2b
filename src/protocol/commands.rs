//! # ESC/POS Protocol Commands
//!
//! This module holds the escape bytes and the device-level commands shared by
//! every print job sent to an ESC/POS-compatible BLE thermal printer.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC a n`, `GS ! n`, `GS ( k pL pH ...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most ESC/POS commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size, barcode and 2D symbol commands.
/// - Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
///
/// Prints any data in the line buffer and advances paper by the current
/// line spacing amount.
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Every formatted job
/// starts with this so that nothing from a previous job leaks in.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## What Gets Reset
///
/// - Print buffer is cleared
/// - Bold disabled
/// - Character size reset to 1x1
/// - Alignment reset to left
///
/// ## Example
///
/// ```
/// use bluepos::protocol::commands;
///
/// let init = commands::init();
/// assert_eq!(init, vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Line Feed (LF)
///
/// Prints the line buffer and advances the paper one line.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | Hex     | 0A    |
#[inline]
pub fn line_feed() -> Vec<u8> {
    vec![LF]
}

/// # Feed Lines (LF × n)
///
/// Advances the paper by `n` lines using raw line feeds. No init and no
/// formatting: this is a purely mechanical advance.
///
/// ## Example
///
/// ```
/// use bluepos::protocol::commands;
///
/// assert_eq!(commands::feed_lines(3), vec![0x0A, 0x0A, 0x0A]);
/// assert!(commands::feed_lines(0).is_empty());
/// ```
pub fn feed_lines(n: usize) -> Vec<u8> {
    vec![LF; n]
}

// ============================================================================
// TESTS
// ============================================================================
