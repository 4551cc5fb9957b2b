//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS command
//! language spoken by generic BLE thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Escape bytes, initialize and line feed
//! - [`text`]: Text styling (alignment, size, bold)
//! - [`barcode`]: Code128 and QR code blocks
//! - [`cp850`]: Text encoding with UTF-8 fallback
//!
//! ## Usage Example
//!
//! ```
//! use bluepos::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align_center());
//! data.extend(text::bold_on());
//! data.extend(b"RECEIPT\n");
//! data.extend(text::reset_formatting());
//! ```
//!
//! Composed jobs live in [`crate::encoder`]; these functions only build
//! single commands.

pub mod barcode;
pub mod commands;
pub mod cp850;
pub mod text;
