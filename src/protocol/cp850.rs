//! # Code Page 850 Encoding
//!
//! Converts Unicode strings to CP850 (Multilingual Latin-1) single-byte
//! encoding, the default character table of most ESC/POS BLE printers.
//! ASCII (U+0000–U+007F) passes through unchanged.
//!
//! Text that contains any character outside CP850 is sent as UTF-8 instead.
//! The fallback covers the whole string, so a request never fails because of
//! its characters; printers without UTF-8 support print those bytes as
//! CP850 glyphs.

use tracing::debug;

/// Encoding actually used for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Cp850,
    Utf8,
}

/// Encode a Unicode string as CP850 bytes.
///
/// Returns `None` as soon as one character has no CP850 representation.
pub fn encode(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if (ch as u32) < 0x80 {
            out.push(ch as u8);
        } else {
            out.push(unicode_to_cp850(ch)?);
        }
    }
    Some(out)
}

/// Encode text for the printer: CP850 when possible, UTF-8 otherwise.
///
/// ```
/// use bluepos::protocol::cp850::{encode_with_fallback, TextEncoding};
///
/// assert_eq!(encode_with_fallback("Olá"), (vec![b'O', b'l', 0xA0], TextEncoding::Cp850));
/// assert_eq!(encode_with_fallback("€5").1, TextEncoding::Utf8);
/// ```
pub fn encode_with_fallback(s: &str) -> (Vec<u8>, TextEncoding) {
    match encode(s) {
        Some(bytes) => (bytes, TextEncoding::Cp850),
        None => {
            debug!(chars = s.chars().count(), "text not representable in CP850, sending UTF-8");
            (s.as_bytes().to_vec(), TextEncoding::Utf8)
        }
    }
}

/// Map a Unicode code point to its CP850 byte value (0x80–0xFF).
///
/// Returns `None` if the character has no CP850 representation.
fn unicode_to_cp850(ch: char) -> Option<u8> {
    let byte = match ch {
        // 0x80–0x8F
        'Ç' => 0x80,
        'ü' => 0x81,
        'é' => 0x82,
        'â' => 0x83,
        'ä' => 0x84,
        'à' => 0x85,
        'å' => 0x86,
        'ç' => 0x87,
        'ê' => 0x88,
        'ë' => 0x89,
        'è' => 0x8A,
        'ï' => 0x8B,
        'î' => 0x8C,
        'ì' => 0x8D,
        'Ä' => 0x8E,
        'Å' => 0x8F,

        // 0x90–0x9F
        'É' => 0x90,
        'æ' => 0x91,
        'Æ' => 0x92,
        'ô' => 0x93,
        'ö' => 0x94,
        'ò' => 0x95,
        'û' => 0x96,
        'ù' => 0x97,
        'ÿ' => 0x98,
        'Ö' => 0x99,
        'Ü' => 0x9A,
        'ø' => 0x9B,
        '£' => 0x9C,
        'Ø' => 0x9D,
        '×' => 0x9E,
        'ƒ' => 0x9F,

        // 0xA0–0xAF
        'á' => 0xA0,
        'í' => 0xA1,
        'ó' => 0xA2,
        'ú' => 0xA3,
        'ñ' => 0xA4,
        'Ñ' => 0xA5,
        'ª' => 0xA6,
        'º' => 0xA7,
        '¿' => 0xA8,
        '®' => 0xA9,
        '¬' => 0xAA,
        '½' => 0xAB,
        '¼' => 0xAC,
        '¡' => 0xAD,
        '«' => 0xAE,
        '»' => 0xAF,

        // 0xB0–0xBF
        '░' => 0xB0,
        '▒' => 0xB1,
        '▓' => 0xB2,
        '│' => 0xB3,
        '┤' => 0xB4,
        'Á' => 0xB5,
        'Â' => 0xB6,
        'À' => 0xB7,
        '©' => 0xB8,
        '╣' => 0xB9,
        '║' => 0xBA,
        '╗' => 0xBB,
        '╝' => 0xBC,
        '¢' => 0xBD,
        '¥' => 0xBE,
        '┐' => 0xBF,

        // 0xC0–0xCF
        '└' => 0xC0,
        '┴' => 0xC1,
        '┬' => 0xC2,
        '├' => 0xC3,
        '─' => 0xC4,
        '┼' => 0xC5,
        'ã' => 0xC6,
        'Ã' => 0xC7,
        '╚' => 0xC8,
        '╔' => 0xC9,
        '╩' => 0xCA,
        '╦' => 0xCB,
        '╠' => 0xCC,
        '═' => 0xCD,
        '╬' => 0xCE,
        '¤' => 0xCF,

        // 0xD0–0xDF
        'ð' => 0xD0,
        'Ð' => 0xD1,
        'Ê' => 0xD2,
        'Ë' => 0xD3,
        'È' => 0xD4,
        'ı' => 0xD5,
        'Í' => 0xD6,
        'Î' => 0xD7,
        'Ï' => 0xD8,
        '┘' => 0xD9,
        '┌' => 0xDA,
        '█' => 0xDB,
        '▄' => 0xDC,
        '¦' => 0xDD,
        'Ì' => 0xDE,
        '▀' => 0xDF,

        // 0xE0–0xEF
        'Ó' => 0xE0,
        'ß' => 0xE1,
        'Ô' => 0xE2,
        'Ò' => 0xE3,
        'õ' => 0xE4,
        'Õ' => 0xE5,
        'µ' => 0xE6,
        'þ' => 0xE7,
        'Þ' => 0xE8,
        'Ú' => 0xE9,
        'Û' => 0xEA,
        'Ù' => 0xEB,
        'ý' => 0xEC,
        'Ý' => 0xED,
        '¯' => 0xEE,
        '´' => 0xEF,

        // 0xF0–0xFF
        '\u{00AD}' => 0xF0, // soft hyphen
        '±' => 0xF1,
        '‗' => 0xF2,
        '¾' => 0xF3,
        '¶' => 0xF4,
        '§' => 0xF5,
        '÷' => 0xF6,
        '¸' => 0xF7,
        '°' => 0xF8,
        '¨' => 0xF9,
        '·' => 0xFA,
        '¹' => 0xFB,
        '³' => 0xFC,
        '²' => 0xFD,
        '■' => 0xFE,
        '\u{00A0}' => 0xFF, // no-break space

        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("Hello, World!"), Some(b"Hello, World!".to_vec()));
        assert_eq!(encode("\t\n"), Some(vec![0x09, 0x0A]));
    }

    #[test]
    fn test_portuguese() {
        // "Impressão Térmica"
        let bytes = encode("ção").unwrap();
        assert_eq!(bytes, vec![0x87, 0xC6, b'o']);
        assert_eq!(encode("Térmica").unwrap()[1], 0x82);
    }

    #[test]
    fn test_cp850_specific_slots() {
        // Slots where CP850 differs from CP437
        assert_eq!(encode("ø"), Some(vec![0x9B]));
        assert_eq!(encode("Ø"), Some(vec![0x9D]));
        assert_eq!(encode("®"), Some(vec![0xA9]));
        assert_eq!(encode("ã"), Some(vec![0xC6]));
        assert_eq!(encode("ı"), Some(vec![0xD5]));
    }

    #[test]
    fn test_high_slots() {
        assert_eq!(encode("°"), Some(vec![0xF8]));
        assert_eq!(encode("\u{00A0}"), Some(vec![0xFF]));
        assert_eq!(encode("\u{00AD}"), Some(vec![0xF0]));
    }

    #[test]
    fn test_unmapped_fails() {
        assert_eq!(encode("★"), None);
        assert_eq!(encode("€"), None);
        assert_eq!(encode("日本"), None);
    }

    #[test]
    fn test_fallback_is_whole_string() {
        // One unmapped character switches the entire string to UTF-8
        let (bytes, encoding) = encode_with_fallback("é€");
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(bytes, "é€".as_bytes().to_vec());
    }

    #[test]
    fn test_fallback_prefers_cp850() {
        let (bytes, encoding) = encode_with_fallback("Café");
        assert_eq!(encoding, TextEncoding::Cp850);
        assert_eq!(bytes, vec![0x43, 0x61, 0x66, 0x82]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode_with_fallback(""), (vec![], TextEncoding::Cp850));
    }
}
