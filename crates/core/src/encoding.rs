//! The closed set of charset labels this crate understands, and the
//! byte-for-scalar codecs behind the single-byte legacy members of that set.

use crate::tables::{CP850_UPPER, ISO_8859_9_OVERRIDES};
use encoding_rs::Encoding as RsEncoding;

/// A charset label drawn from the closed set the system classifies and
/// transcodes. Names are matched case-insensitively on input (see
/// [`Encoding::parse`]) and always emitted lower-case via [`Encoding::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Utf8,
    /// Detected and reported only; see the crate-level docs on UTF-16.
    Utf16Le,
    Utf16Be,
    Iso8859(Iso8859Variant),
    Windows1252,
    Macintosh,
    Cp850,
    /// Sentinel for samples that fail the text probe; never produced by the
    /// classifier itself.
    Binary,
}

/// The ISO-8859 sub-variants the system supports. 11 and 12 are intentionally
/// absent: 12 was never finalized and 11 (Thai) is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Iso8859Variant {
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
    V13,
    V14,
    V15,
    V16,
}

impl Iso8859Variant {
    pub const fn number(self) -> u8 {
        match self {
            Iso8859Variant::V1 => 1,
            Iso8859Variant::V2 => 2,
            Iso8859Variant::V3 => 3,
            Iso8859Variant::V4 => 4,
            Iso8859Variant::V5 => 5,
            Iso8859Variant::V6 => 6,
            Iso8859Variant::V7 => 7,
            Iso8859Variant::V8 => 8,
            Iso8859Variant::V9 => 9,
            Iso8859Variant::V10 => 10,
            Iso8859Variant::V13 => 13,
            Iso8859Variant::V14 => 14,
            Iso8859Variant::V15 => 15,
            Iso8859Variant::V16 => 16,
        }
    }

    pub const fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            1 => Iso8859Variant::V1,
            2 => Iso8859Variant::V2,
            3 => Iso8859Variant::V3,
            4 => Iso8859Variant::V4,
            5 => Iso8859Variant::V5,
            6 => Iso8859Variant::V6,
            7 => Iso8859Variant::V7,
            8 => Iso8859Variant::V8,
            9 => Iso8859Variant::V9,
            10 => Iso8859Variant::V10,
            13 => Iso8859Variant::V13,
            14 => Iso8859Variant::V14,
            15 => Iso8859Variant::V15,
            16 => Iso8859Variant::V16,
            _ => return None,
        })
    }
}

/// Every legacy single-byte encoding the classifier and transcoder support,
/// in tie-break order: windows-1252 > iso-8859-1 > iso-8859-15 > macintosh >
/// cp850 > iso-8859-2..16 (ascending, skipping the ones already named).
pub const LEGACY_CANDIDATES: &[Encoding] = &[
    Encoding::Windows1252,
    Encoding::Iso8859(Iso8859Variant::V1),
    Encoding::Iso8859(Iso8859Variant::V15),
    Encoding::Macintosh,
    Encoding::Cp850,
    Encoding::Iso8859(Iso8859Variant::V2),
    Encoding::Iso8859(Iso8859Variant::V3),
    Encoding::Iso8859(Iso8859Variant::V4),
    Encoding::Iso8859(Iso8859Variant::V5),
    Encoding::Iso8859(Iso8859Variant::V6),
    Encoding::Iso8859(Iso8859Variant::V7),
    Encoding::Iso8859(Iso8859Variant::V8),
    Encoding::Iso8859(Iso8859Variant::V9),
    Encoding::Iso8859(Iso8859Variant::V10),
    Encoding::Iso8859(Iso8859Variant::V13),
    Encoding::Iso8859(Iso8859Variant::V14),
    Encoding::Iso8859(Iso8859Variant::V16),
];

impl Encoding {
    pub fn name(self) -> String {
        match self {
            Encoding::Utf8 => "utf-8".to_string(),
            Encoding::Utf16Le => "utf-16le".to_string(),
            Encoding::Utf16Be => "utf-16be".to_string(),
            Encoding::Iso8859(v) => format!("iso-8859-{}", v.number()),
            Encoding::Windows1252 => "windows-1252".to_string(),
            Encoding::Macintosh => "macintosh".to_string(),
            Encoding::Cp850 => "cp850".to_string(),
            Encoding::Binary => "binary".to_string(),
        }
    }

    /// Parses a label case-insensitively. `ascii` normalizes to `utf-8`, as
    /// does the bare `latin1` alias for `iso-8859-1`.
    pub fn parse(label: &str) -> Option<Encoding> {
        let lower = label.trim().to_ascii_lowercase();
        Some(match lower.as_str() {
            "utf-8" | "utf8" | "ascii" => Encoding::Utf8,
            "utf-16le" | "utf16le" => Encoding::Utf16Le,
            "utf-16be" | "utf16be" => Encoding::Utf16Be,
            "windows-1252" | "cp1252" => Encoding::Windows1252,
            "macintosh" | "mac-roman" | "macroman" => Encoding::Macintosh,
            "cp850" | "ibm850" => Encoding::Cp850,
            "binary" => Encoding::Binary,
            "iso-8859-1" | "latin1" | "iso8859-1" => Encoding::Iso8859(Iso8859Variant::V1),
            _ => {
                let digits = lower.strip_prefix("iso-8859-").or_else(|| lower.strip_prefix("iso8859-"))?;
                let n: u8 = digits.parse().ok()?;
                Encoding::Iso8859(Iso8859Variant::from_number(n)?)
            }
        })
    }

    /// Whether this label is one of the legacy single-byte encodings this
    /// crate can actually transcode (excludes UTF-8, UTF-16 and `binary`).
    pub fn is_legacy_single_byte(self) -> bool {
        matches!(
            self,
            Encoding::Iso8859(_) | Encoding::Windows1252 | Encoding::Macintosh | Encoding::Cp850
        )
    }

    /// Whether the transcoder and compatibility validator can actually
    /// produce/consume bytes in this encoding. UTF-16 is detected by the
    /// classifier's BOM shortcut but has no transcoder table; `binary` is a
    /// sentinel the classifier never returns.
    pub fn is_transcodable(self) -> bool {
        self == Encoding::Utf8 || self.is_legacy_single_byte()
    }
}

/// Returns the backing `encoding_rs` static for the subset of legacy
/// encodings it natively supports under the WHATWG label set. `None` for the
/// three variants this crate hand-rolls (iso-8859-1, iso-8859-9, cp850),
/// which fall outside that set.
fn rs_backing(encoding: Encoding) -> Option<&'static RsEncoding> {
    use encoding_rs::*;
    Some(match encoding {
        Encoding::Windows1252 => WINDOWS_1252,
        Encoding::Macintosh => MACINTOSH,
        Encoding::Iso8859(v) => match v {
            Iso8859Variant::V2 => ISO_8859_2,
            Iso8859Variant::V3 => ISO_8859_3,
            Iso8859Variant::V4 => ISO_8859_4,
            Iso8859Variant::V5 => ISO_8859_5,
            Iso8859Variant::V6 => ISO_8859_6,
            Iso8859Variant::V7 => ISO_8859_7,
            Iso8859Variant::V8 => ISO_8859_8,
            Iso8859Variant::V10 => ISO_8859_10,
            Iso8859Variant::V13 => ISO_8859_13,
            Iso8859Variant::V14 => ISO_8859_14,
            Iso8859Variant::V15 => ISO_8859_15,
            Iso8859Variant::V16 => ISO_8859_16,
            Iso8859Variant::V1 | Iso8859Variant::V9 => return None,
        },
        Encoding::Utf8 | Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Cp850 | Encoding::Binary => {
            return None
        }
    })
}

fn iso_8859_9_decode_byte(byte: u8) -> char {
    if let Some((_, ch)) = ISO_8859_9_OVERRIDES.iter().find(|(b, _)| *b == byte) {
        return *ch;
    }
    byte as char
}

fn iso_8859_9_encode_scalar(scalar: char) -> Option<u8> {
    if let Some((byte, _)) = ISO_8859_9_OVERRIDES.iter().find(|(_, ch)| *ch == scalar) {
        return Some(*byte);
    }
    let code = scalar as u32;
    if code <= 0xFF && !ISO_8859_9_OVERRIDES.iter().any(|(b, _)| *b as u32 == code) {
        Some(code as u8)
    } else {
        None
    }
}

/// Decodes a single byte of a legacy single-byte encoding to its scalar
/// value. Total: every byte in every supported legacy encoding maps to
/// exactly one scalar, so this never fails.
pub fn decode_byte(encoding: Encoding, byte: u8) -> char {
    match encoding {
        Encoding::Iso8859(Iso8859Variant::V1) => byte as char,
        Encoding::Iso8859(Iso8859Variant::V9) => iso_8859_9_decode_byte(byte),
        Encoding::Cp850 => {
            if byte < 0x80 {
                byte as char
            } else {
                CP850_UPPER[(byte - 0x80) as usize]
            }
        }
        other => {
            let rs = rs_backing(other).expect("legacy encoding without a codec");
            let (cow, _had_errors) = rs.decode_without_bom_handling(&[byte]);
            cow.chars().next().unwrap_or('\u{FFFD}')
        }
    }
}

/// Encodes a scalar value to a byte of a legacy single-byte encoding, or
/// `None` if the scalar has no representation in that encoding.
pub fn encode_scalar(encoding: Encoding, scalar: char) -> Option<u8> {
    match encoding {
        Encoding::Iso8859(Iso8859Variant::V1) => {
            let code = scalar as u32;
            (code <= 0xFF).then_some(code as u8)
        }
        Encoding::Iso8859(Iso8859Variant::V9) => iso_8859_9_encode_scalar(scalar),
        Encoding::Cp850 => {
            let code = scalar as u32;
            if code < 0x80 {
                return Some(code as u8);
            }
            CP850_UPPER
                .iter()
                .position(|&c| c == scalar)
                .map(|idx| (idx + 0x80) as u8)
        }
        other => {
            let rs = rs_backing(other).expect("legacy encoding without a codec");
            let mut buf = [0u8; 4];
            let encoded = scalar.encode_utf8(&mut buf);
            let (cow, _enc, had_errors) = rs.encode(encoded);
            if had_errors || cow.is_empty() {
                None
            } else {
                Some(cow[0])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_label_names() {
        for &enc in LEGACY_CANDIDATES {
            let parsed = Encoding::parse(&enc.name()).unwrap();
            assert_eq!(parsed, enc);
        }
        assert_eq!(Encoding::parse("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::parse("ascii"), Some(Encoding::Utf8));
        assert_eq!(Encoding::parse("latin1"), Some(Encoding::Iso8859(Iso8859Variant::V1)));
    }

    #[test]
    fn iso_8859_1_is_an_identity_mapping() {
        for byte in 0u16..=255 {
            let ch = decode_byte(Encoding::Iso8859(Iso8859Variant::V1), byte as u8);
            assert_eq!(ch as u32, byte as u32);
            assert_eq!(encode_scalar(Encoding::Iso8859(Iso8859Variant::V1), ch), Some(byte as u8));
        }
    }

    #[test]
    fn iso_8859_9_overrides_turkish_code_points() {
        assert_eq!(decode_byte(Encoding::Iso8859(Iso8859Variant::V9), 0xD0), '\u{011E}');
        assert_eq!(
            encode_scalar(Encoding::Iso8859(Iso8859Variant::V9), '\u{011E}'),
            Some(0xD0)
        );
        // Bytes outside the six overridden positions still behave like Latin-1.
        assert_eq!(decode_byte(Encoding::Iso8859(Iso8859Variant::V9), 0x41), 'A');
    }

    #[test]
    fn cp850_upper_half_round_trips() {
        assert_eq!(decode_byte(Encoding::Cp850, 0x80), 'Ç');
        assert_eq!(encode_scalar(Encoding::Cp850, 'Ç'), Some(0x80));
    }

    #[test]
    fn windows_1252_assigns_smart_quote_bytes_latin1_leaves_as_control() {
        let win = decode_byte(Encoding::Windows1252, 0x93);
        assert_eq!(win, '\u{201C}'); // left double quotation mark
        let latin1 = decode_byte(Encoding::Iso8859(Iso8859Variant::V1), 0x93);
        assert_eq!(latin1 as u32, 0x93); // C1 control code
    }
}
