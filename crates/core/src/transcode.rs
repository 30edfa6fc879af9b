//! Transcoder (C3).
//!
//! The orchestrator always needs the fully decoded string in hand (to repair
//! mojibake and to compare byte-for-byte against the original), so these are
//! exposed as buffered block-transform passes over an in-memory slice rather
//! than lazy `Read` adapters. `from`/`to` outside the enumerated set is
//! rejected with [`TextmendError::UnknownEncoding`] at the call site, before
//! either function runs.

use crate::bom;
use crate::encoding::{decode_byte, encode_scalar, Encoding};

/// Decodes `bytes` (in encoding `from`) to a valid UTF-8 `String`. If `from`
/// is `utf-8`, invalid sequences are lossily replaced with `U+FFFD` rather
/// than rejected.
///
/// For the legacy single-byte encodings every byte maps to exactly one
/// scalar, so this never produces `U+FFFD` on that path; UTF-16 inputs are
/// not decoded here (detection-only — the orchestrator rejects them before
/// this is called).
pub fn decode_to_utf8(bytes: &[u8], from: Encoding) -> String {
    match from {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Binary => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        legacy => bytes.iter().map(|&b| decode_byte(legacy, b)).collect(),
    }
}

/// Encodes `text` to bytes in encoding `to`. Any scalar outside `to`'s
/// representable set is mapped to `?` (0x3F); the auto-fix path (C6) is
/// expected to have eliminated such scalars before this call.
pub fn encode_from_utf8(text: &str, to: Encoding) -> Vec<u8> {
    match to {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Utf16Le | Encoding::Utf16Be | Encoding::Binary => text.as_bytes().to_vec(),
        legacy => text.chars().map(|c| encode_scalar(legacy, c).unwrap_or(b'?')).collect(),
    }
}

/// `<from>-><to>` style transformation tag, as recorded in a file plan's
/// `applied` list.
pub fn transform_tag(from: Encoding, to: Encoding) -> String {
    format!("{}->{}", from.name(), to.name())
}

pub fn strip_bom_tag() -> &'static str {
    "strip-bom"
}

pub fn add_bom_tag() -> &'static str {
    "add-bom"
}

/// Applies the BOM policy: at most one of strip/add, strip taking priority
/// when both are requested (mirrors the CLI's `add-bom` flag description:
/// "disables strip").
pub fn apply_bom_policy(bytes: &[u8], strip: bool, add: bool) -> (Vec<u8>, Option<&'static str>) {
    if add {
        (bom::add_bom(bytes), Some(add_bom_tag()))
    } else if strip && bom::has_bom(bytes) {
        (bom::strip_bom(bytes), Some(strip_bom_tag()))
    } else {
        (bytes.to_vec(), None)
    }
}
