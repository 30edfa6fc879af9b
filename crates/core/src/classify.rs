//! Encoding classifier (C2).
//!
//! `classify` is total: every well-formed sample produces a [`Detection`],
//! never an error. The classifier is exposed as a trait so alternative
//! scoring strategies can be swapped in without touching callers.

use crate::encoding::{Encoding, Iso8859Variant, LEGACY_CANDIDATES};

/// `{ encoding, confidence (0..100), language }`. `language` is always empty:
/// this crate does not attempt language identification (see spec Non-goals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub encoding: Encoding,
    pub confidence: u8,
    pub language: String,
}

impl Detection {
    fn new(encoding: Encoding, confidence: u8) -> Self {
        Detection { encoding, confidence, language: String::new() }
    }
}

pub trait Classifier {
    fn classify(&self, sample: &[u8]) -> Detection;
}

/// The baseline classifier: BOM shortcut, then UTF-8 validity, then a scored
/// single-byte heuristic, with pure ASCII samples normalizing to `utf-8`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselineClassifier;

impl Classifier for BaselineClassifier {
    fn classify(&self, sample: &[u8]) -> Detection {
        classify(sample)
    }
}

pub fn classify(sample: &[u8]) -> Detection {
    if sample.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Detection::new(Encoding::Utf8, 100);
    }
    if sample.starts_with(&[0xFF, 0xFE]) {
        return Detection::new(Encoding::Utf16Le, 100);
    }
    if sample.starts_with(&[0xFE, 0xFF]) {
        return Detection::new(Encoding::Utf16Be, 100);
    }

    if sample.is_empty() {
        return Detection::new(Encoding::Utf8, 100);
    }

    let has_non_ascii = sample.iter().any(|&b| b >= 0x80);

    if !has_non_ascii {
        // Pure ASCII: every candidate encoding agrees byte-for-byte, so the
        // statistical pass below would be a costly no-op. Normalize directly.
        return Detection::new(Encoding::Utf8, 100);
    }

    if std::str::from_utf8(sample).is_ok() {
        let confidence = if sample.len() >= 1024 { 90 } else { 60 };
        return Detection::new(Encoding::Utf8, confidence);
    }

    statistical_classify(sample)
}

const COMMON_DIGRAPHS: &[&str] = &[
    "th", "er", "on", "an", "re", "en", "at", "ou", "in", "ng", "de", "le", "es", "la", "ic",
    "ch", "sch", "ße", "ción", "ção", "ñe", "ão", "ä ", "ö ", "ü ",
];

/// Ranks a candidate for tie-break purposes. Normally this is just its
/// position in [`LEGACY_CANDIDATES`] (windows-1252 > iso-8859-1 > ...). But
/// when the sample has no byte in 0x80-0x9F, windows-1252 and iso-8859-1
/// decode it byte-for-byte identically (they only disagree in that range),
/// so windows-1252's default priority would win on a tie with no actual
/// evidence of Windows-1252-specific punctuation; iso-8859-1 is preferred
/// in that case instead.
fn tie_break_rank(encoding: Encoding, distinguishes_windows1252: bool) -> usize {
    if !distinguishes_windows1252 {
        match encoding {
            Encoding::Iso8859(Iso8859Variant::V1) => return 0,
            Encoding::Windows1252 => return 1,
            _ => {}
        }
    }
    LEGACY_CANDIDATES.iter().position(|&e| e == encoding).unwrap_or(usize::MAX)
}

fn statistical_classify(sample: &[u8]) -> Detection {
    let distinguishes_windows1252 = sample.iter().any(|&b| (0x80..=0x9F).contains(&b));

    let mut scores: Vec<(Encoding, i64)> = LEGACY_CANDIDATES
        .iter()
        .map(|&enc| (enc, score_candidate(sample, enc)))
        .collect();

    scores.sort_by(|a, b| {
        b.1.cmp(&a.1).then_with(|| {
            tie_break_rank(a.0, distinguishes_windows1252).cmp(&tie_break_rank(b.0, distinguishes_windows1252))
        })
    });

    let (best_enc, best_score) = scores[0];
    if best_score <= 0 {
        return Detection::new(best_enc, 0);
    }

    // How close the winning decode sits to the per-byte ceiling (every byte
    // alphabetic or common punctuation, nothing resembling a control code).
    // A clean decode is confident evidence for its answer on its own, even
    // when a rival encoding that happens to agree with it over the sampled
    // byte range ties its score (e.g. windows-1252 and iso-8859-1 agree on
    // every byte outside 0x80-0x9F).
    let ceiling = (sample.len() as i64 * 2).max(1);
    let cleanliness = (best_score as f64 / ceiling as f64).clamp(0.0, 1.0);

    // How far ahead the winner sits of the best candidate that actually
    // decodes the sample differently (ties from byte-identical rivals don't
    // count against this, since they aren't really a competing answer).
    let second_score = scores.iter().map(|&(_, s)| s).find(|&s| s < best_score).unwrap_or(0);
    let gap_ratio = ((best_score - second_score).max(0) as f64 / best_score as f64).clamp(0.0, 1.0);

    let confidence = ((cleanliness * 60.0) + (gap_ratio * 40.0)).round().clamp(0.0, 100.0) as u8;

    Detection::new(best_enc, confidence)
}

fn is_common_punctuation(ch: char) -> bool {
    matches!(ch, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' | '(' | ')' | '-')
}

fn is_control_byte_range(encoding: Encoding) -> bool {
    // ISO-8859-* reserves 0x80-0x9F for C1 controls; Windows-1252, Macintosh
    // and CP850 assign printable characters there instead.
    matches!(encoding, Encoding::Iso8859(_))
}

fn score_candidate(sample: &[u8], encoding: Encoding) -> i64 {
    let decoded: String = sample.iter().map(|&b| crate::encoding::decode_byte(encoding, b)).collect();

    let mut score: i64 = 0;
    let penalize_c1 = is_control_byte_range(encoding);

    for &byte in sample {
        if penalize_c1 && (0x80..=0x9F).contains(&byte) {
            score -= 5;
        }
    }

    for ch in decoded.chars() {
        if ch.is_alphabetic() {
            score += 2;
        } else if is_common_punctuation(ch) {
            score += 1;
        } else if ch.is_whitespace() {
            score += 1;
        } else if (ch as u32) < 0x20 && ch != '\t' && ch != '\n' && ch != '\r' {
            score -= 3;
        }
    }

    let lower = decoded.to_lowercase();
    for digraph in COMMON_DIGRAPHS {
        score += lower.matches(digraph).count() as i64;
    }

    score
}
