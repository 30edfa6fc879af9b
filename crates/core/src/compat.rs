//! Compatibility validator (C6), UTF-8 -> legacy only.

use crate::encoding::{encode_scalar, Encoding};

/// Report-mode result: which scalars can't survive the trip to `target`, and
/// the resulting compatibility percentage.
#[derive(Debug, Clone)]
pub struct CompatibilityReport {
    pub offending: Vec<char>,
    pub compatible_percent: u8,
}

impl CompatibilityReport {
    pub fn fully_representable(&self) -> bool {
        self.offending.is_empty()
    }
}

/// Classifies every scalar in `text` as representable-in-`target` or not.
pub fn report(text: &str, target: Encoding) -> CompatibilityReport {
    let mut offending = Vec::new();
    let mut total = 0usize;
    let mut representable = 0usize;

    for ch in text.chars() {
        total += 1;
        if encode_scalar(target, ch).is_some() {
            representable += 1;
        } else {
            offending.push(ch);
        }
    }

    let compatible_percent = if total == 0 {
        100
    } else {
        ((representable as f64 / total as f64) * 100.0).round() as u8
    };

    CompatibilityReport { offending, compatible_percent }
}

/// One substitution-table entry mapping a class of Unicode scalars to an
/// ASCII-safe replacement string.
struct Substitution {
    scalars: &'static [char],
    replacement: &'static str,
}

const SUBSTITUTIONS: &[Substitution] = &[
    Substitution { scalars: &['\u{201C}', '\u{201D}'], replacement: "\"" },
    Substitution { scalars: &['\u{2018}', '\u{2019}'], replacement: "'" },
    Substitution { scalars: &['\u{2013}', '\u{2014}'], replacement: "-" },
    Substitution { scalars: &['\u{2026}'], replacement: "..." },
    Substitution { scalars: &['\u{2122}'], replacement: "(TM)" },
    Substitution { scalars: &['\u{00AE}'], replacement: "(R)" },
    Substitution { scalars: &['\u{00A9}'], replacement: "(C)" },
    Substitution { scalars: &['\u{20AC}'], replacement: "EUR" },
    Substitution { scalars: &['\u{00A3}'], replacement: "GBP" },
    Substitution { scalars: &['\u{00A5}'], replacement: "JPY" },
    Substitution { scalars: &['\u{00D7}'], replacement: "x" },
    Substitution { scalars: &['\u{00F7}'], replacement: "/" },
    Substitution { scalars: &['\u{00B1}'], replacement: "+/-" },
    Substitution { scalars: &['\u{2190}'], replacement: "<-" },
    Substitution { scalars: &['\u{2191}'], replacement: "^" },
    Substitution { scalars: &['\u{2192}'], replacement: "->" },
    Substitution { scalars: &['\u{2193}'], replacement: "v" },
    Substitution { scalars: &['\u{2022}'], replacement: "*" },
    Substitution { scalars: &['\u{25E6}'], replacement: "-" },
    Substitution { scalars: &['\u{25AA}'], replacement: "*" },
];

/// Looks up the static substitution for a scalar, falling back to a hex
/// escape (`[U+XXXX]`) for anything else above 0xFF.
fn suggest(ch: char) -> String {
    for sub in SUBSTITUTIONS {
        if sub.scalars.contains(&ch) {
            return sub.replacement.to_string();
        }
    }
    format!("[U+{:04X}]", ch as u32)
}

/// Result of an auto-fix pass: the substituted text and the list of
/// human-readable substitutions applied, in encounter order.
pub struct AutoFixResult {
    pub text: String,
    pub substitutions: Vec<String>,
}

/// Substitutes every scalar not representable in `target` using the
/// substitution table. Returns `None` if, after substitution, the result
/// still contains a scalar the target can't represent (the file is
/// rejected in that case).
pub fn auto_fix(text: &str, target: Encoding) -> Option<AutoFixResult> {
    let initial = report(text, target);
    if initial.fully_representable() {
        return Some(AutoFixResult { text: text.to_string(), substitutions: Vec::new() });
    }

    let mut out = String::with_capacity(text.len());
    let mut substitutions = Vec::new();

    for ch in text.chars() {
        if encode_scalar(target, ch).is_some() {
            out.push(ch);
        } else {
            let alt = suggest(ch);
            substitutions.push(format!("'{}' -> '{}'", ch, alt));
            out.push_str(&alt);
        }
    }

    let final_report = report(&out, target);
    if final_report.fully_representable() {
        Some(AutoFixResult { text: out, substitutions })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Iso8859Variant;

    #[test]
    fn fully_representable_text_reports_100_percent() {
        let r = report("plain ascii text", Encoding::Iso8859(Iso8859Variant::V1));
        assert!(r.fully_representable());
        assert_eq!(r.compatible_percent, 100);
    }

    #[test]
    fn euro_sign_flagged_against_iso_8859_1() {
        let r = report("preço €", Encoding::Iso8859(Iso8859Variant::V1));
        assert!(!r.fully_representable());
        assert!(r.offending.contains(&'\u{20AC}'));
    }

    #[test]
    fn auto_fix_substitutes_euro_sign() {
        let fixed = auto_fix("preço €", Encoding::Iso8859(Iso8859Variant::V1)).unwrap();
        assert_eq!(fixed.text, "preço EUR");
        assert_eq!(fixed.substitutions.len(), 1);
    }

    #[test]
    fn auto_fix_falls_back_to_hex_escape_for_unmapped_scalar() {
        let fixed = auto_fix("emoji: \u{1F600}", Encoding::Iso8859(Iso8859Variant::V1)).unwrap();
        assert!(fixed.text.contains("[U+1F600]"));
    }
}
