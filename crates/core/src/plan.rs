//! File plan and batch statistics data model.

use std::path::PathBuf;

use crate::classify::Detection;

/// One of the five terminal statuses a file plan can reach.
///
/// A plan has `Ok` iff its transformed content equals the original bytes;
/// `Fix` iff they differ and a write occurred (or would occur under
/// dry-run); `Warn` is reserved for non-mutating modes flagging a
/// non-UTF-8 or non-convertible file; `Skip` is for binary or
/// non-matching-extension files; `Erro` carries a non-empty error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Fix,
    Warn,
    Skip,
    Erro,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Fix => "FIX",
            Status::Warn => "WARN",
            Status::Skip => "SKIP",
            Status::Erro => "ERRO",
        }
    }
}

/// Transient per-file record, created when a path is dequeued, mutated only
/// by the owning worker, emitted once to the aggregator, then dropped.
#[derive(Debug, Clone)]
pub struct FilePlan {
    pub path: PathBuf,
    pub size: u64,
    pub detection: Option<Detection>,
    pub source_has_bom: bool,
    pub applied: Vec<String>,
    pub status: Status,
    pub note: String,
    /// Whether the file's content, as it sits on disk (or would, under
    /// dry-run) after this plan was applied, is not UTF-8. Used for the
    /// batch's `non_utf8`/`--fail-if-not-utf8` accounting, which cares about
    /// the *outcome* of processing, not merely the originally detected
    /// encoding (a successfully converted file is no longer "remaining"
    /// non-UTF-8 even though its source encoding was).
    pub final_non_utf8: bool,
}

impl FilePlan {
    pub fn new(path: PathBuf) -> Self {
        FilePlan {
            path,
            size: 0,
            detection: None,
            source_has_bom: false,
            applied: Vec::new(),
            status: Status::Skip,
            note: String::new(),
            final_non_utf8: false,
        }
    }

    pub fn with_final_non_utf8(mut self, value: bool) -> Self {
        self.final_non_utf8 = value;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn push_applied(&mut self, tag: impl Into<String>) {
        self.applied.push(tag.into());
    }

    /// `<STATUS> | <path> | from=<enc>[ conf=<n>][ | applied=<tag1,tag2,...>]`
    pub fn result_line(&self) -> String {
        let mut line = format!("{} | {}", self.status.as_str(), self.path.display());

        if let Some(detection) = &self.detection {
            line.push_str(&format!(" | from={}", detection.encoding.name()));
            if detection.confidence > 0 {
                line.push_str(&format!(" conf={}", detection.confidence));
            }
        } else {
            line.push_str(&format!(" | from={}", self.note));
        }

        if !self.applied.is_empty() {
            line.push_str(&format!(" | applied={}", self.applied.join(",")));
        }

        line
    }
}

/// Running counters maintained by a single aggregator; no worker writes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchStats {
    pub total: u64,
    pub changed: u64,
    pub non_utf8: u64,
    pub errors: u64,
    pub skipped: u64,
}

impl BatchStats {
    pub fn record(&mut self, plan: &FilePlan) {
        self.total += 1;
        match plan.status {
            Status::Fix => self.changed += 1,
            Status::Erro => self.errors += 1,
            Status::Skip => self.skipped += 1,
            Status::Warn | Status::Ok => {}
        }

        if plan.final_non_utf8 && !matches!(plan.status, Status::Skip) {
            self.non_utf8 += 1;
        }
    }

    /// `Arquivos: T | Alterados: C | Restantes não-UTF8: N | Erros: E | Ignorados: S | Tempo: D`
    pub fn summary_line(&self, elapsed: std::time::Duration) -> String {
        format!(
            "Arquivos: {} | Alterados: {} | Restantes não-UTF8: {} | Erros: {} | Ignorados: {} | Tempo: {:?}",
            self.total, self.changed, self.non_utf8, self.errors, self.skipped, elapsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Encoding, Iso8859Variant};
    use std::path::PathBuf;

    #[test]
    fn result_line_formats_with_confidence_and_applied_tags() {
        let mut plan = FilePlan::new(PathBuf::from("a.txt")).with_status(Status::Fix);
        plan.detection = Some(Detection { encoding: Encoding::Iso8859(Iso8859Variant::V1), confidence: 80, language: String::new() });
        plan.push_applied("iso-8859-1->utf-8");
        assert_eq!(plan.result_line(), "FIX | a.txt | from=iso-8859-1 conf=80 | applied=iso-8859-1->utf-8");
    }

    #[test]
    fn batch_stats_counts_errors_and_changes() {
        let mut stats = BatchStats::default();
        let mut fixed = FilePlan::new(PathBuf::from("b.txt")).with_status(Status::Fix);
        fixed.detection = Some(Detection { encoding: Encoding::Iso8859(Iso8859Variant::V1), confidence: 70, language: String::new() });
        stats.record(&fixed);

        let errored = FilePlan::new(PathBuf::from("c.txt")).with_status(Status::Erro);
        stats.record(&errored);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.changed, 1);
        assert_eq!(stats.errors, 1);
        // A successfully converted file is no longer "remaining" non-UTF-8
        // even though its source encoding was legacy.
        assert_eq!(stats.non_utf8, 0);
    }

    #[test]
    fn batch_stats_counts_final_non_utf8_for_unconverted_and_reverse_mode() {
        let mut stats = BatchStats::default();

        // Detect-only WARN: classified non-UTF-8, nothing written.
        let mut warned = FilePlan::new(PathBuf::from("d.txt"))
            .with_status(Status::Warn)
            .with_final_non_utf8(true);
        warned.detection = Some(Detection { encoding: Encoding::Iso8859(Iso8859Variant::V1), confidence: 60, language: String::new() });
        stats.record(&warned);

        // Reverse-mode FIX: the file now sits on disk as legacy bytes.
        let mut reversed = FilePlan::new(PathBuf::from("e.txt"))
            .with_status(Status::Fix)
            .with_final_non_utf8(true);
        reversed.detection = Some(Detection { encoding: Encoding::Utf8, confidence: 100, language: String::new() });
        stats.record(&reversed);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.non_utf8, 2);
    }
}
