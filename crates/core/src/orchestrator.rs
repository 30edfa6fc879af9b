//! Per-file orchestrator (C10).
//!
//! Glues the sampler, classifier, transcoder, BOM handler, mojibake repairer
//! and compatibility validator into one file's decision tree, producing
//! exactly one [`FilePlan`] (plus, when a write would occur, the computed
//! bytes for the caller to commit or print).

use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{classify, Detection};
use crate::compat;
use crate::encoding::Encoding;
use crate::mojibake;
use crate::plan::{FilePlan, Status};
use crate::pool::CancelToken;
use crate::sample::{Sample, SAMPLE_BYTES};
use crate::transcode::{apply_bom_policy, decode_to_utf8, encode_from_utf8, transform_tag};

/// Mirrors the CLI flag table; the front end is a thin adapter over this.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Force source encoding; `None` means "classify" (C2).
    pub from: Option<String>,
    /// Reverse-mode target encoding; `None` means forward (legacy -> utf-8).
    pub to: Option<String>,
    pub detect_only: bool,
    pub validate_only: bool,
    pub dry_run: bool,
    /// Commit via atomic write; when `false`, a `Fix` plan's output is
    /// returned for the caller to print instead (single-file/stdout mode).
    pub in_place: bool,
    pub backup_suffix: String,
    pub preserve_times: bool,
    pub strip_bom: bool,
    pub add_bom: bool,
    pub fix_mojibake: bool,
    pub auto_fix: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            from: None,
            to: None,
            detect_only: false,
            validate_only: false,
            dry_run: false,
            in_place: false,
            backup_suffix: ".bak".to_string(),
            preserve_times: true,
            strip_bom: true,
            add_bom: false,
            fix_mojibake: true,
            auto_fix: false,
        }
    }
}

/// The result of running one file through the decision tree: the plan to
/// report, plus the bytes to commit when the plan calls for a write
/// (`status == Fix` and not dry-run).
pub struct Outcome {
    pub plan: FilePlan,
    pub output: Option<Vec<u8>>,
}

fn erro(path: PathBuf, detail: impl Into<String>) -> Outcome {
    Outcome { plan: FilePlan::new(path).with_status(Status::Erro).with_note(detail), output: None }
}

fn skip(path: PathBuf, reason: &str) -> Outcome {
    Outcome { plan: FilePlan::new(path).with_status(Status::Skip).with_note(reason), output: None }
}

/// Runs the full decision tree for one path. `original` is the file's full
/// content, already read by the caller alongside the sample (so callers that
/// only need detect-only results can skip that read).
pub fn process_file(path: &Path, options: &RunOptions, cancel: &CancelToken) -> Outcome {
    if cancel.is_cancelled() {
        return Outcome {
            plan: FilePlan::new(path.to_path_buf()).with_status(Status::Skip).with_note("cancelled"),
            output: None,
        };
    }

    let sample = match Sample::read(path, SAMPLE_BYTES) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("failed to sample {}: {e}", path.display());
            return erro(path.to_path_buf(), e.to_string());
        }
    };

    if !sample.is_likely_text() {
        log::debug!("skipping {} as binary", path.display());
        return skip(path.to_path_buf(), "binary");
    }

    let forced = match &options.from {
        Some(label) => match Encoding::parse(label) {
            Some(enc) => Some(enc),
            None => return erro(path.to_path_buf(), crate::error::TextmendError::UnknownEncoding(label.clone()).to_string()),
        },
        None => None,
    };

    let detection = forced
        .map(|enc| Detection { encoding: enc, confidence: 0, language: String::new() })
        .unwrap_or_else(|| classify(&sample.bytes));
    log::debug!(
        "{}: detected {} (confidence {})",
        path.display(),
        detection.encoding.name(),
        detection.confidence
    );

    let mut plan = FilePlan::new(path.to_path_buf());
    plan.size = sample.stat.size;
    plan.detection = Some(detection.clone());

    if cancel.is_cancelled() {
        plan.status = Status::Skip;
        plan.note = "cancelled".to_string();
        return Outcome { plan, output: None };
    }

    if options.detect_only {
        let is_utf8 = detection.encoding == Encoding::Utf8;
        plan.status = if is_utf8 { Status::Ok } else { Status::Warn };
        plan.final_non_utf8 = !is_utf8;
        return Outcome { plan, output: None };
    }

    // UTF-16 is recognized by the classifier's BOM shortcut but the transcoder
    // carries no UTF-16 table: report and leave the file untouched rather than
    // mis-decode its bytes as UTF-8.
    if !detection.encoding.is_transcodable() {
        plan.status = Status::Warn;
        plan.final_non_utf8 = true;
        plan.note = format!("{} is detected but not supported for conversion", detection.encoding.name());
        return Outcome { plan, output: None };
    }

    let original = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return erro(path.to_path_buf(), e.to_string()),
    };

    let outcome = if let Some(to_label) = &options.to {
        process_reverse(path, &original, to_label, &detection, options, plan)
    } else {
        process_forward(path, &original, &detection, options, plan, cancel)
    };

    maybe_commit(path, &sample.stat, options, outcome)
}

/// On any non-dry-run `Fix`, commit via the atomic writer. Re-stats the file
/// immediately before writing and fails the plan if it changed underneath us
/// since the sample was taken.
fn maybe_commit(path: &Path, original_stat: &crate::sample::Stat, options: &RunOptions, outcome: Outcome) -> Outcome {
    if outcome.plan.status != Status::Fix || options.dry_run || !options.in_place {
        return outcome;
    }
    let Some(bytes) = &outcome.output else { return outcome };

    if let Ok(current) = Sample::restat(path) {
        if current.size != original_stat.size || current.mtime != original_stat.mtime {
            log::warn!("{} changed since it was sampled; aborting commit", path.display());
            let mut plan = outcome.plan;
            plan.status = Status::Erro;
            plan.note = crate::error::TextmendError::Concurrent {
                path: path.to_path_buf(),
                detail: "changed since it was sampled".to_string(),
            }
            .to_string();
            return Outcome { plan, output: None };
        }
    }

    let write_options = crate::atomic::WriteOptions {
        backup_suffix: options.backup_suffix.clone(),
        preserve_times: options.preserve_times,
        #[cfg(unix)]
        original_mode: Some(original_stat.mode),
        original_mtime: original_stat.mtime,
    };

    match crate::atomic::write_atomic(path, bytes, &write_options) {
        Ok(()) => outcome,
        Err(e) => {
            log::warn!("failed to commit {}: {e}", path.display());
            let mut plan = outcome.plan;
            plan.status = Status::Erro;
            plan.note = e.to_string();
            Outcome { plan, output: None }
        }
    }
}

fn process_forward(
    _path: &Path,
    original: &[u8],
    detection: &Detection,
    options: &RunOptions,
    mut plan: FilePlan,
    cancel: &CancelToken,
) -> Outcome {
    if cancel.is_cancelled() {
        plan.status = Status::Skip;
        plan.note = "cancelled".to_string();
        return Outcome { plan, output: None };
    }

    let mut text = decode_to_utf8(original, detection.encoding);
    if detection.encoding != Encoding::Utf8 {
        plan.push_applied(transform_tag(detection.encoding, Encoding::Utf8));
    }

    if options.fix_mojibake {
        let (repaired, applied) = mojibake::repair(&text);
        if applied {
            plan.push_applied("mojibake-fix");
            text = repaired;
        }
    }

    let mut bytes = text.into_bytes();
    plan.source_has_bom = crate::bom::has_bom(original);
    let (with_bom_policy, bom_tag) = apply_bom_policy(&bytes, options.strip_bom, options.add_bom);
    bytes = with_bom_policy;
    if let Some(tag) = bom_tag {
        plan.push_applied(tag);
    }

    if bytes == original {
        plan.status = Status::Ok;
        return Outcome { plan, output: None };
    }

    plan.status = Status::Fix;
    if options.dry_run {
        return Outcome { plan, output: None };
    }
    Outcome { plan, output: Some(bytes) }
}

fn process_reverse(
    path: &Path,
    original: &[u8],
    to_label: &str,
    _detection: &Detection,
    options: &RunOptions,
    mut plan: FilePlan,
) -> Outcome {
    // Reverse mode only ever targets a legacy single-byte encoding: `--to
    // utf-8` (a no-op direction) and `--to utf-16le/be` (no transcoder table)
    // both fall outside what `encode_scalar`/`compat::report` can handle.
    let target = match Encoding::parse(to_label) {
        Some(enc) if enc.is_legacy_single_byte() => enc,
        _ => return erro(path.to_path_buf(), crate::error::TextmendError::UnknownEncoding(to_label.to_string()).to_string()),
    };

    let text = String::from_utf8_lossy(original).into_owned();

    if options.validate_only {
        let report = compat::report(&text, target);
        plan.status = if report.fully_representable() { Status::Ok } else { Status::Warn };
        if !report.fully_representable() {
            let scalars: Vec<String> = report.offending.iter().map(|c| format!("U+{:04X}", *c as u32)).collect();
            plan.note = scalars.join(", ");
        }
        return Outcome { plan, output: None };
    }

    let report = compat::report(&text, target);
    let final_text = if report.fully_representable() {
        text.clone()
    } else if options.auto_fix {
        match compat::auto_fix(&text, target) {
            Some(fixed) => {
                plan.push_applied("auto-fixed");
                fixed.text
            }
            None => {
                plan.status = Status::Warn;
                plan.note = "substitution table could not make text representable".to_string();
                return Outcome { plan, output: None };
            }
        }
    } else {
        plan.status = Status::Warn;
        let scalars: Vec<String> = report.offending.iter().map(|c| format!("U+{:04X}", *c as u32)).collect();
        plan.note = scalars.join(", ");
        return Outcome { plan, output: None };
    };

    plan.push_applied(transform_tag(Encoding::Utf8, target));
    let bytes = encode_from_utf8(&final_text, target);
    // Reaching here means the file is committed (or would be, under
    // dry-run) in the legacy target encoding, not UTF-8.
    plan.final_non_utf8 = target != Encoding::Utf8;

    if bytes == original {
        plan.status = Status::Ok;
        return Outcome { plan, output: None };
    }

    plan.status = Status::Fix;
    if options.dry_run {
        return Outcome { plan, output: None };
    }
    Outcome { plan, output: Some(bytes) }
}
