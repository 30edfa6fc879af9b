use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use textmend_core::orchestrator::RunOptions;
use textmend_core::pool::{default_worker_count, CancelToken};
use textmend_core::walk::{parse_exclude_dirs, parse_extensions, WalkOptions};
use textmend_core::{gather_targets, run_batch};

/// Batch text-file transcoder and mojibake repairer.
#[derive(Parser)]
#[command(name = "textmend", about = "Batch text-file transcoder and mojibake repairer", author, version)]
struct Cli {
    /// File or directory to process.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Comma-separated extension filter.
    #[arg(long, default_value = DEFAULT_EXTENSIONS_CSV)]
    ext: String,

    /// Walk subdirectories; defaults to true.
    #[arg(long, value_name = "true|false")]
    recursive: Option<bool>,

    /// Detect-only mode.
    #[arg(long)]
    detect: bool,

    /// Force source encoding; empty means auto-detect.
    #[arg(long, default_value = "")]
    from: String,

    /// Target encoding for reverse mode.
    #[arg(long, default_value = "")]
    to: String,

    /// Commit via atomic write; else print to stdout.
    #[arg(long = "in-place")]
    in_place: bool,

    /// Backup suffix; empty disables.
    #[arg(long = "backup-suffix", default_value = ".bak")]
    backup_suffix: String,

    /// Classify and plan only, never commit.
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Worker pool size.
    #[arg(long)]
    workers: Option<usize>,

    /// Preserve mtime; defaults to true.
    #[arg(long = "preserve-times", value_name = "true|false")]
    preserve_times: Option<bool>,

    /// Strip an existing UTF-8 BOM; defaults to true.
    #[arg(long = "strip-bom", value_name = "true|false")]
    strip_bom: Option<bool>,

    /// Add a UTF-8 BOM (disables strip-bom).
    #[arg(long = "add-bom")]
    add_bom: bool,

    /// Enable mojibake repair; defaults to true.
    #[arg(long = "fix-mojibake", value_name = "true|false")]
    fix_mojibake: Option<bool>,

    /// Exit 1 if any file remains non-UTF-8.
    #[arg(long = "fail-if-not-utf8")]
    fail_if_not_utf8: bool,

    /// Directory basenames to exclude (comma-separated).
    #[arg(long = "exclude-dirs", default_value = "")]
    exclude_dirs: String,

    /// Enable the substitution-table auto-fix.
    #[arg(long = "auto-fix")]
    auto_fix: bool,

    /// Report-only reverse-mode compatibility check.
    #[arg(long = "validate-only")]
    validate_only: bool,
}

const DEFAULT_EXTENSIONS_CSV: &str = ".txt,.md,.java,.xml,.properties,.csv,.html,.js,.ts,.go";

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("argument_error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.add_bom && cli.strip_bom.unwrap_or(true) {
        log::debug!("add-bom disables strip-bom");
    }
    if !cli.to.is_empty() && cli.detect {
        bail!("--detect and --to are mutually exclusive");
    }

    let metadata = std::fs::metadata(&cli.path)
        .with_context(|| format!("cannot access path {}", cli.path.display()))?;

    if metadata.is_dir() && !cli.in_place && !cli.detect && !cli.dry_run && !cli.validate_only {
        bail!("processing a directory requires --in-place, --dry-run, --detect or --validate-only");
    }

    let recursive = cli.recursive.unwrap_or(true);
    let preserve_times = cli.preserve_times.unwrap_or(true);
    let strip_bom = cli.strip_bom.unwrap_or(true);
    let fix_mojibake = cli.fix_mojibake.unwrap_or(true);

    let walk_options = WalkOptions {
        recursive,
        extensions: parse_extensions(&cli.ext),
        exclude_dirs: parse_exclude_dirs(&cli.exclude_dirs),
    };

    let paths = gather_targets(&cli.path, &walk_options)
        .with_context(|| format!("error gathering files under {}", cli.path.display()))?;

    if paths.is_empty() {
        log::info!("no files found to process");
        println!("{}", textmend_core::BatchStats::default().summary_line(std::time::Duration::default()));
        return Ok(ExitCode::SUCCESS);
    }

    let run_options = RunOptions {
        from: non_empty(&cli.from),
        to: non_empty(&cli.to),
        detect_only: cli.detect,
        validate_only: cli.validate_only,
        dry_run: cli.dry_run,
        in_place: cli.in_place,
        backup_suffix: cli.backup_suffix,
        preserve_times,
        strip_bom: strip_bom && !cli.add_bom,
        add_bom: cli.add_bom,
        fix_mojibake,
        auto_fix: cli.auto_fix,
    };

    let worker_count = cli.workers.unwrap_or_else(default_worker_count);
    let cancel = CancelToken::new();
    install_signal_handler(cancel.clone());

    let single_file_stdout = !cli.in_place && metadata.is_file();

    let (stats, elapsed) = run_batch(paths, run_options, worker_count, cancel, |outcome| {
        println!("{}", outcome.plan.result_line());
        if single_file_stdout {
            if let Some(bytes) = &outcome.output {
                use std::io::Write;
                let _ = std::io::stdout().write_all(bytes);
            }
        }
    });

    println!("{}", stats.summary_line(elapsed));

    if stats.errors > 0 {
        return Ok(ExitCode::from(1));
    }
    if cli.fail_if_not_utf8 && stats.non_utf8 > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// SIGINT/SIGTERM trigger cancellation exactly once; a second signal is
/// ignored so the process doesn't attempt to close the result channel twice.
fn install_signal_handler(cancel: CancelToken) {
    let already_signaled = Arc::new(AtomicBool::new(false));
    let handler_cancel = cancel.clone();
    let handler_flag = already_signaled.clone();
    let _ = ctrlc::set_handler(move || {
        if !handler_flag.swap(true, Ordering::SeqCst) {
            handler_cancel.cancel();
        }
    });
}
