//! textmend-core: encoding classification, transcoding and mojibake repair
//! engine. Glues the byte sampler, classifier, transcoder, BOM handler,
//! mojibake repairer, compatibility validator, file-tree walker, atomic
//! writer and worker pool into a single per-file batch pipeline.

pub mod atomic;
pub mod bom;
pub mod classify;
pub mod compat;
pub mod encoding;
pub mod error;
pub mod mojibake;
pub mod orchestrator;
pub mod plan;
pub mod pool;
pub mod sample;
mod tables;
pub mod transcode;
pub mod walk;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Instant;

pub use classify::Detection;
pub use encoding::Encoding;
pub use error::{Result, TextmendError};
pub use orchestrator::{Outcome, RunOptions};
pub use plan::{BatchStats, FilePlan, Status};
pub use pool::CancelToken;
pub use walk::WalkOptions;

/// Resolves a CLI `path` argument to the set of files to process: the walk
/// result if it names a directory, or the single path itself otherwise
/// (mirroring the stdout-mode short-circuit for a lone file).
pub fn gather_targets(path: &Path, walk_options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path).map_err(|e| TextmendError::io(path, e))?;
    if metadata.is_dir() {
        walk::gather_files(path, walk_options)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Runs the worker pool over `paths`, invoking `on_outcome` once per
/// completed file (in completion order) and returning the aggregated batch
/// statistics plus total elapsed time. `on_outcome` also sees the computed
/// output bytes when the caller needs to print them (non-in-place
/// single-file mode).
pub fn run_batch(
    paths: Vec<PathBuf>,
    run_options: RunOptions,
    worker_count: usize,
    cancel: CancelToken,
    mut on_outcome: impl FnMut(&Outcome),
) -> (BatchStats, std::time::Duration) {
    let started = Instant::now();
    let total_jobs = paths.len();
    let run_options = std::sync::Arc::new(run_options);

    let rx: Receiver<Outcome> = pool::run(paths, worker_count, cancel, move |path, cancel_token| {
        orchestrator::process_file(&path, &run_options, cancel_token)
    });

    let mut stats = BatchStats::default();
    let mut received = 0usize;
    for outcome in rx.iter() {
        stats.record(&outcome.plan);
        on_outcome(&outcome);
        received += 1;
        if received == total_jobs {
            break;
        }
    }

    (stats, started.elapsed())
}
