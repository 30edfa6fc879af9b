//! Worker pool and dispatcher (C9).
//!
//! A fixed-size pool pulling paths off a bounded job queue and pushing file
//! plans onto a result queue, the same shape as the Go original's
//! goroutines-and-channels pool, translated to `std::thread` + `mpsc`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default worker count: `max(2, host_logical_cpus / 2)`.
pub fn default_worker_count() -> usize {
    let cpus = thread::available_parallelism().map(|n| n.get()).unwrap_or(2);
    (cpus / 2).max(2)
}

/// Shared cancellation flag. Observed by every worker at every blocking
/// point and between orchestrator steps. A second signal after the first is
/// a no-op.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs `process` over `paths` with `worker_count` workers, returning the
/// unordered stream of results as they complete. Exactly one result is
/// emitted per submitted path, even under cancellation (a cancelled job
/// still yields a result from `process` itself, which observes `cancel`).
pub fn run<T, F>(
    paths: Vec<PathBuf>,
    worker_count: usize,
    cancel: CancelToken,
    process: F,
) -> Receiver<T>
where
    T: Send + 'static,
    F: Fn(PathBuf, &CancelToken) -> T + Send + Sync + 'static,
{
    let worker_count = worker_count.max(1);
    let queue_capacity = (worker_count * 2).max(1);
    log::debug!("starting pool with {worker_count} worker(s) for {} job(s)", paths.len());

    let (job_tx, job_rx) = mpsc::sync_channel::<PathBuf>(queue_capacity);
    let (result_tx, result_rx) = mpsc::sync_channel::<T>(queue_capacity);

    let job_rx = Arc::new(std::sync::Mutex::new(job_rx));
    let process = Arc::new(process);

    let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let job_rx = Arc::clone(&job_rx);
        let result_tx = result_tx.clone();
        let cancel = cancel.clone();
        let process = Arc::clone(&process);

        handles.push(thread::spawn(move || loop {
            let path = {
                let rx = job_rx.lock().expect("job queue mutex poisoned");
                rx.recv()
            };
            let path = match path {
                Ok(p) => p,
                Err(_) => break, // job queue closed, no more work
            };

            let plan = process(path, &cancel);
            if result_tx.send(plan).is_err() {
                break; // aggregator gone
            }
        }));
    }
    drop(result_tx);

    thread::spawn(move || {
        // Every path is sent regardless of cancellation: workers observe
        // `cancel` themselves and drain-and-exit, emitting a `Skip` for each
        // job they pull rather than processing it. Stopping the producer
        // early would silently drop paths with no result at all, violating
        // "exactly one result per submitted job".
        for path in paths {
            if job_tx.send(path).is_err() {
                break;
            }
        }
        // dropping job_tx closes the job queue once all paths are sent
    });

    thread::spawn(move || {
        for handle in handles {
            let _ = handle.join();
        }
        // result_rx's sender side is dropped here implicitly when result_tx
        // clones held by workers all go out of scope, closing the channel.
    });

    result_rx
}
