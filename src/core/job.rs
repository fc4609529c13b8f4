// frameprep/src/core/job.rs
//! Background runner for a single batch at a time.
//!
//! A caller such as an HTTP handler starts a batch, polls `status()` and may
//! request cancellation. A second `start` while a batch is active is rejected.

use super::{BatchOutcome, FrameError, ProgressEvent, ResizeConfig, Result};
use crate::processors::{BatchProcessor, CancelToken, FileCodec, ImageCodec};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Snapshot returned by [`PrepareJob::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    pub running: bool,
    pub cancelled: bool,
    pub current: usize,
    pub total: usize,
    pub percent: f64,
    pub current_file: Option<PathBuf>,
    pub counts: BatchOutcome,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct JobState {
    total: usize,
    progress: Option<ProgressEvent>,
    counts: BatchOutcome,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    running: AtomicBool,
    cancel: CancelToken,
    state: Mutex<JobState>,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the running flag however the worker exits.
struct RunningGuard(Arc<Shared>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.lock_state().error = Some("worker thread panicked".to_string());
        }
        self.0.running.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct PrepareJob {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<BatchOutcome>>>,
}

impl PrepareJob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, config: ResizeConfig) -> Result<()> {
        let codec = FileCodec::new(config.quality);
        self.start_with_codec(config, codec)
    }

    pub fn start_with_codec<C>(&self, config: ResizeConfig, codec: C) -> Result<()>
    where
        C: ImageCodec + Send + 'static,
    {
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(FrameError::JobAlreadyRunning);
        }

        let processor = match BatchProcessor::with_codec(config, codec) {
            Ok(processor) => processor.with_cancel_token(self.shared.cancel.clone()),
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = worker.take() {
            let _ = previous.join();
        }

        self.shared.cancel.reset();
        *self.shared.lock_state() = JobState::default();

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("frameprep-job".to_string())
            .spawn(move || run_job(shared, processor));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                log::info!("Prepare job started");
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                Err(FrameError::Io(e))
            }
        }
    }

    /// Asks the worker to stop after the file it is working on.
    pub fn cancel(&self) {
        log::info!("Prepare job cancellation requested");
        self.shared.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> JobStatus {
        let state = self.shared.lock_state();
        let (current, percent, current_file) = match &state.progress {
            Some(event) => (event.index, event.percent(), Some(event.source_path.clone())),
            None => (0, 0.0, None),
        };

        JobStatus {
            running: self.is_running(),
            cancelled: self.shared.cancel.is_cancelled(),
            current,
            total: state.total,
            percent,
            current_file,
            counts: state.counts,
            error: state.error.clone(),
        }
    }

    /// Blocks until the current worker exits. `None` when no job was started
    /// or the worker panicked.
    pub fn wait(&self) -> Option<BatchOutcome> {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        handle.join().ok()
    }
}

fn run_job<C: ImageCodec>(shared: Arc<Shared>, processor: BatchProcessor<C>) -> BatchOutcome {
    let _guard = RunningGuard(Arc::clone(&shared));

    let mut run = processor.run();
    shared.lock_state().total = run.total();

    for event in run.by_ref() {
        let mut state = shared.lock_state();
        state.counts.record(event.status);
        state.progress = Some(event);
    }

    run.outcome()
}
