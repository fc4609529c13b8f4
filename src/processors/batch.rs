// frameprep/src/processors/batch.rs
use crate::core::{BatchOutcome, ImageProcessor, ProgressEvent, ProgressStatus, ResizeConfig, Result};
use crate::processors::{FileCodec, ImageCodec};
use crate::utils::{collect_image_paths_excluding, output_path_for};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Files between two memory reclaim hints.
pub const RECLAIM_INTERVAL: usize = 10;

/// Cooperative cancellation flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
struct WorkItem {
    source: PathBuf,
    output: PathBuf,
}

pub struct BatchProcessor<C: ImageCodec = FileCodec> {
    config: ResizeConfig,
    processor: ImageProcessor<C>,
    cancel: CancelToken,
}

impl BatchProcessor<FileCodec> {
    pub fn new(config: ResizeConfig) -> Result<Self> {
        let codec = FileCodec::new(config.quality);
        Self::with_codec(config, codec)
    }
}

impl<C: ImageCodec> BatchProcessor<C> {
    /// Fails on configuration errors before any file is touched.
    pub fn with_codec(config: ResizeConfig, codec: C) -> Result<Self> {
        config.validate()?;
        let processor = ImageProcessor::with_codec(config.strategy(), codec);
        Ok(Self {
            config,
            processor,
            cancel: CancelToken::new(),
        })
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        self.processor.codec()
    }

    /// Scans the input tree and returns the lazy per-file event stream. An
    /// output directory inside the input tree is not scanned.
    pub fn run(&self) -> BatchRun<'_, C> {
        let config = &self.config;
        let items: Vec<WorkItem> = collect_image_paths_excluding(&config.input_dir, &config.output_dir)
            .into_iter()
            .map(|source| {
                let output = output_path_for(&source, &config.input_dir, &config.output_dir, config.flatten);
                WorkItem { source, output }
            })
            .collect();

        if items.is_empty() {
            log::warn!("No image files found in {}", self.config.input_dir.display());
        } else {
            log::info!(
                "Processing {} images from {} ({} onto {})",
                items.len(),
                self.config.input_dir.display(),
                self.config.mode,
                self.config.target_size
            );
        }

        BatchRun {
            batch: self,
            total: items.len(),
            items: items.into_iter(),
            done: 0,
            outcome: BatchOutcome::default(),
            finished: false,
        }
    }

    /// Runs the whole batch and returns the final tally.
    pub fn process_all(&self) -> BatchOutcome {
        self.run().finish()
    }

    fn process_item(&self, item: &WorkItem) -> (ProgressStatus, Option<String>) {
        if self.config.skip_existing && item.output.exists() {
            log::debug!("Exists: {}", item.output.display());
            return (ProgressStatus::Exists, None);
        }

        if self.config.dry_run {
            log::info!("Would process: {} -> {}", item.source.display(), item.output.display());
            return (ProgressStatus::Processed, None);
        }

        match self.processor.process(&item.source, &item.output) {
            Ok(()) => (ProgressStatus::Processed, None),
            Err(e) => {
                log::warn!("Error processing {}: {}", item.source.display(), e);
                (ProgressStatus::Error, Some(e.to_string()))
            }
        }
    }
}

/// One pass over a batch. Yields exactly one event per eligible file and
/// stops early once the cancel token is set.
pub struct BatchRun<'a, C: ImageCodec> {
    batch: &'a BatchProcessor<C>,
    items: std::vec::IntoIter<WorkItem>,
    total: usize,
    done: usize,
    outcome: BatchOutcome,
    finished: bool,
}

impl<'a, C: ImageCodec> BatchRun<'a, C> {
    /// Number of eligible files found by the scan.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Tally of the events emitted so far.
    pub fn outcome(&self) -> BatchOutcome {
        self.outcome
    }

    pub fn was_cancelled(&self) -> bool {
        self.batch.cancel.is_cancelled() && self.done < self.total
    }

    /// Drains the remaining events and returns the final tally.
    pub fn finish(mut self) -> BatchOutcome {
        for _ in self.by_ref() {}
        self.outcome
    }

    fn complete(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.batch.codec().reclaim();

        if self.was_cancelled() {
            log::info!(
                "Batch cancelled after {} of {} files: {}",
                self.done,
                self.total,
                self.outcome
            );
        } else {
            log::info!("Batch complete: {}", self.outcome);
        }
    }
}

impl<C: ImageCodec> Iterator for BatchRun<'_, C> {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        if self.finished {
            return None;
        }

        if self.batch.cancel.is_cancelled() {
            self.complete();
            return None;
        }

        let Some(item) = self.items.next() else {
            self.complete();
            return None;
        };

        let (status, error_message) = self.batch.process_item(&item);
        self.done += 1;
        self.outcome.record(status);

        if self.done % RECLAIM_INTERVAL == 0 {
            log::debug!("Reclaiming memory after {} files", self.done);
            self.batch.codec().reclaim();
        }

        Some(ProgressEvent {
            index: self.done,
            total: self.total,
            source_path: item.source,
            output_path: item.output,
            status,
            error_message,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(self.items.len()))
        }
    }
}
