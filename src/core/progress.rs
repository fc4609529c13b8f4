// frameprep/src/core/progress.rs
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    Processed,
    Exists,
    Error,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::Processed => write!(f, "processed"),
            ProgressStatus::Exists => write!(f, "exists"),
            ProgressStatus::Error => write!(f, "error"),
        }
    }
}

/// One event per eligible file, emitted in walk order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    /// 1-based position of the file in the batch.
    pub index: usize,
    pub total: usize,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub status: ProgressStatus,
    pub error_message: Option<String>,
}

impl ProgressEvent {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (1000.0 * self.index as f64 / self.total as f64).round() / 10.0
    }
}

/// Final tally of a batch run. Always a fold over the emitted events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub exists: usize,
    pub error: usize,
}

impl BatchOutcome {
    pub fn record(&mut self, status: ProgressStatus) {
        match status {
            ProgressStatus::Processed => self.processed += 1,
            ProgressStatus::Exists => self.exists += 1,
            ProgressStatus::Error => self.error += 1,
        }
    }

    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a ProgressEvent>) -> Self {
        events.into_iter().fold(Self::default(), |mut outcome, event| {
            outcome.record(event.status);
            outcome
        })
    }

    pub fn total(&self) -> usize {
        self.processed + self.exists + self.error
    }

    pub fn is_success(&self) -> bool {
        self.error == 0
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.processed > 0 {
            parts.push(format!("Processed: {}", self.processed));
        }
        if self.exists > 0 {
            parts.push(format!("Skipped (exists): {}", self.exists));
        }
        if self.error > 0 {
            parts.push(format!("Errors: {}", self.error));
        }

        if parts.is_empty() {
            write!(f, "No images found.")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
