// frameprep/src/core/mod.rs
mod config;
pub mod job;
pub mod processor;
mod progress;

use thiserror::Error;

pub use config::{PadColor, ResizeConfig, ResizeMode, Strategy, TargetSize};
pub use job::{JobStatus, PrepareJob};
pub use processor::ImageProcessor;
pub use progress::{BatchOutcome, ProgressEvent, ProgressStatus};

/// Aspect comparisons across the whole pipeline use this tolerance.
pub const EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid size format: {0}. Use WxH (e.g., 1920x1080)")]
    InvalidSize(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Job already running")]
    JobAlreadyRunning,
}

pub type Result<T> = std::result::Result<T, FrameError>;
