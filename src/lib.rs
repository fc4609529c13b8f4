mod cli;
mod core;
mod processors;
mod utils;

pub use crate::cli::{Algorithm, Cli};
pub use crate::core::{
    BatchOutcome, FrameError, ImageProcessor, JobStatus, PadColor, PrepareJob, ProgressEvent,
    ProgressStatus, ResizeAlgorithm, ResizeConfig, ResizeMode, Result, Strategy, TargetSize, EPS,
};
pub use crate::processors::{
    geometry, plan_hybrid_stretch, resizer, BatchProcessor, BatchRun, CancelToken, Compressor,
    FileCodec, ImageCodec, Loader, Resizer, StretchPlan, RECLAIM_INTERVAL,
};
pub use crate::utils::{
    collect_image_paths, collect_image_paths_excluding, count_image_files, flatten_prefix,
    is_supported_format, list_subdirs, output_path_for, FLATTEN_DELIMITER, SUPPORTED_EXTENSIONS,
};

pub mod prelude {
    pub use crate::{
        BatchOutcome, BatchProcessor, CancelToken, ImageCodec, PadColor, PrepareJob, ProgressEvent,
        ProgressStatus, ResizeConfig, ResizeMode, TargetSize,
    };
}

// Re-export commonly used types
pub use image::{DynamicImage, RgbImage};
