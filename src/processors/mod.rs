// frameprep/src/processors/mod.rs
mod batch;
mod codec;
mod compressor;
pub mod geometry;
mod loader;
pub mod resizer;

pub use batch::{BatchProcessor, BatchRun, CancelToken, RECLAIM_INTERVAL};
pub use codec::{FileCodec, ImageCodec};
pub use compressor::Compressor;
pub use loader::Loader;
pub use resizer::{plan_hybrid_stretch, Resizer, StretchPlan};
