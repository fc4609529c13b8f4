// frameprep/src/processors/codec.rs
use super::{Compressor, Loader};
use crate::core::Result;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// File decode/encode collaborator used by the batch driver.
pub trait ImageCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    fn encode(&self, image: &RgbImage, path: &Path) -> Result<()>;

    /// Called periodically during a batch once the previous files' buffers
    /// are gone. Implementations holding scratch memory release it here.
    fn reclaim(&self) {}
}

/// `Loader` + `Compressor` over real files.
#[derive(Debug, Clone, Default)]
pub struct FileCodec {
    loader: Loader,
    compressor: Compressor,
}

impl FileCodec {
    pub fn new(quality: u8) -> Self {
        Self {
            loader: Loader::new(),
            compressor: Compressor::new(quality),
        }
    }

    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }
}

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        self.loader.load(path)
    }

    fn encode(&self, image: &RgbImage, path: &Path) -> Result<()> {
        self.compressor.save(image, path)
    }
}
