// frameprep/src/core/processor.rs
use super::{Result, Strategy};
use crate::processors::{FileCodec, ImageCodec, Resizer};
use std::path::Path;

/// Decode, fit and encode a single file.
pub struct ImageProcessor<C: ImageCodec = FileCodec> {
    resizer: Resizer,
    codec: C,
}

impl ImageProcessor<FileCodec> {
    pub fn new(strategy: Strategy, quality: u8) -> Self {
        Self::with_codec(strategy, FileCodec::new(quality))
    }
}

impl<C: ImageCodec> ImageProcessor<C> {
    pub fn with_codec(strategy: Strategy, codec: C) -> Self {
        Self {
            resizer: Resizer::new(strategy),
            codec,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn strategy(&self) -> &Strategy {
        self.resizer.strategy()
    }

    /// Pixel buffers live only for the duration of this call.
    pub fn process(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        let source = self.codec.decode(input_path)?.into_rgb8();
        let fitted = self.resizer.apply(source)?;
        self.codec.encode(&fitted, output_path)
    }
}
