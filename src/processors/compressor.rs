// frameprep/src/processors/compressor.rs
use crate::core::Result;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every output as JPEG, the one format photo frames reliably read.
#[derive(Debug, Clone)]
pub struct Compressor {
    quality: u8,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn save(&self, image: &RgbImage, path: &Path) -> Result<()> {
        log::debug!(
            "Saving image to {} as JPEG, quality: {}",
            path.display(),
            self.quality
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if let Err(e) = self.save_jpeg(image, path) {
            // drop the partial output
            let _ = std::fs::remove_file(path);
            return Err(e);
        }

        self.log_save_result(path)
    }

    fn save_jpeg(&self, image: &RgbImage, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        {
            let mut encoder = JpegEncoder::new_with_quality(&mut writer, self.quality);
            encoder.encode_image(image)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn log_save_result(&self, path: &Path) -> Result<()> {
        let file_size = std::fs::metadata(path)?.len();
        log::info!("Saved: {} ({} bytes)", path.display(), file_size);
        Ok(())
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(95)
    }
}
