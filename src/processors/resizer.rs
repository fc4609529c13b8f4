// frameprep/src/processors/resizer.rs
use crate::core::{ResizeAlgorithm, ResizeMode, Result, Strategy, TargetSize, EPS};
use crate::processors::geometry::{
    apply_crop, aspect_of, crop_towards_aspect, crop_window, is_at_aspect, pad_to_aspect, CropWindow,
};
use image::{imageops, imageops::FilterType, RgbImage};

/// What `hybrid-stretch` will do to a source of a given shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchPlan {
    /// Shape too far off target: pad only, never crop.
    PadOnly,
    /// Crop alone reaches the target aspect.
    Crop(CropWindow),
    /// Crop, then stretch the width by `ratio` to close the gap exactly.
    CropStretch { crop: CropWindow, ratio: f64 },
    /// Crop, stretch the width by the clamped `ratio`, pad the rest.
    CropStretchPad { crop: CropWindow, ratio: f64 },
}

impl StretchPlan {
    pub fn stretch_ratio(&self) -> Option<f64> {
        match self {
            StretchPlan::CropStretch { ratio, .. } | StretchPlan::CropStretchPad { ratio, .. } => Some(*ratio),
            _ => None,
        }
    }
}

/// Decides the `hybrid-stretch` steps from dimensions alone.
pub fn plan_hybrid_stretch(width: u32, height: u32, strategy: &Strategy) -> StretchPlan {
    let target_aspect = strategy.target.aspect();
    let dev0 = (aspect_of(width, height) / target_aspect - 1.0).abs();

    if dev0 > strategy.no_stretch_limit + EPS {
        return StretchPlan::PadOnly;
    }

    let crop = crop_window(width, height, target_aspect, strategy.max_crop_fraction());
    if crop.reached_exact || is_at_aspect(crop.width, crop.height, target_aspect) {
        return StretchPlan::Crop(crop);
    }

    let r_needed = target_aspect / aspect_of(crop.width, crop.height);
    let anisotropy = (r_needed - 1.0).abs();

    if anisotropy <= strategy.stretch_max + EPS {
        StretchPlan::CropStretch { crop, ratio: r_needed }
    } else {
        let ratio = if r_needed > 1.0 {
            1.0 + strategy.stretch_max
        } else {
            1.0 - strategy.stretch_max
        };
        StretchPlan::CropStretchPad { crop, ratio }
    }
}

/// Uniform scale to the target canvas.
pub fn resize_uniform(image: &RgbImage, target: TargetSize, filter: FilterType) -> RgbImage {
    resize_to(image, target.width(), target.height(), filter)
}

fn resize_to(image: &RgbImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, filter)
}

fn stretch_width(image: &RgbImage, ratio: f64, filter: FilterType) -> RgbImage {
    let width = ((image.width() as f64 * ratio).round() as u32).max(1);
    log::debug!(
        "Stretching width {} -> {} (ratio {:.4})",
        image.width(),
        width,
        ratio
    );
    resize_to(image, width, image.height(), filter)
}

pub fn mode_pad(image: RgbImage, strategy: &Strategy, filter: FilterType) -> Result<RgbImage> {
    let padded = pad_to_aspect(image, strategy.target.aspect(), strategy.pad_color)?;
    Ok(resize_uniform(&padded, strategy.target, filter))
}

/// Crops within the retention budget and then scales. A crop stopped short by
/// the budget is not corrected: the final resize absorbs the residual
/// mismatch as distortion.
pub fn mode_crop(image: RgbImage, strategy: &Strategy, filter: FilterType) -> Result<RgbImage> {
    let outcome = crop_towards_aspect(image, strategy.target.aspect(), strategy.max_crop_fraction());
    Ok(resize_uniform(&outcome.image, strategy.target, filter))
}

pub fn mode_hybrid(image: RgbImage, strategy: &Strategy, filter: FilterType) -> Result<RgbImage> {
    let target_aspect = strategy.target.aspect();
    let outcome = crop_towards_aspect(image, target_aspect, strategy.max_crop_fraction());
    if outcome.reached_exact {
        return Ok(resize_uniform(&outcome.image, strategy.target, filter));
    }
    let padded = pad_to_aspect(outcome.image, target_aspect, strategy.pad_color)?;
    Ok(resize_uniform(&padded, strategy.target, filter))
}

pub fn mode_hybrid_stretch(image: RgbImage, strategy: &Strategy, filter: FilterType) -> Result<RgbImage> {
    let target_aspect = strategy.target.aspect();
    let plan = plan_hybrid_stretch(image.width(), image.height(), strategy);
    log::debug!("hybrid-stretch plan for {}x{}: {:?}", image.width(), image.height(), plan);

    match plan {
        StretchPlan::PadOnly => mode_pad(image, strategy, filter),
        StretchPlan::Crop(crop) => {
            let cropped = apply_crop(image, &crop);
            Ok(resize_uniform(&cropped, strategy.target, filter))
        }
        StretchPlan::CropStretch { crop, ratio } => {
            let cropped = apply_crop(image, &crop);
            let stretched = stretch_width(&cropped, ratio, filter);
            drop(cropped);
            Ok(resize_uniform(&stretched, strategy.target, filter))
        }
        StretchPlan::CropStretchPad { crop, ratio } => {
            let cropped = apply_crop(image, &crop);
            let stretched = stretch_width(&cropped, ratio, filter);
            drop(cropped);
            let padded = pad_to_aspect(stretched, target_aspect, strategy.pad_color)?;
            Ok(resize_uniform(&padded, strategy.target, filter))
        }
    }
}

pub struct Resizer {
    strategy: Strategy,
}

impl Resizer {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Runs the configured mode. The result is always exactly the target size.
    pub fn apply(&self, image: RgbImage) -> Result<RgbImage> {
        let filter = self.get_filter_type();

        log::debug!(
            "Fitting {}x{} onto {} with mode {}",
            image.width(),
            image.height(),
            self.strategy.target,
            self.strategy.mode
        );

        match self.strategy.mode {
            ResizeMode::Pad => mode_pad(image, &self.strategy, filter),
            ResizeMode::Crop => mode_crop(image, &self.strategy, filter),
            ResizeMode::Hybrid => mode_hybrid(image, &self.strategy, filter),
            ResizeMode::HybridStretch => mode_hybrid_stretch(image, &self.strategy, filter),
        }
    }

    fn get_filter_type(&self) -> FilterType {
        match self.strategy.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
