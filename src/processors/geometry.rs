// frameprep/src/processors/geometry.rs
//! Crop and pad primitives shared by every resize strategy.
//!
//! The `*_window`/`pad_canvas` functions only do the arithmetic on
//! dimensions; `crop_towards_aspect` and `pad_to_aspect` apply it to pixels.

use crate::core::{FrameError, PadColor, Result, EPS};
use image::{imageops, imageops::FilterType, Rgb, RgbImage};

/// Largest padded canvas, in pixels, that `pad_to_aspect` will allocate.
pub const MAX_CANVAS_PIXELS: u64 = 16_384 * 16_384;

/// Where the source lands on an enlarged canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadCanvas {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Region kept by a crop, plus how far the crop got.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Fraction of the cropped axis that was removed.
    pub cropped_fraction: f64,
    /// False when the crop budget stopped short of the target aspect.
    pub reached_exact: bool,
}

pub struct CropOutcome {
    pub image: RgbImage,
    pub cropped_fraction: f64,
    pub reached_exact: bool,
}

pub fn aspect_of(width: u32, height: u32) -> f64 {
    width as f64 / height as f64
}

pub fn is_at_aspect(width: u32, height: u32, target_aspect: f64) -> bool {
    (aspect_of(width, height) - target_aspect).abs() < EPS
}

/// Canvas needed to bring `width x height` to `target_aspect` by padding,
/// or `None` if no padding is needed.
pub fn pad_canvas(width: u32, height: u32, target_aspect: f64) -> Option<PadCanvas> {
    if is_at_aspect(width, height, target_aspect) {
        return None;
    }

    let (new_w, new_h) = if aspect_of(width, height) > target_aspect {
        (width, ((width as f64 / target_aspect) as u32).max(height))
    } else {
        (((height as f64 * target_aspect) as u32).max(width), height)
    };

    if new_w == width && new_h == height {
        return None;
    }

    Some(PadCanvas {
        width: new_w,
        height: new_h,
        x: (new_w - width) / 2,
        y: (new_h - height) / 2,
    })
}

/// Centered crop window towards `target_aspect`, removing at most
/// `max_crop_fraction` of the excess axis.
pub fn crop_window(width: u32, height: u32, target_aspect: f64, max_crop_fraction: f64) -> CropWindow {
    let full = CropWindow {
        x: 0,
        y: 0,
        width,
        height,
        cropped_fraction: 0.0,
        reached_exact: true,
    };

    if is_at_aspect(width, height, target_aspect) {
        return full;
    }

    let max_crop_fraction = max_crop_fraction.clamp(0.0, 1.0);

    if aspect_of(width, height) > target_aspect {
        let wanted = ((target_aspect * height as f64) as u32).clamp(1, width);
        let (delta, reached_exact) = clamp_delta(width - wanted, width, max_crop_fraction);
        CropWindow {
            x: delta / 2,
            width: width - delta,
            cropped_fraction: delta as f64 / width as f64,
            reached_exact,
            ..full
        }
    } else {
        let wanted = ((width as f64 / target_aspect) as u32).clamp(1, height);
        let (delta, reached_exact) = clamp_delta(height - wanted, height, max_crop_fraction);
        CropWindow {
            y: delta / 2,
            height: height - delta,
            cropped_fraction: delta as f64 / height as f64,
            reached_exact,
            ..full
        }
    }
}

fn clamp_delta(delta: u32, size: u32, max_crop_fraction: f64) -> (u32, bool) {
    let budget = ((size as f64 * max_crop_fraction) as u32).min(size.saturating_sub(1));
    if delta > budget {
        (budget, false)
    } else {
        (delta, true)
    }
}

/// Crops `image` towards `target_aspect`. An image already at the target
/// aspect is handed back untouched.
pub fn crop_towards_aspect(image: RgbImage, target_aspect: f64, max_crop_fraction: f64) -> CropOutcome {
    let window = crop_window(image.width(), image.height(), target_aspect, max_crop_fraction);

    if window.width == image.width() && window.height == image.height() {
        return CropOutcome {
            image,
            cropped_fraction: 0.0,
            reached_exact: window.reached_exact,
        };
    }

    log::debug!(
        "Cropping {}x{} to {}x{} at ({}, {}), removed {:.1}%{}",
        image.width(),
        image.height(),
        window.width,
        window.height,
        window.x,
        window.y,
        window.cropped_fraction * 100.0,
        if window.reached_exact { "" } else { " (budget exhausted)" }
    );

    CropOutcome {
        image: apply_crop(image, &window),
        cropped_fraction: window.cropped_fraction,
        reached_exact: window.reached_exact,
    }
}

/// Cuts `window` out of `image`; a full-size window hands the image back.
pub fn apply_crop(image: RgbImage, window: &CropWindow) -> RgbImage {
    if window.width == image.width() && window.height == image.height() {
        return image;
    }
    imageops::crop_imm(&image, window.x, window.y, window.width, window.height).to_image()
}

/// Centers `image` on a larger canvas with the target aspect. Fails instead
/// of allocating a canvas above [`MAX_CANVAS_PIXELS`].
pub fn pad_to_aspect(image: RgbImage, target_aspect: f64, pad_color: PadColor) -> Result<RgbImage> {
    let Some(canvas) = pad_canvas(image.width(), image.height(), target_aspect) else {
        return Ok(image);
    };

    let pixels = canvas.width as u64 * canvas.height as u64;
    if pixels > MAX_CANVAS_PIXELS {
        return Err(FrameError::ProcessingError(format!(
            "Padded canvas {}x{} for a {}x{} image exceeds {} pixels",
            canvas.width,
            canvas.height,
            image.width(),
            image.height(),
            MAX_CANVAS_PIXELS
        )));
    }

    let color = resolve_pad_color(&image, pad_color);
    log::debug!(
        "Padding {}x{} to {}x{} with {:?}",
        image.width(),
        image.height(),
        canvas.width,
        canvas.height,
        color
    );

    let mut padded = RgbImage::from_pixel(canvas.width, canvas.height, Rgb(color));
    imageops::replace(&mut padded, &image, canvas.x as i64, canvas.y as i64);
    Ok(padded)
}

pub fn resolve_pad_color(image: &RgbImage, pad_color: PadColor) -> [u8; 3] {
    match pad_color.fixed_rgb() {
        Some(rgb) => rgb,
        None => average_color(image),
    }
}

/// Per-channel mean of a one-third scale copy of `image`.
pub fn average_color(image: &RgbImage) -> [u8; 3] {
    let width = (image.width() / 3).max(1);
    let height = (image.height() / 3).max(1);
    let small = imageops::resize(image, width, height, FilterType::Triangle);

    let mut sums = [0u64; 3];
    for pixel in small.pixels() {
        for (sum, channel) in sums.iter_mut().zip(pixel.0) {
            *sum += channel as u64;
        }
    }

    let count = (small.width() as u64 * small.height() as u64).max(1);
    sums.map(|sum| (sum / count) as u8)
}
