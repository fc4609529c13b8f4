// frameprep/src/core/config.rs
use super::{FrameError, ResizeAlgorithm, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a source is fitted onto the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Pad,
    Crop,
    Hybrid,
    HybridStretch,
}

impl FromStr for ResizeMode {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pad" => Ok(ResizeMode::Pad),
            "crop" => Ok(ResizeMode::Crop),
            "hybrid" => Ok(ResizeMode::Hybrid),
            "hybrid-stretch" | "hybrid_stretch" => Ok(ResizeMode::HybridStretch),
            other => Err(FrameError::InvalidParameter(format!(
                "Unknown resize mode '{}' (expected pad, crop, hybrid or hybrid-stretch)",
                other
            ))),
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeMode::Pad => write!(f, "pad"),
            ResizeMode::Crop => write!(f, "crop"),
            ResizeMode::Hybrid => write!(f, "hybrid"),
            ResizeMode::HybridStretch => write!(f, "hybrid-stretch"),
        }
    }
}

/// Fill color for the padded margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadColor {
    White,
    Black,
    Gray,
    /// Mean color of a 1/3 scale copy of the image being padded.
    AverageSampled,
}

impl PadColor {
    /// Fixed RGB triple, `None` for the sampled policy.
    pub fn fixed_rgb(self) -> Option<[u8; 3]> {
        match self {
            PadColor::White => Some([255, 255, 255]),
            PadColor::Black => Some([0, 0, 0]),
            PadColor::Gray => Some([128, 128, 128]),
            PadColor::AverageSampled => None,
        }
    }
}

impl FromStr for PadColor {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" => Ok(PadColor::White),
            "black" => Ok(PadColor::Black),
            "gray" | "grey" => Ok(PadColor::Gray),
            "average" => Ok(PadColor::AverageSampled),
            other => Err(FrameError::InvalidParameter(format!(
                "Unknown pad mode '{}' (expected white, black, gray or average)",
                other
            ))),
        }
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadColor::White => write!(f, "white"),
            PadColor::Black => write!(f, "black"),
            PadColor::Gray => write!(f, "gray"),
            PadColor::AverageSampled => write!(f, "average"),
        }
    }
}

/// Output canvas in pixels. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidSize(format!("{}x{}", width, height)));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl FromStr for TargetSize {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FrameError::InvalidSize(s.to_string());
        let lower = s.trim().to_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The path-free part of a configuration: everything the geometry and
/// strategy code needs to transform one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strategy {
    pub mode: ResizeMode,
    pub target: TargetSize,
    pub pad_color: PadColor,
    pub crop_min_retain: f64,
    pub stretch_max: f64,
    pub no_stretch_limit: f64,
    pub algorithm: ResizeAlgorithm,
}

impl Strategy {
    /// `1 - crop_min_retain`, clamped to `[0, 1]`.
    pub fn max_crop_fraction(&self) -> f64 {
        (1.0 - self.crop_min_retain).clamp(0.0, 1.0)
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            mode: ResizeMode::HybridStretch,
            target: TargetSize::default(),
            pad_color: PadColor::AverageSampled,
            crop_min_retain: 0.8,
            stretch_max: 0.2,
            no_stretch_limit: 0.4,
            algorithm: ResizeAlgorithm::Lanczos3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResizeConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mode: ResizeMode,
    pub target_size: TargetSize,
    pub pad_color: PadColor,
    pub crop_min_retain: f64,
    pub stretch_max: f64,
    pub no_stretch_limit: f64,
    pub algorithm: ResizeAlgorithm,
    pub flatten: bool,
    pub skip_existing: bool,
    pub dry_run: bool,
    pub quality: u8,
}

impl ResizeConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let defaults = Strategy::default();
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            mode: defaults.mode,
            target_size: defaults.target,
            pad_color: defaults.pad_color,
            crop_min_retain: defaults.crop_min_retain,
            stretch_max: defaults.stretch_max,
            no_stretch_limit: defaults.no_stretch_limit,
            algorithm: defaults.algorithm,
            flatten: false,
            skip_existing: true,
            dry_run: false,
            quality: 95,
        }
    }

    pub fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_target_size(mut self, target_size: TargetSize) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_pad_color(mut self, pad_color: PadColor) -> Self {
        self.pad_color = pad_color;
        self
    }

    pub fn with_crop_min_retain(mut self, crop_min_retain: f64) -> Self {
        self.crop_min_retain = crop_min_retain;
        self
    }

    pub fn with_stretch_max(mut self, stretch_max: f64) -> Self {
        self.stretch_max = stretch_max;
        self
    }

    pub fn with_no_stretch_limit(mut self, no_stretch_limit: f64) -> Self {
        self.no_stretch_limit = no_stretch_limit;
        self
    }

    pub fn with_algorithm(mut self, algorithm: ResizeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn target_aspect(&self) -> f64 {
        self.target_size.aspect()
    }

    pub fn strategy(&self) -> Strategy {
        Strategy {
            mode: self.mode,
            target: self.target_size,
            pad_color: self.pad_color,
            crop_min_retain: self.crop_min_retain,
            stretch_max: self.stretch_max,
            no_stretch_limit: self.no_stretch_limit,
            algorithm: self.algorithm,
        }
    }

    /// Checks everything that must hold before a single file is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.crop_min_retain.is_finite() {
            return Err(FrameError::InvalidParameter(
                "crop_min_retain must be a finite number".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.stretch_max) {
            return Err(FrameError::InvalidParameter(format!(
                "stretch_max must be between 0.0 and 1.0, got {}",
                self.stretch_max
            )));
        }

        if !self.no_stretch_limit.is_finite() || self.no_stretch_limit < 0.0 {
            return Err(FrameError::InvalidParameter(format!(
                "no_stretch_limit must be >= 0.0, got {}",
                self.no_stretch_limit
            )));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(FrameError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        validate_dirs(&self.input_dir, &self.output_dir)
    }
}

fn validate_dirs(input_dir: &Path, output_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(FrameError::InvalidParameter(format!(
            "Input directory does not exist: {}",
            input_dir.display()
        )));
    }

    if !input_dir.is_dir() {
        return Err(FrameError::InvalidParameter(format!(
            "Input path is not a directory: {}",
            input_dir.display()
        )));
    }

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(FrameError::InvalidParameter(format!(
            "Output path exists but is not a directory: {}",
            output_dir.display()
        )));
    }

    if input_dir == output_dir {
        return Err(FrameError::InvalidParameter(
            "Input and output directories cannot be the same".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_size_strings() {
        let size: TargetSize = "1920x1080".parse().unwrap();
        assert_eq!((size.width(), size.height()), (1920, 1080));

        let size: TargetSize = " 1280X720 ".parse().unwrap();
        assert_eq!((size.width(), size.height()), (1280, 720));
        assert_eq!(size.to_string(), "1280x720");
    }

    #[test]
    fn rejects_bad_size_strings() {
        for bad in ["", "1920", "1920x", "x1080", "0x1080", "1920x0", "-5x10", "axb", "1x2x3"] {
            let parsed: Result<TargetSize> = bad.parse();
            assert!(
                matches!(parsed, Err(FrameError::InvalidSize(_))),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(TargetSize::new(0, 10).is_err());
    }

    #[test]
    fn parses_mode_and_pad_names() {
        assert_eq!("hybrid-stretch".parse::<ResizeMode>().unwrap(), ResizeMode::HybridStretch);
        assert_eq!("PAD".parse::<ResizeMode>().unwrap(), ResizeMode::Pad);
        assert!("zoom".parse::<ResizeMode>().is_err());

        assert_eq!("average".parse::<PadColor>().unwrap(), PadColor::AverageSampled);
        assert_eq!("grey".parse::<PadColor>().unwrap(), PadColor::Gray);
        assert!("purple".parse::<PadColor>().is_err());

        for mode in [ResizeMode::Pad, ResizeMode::Crop, ResizeMode::Hybrid, ResizeMode::HybridStretch] {
            assert_eq!(mode.to_string().parse::<ResizeMode>().unwrap(), mode);
        }
    }

    #[test]
    fn max_crop_fraction_is_clamped() {
        let mut strategy = Strategy::default();
        strategy.crop_min_retain = 1.5;
        assert_eq!(strategy.max_crop_fraction(), 0.0);
        strategy.crop_min_retain = -0.5;
        assert_eq!(strategy.max_crop_fraction(), 1.0);
        strategy.crop_min_retain = 0.75;
        assert!((strategy.max_crop_fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_missing_input_dir() {
        let temp = TempDir::new().unwrap();
        let config = ResizeConfig::new(temp.path().join("missing"), temp.path().join("out"));
        assert!(matches!(config.validate(), Err(FrameError::InvalidParameter(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_parameters() {
        let temp = TempDir::new().unwrap();
        let base = ResizeConfig::new(temp.path(), temp.path().join("out"));
        assert!(base.validate().is_ok());

        assert!(base.clone().with_stretch_max(1.5).validate().is_err());
        assert!(base.clone().with_stretch_max(-0.1).validate().is_err());
        assert!(base.clone().with_no_stretch_limit(-1.0).validate().is_err());
        assert!(base.clone().with_quality(0).validate().is_err());
        assert!(base.clone().with_crop_min_retain(f64::NAN).validate().is_err());
        // Out-of-range retention is clamped, not rejected.
        assert!(base.with_crop_min_retain(1.2).validate().is_ok());
    }

    #[test]
    fn validate_rejects_same_input_and_output() {
        let temp = TempDir::new().unwrap();
        let config = ResizeConfig::new(temp.path(), temp.path());
        assert!(config.validate().is_err());
    }
}
