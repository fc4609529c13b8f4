// frameprep/src/cli.rs
use crate::core::{PadColor, ResizeAlgorithm, ResizeConfig, ResizeMode, TargetSize};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "frameprep",
    version,
    about = "Resize images for digital photo frames.",
    after_help = "Examples:\n  frameprep /photos/input /photos/output\n  frameprep -m hybrid-stretch --crop-min 0.8 --stretch-max 0.2 input/ output/\n  frameprep --size 1280x720 --pad-mode black input/ output/"
)]
pub struct Cli {
    /// Source directory with images
    pub input_dir: PathBuf,

    /// Destination directory for processed images
    pub output_dir: PathBuf,

    /// Resize mode: pad, crop, hybrid or hybrid-stretch
    #[arg(short, long, default_value = "hybrid-stretch")]
    pub mode: ResizeMode,

    /// Target size
    #[arg(short, long, default_value = "1920x1080", value_name = "WxH")]
    pub size: TargetSize,

    /// Padding color: gray, white, black or average
    #[arg(long, default_value = "average")]
    pub pad_mode: PadColor,

    /// Minimum image retention when cropping, 0.0-1.0
    #[arg(long, default_value_t = 0.8, value_name = "FLOAT")]
    pub crop_min: f64,

    /// Maximum stretch factor for hybrid-stretch mode
    #[arg(long, default_value_t = 0.2, value_name = "FLOAT")]
    pub stretch_max: f64,

    /// Aspect deviation limit beyond which no stretching is applied
    #[arg(long, default_value_t = 0.4, value_name = "FLOAT")]
    pub no_stretch_limit: f64,

    /// Resampling filter
    #[arg(long, value_enum, default_value_t = Algorithm::Lanczos3)]
    pub algorithm: Algorithm,

    /// JPEG quality of the written files
    #[arg(long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Process all images, even if output already exists
    #[arg(long)]
    pub no_skip: bool,

    /// Show what would be processed without actually doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Flatten output: all images in output root
    #[arg(long)]
    pub flatten: bool,

    /// Verbose output (show all files including skipped)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (only show errors and summary)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

impl Cli {
    pub fn to_config(&self) -> ResizeConfig {
        ResizeConfig::new(&self.input_dir, &self.output_dir)
            .with_mode(self.mode)
            .with_target_size(self.size)
            .with_pad_color(self.pad_mode)
            .with_crop_min_retain(self.crop_min)
            .with_stretch_max(self.stretch_max)
            .with_no_stretch_limit(self.no_stretch_limit)
            .with_algorithm(self.algorithm.into())
            .with_quality(self.quality)
            .with_skip_existing(!self.no_skip)
            .with_dry_run(self.dry_run)
            .with_flatten(self.flatten)
    }
}
