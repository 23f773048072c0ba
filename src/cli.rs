use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Default list of recognized image extensions
pub const DEFAULT_EXTENSIONS: &str = "png,jpg,jpeg,webp,bmp,tiff,gif";

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ResizeMode {
    /// Bicubic resampling (higher quality)
    #[value(name = "standard")]
    Standard,
    /// Bilinear resampling (lower quality, faster)
    #[value(name = "fast")]
    Fast,
}

impl ResizeMode {
    pub fn from_fast(fast: bool) -> Self {
        if fast {
            ResizeMode::Fast
        } else {
            ResizeMode::Standard
        }
    }

    /// Human readable label used in the summary
    pub fn label(&self) -> &'static str {
        match self {
            ResizeMode::Fast => "Ultra-Fast (BILINEAR)",
            ResizeMode::Standard => "Standard (BICUBIC)",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "repaint-processor",
    about = "Replace every image in a target folder with resized images from a source folder",
    long_about = "
Repaint Processor

Walks a target folder and overwrites every image it finds with an image drawn from a
source folder. Source images are shuffled once and reused in a cycle when there are
fewer sources than targets. Each replacement is resized to the exact pixel size of the
image it replaces.

Key Features:
• Parallel processing on a thread pool sized to the CPU count
• Optional vertical flip of the source images
• Skip targets that carry transparency, or keep their alpha mask on the replacement
• Fast (bilinear) or standard (bicubic) resampling

Example Usage:
  # Replace everything under ./textures with images from ./photos
  repaint-processor -t ./textures -s ./photos

  # Keep the alpha mask of the original textures and flip the replacements
  repaint-processor -t ./textures -s ./photos --preserve-transparency --flip

  # Leave transparent targets alone, resample fast
  repaint-processor -t ./textures -s ./photos --skip-transparent --fast

  # Ask for folders and options interactively
  repaint-processor --interactive

  # Reproducible pairing, nothing written
  repaint-processor -t ./textures -s ./photos --seed 42 --dry-run --verbose"
)]
pub struct Args {
    /// Folder containing the images to be replaced
    #[arg(short = 't', long = "target", value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Folder containing the images to replace with
    #[arg(short = 's', long = "source", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Flip the source images vertically before resizing
    #[arg(long = "flip")]
    pub flip_images: bool,

    /// Leave targets with transparency untouched (ignored with --preserve-transparency)
    #[arg(long = "skip-transparent")]
    pub skip_transparency: bool,

    /// Copy the alpha channel of each target onto its replacement
    #[arg(long = "preserve-transparency")]
    pub preserve_transparency: bool,

    /// Use bilinear instead of bicubic resampling (lower quality, faster)
    #[arg(long = "fast")]
    pub fast_mode: bool,

    /// Ask for missing folders and all options through prompts
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Use native dialogs instead of terminal prompts
    #[cfg(feature = "gui")]
    #[arg(long = "gui-dialogs")]
    pub gui_dialogs: bool,

    /// Number of parallel processing jobs (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", default_value = "0", value_name = "N")]
    pub jobs: usize,

    /// Seed for the source shuffle (random when omitted)
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Comma-separated list of image extensions to process
    #[arg(long = "extensions", default_value = DEFAULT_EXTENSIONS)]
    pub extensions_str: String,

    /// JSON configuration file; command-line values take precedence
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Perform every step except writing the target files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Emit progress as JSON lines on stdout instead of human output
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn resize_mode(&self) -> ResizeMode {
        ResizeMode::from_fast(self.fast_mode)
    }

    /// Interactive mode is implied when no folder was given at all
    pub fn wants_prompts(&self) -> bool {
        self.interactive || (self.target_dir.is_none() && self.source_dir.is_none())
    }

    #[cfg(feature = "gui")]
    pub fn native_dialogs(&self) -> bool {
        self.gui_dialogs
    }

    #[cfg(not(feature = "gui"))]
    pub fn native_dialogs(&self) -> bool {
        false
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            target_dir: None,
            source_dir: None,
            flip_images: false,
            skip_transparency: false,
            preserve_transparency: false,
            fast_mode: false,
            interactive: false,
            #[cfg(feature = "gui")]
            gui_dialogs: false,
            jobs: 0,
            seed: None,
            extensions_str: DEFAULT_EXTENSIONS.to_string(),
            config_file: None,
            dry_run: false,
            json_progress: false,
            verbose: false,
        }
    }
}
