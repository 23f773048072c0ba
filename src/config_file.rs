use crate::cli::{Args, DEFAULT_EXTENSIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk run configuration
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub target_path: Option<String>,
    pub source_path: Option<String>,
    pub flip_images: Option<bool>,
    pub skip_transparency: Option<bool>,
    pub preserve_transparency: Option<bool>,
    pub fast_mode: Option<bool>,
    pub jobs: Option<usize>,
    pub seed: Option<u64>,
    pub extensions: Option<String>,
    pub dry_run: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: ConfigFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            self.merge_from_config(config);

            if self.verbose && !self.json_progress {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    pub(crate) fn merge_from_config(&mut self, config: ConfigFile) {
        if self.target_dir.is_none() {
            self.target_dir = config.target_path.map(PathBuf::from);
        }

        if self.source_dir.is_none() {
            self.source_dir = config.source_path.map(PathBuf::from);
        }

        // Boolean flags - only apply if currently false (default)
        if !self.flip_images {
            self.flip_images = config.flip_images.unwrap_or(false);
        }

        if !self.skip_transparency {
            self.skip_transparency = config.skip_transparency.unwrap_or(false);
        }

        if !self.preserve_transparency {
            self.preserve_transparency = config.preserve_transparency.unwrap_or(false);
        }

        if !self.fast_mode {
            self.fast_mode = config.fast_mode.unwrap_or(false);
        }

        if !self.dry_run {
            self.dry_run = config.dry_run.unwrap_or(false);
        }

        if self.jobs == 0 {
            if let Some(jobs) = config.jobs {
                self.jobs = jobs;
            }
        }

        if self.seed.is_none() {
            self.seed = config.seed;
        }

        if self.extensions_str == DEFAULT_EXTENSIONS {
            if let Some(ext) = config.extensions {
                self.extensions_str = ext;
            }
        }
    }
}
