pub mod batch;
pub mod pairing;
pub mod replace;
pub mod resize;
pub mod summary;

use anyhow::{Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use walkdir::WalkDir;

use crate::cli::ResizeMode;
use crate::utils::{has_valid_extension, verbose_println, warn_println};

use batch::{BatchProcessor, ItemReport, OutcomeTally};
use pairing::ReplaceJob;
use replace::replace_image;

/// Options fixed for the whole run and copied into every task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub flip_images: bool,
    pub skip_transparency: bool,
    pub preserve_transparency: bool,
    pub resize_mode: ResizeMode,
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub options: ReplaceOptions,
    pub extensions: Vec<String>,
    pub parallel_jobs: usize,
    pub dry_run: bool,
    pub verbose: bool,
    /// Suppress human output (JSON mode)
    pub quiet: bool,
}

/// Which side of the replacement a folder provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderRole {
    Target,
    Source,
}

impl FolderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderRole::Target => "target",
            FolderRole::Source => "source",
        }
    }
}

pub struct ReplaceEngine {
    config: ProcessingConfig,
    pool: rayon::ThreadPool,
}

impl ReplaceEngine {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_jobs)
            .thread_name(|i| format!("repaint-worker-{}", i))
            .build()
            .context("Failed to initialize thread pool")?;

        Ok(Self { config, pool })
    }

    /// Number of worker threads actually running
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Discover all image files below `root`, in scan order
    pub fn discover_images(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(anyhow::anyhow!("Not a directory: {}", root.display()));
        }

        verbose_println(
            self.config.verbose && !self.config.quiet,
            &format!("Scanning directory: {}", root.display()),
        );

        let mut image_files = Vec::new();
        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable entries are passed over, like missing files
                    if !self.config.quiet {
                        warn_println(&format!("Skipping unreadable entry: {}", e));
                    }
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() && has_valid_extension(path, &self.config.extensions) {
                image_files.push(path.to_path_buf());
            }
        }

        verbose_println(
            self.config.verbose && !self.config.quiet,
            &format!("Found {} image files in {}", image_files.len(), root.display()),
        );
        Ok(image_files)
    }

    /// Like `discover_images`, but finding nothing is an error
    pub fn discover_required(&self, root: &Path, role: FolderRole) -> Result<Vec<PathBuf>> {
        let images = self.discover_images(root)?;
        if images.is_empty() {
            return Err(anyhow::anyhow!(
                "No valid images found in {} folder!",
                role.as_str()
            ));
        }
        Ok(images)
    }

    /// Run every job on the pool and aggregate outcomes as they complete
    ///
    /// `on_report` is called on the calling thread, once per job, in
    /// completion order.
    pub fn run<F>(&self, jobs: Vec<ReplaceJob>, mut on_report: F) -> OutcomeTally
    where
        F: FnMut(&ItemReport, &BatchProcessor),
    {
        let processor = BatchProcessor::new(jobs.len());
        let (tx, rx) = channel();

        for job in jobs {
            let tx = tx.clone();
            let options = self.config.options;
            let dry_run = self.config.dry_run;

            self.pool.spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| replace_image(&job, &options, dry_run)))
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("Worker panicked while processing image")));
                // The receiver only goes away once every report is in
                let _ = tx.send(ItemReport { job, outcome });
            });
        }
        drop(tx);

        let mut tally = OutcomeTally::default();
        for report in rx {
            processor.increment();
            tally.record(&report.outcome);
            on_report(&report, &processor);
        }

        tally
    }
}
