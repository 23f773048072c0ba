use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::pairing::ReplaceJob;
use super::replace::ReplaceOutcome;

/// Batch processing statistics and progress tracking
pub struct BatchProcessor {
    pub total_files: usize,
    pub processed_count: AtomicUsize,
}

impl BatchProcessor {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            processed_count: AtomicUsize::new(0),
        }
    }

    /// Increment processed count and return current count
    pub fn increment(&self) -> usize {
        self.processed_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed(&self) -> usize {
        self.processed_count.load(Ordering::Relaxed)
    }

    /// Get current progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_files == 0 {
            1.0
        } else {
            (self.completed() as f64) / (self.total_files as f64)
        }
    }
}

/// Result of one finished task, sent back to the aggregating thread
#[derive(Debug)]
pub struct ItemReport {
    pub job: ReplaceJob,
    pub outcome: Result<ReplaceOutcome>,
}

impl ItemReport {
    /// Console line for this item
    pub fn log_line(&self, flipped: bool) -> String {
        let prefix = format!("[{}/{}]", self.job.index, self.job.total);
        let target = self.job.target.display();
        match &self.outcome {
            Ok(ReplaceOutcome::Replaced) => format!(
                "{} Replaced {} with {}{}",
                prefix,
                target,
                crate::utils::display_name(&self.job.source),
                if flipped { " (flipped)" } else { "" }
            ),
            Ok(ReplaceOutcome::Skipped(reason)) => {
                format!("{} Skipped {} ({})", prefix, target, reason.as_str())
            }
            Err(e) => format!("{} ERROR with {}: {:#}", prefix, target, e),
        }
    }
}

/// Per-outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub replaced: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: &Result<ReplaceOutcome>) {
        match outcome {
            Ok(ReplaceOutcome::Replaced) => self.replaced += 1,
            Ok(ReplaceOutcome::Skipped(_)) => self.skipped += 1,
            Err(_) => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.replaced + self.skipped + self.errors
    }
}
