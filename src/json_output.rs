//! JSON output for GUI integration
//!
//! When --json-progress flag is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::image_processing::batch::OutcomeTally;

/// Last progress emission timestamp (milliseconds since epoch)
/// Used for throttling progress updates to ~25 FPS (40ms between updates)
static LAST_PROGRESS_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// Target overwritten with a source image
    Replaced {
        index: usize,
        target_path: String,
        source_path: String,
    },
    /// Target left untouched
    Skipped {
        index: usize,
        target_path: String,
        reason: String,
    },
    /// Target processing failed
    Failed {
        index: usize,
        target_path: String,
        error: String,
    },
    /// Processing summary
    Summary {
        total_files: usize,
        replaced: usize,
        skipped: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit progress message (throttled to ~25 FPS for smooth GUI updates)
    ///
    /// The final progress (current == total) is always emitted to ensure 100% completion.
    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let last_ms = LAST_PROGRESS_MS.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) >= 40 || current == total {
            LAST_PROGRESS_MS.store(now_ms, Ordering::Relaxed);
            Self::Progress {
                current,
                total,
                message: message.into(),
            }
            .emit();
        }
    }

    pub fn replaced(index: usize, target_path: &Path, source_path: &Path) {
        Self::Replaced {
            index,
            target_path: target_path.display().to_string(),
            source_path: source_path.display().to_string(),
        }
        .emit();
    }

    pub fn skipped(index: usize, target_path: &Path, reason: impl Into<String>) {
        Self::Skipped {
            index,
            target_path: target_path.display().to_string(),
            reason: reason.into(),
        }
        .emit();
    }

    pub fn failed(index: usize, target_path: &Path, error: impl Into<String>) {
        Self::Failed {
            index,
            target_path: target_path.display().to_string(),
            error: error.into(),
        }
        .emit();
    }

    /// Create and emit summary message
    pub fn summary(total_files: usize, tally: &OutcomeTally, duration_secs: f64) {
        Self::Summary {
            total_files,
            replaced: tally.replaced,
            skipped: tally.skipped,
            failed: tally.errors,
            duration_secs,
        }
        .emit();
    }
}
