// Library exports for reuse by the binary and integration tests
pub mod cli;
pub mod config_file;
#[cfg(feature = "gui")]
pub mod gui;
pub mod image_processing;
pub mod json_output;
pub mod prompt;
pub mod utils;

// Re-export commonly used types
pub use cli::{Args, ResizeMode};
pub use image_processing::{
    batch::{ItemReport, OutcomeTally},
    pairing::{pair_targets, ReplaceJob, SourceCycle},
    replace::{ReplaceOutcome, SkipReason},
    summary::RunSummary,
    FolderRole, ProcessingConfig, ReplaceEngine, ReplaceOptions,
};
pub use json_output::JsonMessage;
pub use prompt::{Prompter, TerminalPrompter};
