use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

use crate::image_processing::summary::RunSummary;
use crate::prompt::Prompter;
use crate::utils::error_println;

/// Prompter backed by the platform's file and message dialogs
#[derive(Debug, Default)]
pub struct NativePrompter;

impl Prompter for NativePrompter {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        FileDialog::new().set_title(title).pick_folder()
    }

    fn confirm(&self, question: &str) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Option")
            .set_description(question)
            .set_buttons(MessageButtons::YesNo)
            .show();
        matches!(result, MessageDialogResult::Yes)
    }

    fn error(&self, message: &str) {
        error_println(message);
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Error")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn show_summary(&self, summary: &RunSummary) {
        summary.print();
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Repaint - Summary")
            .set_description(summary.render())
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
