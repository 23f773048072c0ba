//! Folder pickers, yes/no questions and popups
//!
//! The terminal implementation is always available; native dialogs live in
//! `gui::dialogs` behind the `gui` feature.

use anyhow::Result;
use console::{style, Term};
use std::io::{self, BufRead};
use std::path::PathBuf;

use crate::cli::Args;
use crate::image_processing::summary::RunSummary;
use crate::utils::error_println;

pub const TARGET_FOLDER_TITLE: &str = "Select Target Folder (images to be replaced)";
pub const SOURCE_FOLDER_TITLE: &str = "Select Source Folder (images to replace with)";
pub const FLIP_QUESTION: &str = "Do you want the images to be flipped vertically?";
pub const SKIP_QUESTION: &str = "Skip replacing images with transparency?";
pub const PRESERVE_QUESTION: &str = "Preserve transparent pixels when replacing?";
pub const FAST_QUESTION: &str = "Enable Ultra-Fast Mode? (lower quality, faster)";

pub trait Prompter {
    /// Ask for a directory; `None` when the user gave nothing
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;

    /// Yes/no question; only an explicit yes returns `true`
    fn confirm(&self, question: &str) -> bool;

    /// Report a fatal error
    fn error(&self, message: &str);

    fn show_summary(&self, summary: &RunSummary) {
        summary.print();
    }
}

pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    /// Prompts go to stderr, or to stdout when only stdout is a terminal
    pub fn new() -> Self {
        let stderr = Term::stderr();
        let stdout = Term::stdout();
        let term = if !stderr.is_term() && stdout.is_term() { stdout } else { stderr };
        Self { term }
    }

    fn ask(&self, prompt: &str) -> Option<String> {
        self.term.write_str(prompt).ok()?;
        if self.term.is_term() {
            self.term.read_line().ok()
        } else {
            // Term::read_line yields nothing off a terminal
            read_answer(&mut io::stdin().lock())
        }
    }
}

/// One answer line from `reader`, without the line ending; `None` at EOF
fn read_answer(reader: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        let line = self.ask(&format!("{}: ", style(title).bold()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }

    fn confirm(&self, question: &str) -> bool {
        self.ask(&format!("{} {} ", style(question).bold(), style("[y/N]").dim()))
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }

    fn error(&self, message: &str) {
        error_println(message);
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Fill in folders and options through the prompter
///
/// Folders already present are not asked again. A missing target aborts
/// before the source is asked for. Options already enabled stay enabled.
pub fn collect_interactive(args: &mut Args, prompter: &dyn Prompter) -> Result<()> {
    if args.target_dir.is_none() {
        args.target_dir = prompter.pick_folder(TARGET_FOLDER_TITLE);
        if args.target_dir.is_none() {
            return Err(anyhow::anyhow!("No target folder selected!"));
        }
    }

    if args.source_dir.is_none() {
        args.source_dir = prompter.pick_folder(SOURCE_FOLDER_TITLE);
        if args.source_dir.is_none() {
            return Err(anyhow::anyhow!("No source folder selected!"));
        }
    }

    let questions: [(&str, &mut bool); 4] = [
        (FLIP_QUESTION, &mut args.flip_images),
        (SKIP_QUESTION, &mut args.skip_transparency),
        (PRESERVE_QUESTION, &mut args.preserve_transparency),
        (FAST_QUESTION, &mut args.fast_mode),
    ];
    for (question, flag) in questions {
        if !*flag {
            *flag = prompter.confirm(question);
        }
    }

    Ok(())
}
