use console::style;
use prettytable::{format, Cell, Row, Table};
use std::time::Duration;

use super::batch::OutcomeTally;
use super::ReplaceOptions;
use crate::utils::format_duration;

/// Final figures of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_targets: usize,
    pub tally: OutcomeTally,
    pub options: ReplaceOptions,
    pub workers: usize,
    pub elapsed: Duration,
    pub dry_run: bool,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl RunSummary {
    fn replaced_label(&self) -> &'static str {
        if self.dry_run {
            "Would be replaced"
        } else {
            "Replaced"
        }
    }

    /// Label/value pairs shown below the counts
    fn settings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Resize Mode", self.options.resize_mode.label().to_string()),
            ("Flip Images", yes_no(self.options.flip_images).to_string()),
            (
                "Preserve Transparency",
                yes_no(self.options.preserve_transparency).to_string(),
            ),
            (
                "Skip Transparent Images",
                yes_no(self.options.skip_transparency).to_string(),
            ),
            ("CPU Workers", self.workers.to_string()),
        ]
    }

    /// Plain multi-line text, used for dialogs
    pub fn render(&self) -> String {
        let heading = if self.dry_run {
            "Dry run complete, no files were written."
        } else {
            "Done Replacing!"
        };

        let mut lines = vec![
            heading.to_string(),
            String::new(),
            format!("Total images processed: {}", self.total_targets),
            format!("{}: {}", self.replaced_label(), self.tally.replaced),
            format!("Skipped (transparent): {}", self.tally.skipped),
            format!("Errors: {}", self.tally.errors),
            String::new(),
        ];
        lines.extend(
            self.settings()
                .into_iter()
                .map(|(label, value)| format!("{}: {}", label, value)),
        );
        lines.push(format!(
            "Elapsed Time: {:.2} seconds",
            self.elapsed.as_secs_f64()
        ));

        lines.join("\n")
    }

    /// Styled console output
    pub fn print(&self) {
        println!();
        let header = if self.dry_run {
            style("Dry Run Results Summary:").bold().cyan()
        } else {
            style("Results Summary:").bold().green()
        };
        println!("{}", header);
        println!("  Total images: {}", style(self.total_targets).bold());
        println!(
            "  {}: {}",
            self.replaced_label(),
            style(self.tally.replaced).bold().green()
        );
        if self.tally.skipped > 0 {
            println!(
                "  Skipped (transparent): {}",
                style(self.tally.skipped).bold().yellow()
            );
        }
        if self.tally.errors > 0 {
            println!("  Errors: {}", style(self.tally.errors).bold().red());
        }

        println!();
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.add_row(Row::new(vec![Cell::new("Setting"), Cell::new("Value")]));
        for (label, value) in self.settings() {
            table.add_row(Row::new(vec![Cell::new(label), Cell::new(&value)]));
        }
        table.printstd();

        println!();
        println!("{}", style("Performance:").bold().blue());
        println!(
            "  Total processing time: {}",
            style(format_duration(self.elapsed)).bold()
        );
        if self.total_targets > 0 {
            println!(
                "  Average time per image: {}",
                style(format_duration(self.elapsed / self.total_targets as u32)).dim()
            );
        }

        if self.tally.errors > 0 {
            println!();
            println!(
                "{}",
                style(format!("⚠ {} errors occurred during processing", self.tally.errors))
                    .bold()
                    .yellow()
            );
            println!("  Check the ERROR lines above for the affected files");
        }
    }
}
