use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;
use std::time::Instant;

use repaint_processor::cli::Args;
use repaint_processor::image_processing::{
    pairing::{pair_targets, SourceCycle},
    replace::ReplaceOutcome,
    summary::RunSummary,
    FolderRole, ProcessingConfig, ReplaceEngine, ReplaceOptions,
};
use repaint_processor::json_output::JsonMessage;
use repaint_processor::prompt::{collect_interactive, Prompter, TerminalPrompter};
use repaint_processor::utils::{create_progress_bar, validate_inputs, verbose_println};

fn make_prompter(args: &Args) -> Box<dyn Prompter> {
    if args.native_dialogs() {
        #[cfg(feature = "gui")]
        {
            return Box::new(repaint_processor::gui::NativePrompter);
        }
    }
    Box::new(TerminalPrompter::new())
}

fn run(mut args: Args, prompter: &dyn Prompter) -> Result<()> {
    args.load_and_merge_config()?;
    let human = !args.json_progress;

    if human {
        println!("{}", style("Repaint - Image Replacer").bold().blue());
        println!("{}", style("Bulk image replacement with resize").dim());
        println!();
    }

    if args.wants_prompts() {
        collect_interactive(&mut args, prompter)?;
    }

    validate_inputs(&args)?;
    let target_dir = args.target_dir.clone().context("No target folder selected!")?;
    let source_dir = args.source_dir.clone().context("No source folder selected!")?;

    let options = ReplaceOptions {
        flip_images: args.flip_images,
        skip_transparency: args.skip_transparency,
        preserve_transparency: args.preserve_transparency,
        resize_mode: args.resize_mode(),
    };

    let config = ProcessingConfig {
        options,
        extensions: args.parse_extensions(),
        parallel_jobs: if args.jobs == 0 {
            num_cpus::get()
        } else {
            args.jobs
        },
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: !human,
    };

    if config.verbose && human {
        println!("{}", style("Configuration:").bold());
        println!("  Target folder: {}", target_dir.display());
        println!("  Source folder: {}", source_dir.display());
        println!("  Resize mode: {}", options.resize_mode.label());
        println!("  Flip images: {}", options.flip_images);
        println!("  Skip transparent: {}", options.skip_transparency);
        println!("  Preserve transparency: {}", options.preserve_transparency);
        println!("  Parallel jobs: {}", config.parallel_jobs);
        println!("  Extensions: {:?}", config.extensions);
        match args.seed {
            Some(seed) => println!("  Shuffle seed: {}", seed),
            None => println!("  Shuffle seed: random"),
        }
        if options.skip_transparency && options.preserve_transparency {
            println!("  Note: preserving transparency, so transparent targets are not skipped");
        }
        if config.dry_run {
            println!("  Dry run mode: enabled (simulation only - no files will be written)");
        }
        println!();
    }

    let dry_run = config.dry_run;
    let engine = ReplaceEngine::new(config)?;

    let sources = engine.discover_required(&source_dir, FolderRole::Source)?;
    let source_count = sources.len();
    let mut cycle = SourceCycle::new(sources, args.seed)?;

    let targets = engine.discover_required(&target_dir, FolderRole::Target)?;
    let jobs = pair_targets(targets, &mut cycle);
    let total_targets = jobs.len();

    if human {
        println!(
            "Found {} target images and {} source images",
            style(total_targets).bold(),
            style(source_count).bold()
        );
        if source_count < total_targets {
            verbose_println(
                args.verbose,
                &format!("Sources will be reused: {} targets share {} sources", total_targets, source_count),
            );
        }
    }

    let progress = if human {
        create_progress_bar(total_targets as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_message("Replacing images");

    let start_time = Instant::now();
    let flipped = options.flip_images;
    let tally = engine.run(jobs, |report, processor| {
        if human {
            let line = report.log_line(flipped);
            match &report.outcome {
                Ok(ReplaceOutcome::Replaced) => progress.println(line),
                Ok(ReplaceOutcome::Skipped(_)) => progress.println(style(line).yellow().to_string()),
                Err(_) => progress.println(style(line).red().to_string()),
            }
            progress.inc(1);
        } else {
            let job = &report.job;
            match &report.outcome {
                Ok(ReplaceOutcome::Replaced) => JsonMessage::replaced(job.index, &job.target, &job.source),
                Ok(ReplaceOutcome::Skipped(reason)) => JsonMessage::skipped(job.index, &job.target, reason.as_str()),
                Err(e) => JsonMessage::failed(job.index, &job.target, format!("{:#}", e)),
            }
            JsonMessage::progress(
                processor.completed(),
                total_targets,
                format!("Replacing images ({:.0}%)", processor.progress() * 100.0),
            );
        }
    });
    let elapsed = start_time.elapsed();
    progress.finish_with_message("✓ Processing complete!");

    let summary = RunSummary {
        total_targets,
        tally,
        options,
        workers: engine.workers(),
        elapsed,
        dry_run,
    };

    if human {
        prompter.show_summary(&summary);
    } else {
        JsonMessage::summary(total_targets, &tally, elapsed.as_secs_f64());
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    let prompter = make_prompter(&args);

    if let Err(e) = run(args, prompter.as_ref()) {
        prompter.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
