use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::time::Instant;

mod cli;
mod config_file;
mod dither;
mod image_processing;
mod json_output;
mod utils;

use cli::{Algorithm, Args};
use dither::{DitherAlgorithm, Palette};
use image_processing::{ProcessingConfig, ProcessingEngine};
use json_output::JsonMessage;
use utils::{
    create_progress_bar, error_println, format_duration, validate_inputs, verbose_println,
};

impl From<Algorithm> for DitherAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Ordered => DitherAlgorithm::Ordered,
            Algorithm::Atkinson => DitherAlgorithm::Atkinson,
        }
    }
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();
    args.load_and_merge_config()?;

    let json_progress = args.json_progress;

    // Print banner
    if !json_progress {
        println!(
            "{}",
            style("Dither Processor - Batch palette reduction").bold().blue()
        );
        println!(
            "{}",
            style("Ordered and Atkinson dithering for fixed palettes").dim()
        );
        println!();
    }

    // Validate inputs
    validate_inputs(&args)?;

    // Build the palette; parse errors were already caught by validation
    let colors = args
        .parse_palette()
        .map_err(|message| anyhow::anyhow!(message))?;
    let palette = Palette::new(colors)?;

    // Create processing configuration
    let config = ProcessingConfig {
        palette,
        step: args.step,
        algorithm: args.algorithm.clone().into(),
        suffix: args.suffix.clone(),
        extensions: args.parse_extensions(),
        verbose: args.verbose && !json_progress,
        parallel_jobs: if args.jobs == 0 {
            num_cpus::get()
        } else {
            args.jobs
        },
        force: args.force,
        dry_run: args.dry_run,
    };

    if config.verbose {
        println!("{}", style("Configuration:").bold());
        let palette_list: Vec<String> = config
            .palette
            .colors()
            .iter()
            .map(|color| color.to_string())
            .collect();
        println!("  Palette: {}", palette_list.join(", "));
        println!("  Step: {}", config.step);
        println!("  Algorithm: {:?}", config.algorithm);
        println!("  Suffix: {:?}", config.suffix);
        println!("  Extensions: {:?}", config.extensions);
        println!("  Parallel jobs: {}", config.parallel_jobs);
        println!("  Output directory: {}", args.output_dir.display());
        if config.force {
            println!("  Force: enabled (existing outputs are overwritten)");
        }
        if config.dry_run {
            println!("  Dry run mode: enabled (simulation only - no files will be created)");
        }
        println!();
    }

    // Create output directory (skip in dry-run mode)
    if !args.dry_run {
        std::fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;
    } else {
        verbose_println(
            config.verbose,
            "Dry run mode: skipping output directory creation",
        );
    }

    // Initialize processing engine
    let engine = ProcessingEngine::new(config)?;

    // Discover all images
    let image_files = engine.discover_images(&args.input_paths)?;

    if image_files.is_empty() {
        if json_progress {
            JsonMessage::summary(0, 0, 0, 0, start_time.elapsed().as_secs_f64());
        } else {
            println!(
                "{}",
                style("No images found with specified extensions").red()
            );
        }
        return Ok(());
    }

    let total = image_files.len();

    // Process all images in parallel with progress reporting
    let progress = if json_progress {
        None
    } else {
        let pb = create_progress_bar(total as u64);
        pb.set_message("Dithering images");
        Some(pb)
    };

    let results = engine.process_batch(&image_files, &args.output_dir, |completed, _ratio, _eta| {
        match &progress {
            Some(pb) => pb.set_position(completed as u64),
            None => JsonMessage::progress(completed, total, "Dithering images"),
        }
    })?;

    if let Some(pb) = &progress {
        pb.finish_with_message("Processing complete");
    }

    // Print results summary
    let mut processed = 0;
    let mut skipped = 0;
    let mut failures = Vec::new();

    for (image_path, result) in image_files.iter().zip(&results) {
        match result {
            Ok(outcome) if outcome.skipped => {
                skipped += 1;
            }
            Ok(outcome) => {
                processed += 1;
                if json_progress {
                    JsonMessage::file_completed(
                        &outcome.input_path,
                        &outcome.output_path,
                        outcome.processing_time.as_millis(),
                    );
                } else {
                    verbose_println(
                        args.verbose,
                        &format!(
                            "{} -> {} ({}x{}, {})",
                            outcome.input_path.display(),
                            outcome.output_path.display(),
                            outcome.width,
                            outcome.height,
                            format_duration(outcome.processing_time)
                        ),
                    );
                }
            }
            Err(err) => {
                failures.push((image_path, err));
                if json_progress {
                    JsonMessage::file_failed(image_path, format!("{:#}", err));
                }
            }
        }
    }

    let total_time = start_time.elapsed();

    if json_progress {
        JsonMessage::summary(
            total,
            processed,
            skipped,
            failures.len(),
            total_time.as_secs_f64(),
        );
    } else {
        println!();
        for (image_path, err) in &failures {
            error_println(&format!("{}: {:#}", image_path.display(), err));
        }

        println!("{}", style("Summary:").bold());
        println!("  Processed: {}", style(processed).green());
        if skipped > 0 {
            println!(
                "  Skipped:   {} {}",
                style(skipped).yellow(),
                style("(already exist, use --force to overwrite)").dim()
            );
        }
        if !failures.is_empty() {
            println!("  Failed:    {}", style(failures.len()).red());
        }
        println!("  Total time: {}", format_duration(total_time));
    }

    if !failures.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
