/*!
 * Command-line interface for codebase-extractor
 */

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;

use codebase_extractor::config::{Args, Config};
use codebase_extractor::extractor::{Extraction, Extractor};
use codebase_extractor::logger::setup_logger;
use codebase_extractor::report::{ReportFormat, Reporter, ScanReport};

/// Ask a yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "codebase-extractor", &mut io::stdout());
        return Ok(());
    }

    if let Err(e) = setup_logger(args.verbose) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    // Create and validate configuration
    let config = Config::from_args(&args);
    config.validate()?;

    if let Err(conflict) = config.check_output(args.force) {
        println!("⚠️ Warning: {}", conflict);
        if !confirm("Do you want to overwrite it?")? {
            println!("❌ Operation cancelled.");
            return Ok(());
        }
    }

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    };
    progress.set_prefix("📊 Scanning");

    let extractor = Extractor::new(config.clone(), Arc::new(progress.clone()))?;

    // Start timing
    let start_time = Instant::now();

    let mut scan = extractor.scan()?;

    if let Some(includes) = &config.include_patterns {
        if scan.content_candidates().next().is_none() {
            let proceed = progress.suspend(|| {
                warn!(
                    "No files matched the inclusion patterns: {}",
                    includes.display()
                );
                confirm("Continue with just directory structure?")
            })?;
            if !proceed {
                progress.finish_and_clear();
                println!("❌ Operation cancelled.");
                return Ok(());
            }
        }
    }

    progress.set_prefix("📊 Processing");
    let assembly = extractor.assemble(&mut scan);

    progress.set_prefix("💾 Writing");
    let report = extractor.compose(&scan, &assembly);
    extractor.write(&report)?;

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    let extraction = Extraction {
        scan,
        assembly,
        report,
    };
    let scan_report = ScanReport::from_extraction(
        &extraction,
        config.output_file.display().to_string(),
        duration,
        extractor.tokenizer().model_context_window(),
    );

    // Create a reporter and print the report
    let reporter = Reporter::new(ReportFormat::ConsoleTable);
    reporter.print_report(&scan_report);

    Ok(())
}
