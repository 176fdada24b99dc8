//! Metascrub - Image Metadata Scrubber
//!
//! Writes copies of GIF, JPEG and PNG files with their metadata removed.

use anyhow::{Context, Result};
use clap::Parser;
use humansize::{BINARY, format_size};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use metascrub::application::dto::{ScrubReport, UnitReport};
use metascrub::formats::{self, ImageCodec};
use metascrub::infrastructure::persistence::{output_path_in, sibling_output_path};
use metascrub::presentation::cli::{Cli, Commands};
use metascrub::types::{Disposition, ImageFormat};
use metascrub::{LocalFileWriter, ScrubJob, ValidateImageUseCase, ValidationOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    match cli.command {
        Commands::Scrub {
            inputs,
            output_dir,
            overwrite,
            max_size,
            json,
        } => run_scrub(&inputs, output_dir.as_deref(), overwrite, max_size, json),
        Commands::Inspect { input, json } => run_inspect(&input, json),
        Commands::Formats => {
            print_formats();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool, debug: bool) {
    let level = if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run_scrub(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    overwrite: bool,
    max_size: usize,
    json: bool,
) -> Result<()> {
    let jobs: Vec<ScrubJob> = inputs
        .iter()
        .map(|source| {
            let destination = match output_dir {
                Some(dir) => output_path_in(dir, source),
                None => sibling_output_path(source),
            };
            ScrubJob::new(source, destination)
        })
        .collect();

    let options = ValidationOptions::new()
        .with_max_input_size(max_size)
        .with_overwrite(overwrite);
    let use_case = ValidateImageUseCase::new(LocalFileWriter::new(), options);
    let summary = use_case.execute_batch(&jobs);

    if json {
        let output = serde_json::to_string_pretty(&summary.reports)
            .context("Failed to serialize scrub reports")?;
        println!("{}", output);
    } else {
        for report in &summary.reports {
            print_report(report);
        }
        println!();
        print!("{}", summary.summary());
    }

    if !summary.is_success() {
        anyhow::bail!("{} of {} input(s) rejected", summary.failed_files, jobs.len());
    }
    Ok(())
}

fn print_report(report: &ScrubReport) {
    let source = report
        .source
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!(
        "{} -> {} ({}, removed {} in {} unit(s))",
        source,
        report.destination.display(),
        report.format,
        format_size(report.bytes_removed() as u64, BINARY),
        report.removed.len()
    );
}

fn run_inspect(input: &Path, json: bool) -> Result<()> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let codec: &dyn ImageCodec = match formats::codec_for_path(input) {
        Ok(codec) => codec,
        Err(_) => {
            let format = formats::sniff(&data).with_context(|| {
                format!("{} is not a GIF, JPEG or PNG file", input.display())
            })?;
            formats::codec_for(format)
        }
    };

    if !codec.detect(&data) {
        anyhow::bail!(
            "{} does not carry a {} signature",
            input.display(),
            codec.format()
        );
    }

    let units = codec
        .walk(&data)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    let reports = UnitReport::from_units(&data, &units);

    if json {
        let output =
            serde_json::to_string_pretty(&reports).context("Failed to serialize unit list")?;
        println!("{}", output);
        return Ok(());
    }

    println!(
        "{} ({}, {})",
        input.display(),
        codec.format(),
        format_size(data.len() as u64, BINARY)
    );
    println!("{:>10} {:>10}  {:<8} {:<8} CRC", "OFFSET", "LENGTH", "UNIT", "ACTION");
    for unit in &reports {
        let crc = match unit.crc_valid {
            Some(true) => "ok",
            Some(false) => "bad",
            None => "",
        };
        let action = match unit.disposition {
            Disposition::Retain => "keep",
            Disposition::Drop => "drop",
        };
        println!(
            "{:>10} {:>10}  {:<8} {:<8} {}",
            unit.offset, unit.length, unit.kind, action, crc
        );
    }

    let removable: usize = reports
        .iter()
        .filter(|u| u.disposition == Disposition::Drop)
        .map(|u| u.length)
        .sum();
    println!("\n{} removable", format_size(removable as u64, BINARY));
    Ok(())
}

fn print_formats() {
    println!("{:<6} {:<12} REMOVED", "FORMAT", "EXTENSIONS");
    for format in ImageFormat::ALL {
        let removed = match format {
            ImageFormat::Gif => "Comment, Plain Text and Application extensions",
            ImageFormat::Jpeg => "APP1-APP13, APP15 and COM segments",
            ImageFormat::Png => "tEXt, zTXt and iTXt chunks",
        };
        println!(
            "{:<6} {:<12} {}",
            format.name(),
            format.extensions().join(", "),
            removed
        );
    }
}
