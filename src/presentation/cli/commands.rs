//! CLI commands using clap

use crate::application::dto::DEFAULT_MAX_INPUT_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Metascrub - Image Metadata Scrubber
///
/// Removes comments, text chunks and application segments from GIF, JPEG
/// and PNG files. Pixel data is copied byte for byte, never re-encoded.
#[derive(Parser)]
#[command(name = "metascrub")]
#[command(version)]
#[command(about = "Strip metadata from GIF, JPEG and PNG files", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and strip metadata, writing cleaned copies
    Scrub {
        /// Image files to scrub; the extension selects the format
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for cleaned copies (default: "<name> (1).<ext>" next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(long)]
        overwrite: bool,

        /// Reject inputs larger than this many bytes
        #[arg(long, default_value_t = DEFAULT_MAX_INPUT_SIZE)]
        max_size: usize,

        /// Print per-file reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every structural unit of an image and whether it would be kept
    Inspect {
        /// Image file to inspect
        input: PathBuf,

        /// Print the unit list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported formats
    Formats,
}
