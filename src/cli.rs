use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::dither::Color;

#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum Algorithm {
    /// Ordered dithering with a 4x4 threshold matrix (regular pattern, no bleed)
    #[value(name = "ordered")]
    Ordered,
    /// Atkinson error diffusion (softer look, good for photos)
    #[value(name = "atkinson")]
    Atkinson,
}

#[derive(Parser, Debug)]
#[command(
    name = "dither-processor",
    about = "Batch palette-reduction and dithering for images",
    long_about = "
Dither Processor

Reduces full-color images to a small fixed palette using ordered (threshold
matrix) or Atkinson error-diffusion dithering, processing whole directory
trees in parallel. Output files land next to each other in the output
directory, named after the input with a configurable suffix.

Example Usage:
  # Dither every JPEG under ~/Photos to black & white
  dither-processor -i ~/Photos -o ~/dithered

  # Atkinson dithering against a 4-color palette, chunky 4px blocks
  dither-processor -i ~/Photos -o ~/dithered --algorithm atkinson \\
    --palette \"#000000,#ffffff,#ff0000,#0000ff\" --step 4

  # PNGs too, eight parallel jobs, overwrite existing outputs
  dither-processor -i ~/Photos -o ~/dithered --extensions jpg,jpeg,png -j 8 --force

  # Load options from a JSON config file (command line wins)
  dither-processor --config dither.json

  # Dry run: decode and dither but write nothing
  dither-processor -i ~/Photos -o ~/dithered --dry-run --verbose"
)]
pub struct Args {
    /// Input directories or single image files (can be specified multiple times)
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "config_file",
        value_name = "DIR|FILE"
    )]
    pub input_paths: Vec<PathBuf>,

    /// Output directory for dithered images
    #[arg(short = 'o', long = "output", default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Target palette as comma-separated hex colors; earlier entries win
    /// ties in the nearest-color match
    #[arg(
        long = "palette",
        default_value = "#000000,#ffffff",
        value_name = "COLORS"
    )]
    pub palette_str: String,

    /// Sampling interval and block size in pixels (1 = per-pixel)
    #[arg(long = "step", default_value = "1", value_name = "N")]
    pub step: u32,

    /// Dithering algorithm
    #[arg(long = "algorithm", default_value = "ordered", value_name = "METHOD")]
    pub algorithm: Algorithm,

    /// Suffix appended to output filenames, before the extension
    #[arg(long = "suffix", default_value = "-dither", value_name = "SUFFIX")]
    pub suffix: String,

    /// Comma-separated list of image extensions to process
    #[arg(long = "extensions", default_value = "jpg,jpeg", value_name = "LIST")]
    pub extensions_str: String,

    /// Number of parallel processing jobs (0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", default_value = "0", value_name = "N")]
    pub jobs: usize,

    /// Load options from a JSON config file (command-line arguments take precedence)
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Overwrite existing output files instead of skipping them
    #[arg(long = "force")]
    pub force: bool,

    /// Simulate processing without writing any files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Emit machine-readable JSON progress lines instead of styled output
    #[arg(long = "json-progress")]
    pub json_progress: bool,
}

impl Args {
    /// Parse the palette string into an ordered color list
    pub fn parse_palette(&self) -> Result<Vec<Color>, String> {
        let mut colors = Vec::new();

        for part in self.palette_str.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let color = Color::from_hex(part)
                .map_err(|err| format!("Invalid palette color '{}': {}", part, err))?;
            colors.push(color);
        }

        if colors.is_empty() {
            return Err("No valid palette colors specified".to_string());
        }

        Ok(colors)
    }

    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            input_paths: vec![],
            output_dir: PathBuf::from("."),
            palette_str: "#000000,#ffffff".to_string(),
            step: 1,
            algorithm: Algorithm::Ordered,
            suffix: "-dither".to_string(),
            extensions_str: "jpg,jpeg".to_string(),
            jobs: 0,
            config_file: None,
            verbose: false,
            force: false,
            dry_run: false,
            json_progress: false,
        }
    }
}
