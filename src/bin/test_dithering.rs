use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use std::path::PathBuf;

use dither_processor::dither::{self, DitherAlgorithm, DitherOptions, Palette, PixelBuffer};

#[derive(Parser, Debug)]
#[command(name = "test-dithering")]
#[command(about = "Compare dithering algorithms and step sizes on one image")]
struct Args {
    /// Input image path
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Palette as comma-separated hex colors
    #[arg(long, default_value = "#000000,#ffffff")]
    palette: String,

    /// Step sizes to render, comma-separated
    #[arg(long, default_value = "1,2,4")]
    steps: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading image: {:?}", args.input);
    let rgba = image::open(&args.input)
        .with_context(|| format!("Failed to open image: {}", args.input.display()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let source = PixelBuffer::from_raw(width, height, rgba.into_raw())?;

    let colors = args
        .palette
        .split(',')
        .map(|part| dither_processor::Color::from_hex(part.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    let palette = Palette::new(colors)?;

    let steps = args
        .steps
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid step list")?;

    std::fs::create_dir_all(&args.output)?;
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    for (algorithm, name) in [
        (DitherAlgorithm::Ordered, "ordered"),
        (DitherAlgorithm::Atkinson, "atkinson"),
    ] {
        for &step in &steps {
            let options = DitherOptions {
                step,
                algorithm,
                palette: &palette,
            };
            let result = dither::render(&source, &options)?;

            let output_path = args
                .output
                .join(format!("{}_{}_step{}.png", stem, name, step));
            let encoded = RgbaImage::from_raw(width, height, result.into_raw())
                .context("Dithered buffer has the wrong length for the output image")?;
            encoded.save(&output_path)?;
            println!("  Saved: {:?}", output_path);
        }
    }

    println!("Processing complete");
    Ok(())
}
