pub mod batch;

use anyhow::{Context, Result};
use image::RgbaImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::dither::{self, DitherAlgorithm, DitherOptions, Palette, PixelBuffer};
use crate::utils::{create_output_filename, get_file_extension, has_valid_extension, verbose_println};

use batch::BatchProcessor;

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub palette: Palette,
    pub step: u32,
    pub algorithm: DitherAlgorithm,
    pub suffix: String,
    pub extensions: Vec<String>,
    pub verbose: bool,
    pub parallel_jobs: usize,
    pub force: bool,
    pub dry_run: bool,
}

pub struct ProcessingEngine {
    config: ProcessingConfig,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        // Initialize thread pool with specified number of jobs
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_jobs)
            .build_global()
            .context("Failed to initialize thread pool")?;

        Ok(Self { config })
    }

    /// Discover all image files under the input paths
    pub fn discover_images(&self, input_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut image_files = Vec::new();

        for input_path in input_paths {
            verbose_println(
                self.config.verbose,
                &format!("Scanning: {}", input_path.display()),
            );

            let walker = WalkDir::new(input_path)
                .follow_links(false)
                .max_depth(10); // Reasonable depth limit

            for entry in walker {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                if path.is_file() && has_valid_extension(path, &self.config.extensions) {
                    image_files.push(path.to_path_buf());
                }
            }
        }

        // Sort for consistent processing order
        image_files.sort();

        verbose_println(
            self.config.verbose,
            &format!("Found {} image files", image_files.len()),
        );
        Ok(image_files)
    }

    /// Process a batch of images in parallel with a progress callback.
    ///
    /// Each image pipeline owns its buffers; only the progress counter is
    /// shared. One outcome per image: a failing image never aborts the rest
    /// of the batch.
    pub fn process_batch<F>(
        &self,
        image_files: &[PathBuf],
        output_dir: &Path,
        progress_callback: F,
    ) -> Result<Vec<Result<ProcessingResult>>>
    where
        F: Fn(usize, f64, Option<Duration>) + Send + Sync,
    {
        let processor = BatchProcessor::new(image_files.len());

        let results: Vec<Result<ProcessingResult>> = image_files
            .par_iter()
            .map(|image_path| {
                let result = self.process_single_image(image_path, output_dir);

                let completed = processor.increment();
                progress_callback(completed, processor.progress(), processor.eta());

                result
            })
            .collect();

        Ok(results)
    }

    /// Process a single image file: decode, dither, encode.
    ///
    /// The output is written only after the full buffer is computed; a
    /// failure anywhere discards the attempt without leaving a partial file.
    fn process_single_image(&self, input_path: &Path, output_dir: &Path) -> Result<ProcessingResult> {
        let started = Instant::now();
        verbose_println(
            self.config.verbose,
            &format!("Processing: {}", input_path.display()),
        );

        let output_filename = create_output_filename(input_path, &self.config.suffix);
        let output_path = output_dir.join(output_filename);

        if !self.config.force && !self.config.dry_run && output_path.exists() {
            verbose_println(
                self.config.verbose,
                &format!("Skipping, output exists: {}", output_path.display()),
            );
            return Ok(ProcessingResult {
                input_path: input_path.to_path_buf(),
                output_path,
                width: 0,
                height: 0,
                skipped: true,
                processing_time: started.elapsed(),
            });
        }

        // Load and decode the image
        let img = image::open(input_path)
            .with_context(|| format!("Failed to open image: {}", input_path.display()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let source = PixelBuffer::from_raw(width, height, rgba.into_raw())?;
        let options = DitherOptions {
            step: self.config.step,
            algorithm: self.config.algorithm,
            palette: &self.config.palette,
        };
        let dithered = dither::render(&source, &options)?;

        if !self.config.dry_run {
            let encoded = RgbaImage::from_raw(width, height, dithered.into_raw())
                .context("Dithered buffer has the wrong length for the output image")?;

            match get_file_extension(&output_path).as_deref() {
                // JPEG has no alpha channel
                Some("jpg") | Some("jpeg") => image::DynamicImage::ImageRgba8(encoded)
                    .to_rgb8()
                    .save(&output_path)
                    .with_context(|| {
                        format!("Failed to save image: {}", output_path.display())
                    })?,
                _ => encoded.save(&output_path).with_context(|| {
                    format!("Failed to save image: {}", output_path.display())
                })?,
            }
        }

        Ok(ProcessingResult {
            input_path: input_path.to_path_buf(),
            output_path,
            width,
            height,
            skipped: false,
            processing_time: started.elapsed(),
        })
    }
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Output already existed and --force was not given
    pub skipped: bool,
    pub processing_time: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn test_config(dry_run: bool, force: bool) -> ProcessingConfig {
        ProcessingConfig {
            palette: Palette::black_white(),
            step: 1,
            algorithm: DitherAlgorithm::Ordered,
            suffix: "-dither".to_string(),
            extensions: vec!["png".to_string(), "jpg".to_string()],
            verbose: false,
            parallel_jobs: 1,
            force,
            dry_run,
        }
    }

    fn test_engine(config: ProcessingConfig) -> ProcessingEngine {
        // Bypass ProcessingEngine::new to avoid re-initializing the global
        // rayon pool across tests.
        ProcessingEngine { config }
    }

    fn write_test_image(path: &Path, width: u32, height: u32) {
        // RGB rather than RGBA so the same helper can write JPEGs.
        let img = RgbImage::from_fn(width, height, |x, y| {
            let value = ((x + y) * 37 % 256) as u8;
            Rgb([value, value, value])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_process_single_image_writes_dithered_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_image(&input, 6, 4);

        let engine = test_engine(test_config(false, false));
        let result = engine.process_single_image(&input, dir.path()).unwrap();

        assert!(!result.skipped);
        assert_eq!((result.width, result.height), (6, 4));
        assert_eq!(result.output_path, dir.path().join("photo-dither.png"));

        let output = image::open(&result.output_path).unwrap().to_rgba8();
        assert_eq!(output.dimensions(), (6, 4));
        for pixel in output.pixels() {
            let rgb = [pixel[0], pixel[1], pixel[2]];
            assert!(rgb == [0, 0, 0] || rgb == [255, 255, 255]);
        }
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_image(&input, 4, 4);

        let engine = test_engine(test_config(true, false));
        let result = engine.process_single_image(&input, dir.path()).unwrap();

        assert!(!result.skipped);
        assert!(!result.output_path.exists());
    }

    #[test]
    fn test_existing_output_skipped_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_image(&input, 4, 4);
        std::fs::write(dir.path().join("photo-dither.png"), b"placeholder").unwrap();

        let engine = test_engine(test_config(false, false));
        let result = engine.process_single_image(&input, dir.path()).unwrap();
        assert!(result.skipped);

        // With --force the file is reprocessed and overwritten.
        let engine = test_engine(test_config(false, true));
        let result = engine.process_single_image(&input, dir.path()).unwrap();
        assert!(!result.skipped);
        assert!(image::open(&result.output_path).is_ok());
    }

    #[test]
    fn test_decode_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"not an image").unwrap();

        let engine = test_engine(test_config(false, false));
        assert!(engine.process_single_image(&input, dir.path()).is_err());
    }

    #[test]
    fn test_discover_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write_test_image(&dir.path().join("b.png"), 2, 2);
        write_test_image(&dir.path().join("a.jpg"), 2, 2);
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_test_image(&nested.join("c.png"), 2, 2);

        let engine = test_engine(test_config(false, false));
        let found = engine
            .discover_images(&[dir.path().to_path_buf()])
            .unwrap();

        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "nested/c.png"]);
    }
}
