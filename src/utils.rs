use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::cli::Args;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    // Validate input paths (directories or files)
    if args.input_paths.is_empty() {
        return Err(anyhow::anyhow!(
            "No input paths specified (use --input or a config file)"
        ));
    }
    for input_path in &args.input_paths {
        if !input_path.exists() {
            return Err(anyhow::anyhow!(
                "Input path does not exist: {}",
                input_path.display()
            ));
        }
        if !input_path.is_dir() && !input_path.is_file() {
            return Err(anyhow::anyhow!(
                "Input path is neither a file nor a directory: {}",
                input_path.display()
            ));
        }
    }

    // Fail fast before any image is touched; the dithering core re-checks
    // this on every render.
    if args.step < 1 {
        return Err(anyhow::anyhow!("Step must be at least 1, got: 0"));
    }

    // Validate palette early so a typo fails before processing starts
    args.parse_palette().map_err(|message| anyhow::anyhow!(message))?;

    // Validate extensions
    let extensions = args.parse_extensions();
    if extensions.is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    // Validate job count
    if args.jobs > 32 {
        return Err(anyhow::anyhow!(
            "Job count too high (max 32), got: {}",
            args.jobs
        ));
    }

    Ok(())
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext)
    } else {
        false
    }
}

/// Build the output filename for an input image: `{stem}{suffix}.{ext}`
pub fn create_output_filename(input_path: &Path, suffix: &str) -> String {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    match get_file_extension(input_path) {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    }
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
#[allow(dead_code)]
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_create_output_filename() {
        assert_eq!(
            create_output_filename(&PathBuf::from("photos/cat.jpg"), "-dither"),
            "cat-dither.jpg"
        );
        assert_eq!(
            create_output_filename(&PathBuf::from("CAT.JPG"), "-dither"),
            "CAT-dither.jpg"
        );
        assert_eq!(
            create_output_filename(&PathBuf::from("a/b/pic.png"), "_bw"),
            "pic_bw.png"
        );
        assert_eq!(
            create_output_filename(&PathBuf::from("noext"), "-dither"),
            "noext-dither"
        );
    }

    #[test]
    fn test_has_valid_extension() {
        let extensions = vec!["jpg".to_string(), "png".to_string()];
        assert!(has_valid_extension(Path::new("a.jpg"), &extensions));
        assert!(has_valid_extension(Path::new("a.PNG"), &extensions));
        assert!(!has_valid_extension(Path::new("a.gif"), &extensions));
        assert!(!has_valid_extension(Path::new("jpg"), &extensions));
    }

    #[test]
    fn test_validate_inputs_rejects_bad_args() {
        let args = Args {
            input_paths: vec![PathBuf::from("/definitely/not/a/real/path")],
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            input_paths: vec![PathBuf::from(".")],
            step: 0,
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            input_paths: vec![PathBuf::from(".")],
            palette_str: "#nothex".to_string(),
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            input_paths: vec![PathBuf::from(".")],
            jobs: 64,
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());
    }

    #[test]
    fn test_validate_inputs_accepts_defaults() {
        let args = Args {
            input_paths: vec![PathBuf::from(".")],
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_ok());
    }
}
