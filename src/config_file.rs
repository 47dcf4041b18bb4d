use crate::cli::{Algorithm, Args};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// On-disk JSON configuration format
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub input_paths: Option<Vec<String>>,
    pub output_path: Option<String>,
    pub palette: Option<Vec<String>>,
    pub step: Option<u32>,
    pub algorithm: Option<String>,
    pub suffix: Option<String>,
    pub extensions: Option<String>,
    pub jobs: Option<usize>,
    pub force: Option<bool>,
    pub dry_run: Option<bool>,
    pub verbose: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments.
    /// Command-line arguments take precedence over config file values.
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: ConfigFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            self.merge_from_config(config);

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ConfigFile) {
        // We check if arguments were explicitly provided on the command line
        let args_from_cli = std::env::args().collect::<Vec<_>>();

        // Input/output paths - only apply if not specified on CLI
        if !args_from_cli.iter().any(|a| a == "-i" || a == "--input") {
            if let Some(inputs) = config.input_paths {
                self.input_paths = inputs.into_iter().map(PathBuf::from).collect();
            }
        }

        if !args_from_cli.iter().any(|a| a == "-o" || a == "--output") {
            if let Some(output) = config.output_path {
                self.output_dir = PathBuf::from(output);
            }
        }

        // Palette - only apply if using the default
        if self.palette_str == "#000000,#ffffff" {
            if let Some(palette) = config.palette {
                self.palette_str = palette.join(",");
            }
        }

        // Algorithm
        if !args_from_cli.iter().any(|a| a == "--algorithm") {
            if let Some(algorithm) = config.algorithm {
                self.algorithm = match algorithm.as_str() {
                    "ordered" => Algorithm::Ordered,
                    "atkinson" => Algorithm::Atkinson,
                    _ => self.algorithm.clone(),
                };
            }
        }

        // Numeric and string parameters - only apply if using defaults
        if self.step == 1 {
            if let Some(step) = config.step {
                self.step = step;
            }
        }

        if self.suffix == "-dither" {
            if let Some(suffix) = config.suffix {
                self.suffix = suffix;
            }
        }

        if self.extensions_str == "jpg,jpeg" {
            if let Some(extensions) = config.extensions {
                self.extensions_str = extensions;
            }
        }

        if self.jobs == 0 {
            if let Some(jobs) = config.jobs {
                self.jobs = jobs;
            }
        }

        // Boolean flags - only apply if currently false (default)
        if !self.force {
            self.force = config.force.unwrap_or(false);
        }

        if !self.dry_run {
            self.dry_run = config.dry_run.unwrap_or(false);
        }

        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_applies_config_over_defaults() {
        let mut args = Args::default();
        let config = ConfigFile {
            input_paths: Some(vec!["/photos".to_string()]),
            output_path: Some("/out".to_string()),
            palette: Some(vec!["#000000".to_string(), "#ff0000".to_string()]),
            step: Some(3),
            algorithm: Some("atkinson".to_string()),
            suffix: Some("_d".to_string()),
            extensions: Some("png".to_string()),
            jobs: Some(2),
            force: Some(true),
            ..Default::default()
        };

        args.merge_from_config(config);

        assert_eq!(args.input_paths, vec![PathBuf::from("/photos")]);
        assert_eq!(args.output_dir, PathBuf::from("/out"));
        assert_eq!(args.palette_str, "#000000,#ff0000");
        assert_eq!(args.step, 3);
        assert_eq!(args.algorithm, Algorithm::Atkinson);
        assert_eq!(args.suffix, "_d");
        assert_eq!(args.extensions_str, "png");
        assert_eq!(args.jobs, 2);
        assert!(args.force);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_merge_keeps_non_default_values() {
        let mut args = Args {
            step: 4,
            palette_str: "#112233,#445566".to_string(),
            suffix: "_custom".to_string(),
            ..Default::default()
        };
        let config = ConfigFile {
            step: Some(2),
            palette: Some(vec!["#000000".to_string()]),
            suffix: Some("_fromconfig".to_string()),
            ..Default::default()
        };

        args.merge_from_config(config);

        assert_eq!(args.step, 4);
        assert_eq!(args.palette_str, "#112233,#445566");
        assert_eq!(args.suffix, "_custom");
    }

    #[test]
    fn test_unknown_algorithm_keeps_current() {
        let mut args = Args::default();
        let config = ConfigFile {
            algorithm: Some("floyd".to_string()),
            ..Default::default()
        };

        args.merge_from_config(config);
        assert_eq!(args.algorithm, Algorithm::Ordered);
    }

    #[test]
    fn test_load_and_merge_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("dither.json");
        std::fs::write(
            &config_path,
            r##"{ "step": 2, "algorithm": "atkinson", "palette": ["#000000", "#ffffff", "#00ff00"] }"##,
        )
        .unwrap();

        let mut args = Args {
            config_file: Some(config_path),
            ..Default::default()
        };
        args.load_and_merge_config().unwrap();

        assert_eq!(args.step, 2);
        assert_eq!(args.algorithm, Algorithm::Atkinson);
        assert_eq!(args.palette_str, "#000000,#ffffff,#00ff00");
    }

    #[test]
    fn test_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let mut args = Args {
            config_file: Some(config_path),
            ..Default::default()
        };
        assert!(args.load_and_merge_config().is_err());
    }
}
