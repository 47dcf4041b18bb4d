// Library exports for reuse by the comparison binary and external tools
pub mod cli;
pub mod config_file;
pub mod dither;
pub mod image_processing;
pub mod json_output;
pub mod utils;

// Re-export commonly used types
pub use cli::{Algorithm, Args};
pub use dither::{
    render, Color, DitherAlgorithm, DitherError, DitherOptions, Palette, PixelBuffer,
};
pub use image_processing::{ProcessingConfig, ProcessingEngine, ProcessingResult};
pub use json_output::JsonMessage;
