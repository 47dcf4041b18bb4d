//! Palette-reduction and dithering core.
//!
//! Converts a full-color RGBA pixel buffer into an approximation restricted
//! to a small fixed palette, using either ordered (threshold matrix)
//! dithering or Atkinson error diffusion. The core is a pure function of
//! (source buffer, options) -> new buffer: it never mutates the caller's
//! buffer and keeps no state across invocations. Decoding and encoding of
//! image files are the caller's concern.

pub mod atkinson;
pub mod buffer;
pub mod error;
pub mod ordered;
pub mod palette;

pub use atkinson::apply_atkinson_dithering;
pub use buffer::PixelBuffer;
pub use error::{DitherError, ParseColorError};
pub use ordered::apply_ordered_dithering;
pub use palette::{Color, Palette};

/// Dithering algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherAlgorithm {
    /// Periodic threshold perturbation, no inter-sample state
    Ordered,
    /// Forward error diffusion over six neighbors
    Atkinson,
}

/// Options for a single render pass. The palette is borrowed, not owned.
#[derive(Debug, Clone)]
pub struct DitherOptions<'a> {
    /// Sampling interval and block side length, >= 1
    pub step: u32,
    pub algorithm: DitherAlgorithm,
    pub palette: &'a Palette,
}

/// Dither `source` into a new buffer according to `options`.
///
/// Validates the step before any processing (an empty palette is already
/// unrepresentable, [`Palette::new`] rejects it) and dispatches to the
/// selected algorithm. The source buffer is never mutated; on failure no
/// partial output exists.
pub fn render(source: &PixelBuffer, options: &DitherOptions) -> Result<PixelBuffer, DitherError> {
    if options.step < 1 {
        return Err(DitherError::InvalidStep { step: options.step });
    }

    let output = match options.algorithm {
        DitherAlgorithm::Ordered => apply_ordered_dithering(source, options.palette, options.step),
        DitherAlgorithm::Atkinson => {
            apply_atkinson_dithering(source, options.palette, options.step)
        }
    };

    Ok(output)
}
