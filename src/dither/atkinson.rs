//! Atkinson error diffusion dithering.
//!
//! Forwards 1/8 of each sample's quantization error to six neighboring
//! samples. Because diffusion feeds values into positions visited later
//! (and, through the -1 offset, positions just behind the scan), the
//! row-major step-incrementing traversal order is part of the observable
//! output and the algorithm is inherently sequential per image.

use super::buffer::PixelBuffer;
use super::palette::Palette;

/// Fraction of the quantization error forwarded to each neighbor.
///
/// Only 6/8 of the error is diffused in total; the rest is dropped, which
/// keeps high-contrast areas from bleeding.
const DIFFUSION_RATIO: f32 = 1.0 / 8.0;

/// Neighbor offsets receiving diffused error, in units of `step`:
///
/// ```text
///         X   1   2
///    -1   0   1
///         0
/// ```
const DIFFUSION_OFFSETS: [(i64, i64); 6] = [(1, 0), (-1, 1), (0, 1), (1, 1), (2, 0), (0, 2)];

/// Atkinson-dither `source` against `palette`, sampling every `step` pixels
/// and painting each quantized color over a `step`x`step` block.
///
/// Two private copies of the source are kept: a working buffer that
/// accumulates diffused error and is read for quantization, and an output
/// buffer that receives only the quantized block colors. Diffusion targets
/// outside the buffer are skipped, blocks are clipped at the edges, and the
/// alpha channel is copied through untouched. `step` must be at least 1
/// (validated by [`render`](super::render)).
pub fn apply_atkinson_dithering(source: &PixelBuffer, palette: &Palette, step: u32) -> PixelBuffer {
    let mut working = source.clone();
    let mut output = source.clone();
    let (width, height) = source.dimensions();
    let step_offset = step as i64;

    for y in (0..height).step_by(step as usize) {
        for x in (0..width).step_by(step as usize) {
            // Read from the working buffer: this position may already carry
            // error diffused by earlier samples.
            let [r, g, b] = working.rgb(x, y);
            let matched = palette.nearest([r as f32, g as f32, b as f32]);

            let error = [
                r as f32 - matched.r as f32,
                g as f32 - matched.g as f32,
                b as f32 - matched.b as f32,
            ];

            for (dx, dy) in DIFFUSION_OFFSETS {
                working.accumulate_rgb(
                    x as i64 + dx * step_offset,
                    y as i64 + dy * step_offset,
                    [
                        error[0] * DIFFUSION_RATIO,
                        error[1] * DIFFUSION_RATIO,
                        error[2] * DIFFUSION_RATIO,
                    ],
                );
            }

            output.fill_block(x, y, step, matched.channels());
        }
    }

    output
}
