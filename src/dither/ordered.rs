//! Ordered (threshold matrix) dithering.
//!
//! Each sample is perturbed by a position-dependent threshold from a fixed
//! 4x4 matrix before palette quantization. No error is carried between
//! samples, so the result depends only on each sample's own position and
//! color.

use super::buffer::PixelBuffer;
use super::palette::Palette;

/// 4x4 threshold matrix with values 1..=16.
///
/// Indexed `[x % 4][y % 4]`: x selects the row, y the column. This
/// orientation is part of the output contract and must not be transposed.
const THRESHOLD_MATRIX: [[i32; 4]; 4] = [
    [1, 9, 3, 11],
    [13, 5, 15, 7],
    [4, 12, 2, 10],
    [16, 8, 14, 6],
];

/// Scale applied to the matrix threshold before it perturbs a sample.
const PERTURBATION_RATIO: i32 = 3;

/// Ordered-dither `source` against `palette`, sampling every `step` pixels
/// and painting each match over a `step`x`step` block.
///
/// Blocks that would extend past the buffer are clipped to the in-bounds
/// pixels; the alpha channel is copied through untouched. The caller's
/// buffer is never mutated. `step` must be at least 1 (validated by
/// [`render`](super::render)).
pub fn apply_ordered_dithering(source: &PixelBuffer, palette: &Palette, step: u32) -> PixelBuffer {
    let mut output = source.clone();
    let (width, height) = source.dimensions();

    for y in (0..height).step_by(step as usize) {
        for x in (0..width).step_by(step as usize) {
            let [r, g, b] = source.rgb(x, y);
            let threshold =
                THRESHOLD_MATRIX[(x % 4) as usize][(y % 4) as usize] * PERTURBATION_RATIO;

            // The perturbed channels saturate like any other 8-bit store
            // before the palette match.
            let perturbed = [
                (r as i32 + threshold).clamp(0, 255) as f32,
                (g as i32 + threshold).clamp(0, 255) as f32,
                (b as i32 + threshold).clamp(0, 255) as f32,
            ];

            let matched = palette.nearest(perturbed);
            output.fill_block(x, y, step, matched.channels());
        }
    }

    output
}
