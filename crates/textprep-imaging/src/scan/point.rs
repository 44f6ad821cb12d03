// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Point operations: per-pixel transforms with no neighbourhood reads.

use rayon::prelude::*;
use textprep_core::config::CONTRAST_SINGULARITY;
use textprep_core::error::{Result, TextprepError};
use tracing::{debug, instrument};

use crate::raster::{CHANNELS, PixelBuffer, mean_intensity};

/// Set R = G = B = `round((R + G + B) / 3)` for every pixel. Alpha is kept.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn to_grayscale(buffer: &mut PixelBuffer) {
    buffer
        .raw_mut()
        .par_chunks_exact_mut(CHANNELS)
        .for_each(|px| {
            let v = mean_intensity(px);
            px[0] = v;
            px[1] = v;
            px[2] = v;
        });
}

/// The multiplier applied around mid-gray for a given contrast setting.
///
/// `259 * (c * 100 + 255) / (255 * (259 - c * 100))`. Fails with
/// `InvalidConfig` at and above the singularity at `c = 2.59`.
pub fn contrast_factor(contrast: f32) -> Result<f64> {
    if !contrast.is_finite() || contrast >= CONTRAST_SINGULARITY {
        return Err(TextprepError::InvalidConfig(format!(
            "contrast must be finite and below {}, got {}",
            CONTRAST_SINGULARITY, contrast
        )));
    }
    let c = contrast as f64 * 100.0;
    let factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));
    if !factor.is_finite() {
        return Err(TextprepError::InvalidConfig(format!(
            "contrast {} yields a non-finite factor",
            contrast
        )));
    }
    Ok(factor)
}

/// Remap every colour channel with
/// `clamp(factor * (v - 128) + 128 + (brightness - 1) * 50, 0, 255)`.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn adjust_contrast_brightness(
    buffer: &mut PixelBuffer,
    contrast: f32,
    brightness: f32,
) -> Result<()> {
    if !brightness.is_finite() {
        return Err(TextprepError::InvalidConfig(format!(
            "brightness must be finite, got {}",
            brightness
        )));
    }
    let factor = contrast_factor(contrast)?;
    let offset = (brightness as f64 - 1.0) * 50.0;
    debug!(factor, offset, "Tone curve computed");

    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let mapped = factor * (v as f64 - 128.0) + 128.0 + offset;
        *out = mapped.round().clamp(0.0, 255.0) as u8;
    }

    buffer
        .raw_mut()
        .par_chunks_exact_mut(CHANNELS)
        .for_each(|px| {
            for c in &mut px[..3] {
                *c = lut[*c as usize];
            }
        });
    Ok(())
}

/// Pixels whose grayscale value exceeds `threshold` become white, the rest
/// black.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn binarize_fixed(buffer: &mut PixelBuffer, threshold: u8) {
    buffer
        .raw_mut()
        .par_chunks_exact_mut(CHANNELS)
        .for_each(|px| {
            let v = if mean_intensity(px) > threshold { 255 } else { 0 };
            px[0] = v;
            px[1] = v;
            px[2] = v;
        });
}
