// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Threshold selection: Otsu's global threshold and Bradley-style adaptive
// thresholding over an integral image.

use rayon::prelude::*;
use textprep_core::error::{Result, TextprepError};
use tracing::{debug, instrument};

use crate::raster::{CHANNELS, PixelBuffer};

/// A pixel is white under adaptive thresholding when it is brighter than this
/// fraction of its window mean.
pub const ADAPTIVE_MEAN_RATIO: f64 = 0.85;

// -- Otsu ---------------------------------------------------------------------

/// 256-bin histogram of grayscale intensities.
pub fn histogram(buffer: &PixelBuffer) -> [u32; 256] {
    let mut bins = [0u32; 256];
    for v in buffer.intensities() {
        bins[v as usize] += 1;
    }
    bins
}

/// Otsu's threshold for `buffer`: values above it are foreground (white).
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn otsu_threshold(buffer: &PixelBuffer) -> u8 {
    let threshold = otsu_threshold_from_histogram(&histogram(buffer));
    debug!(threshold, "Otsu threshold computed");
    threshold
}

/// Threshold maximising the between-class variance `wB * wF * (mB - mF)^2`.
///
/// Candidates are visited in ascending order and only a strictly larger
/// variance replaces the current best, so ties keep the lowest threshold. An
/// empty or single-valued histogram yields 0.
pub fn otsu_threshold_from_histogram(histogram: &[u32; 256]) -> u8 {
    let total: u64 = histogram.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }
    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut weight_background: u64 = 0;
    let mut sum_background: f64 = 0.0;
    let mut max_variance: f64 = 0.0;
    let mut best_threshold: u8 = 0;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count as u64;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

// -- Integral image -----------------------------------------------------------

/// Row-major summed-area table of grayscale intensity.
///
/// `sums[y * width + x]` holds the sum over the inclusive rectangle
/// `(0, 0)..=(x, y)`. Lives only as long as one adaptive thresholding call.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    sums: Vec<u64>,
}

impl IntegralImage {
    /// Build from row-major intensities of a `width x height` image.
    pub fn from_intensities(intensities: &[u8], width: u32, height: u32) -> Self {
        let w = width as usize;
        let mut sums = vec![0u64; w * height as usize];
        for y in 0..height as usize {
            let mut row_sum: u64 = 0;
            for x in 0..w {
                row_sum += intensities[y * w + x] as u64;
                let above = if y > 0 { sums[(y - 1) * w + x] } else { 0 };
                sums[y * w + x] = row_sum + above;
            }
        }
        Self {
            width,
            height,
            sums,
        }
    }

    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        Self::from_intensities(&buffer.intensities(), buffer.width(), buffer.height())
    }

    fn at(&self, x: u32, y: u32) -> u64 {
        self.sums[y as usize * self.width as usize + x as usize]
    }

    /// Sum over the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn rect_sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        let total = self.at(x1, y1);
        let left = if x0 > 0 { self.at(x0 - 1, y1) } else { 0 };
        let top = if y0 > 0 { self.at(x1, y0 - 1) } else { 0 };
        let corner = if x0 > 0 && y0 > 0 {
            self.at(x0 - 1, y0 - 1)
        } else {
            0
        };
        (total + corner) - left - top
    }

    /// Mean intensity of the square window of half-width `half` centred on
    /// `(x, y)`, clamped to the image. Edge windows are smaller and their
    /// pixel count comes from the clamped rectangle.
    pub fn window_mean(&self, x: u32, y: u32, half: u32) -> f64 {
        let x0 = x.saturating_sub(half);
        let y0 = y.saturating_sub(half);
        let x1 = x.saturating_add(half).min(self.width - 1);
        let y1 = y.saturating_add(half).min(self.height - 1);
        // The window always contains (x, y) itself, so the count is never 0.
        let count = (x1 - x0 + 1) as u64 * (y1 - y0 + 1) as u64;
        self.rect_sum(x0, y0, x1, y1) as f64 / count as f64
    }
}

// -- Adaptive -----------------------------------------------------------------

/// Binarize each pixel against `0.85 *` the mean of its `window_size` square
/// window. `window_size` must be odd.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn adaptive_threshold(buffer: &mut PixelBuffer, window_size: u32) -> Result<()> {
    if window_size == 0 || window_size % 2 == 0 {
        return Err(TextprepError::InvalidConfig(format!(
            "adaptive window size must be odd, got {}",
            window_size
        )));
    }
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Ok(());
    }

    let intensities = buffer.intensities();
    let integral = IntegralImage::from_intensities(&intensities, width, height);
    let half = window_size / 2;
    let row_len = width as usize * CHANNELS;

    buffer
        .raw_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let value = intensities[y * width as usize + x as usize];
                let local = ADAPTIVE_MEAN_RATIO * integral.window_mean(x, y as u32, half);
                let v = if value as f64 > local { 255 } else { 0 };
                let i = x as usize * CHANNELS;
                row[i..i + 3].fill(v);
            }
        });

    debug!(window_size, "Adaptive thresholding complete");
    Ok(())
}
