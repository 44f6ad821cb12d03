// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew estimation by projection-profile variance.
//
// Text lines of a level binarized page project onto a few narrow row bands,
// which gives the row histogram a high variance. A skewed page smears the same
// ink across many rows. Each candidate angle shears the row index of every ink
// pixel and keeps the angle whose histogram is most peaked.

use rayon::prelude::*;
use textprep_core::SkewResult;
use tracing::{debug, instrument};

use crate::raster::PixelBuffer;

/// Most negative candidate angle, in degrees.
pub const MIN_ANGLE_DEGREES: f32 = -15.0;
/// Most positive candidate angle, in degrees.
pub const MAX_ANGLE_DEGREES: f32 = 15.0;
/// Spacing between candidates, in degrees.
pub const ANGLE_STEP_DEGREES: f32 = 0.5;

/// Candidate angles in ascending order.
pub fn candidate_angles() -> impl Iterator<Item = f32> {
    let steps = ((MAX_ANGLE_DEGREES - MIN_ANGLE_DEGREES) / ANGLE_STEP_DEGREES).round() as u32;
    (0..=steps).map(|i| MIN_ANGLE_DEGREES + i as f32 * ANGLE_STEP_DEGREES)
}

/// Coordinates of every pixel whose grayscale value is exactly 0.
fn ink_pixels(buffer: &PixelBuffer) -> Vec<(u32, u32)> {
    let width = buffer.width();
    buffer
        .intensities()
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v == 0)
        .map(|(i, _)| ((i as u32) % width, (i as u32) / width))
        .collect()
}

/// Population variance of the row histogram after shearing each ink pixel's
/// row to `round(y + x * tan(angle))`. Rows sheared off the canvas are
/// dropped.
pub fn projection_variance(ink: &[(u32, u32)], height: u32, angle_degrees: f32) -> f64 {
    if height == 0 {
        return 0.0;
    }
    let slope = (angle_degrees as f64).to_radians().tan();
    let mut rows = vec![0u64; height as usize];
    for &(x, y) in ink {
        let row = (y as f64 + x as f64 * slope).round();
        if row >= 0.0 && row < height as f64 {
            rows[row as usize] += 1;
        }
    }

    let n = height as f64;
    let mean = rows.iter().sum::<u64>() as f64 / n;
    rows.iter()
        .map(|&count| (count as f64 - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Estimate the text skew of a binarized buffer.
///
/// Ties go to the first (most negative) candidate. A buffer without any ink
/// reports 0 degrees.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn detect_skew_angle(buffer: &PixelBuffer) -> SkewResult {
    let ink = ink_pixels(buffer);
    if ink.is_empty() {
        debug!("No ink pixels; assuming level text");
        return SkewResult { angle_degrees: 0.0 };
    }
    let height = buffer.height();

    let scores: Vec<(f32, f64)> = candidate_angles()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|angle| (angle, projection_variance(&ink, height, angle)))
        .collect();

    let mut best = scores[0];
    for &(angle, variance) in &scores[1..] {
        if variance > best.1 {
            best = (angle, variance);
        }
    }

    debug!(
        angle = best.0,
        variance = best.1,
        ink_pixels = ink.len(),
        "Skew angle detected"
    );
    SkewResult {
        angle_degrees: best.0,
    }
}
