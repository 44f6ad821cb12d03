// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convolution operations: 3x3 sharpening and median denoising.
//
// The two filters treat the image edge differently on purpose: sharpening drops
// taps that fall outside the image without renormalising the kernel, while the
// median filter leaves the one-pixel outer ring untouched.

use tracing::instrument;

use crate::raster::PixelBuffer;
use crate::raster::stencil::{self, BorderPolicy};

/// Laplacian sharpening kernel, row-major, centred.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Sharpen with [`SHARPEN_KERNEL`]. Taps outside the image contribute nothing.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn sharpen(buffer: &mut PixelBuffer) {
    stencil::apply(buffer, 1, BorderPolicy::SkipMissingTaps, |window| {
        let mut acc = [0i32; 3];
        for tap in window.taps() {
            let weight = SHARPEN_KERNEL[(tap.dy + 1) as usize][(tap.dx + 1) as usize];
            if weight == 0 {
                continue;
            }
            for (sum, &v) in acc.iter_mut().zip(&tap.rgb) {
                *sum += weight * v as i32;
            }
        }
        acc.map(|v| v.clamp(0, 255) as u8)
    });
}

/// 3x3 median filter per colour channel, interior pixels only.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn denoise_median(buffer: &mut PixelBuffer) {
    stencil::apply(buffer, 1, BorderPolicy::InteriorOnly, |window| {
        let mut samples = [[0u8; 9]; 3];
        for (i, tap) in window.taps().enumerate() {
            for (channel, &v) in samples.iter_mut().zip(&tap.rgb) {
                channel[i] = v;
            }
        }
        samples.map(|mut channel| {
            channel.sort_unstable();
            channel[4]
        })
    });
}
