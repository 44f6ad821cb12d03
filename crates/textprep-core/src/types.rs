// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared between the pipeline and its hosts.

use serde::{Deserialize, Serialize};

/// Outcome of skew estimation, consumed immediately by rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkewResult {
    /// Estimated text baseline angle. Positive means the lines rise to the
    /// right on screen.
    pub angle_degrees: f32,
}

impl SkewResult {
    /// Rotations this small are skipped to avoid resampling blur.
    pub const MIN_CORRECTION_DEGREES: f32 = 0.5;

    /// Whether the angle is large enough to be worth correcting.
    pub fn needs_correction(&self) -> bool {
        self.angle_degrees.abs() > Self::MIN_CORRECTION_DEGREES
    }
}

/// Stages of a preprocessing run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Upscale,
    Grayscale,
    ToneAdjust,
    Sharpen,
    Denoise,
    Binarize,
    MorphClose,
    Deskew,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Upscale => "upscale",
            Self::Grayscale => "grayscale",
            Self::ToneAdjust => "contrast/brightness",
            Self::Sharpen => "sharpen",
            Self::Denoise => "denoise",
            Self::Binarize => "binarize",
            Self::MorphClose => "morphological close",
            Self::Deskew => "deskew",
        };
        f.write_str(name)
    }
}
