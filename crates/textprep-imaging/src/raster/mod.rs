// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module: the RGBA pixel buffer, its encode/decode boundary, geometry,
// and the shared stencil machinery for neighbourhood filters.

pub mod buffer;
pub mod processor;
pub mod stencil;

pub use buffer::{CHANNELS, PixelBuffer, mean_intensity};
pub use stencil::{BorderPolicy, Tap, Window};
