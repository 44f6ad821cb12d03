// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer: the channel-interleaved RGBA raster every stage reads and
// writes.

use image::{Rgba, RgbaImage};
use textprep_core::error::{Result, TextprepError};

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An RGBA raster owned by exactly one preprocessing run.
///
/// Backed by an `RgbaImage`, so `as_raw().len() == width * height * 4` always
/// holds. Once a run has converted the buffer to grayscale, R == G == B for
/// every pixel; alpha is carried along and never read by any transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub(crate) image: RgbaImage,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw interleaved RGBA bytes.
    ///
    /// Fails with `EmptyCanvas` for a zero dimension and `DecodeFailure` when
    /// the byte count does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TextprepError::EmptyCanvas { width, height });
        }
        let len = data.len();
        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            TextprepError::DecodeFailure(format!(
                "expected {} bytes for a {}x{} RGBA buffer, got {}",
                width as usize * height as usize * CHANNELS,
                width,
                height,
                len
            ))
        })?;
        Ok(Self { image })
    }

    /// Wrap an already-decoded `RgbaImage`.
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// An opaque gray buffer whose intensity at `(x, y)` is `f(x, y)`.
    pub fn from_gray_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Self {
        Self {
            image: RgbaImage::from_fn(width, height, |x, y| {
                let v = f(x, y);
                Rgba([v, v, v, 255])
            }),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Fail with `EmptyCanvas` if either dimension is zero.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(TextprepError::EmptyCanvas {
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Interleaved RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// The RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// The grayscale intensity at `(x, y)`, see [`mean_intensity`].
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        mean_intensity(&self.image.get_pixel(x, y).0)
    }

    /// Grayscale intensities for every pixel, row-major.
    pub fn intensities(&self) -> Vec<u8> {
        self.as_raw()
            .chunks_exact(CHANNELS)
            .map(mean_intensity)
            .collect()
    }

    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba_image(self) -> RgbaImage {
        self.image
    }
}

/// `round((R + G + B) / 3)` for one pixel's channels.
///
/// A third never has a fractional part of exactly one half, so adding one
/// before the integer division rounds to nearest.
#[inline]
pub fn mean_intensity(px: &[u8]) -> u8 {
    ((px[0] as u16 + px[1] as u16 + px[2] as u16 + 1) / 3) as u8
}
