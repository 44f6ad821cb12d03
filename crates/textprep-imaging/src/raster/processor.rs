// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster boundary and geometry: decode, encode, resample, and rotate pixel
// buffers using the `image` and `imageproc` crates.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use textprep_core::error::{Result, TextprepError};
use tracing::{debug, info, instrument};

use super::buffer::PixelBuffer;

/// Fill for pixels uncovered by a rotation: transparent white, so the canvas
/// edge reads as paper rather than ink.
const ROTATION_FILL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Largest canvas `upscale` will allocate, in pixels (512 MiB of RGBA).
pub const MAX_UPSCALED_PIXELS: u64 = 1 << 27;

impl PixelBuffer {
    // -- Boundary -------------------------------------------------------------

    /// Decode encoded bytes (PNG, JPEG, etc.) into an RGBA buffer.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            TextprepError::DecodeFailure(format!("failed to decode image: {}", err))
        })?;
        let buffer = Self::from_rgba_image(img.into_rgba8());
        buffer.ensure_not_empty()?;
        debug!(
            width = buffer.width(),
            height = buffer.height(),
            "Image decoded from bytes"
        );
        Ok(buffer)
    }

    /// Encode the buffer as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.ensure_not_empty()
            .map_err(|err| TextprepError::EncodeFailure(err.to_string()))?;
        let mut bytes = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut bytes);
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| {
                TextprepError::EncodeFailure(format!("PNG encoding failed: {}", err))
            })?;
        Ok(bytes)
    }

    // -- Geometry (consume self, return new Self) -----------------------------

    /// Resample by `factor` in both directions with Lanczos3 filtering.
    ///
    /// Target dimensions are `round(w * factor) x round(h * factor)`.
    #[instrument(skip(self), fields(from_w = self.width(), from_h = self.height()))]
    pub fn upscale(self, factor: f32) -> Result<Self> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(TextprepError::InvalidConfig(format!(
                "upscale factor must be a finite value >= 1, got {}",
                factor
            )));
        }
        let scaled = |extent: u32| -> Result<u32> {
            let target = (extent as f64 * factor as f64).round();
            if target > u32::MAX as f64 {
                return Err(TextprepError::InvalidConfig(format!(
                    "upscale factor {} overflows a {}px dimension",
                    factor, extent
                )));
            }
            Ok(target as u32)
        };
        let (new_w, new_h) = (scaled(self.width())?, scaled(self.height())?);
        if new_w as u64 * new_h as u64 > MAX_UPSCALED_PIXELS {
            return Err(TextprepError::InvalidConfig(format!(
                "upscaling {}x{} by {} gives {}x{}, over the {} pixel limit",
                self.width(),
                self.height(),
                factor,
                new_w,
                new_h,
                MAX_UPSCALED_PIXELS
            )));
        }
        if new_w == 0 || new_h == 0 {
            return Err(TextprepError::EmptyCanvas {
                width: new_w,
                height: new_h,
            });
        }
        if (new_w, new_h) == self.dimensions() {
            return Ok(self);
        }

        info!(new_w, new_h, factor, "Upscaling image");
        let resized = imageops::resize(&self.image, new_w, new_h, FilterType::Lanczos3);
        Ok(Self::from_rgba_image(resized))
    }

    /// Shrink to fit within `max_side` x `max_side`, preserving aspect ratio.
    /// Buffers that already fit are returned unchanged.
    #[instrument(skip(self))]
    pub fn fit_within(self, max_side: u32) -> Self {
        let (w, h) = self.dimensions();
        let longest = w.max(h);
        if max_side == 0 || longest <= max_side {
            return self;
        }
        let ratio = max_side as f64 / longest as f64;
        let new_w = ((w as f64 * ratio).round() as u32).max(1);
        let new_h = ((h as f64 * ratio).round() as u32).max(1);
        debug!(new_w, new_h, "Downscaling for preview");
        Self::from_rgba_image(imageops::resize(
            &self.image,
            new_w,
            new_h,
            FilterType::Lanczos3,
        ))
    }

    /// Rotate about the centre by `degrees`, positive turning the content
    /// counter-clockwise on screen.
    ///
    /// The canvas keeps its dimensions; corners that fall outside are cut off
    /// and uncovered pixels are filled with transparent white. Nearest-neighbour
    /// sampling keeps a two-valued image two-valued.
    #[instrument(skip(self))]
    pub fn rotate(self, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self;
        }
        info!(degrees, "Rotating image");
        // imageproc turns clockwise for positive angles.
        let rotated = rotate_about_center(
            &self.image,
            -degrees.to_radians(),
            Interpolation::Nearest,
            ROTATION_FILL,
        );
        Self::from_rgba_image(rotated)
    }
}
