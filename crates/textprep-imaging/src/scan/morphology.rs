// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale morphology with a square structuring element.
//
// - Dilation: maximum over the window, grows bright regions
// - Erosion: minimum over the window, shrinks bright regions
// - Opening: erosion then dilation, removes small bright specks
// - Closing: dilation then erosion, fills small dark gaps

use textprep_core::error::{Result, TextprepError};
use tracing::instrument;

use crate::raster::PixelBuffer;
use crate::raster::stencil::{self, BorderPolicy};

/// Window radius for a kernel side; even sides round down.
fn radius_for(kernel_size: u32) -> Result<u32> {
    if kernel_size == 0 {
        return Err(TextprepError::InvalidConfig(
            "morphology kernel size must be at least 1".into(),
        ));
    }
    Ok(kernel_size / 2)
}

/// Replace each channel value with the maximum in its window. Neighbours
/// outside the image are ignored.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn dilate(buffer: &mut PixelBuffer, kernel_size: u32) -> Result<()> {
    let radius = radius_for(kernel_size)?;
    stencil::apply(buffer, radius, BorderPolicy::SkipMissingTaps, |window| {
        window.fold_channels(u8::MIN, u8::max)
    });
    Ok(())
}

/// Replace each channel value with the minimum in its window. Neighbours
/// outside the image are ignored.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn erode(buffer: &mut PixelBuffer, kernel_size: u32) -> Result<()> {
    let radius = radius_for(kernel_size)?;
    stencil::apply(buffer, radius, BorderPolicy::SkipMissingTaps, |window| {
        window.fold_channels(u8::MAX, u8::min)
    });
    Ok(())
}

/// `erode(dilate(buffer))`: reconnects broken strokes and fills small gaps.
pub fn close(buffer: &mut PixelBuffer, kernel_size: u32) -> Result<()> {
    dilate(buffer, kernel_size)?;
    erode(buffer, kernel_size)
}

/// `dilate(erode(buffer))`.
pub fn open(buffer: &mut PixelBuffer, kernel_size: u32) -> Result<()> {
    erode(buffer, kernel_size)?;
    dilate(buffer, kernel_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speckled() -> PixelBuffer {
        PixelBuffer::from_gray_fn(12, 9, |x, y| if (x * 5 + y * 3) % 7 < 3 { 0 } else { 255 })
    }

    #[test]
    fn dilate_expands_bright_pixel() {
        let mut buf = PixelBuffer::from_gray_fn(5, 5, |x, y| if (x, y) == (2, 2) { 255 } else { 0 });
        dilate(&mut buf, 3).unwrap();
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3), (1, 1), (3, 3)] {
            assert_eq!(buf.pixel(x, y)[0], 255);
        }
        assert_eq!(buf.pixel(0, 0)[0], 0);
    }

    #[test]
    fn erode_expands_dark_pixel() {
        let mut buf = PixelBuffer::from_gray_fn(5, 5, |x, y| if (x, y) == (2, 2) { 0 } else { 255 });
        erode(&mut buf, 3).unwrap();
        assert_eq!(buf.pixel(1, 1)[0], 0);
        assert_eq!(buf.pixel(4, 4)[0], 255);
    }

    #[test]
    fn kernel_size_one_is_identity() {
        let mut buf = speckled();
        let before = buf.clone();
        dilate(&mut buf, 1).unwrap();
        erode(&mut buf, 1).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn even_kernel_uses_floor_radius() {
        let mut two = PixelBuffer::from_gray_fn(7, 7, |x, y| if (x, y) == (3, 3) { 255 } else { 0 });
        let mut three = two.clone();
        dilate(&mut two, 2).unwrap();
        dilate(&mut three, 3).unwrap();
        assert_eq!(two, three);
    }

    #[test]
    fn zero_kernel_is_rejected() {
        let mut buf = speckled();
        assert!(dilate(&mut buf, 0).is_err());
    }

    #[test]
    fn closing_fills_one_pixel_gap() {
        // White row with a single black hole.
        let mut buf = PixelBuffer::from_gray_fn(7, 3, |x, y| if (x, y) == (3, 1) { 0 } else { 255 });
        close(&mut buf, 3).unwrap();
        assert_eq!(buf.pixel(3, 1)[0], 255);
    }

    #[test]
    fn closing_white_image_stays_white() {
        let mut buf = PixelBuffer::filled(9, 6, [255, 255, 255, 255]);
        close(&mut buf, 5).unwrap();
        assert!(buf.as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn closing_never_darker_than_plain_erosion() {
        for k in 1..=5 {
            let mut closed = speckled();
            close(&mut closed, k).unwrap();
            let mut eroded = speckled();
            erode(&mut eroded, k).unwrap();
            for (c, e) in closed.as_raw().iter().zip(eroded.as_raw()) {
                assert!(c >= e, "kernel {k}: closing {c} < erosion {e}");
            }
        }
    }

    #[test]
    fn opening_removes_isolated_speck() {
        let mut buf = PixelBuffer::from_gray_fn(7, 7, |x, y| if (x, y) == (3, 3) { 255 } else { 0 });
        open(&mut buf, 3).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px[0] == 0));
    }
}
