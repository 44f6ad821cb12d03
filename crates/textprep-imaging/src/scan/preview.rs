// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Down-scaled previews of the original and processed image for side-by-side
// display. Previews never feed back into the pipeline.

use image::{Rgba, RgbaImage, imageops};
use textprep_core::error::Result;
use tracing::instrument;

use super::pipeline::{PipelineReport, Preprocessor};
use crate::raster::PixelBuffer;

/// Longest side used by hosts that do not pick their own preview size.
pub const DEFAULT_PREVIEW_SIDE: u32 = 512;

/// Blank columns between the two panels of a composed preview.
const PANEL_GAP: u32 = 8;

/// PNG previews of one input before and after preprocessing.
#[derive(Debug, Clone)]
pub struct SideBySide {
    pub original: Vec<u8>,
    pub processed: Vec<u8>,
    pub report: PipelineReport,
}

impl SideBySide {
    /// Both previews on one white canvas as PNG, original on the left.
    pub fn compose(&self) -> Result<Vec<u8>> {
        let left = PixelBuffer::decode(&self.original)?;
        let right = PixelBuffer::decode(&self.processed)?;
        let width = left.width() + PANEL_GAP + right.width();
        let height = left.height().max(right.height());

        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        imageops::replace(&mut canvas, left.as_rgba_image(), 0, 0);
        imageops::replace(
            &mut canvas,
            right.as_rgba_image(),
            (left.width() + PANEL_GAP) as i64,
            0,
        );
        PixelBuffer::from_rgba_image(canvas).encode_png()
    }
}

/// Decode `data` and encode an unmodified copy that fits within
/// `max_side` x `max_side`.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn render_preview(data: &[u8], max_side: u32) -> Result<Vec<u8>> {
    PixelBuffer::decode(data)?.fit_within(max_side).encode_png()
}

impl Preprocessor {
    /// Render the original and the fully processed image at preview size.
    ///
    /// The input is decoded twice, once per side.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn side_by_side(&self, data: &[u8], max_side: u32) -> Result<SideBySide> {
        let original = render_preview(data, max_side)?;
        let processed = self.run(PixelBuffer::decode(data)?)?;
        Ok(SideBySide {
            original,
            processed: processed.image.fit_within(max_side).encode_png()?,
            report: processed.report,
        })
    }
}
