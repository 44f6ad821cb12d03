// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textprep-imaging: Raster preprocessing that makes photographed and scanned
// text easier for an OCR engine to read.
//
// Provides the RGBA pixel buffer and its decode/encode boundary, a shared
// stencil for neighbourhood filters, the individual scan operations
// (grayscale, tone curve, sharpen, median denoise, Otsu and adaptive
// thresholding, morphology, skew estimation), and the pipeline that runs them.

pub mod raster;
pub mod scan;

// Re-export the primary entry points so callers can use `textprep_imaging::Preprocessor` etc.
pub use raster::PixelBuffer;
pub use scan::{
    PipelineReport, PreprocessOutput, Preprocessor, Processed, RecognizedDocument, SideBySide,
    recognize_document, render_preview,
};

#[cfg(feature = "ocr")]
pub use scan::{OcrConfig, OcrsRecognizer};
