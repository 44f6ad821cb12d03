// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan preprocessing: pixel transforms, threshold selection, morphology, skew
// correction, and the pipeline that orders them. Text recognition sits behind
// the `ocr` feature.

pub mod convolve;
pub mod morphology;
pub mod pipeline;
pub mod point;
pub mod preview;
pub mod skew;
pub mod threshold;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use pipeline::{
    PipelineReport, PreprocessOutput, Preprocessor, Processed, RecognizedDocument,
    recognize_document,
};
pub use preview::{DEFAULT_PREVIEW_SIDE, SideBySide, render_preview};
pub use skew::detect_skew_angle;
pub use threshold::IntegralImage;

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrsRecognizer};
