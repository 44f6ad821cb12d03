// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text-recognition boundary. The preprocessor hands an encoded image to a
// recognizer and passes the returned text through untouched.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How the recognizer should segment the page.
///
/// Numbering follows the Tesseract page segmentation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageSegMode {
    /// Fully automatic page segmentation (3).
    Auto,
    /// A single uniform block of text (6).
    SingleBlock,
    /// A single text line (7).
    SingleLine,
    /// A single word (8).
    SingleWord,
    /// Find as much text as possible in no particular order (11).
    SparseText,
}

impl PageSegMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleBlock => 6,
            Self::SingleLine => 7,
            Self::SingleWord => 8,
            Self::SparseText => 11,
        }
    }
}

/// Which recognition engine variant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineMode {
    Legacy,
    NeuralNet,
    Combined,
    Default,
}

impl EngineMode {
    pub fn code(self) -> u8 {
        match self {
            Self::Legacy => 0,
            Self::NeuralNet => 1,
            Self::Combined => 2,
            Self::Default => 3,
        }
    }
}

/// Options forwarded verbatim to the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecognitionOptions {
    /// Language code, e.g. `eng`.
    pub language: String,
    pub page_seg_mode: PageSegMode,
    pub engine_mode: EngineMode,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: "eng".into(),
            page_seg_mode: PageSegMode::Auto,
            engine_mode: EngineMode::Default,
        }
    }
}

/// An engine that turns an encoded image into text.
///
/// Implementations must not retry internally; retry policy belongs to the host.
pub trait TextRecognizer {
    /// Recognize the text in `image` (encoded bytes, e.g. PNG).
    fn recognize(&self, image: &[u8], options: &RecognitionOptions) -> Result<String>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for &R {
    fn recognize(&self, image: &[u8], options: &RecognitionOptions) -> Result<String> {
        (**self).recognize(image, options)
    }
}
