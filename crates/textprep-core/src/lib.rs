// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textprep: Core types, configuration, and error definitions shared by the
// imaging pipeline and its hosts.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod recognize;
pub mod types;

pub use config::{BinarizeMode, Binarization, PreprocessConfig, Settings};
pub use error::{ErrorKind, TextprepError};
pub use recognize::{EngineMode, PageSegMode, RecognitionOptions, TextRecognizer};
pub use types::*;
