// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition backed by `ocrs`, a pure-Rust OCR engine running neural
// network models through `rten`.
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// textprep-imaging = { path = "crates/textprep-imaging", features = ["ocr"] }
// ```
//
// # Model Setup
//
// Two model files are required:
//
// - `text-detection.rten` locates text regions.
// - `text-recognition.rten` decodes characters in each region.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where the default config looks.
//
// The engine must be built in release mode; debug builds of `ocrs` and `rten`
// are orders of magnitude slower.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use textprep_core::error::{Result, TextprepError};
use textprep_core::{RecognitionOptions, TextRecognizer};
use tracing::{debug, info, instrument, warn};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Language the bundled models were trained on.
const SUPPORTED_LANGUAGE: &str = "eng";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where to find the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Both models inside `dir`, under their well-known filenames.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn from_paths(
        detection_model: impl Into<PathBuf>,
        recognition_model: impl Into<PathBuf>,
    ) -> Self {
        Self {
            detection_model_path: detection_model.into(),
            recognition_model_path: recognition_model.into(),
        }
    }

    /// Fail with `Recognition` unless both model files exist.
    pub fn validate(&self) -> Result<()> {
        for (role, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(TextprepError::Recognition(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download models",
                    role,
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Whether both model files are present.
    pub fn models_available(&self) -> bool {
        self.validate().is_ok()
    }
}

fn load_model(role: &str, path: &Path) -> Result<Model> {
    info!(role, path = %path.display(), "Loading OCR model");
    Model::load_file(path).map_err(|err| {
        TextprepError::Recognition(format!(
            "failed to load {} model from {}: {}",
            role,
            path.display(),
            err
        ))
    })
}

/// [`TextRecognizer`] backed by the `ocrs` engine.
///
/// Model loading is the expensive step; build one recognizer and reuse it.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;
        let detection_model = load_model("detection", &config.detection_model_path)?;
        let recognition_model = load_model("recognition", &config.recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            TextprepError::Recognition(format!("failed to initialise OCR engine: {}", err))
        })?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    /// Load models from the default cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrConfig::default())
    }

    pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(OcrConfig::from_dir(dir))
    }
}

impl TextRecognizer for OcrsRecognizer {
    #[instrument(skip_all, fields(encoded_len = encoded.len(), language = %options.language))]
    fn recognize(&self, encoded: &[u8], options: &RecognitionOptions) -> Result<String> {
        if options.language != SUPPORTED_LANGUAGE {
            warn!(
                requested = %options.language,
                "ocrs models only cover Latin script; recognizing anyway"
            );
        }
        debug!(
            page_seg_mode = options.page_seg_mode.code(),
            engine_mode = options.engine_mode.code(),
            "Layout and engine modes are decided by ocrs itself"
        );

        let rgb = image::load_from_memory(encoded)
            .map_err(|err| TextprepError::DecodeFailure(format!("failed to decode image: {}", err)))?
            .into_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            TextprepError::Recognition(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| TextprepError::Recognition(format!("OCR preprocessing failed: {}", err)))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| TextprepError::Recognition(format!("OCR text recognition failed: {}", err)))?;

        debug!(lines = text.lines().count(), chars = text.len(), "OCR complete");
        Ok(text)
    }
}
