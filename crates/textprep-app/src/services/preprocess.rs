// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing service: reads images, runs the pipeline off the async
// runtime, and writes results back out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use textprep_core::error::{Result, TextprepError};
use textprep_core::{RecognitionOptions, Settings};
use textprep_imaging::{PipelineReport, Preprocessor};
use tracing::{debug, info, instrument};

/// A validated pipeline plus the recognition options it was stored with.
///
/// Cheap to clone; the preprocessor is shared with blocking tasks.
#[derive(Clone)]
pub struct PreprocessService {
    recognition: RecognitionOptions,
    preprocessor: Arc<Preprocessor>,
}

/// Run CPU-bound work on the blocking pool and flatten the join error.
async fn blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| TextprepError::Io(std::io::Error::other(format!("worker task failed: {err}"))))?
}

impl PreprocessService {
    pub fn new(settings: Settings) -> Result<Self> {
        let preprocessor = Preprocessor::new(settings.preprocessing)?;
        Ok(Self {
            recognition: settings.recognition,
            preprocessor: Arc::new(preprocessor),
        })
    }

    /// Preprocess `input` and write the PNG result to `output`.
    #[instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    pub async fn process_file(&self, input: &Path, output: &Path) -> Result<PipelineReport> {
        let data = tokio::fs::read(input).await?;
        debug!(bytes = data.len(), "Input read");

        let preprocessor = Arc::clone(&self.preprocessor);
        let result = blocking(move || preprocessor.process_bytes(&data)).await?;

        tokio::fs::write(output, &result.png).await?;
        info!(
            width = result.report.final_dimensions.0,
            height = result.report.final_dimensions.1,
            "Processed image written"
        );
        Ok(result.report)
    }

    /// Write a composed original | processed preview of `input` to `preview`.
    #[instrument(skip(self), fields(input = %input.display(), preview = %preview.display()))]
    pub async fn write_preview(&self, input: &Path, preview: &Path, max_side: u32) -> Result<()> {
        let data = tokio::fs::read(input).await?;
        let preprocessor = Arc::clone(&self.preprocessor);
        let composed = blocking(move || preprocessor.side_by_side(&data, max_side)?.compose()).await?;
        tokio::fs::write(preview, composed).await?;
        info!("Preview written");
        Ok(())
    }

    /// Preprocess `input` and recognize its text with the `ocrs` engine.
    ///
    /// Models come from `models` or the default cache directory.
    #[cfg(feature = "ocr")]
    #[instrument(skip(self), fields(input = %input.display()))]
    pub async fn recognize_file(&self, input: &Path, models: Option<PathBuf>) -> Result<String> {
        use textprep_imaging::{OcrConfig, OcrsRecognizer, recognize_document};

        let data = tokio::fs::read(input).await?;
        let preprocessor = Arc::clone(&self.preprocessor);
        let options = self.recognition.clone();
        blocking(move || {
            let config = models.map(OcrConfig::from_dir).unwrap_or_default();
            let recognizer = OcrsRecognizer::new(config)?;
            let document = recognize_document(&data, &preprocessor, &recognizer, &options)?;
            Ok(document.text)
        })
        .await
    }

    #[cfg(not(feature = "ocr"))]
    pub async fn recognize_file(&self, input: &Path, _models: Option<PathBuf>) -> Result<String> {
        tracing::warn!(
            input = %input.display(),
            language = %self.recognition.language,
            "Recognition requested without an OCR engine"
        );
        Err(TextprepError::Recognition(
            "this build has no OCR engine; rebuild with `--features ocr`".into(),
        ))
    }
}
