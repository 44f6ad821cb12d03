// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing pipeline: runs the enabled stages in their fixed order over an
// owned pixel buffer and reports what happened.
//
// Order: upscale, then (behind the `preprocess` master switch) grayscale,
// contrast/brightness, sharpen, denoise, binarize, morphological close, deskew.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use textprep_core::error::Result;
use textprep_core::{
    Binarization, PreprocessConfig, RecognitionOptions, SkewResult, Stage, TextRecognizer,
};
use tracing::{debug, info, instrument, warn};

use crate::raster::PixelBuffer;
use crate::scan::{convolve, morphology, point, skew, threshold};

/// What a pipeline run did, in the order it did it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Stages that actually ran.
    pub stages: Vec<Stage>,
    /// Global threshold used by fixed or Otsu binarization.
    pub threshold: Option<u8>,
    /// Detected skew, when deskewing was enabled.
    pub skew: Option<SkewResult>,
    /// Whether the deskew stage rotated the canvas.
    pub rotated: bool,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
    pub processing_time_ms: u64,
}

impl PipelineReport {
    fn new(original_dimensions: (u32, u32)) -> Self {
        Self {
            stages: Vec::new(),
            threshold: None,
            skew: None,
            rotated: false,
            original_dimensions,
            final_dimensions: original_dimensions,
            processing_time_ms: 0,
        }
    }

    fn record(&mut self, stage: Stage) {
        debug!(%stage, "Stage applied");
        self.stages.push(stage);
    }

    /// Whether `stage` ran.
    pub fn ran(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

/// A processed buffer and its report.
#[derive(Debug, Clone)]
pub struct Processed {
    pub image: PixelBuffer,
    pub report: PipelineReport,
}

/// Result of the byte-level entry point.
#[derive(Debug, Clone)]
pub struct PreprocessOutput {
    pub image: PixelBuffer,
    /// PNG encoding of `image`, ready for a recognizer or a preview.
    pub png: Vec<u8>,
    pub report: PipelineReport,
}

/// Recognized text together with the preprocessing output it was read from.
#[derive(Debug, Clone)]
pub struct RecognizedDocument {
    pub text: String,
    pub output: PreprocessOutput,
}

/// Runs a validated [`PreprocessConfig`] over pixel buffers.
///
/// Holds no state between runs; one preprocessor can serve many images.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Validate `config` and build a preprocessor around it.
    pub fn new(config: PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Run every enabled stage over `buffer`.
    ///
    /// Any stage failure aborts the run and drops the partial buffer.
    #[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
    pub fn run(&self, buffer: PixelBuffer) -> Result<Processed> {
        let started = Instant::now();
        let config = &self.config;
        let mut report = PipelineReport::new(buffer.dimensions());
        let mut buffer = buffer;

        if config.upscale {
            buffer = buffer.upscale(config.upscale_factor)?;
            report.record(Stage::Upscale);
        }
        buffer.ensure_not_empty()?;

        if config.preprocess {
            buffer = self.apply_stages(buffer, &mut report)?;
        } else {
            debug!("Preprocessing disabled; only geometry applied");
        }

        report.final_dimensions = buffer.dimensions();
        report.processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            stages = report.stages.len(),
            final_w = report.final_dimensions.0,
            final_h = report.final_dimensions.1,
            elapsed_ms = report.processing_time_ms,
            "Preprocessing complete"
        );
        Ok(Processed {
            image: buffer,
            report,
        })
    }

    fn apply_stages(
        &self,
        mut buffer: PixelBuffer,
        report: &mut PipelineReport,
    ) -> Result<PixelBuffer> {
        let config = &self.config;

        if config.grayscale {
            point::to_grayscale(&mut buffer);
            report.record(Stage::Grayscale);
        }

        if config.is_tone_neutral() {
            debug!("Contrast and brightness neutral; skipping tone adjustment");
        } else {
            point::adjust_contrast_brightness(&mut buffer, config.contrast, config.brightness)?;
            report.record(Stage::ToneAdjust);
        }

        if config.sharpen {
            convolve::sharpen(&mut buffer);
            report.record(Stage::Sharpen);
        }

        if config.denoise {
            convolve::denoise_median(&mut buffer);
            report.record(Stage::Denoise);
        }

        if let Some(mode) = config.binarization() {
            match mode {
                Binarization::Fixed(t) => {
                    point::binarize_fixed(&mut buffer, t);
                    report.threshold = Some(t);
                }
                Binarization::Otsu => {
                    let t = threshold::otsu_threshold(&buffer);
                    point::binarize_fixed(&mut buffer, t);
                    report.threshold = Some(t);
                }
                Binarization::Adaptive(window) => {
                    threshold::adaptive_threshold(&mut buffer, window)?;
                }
            }
            report.record(Stage::Binarize);
        }

        if config.morphological_ops {
            morphology::close(&mut buffer, config.morph_kernel_size)?;
            report.record(Stage::MorphClose);
        }

        if config.deskew {
            if !config.binarize {
                warn!("Deskew enabled without binarization; only pure black pixels count as ink");
            }
            let detected = skew::detect_skew_angle(&buffer);
            if detected.needs_correction() {
                // Binarization and closing have committed their pixels; the
                // rotation reads them and replaces the canvas.
                buffer = buffer.rotate(-detected.angle_degrees);
                report.rotated = true;
            }
            report.skew = Some(detected);
            report.record(Stage::Deskew);
        }

        Ok(buffer)
    }

    /// Decode `data`, run the pipeline, and encode the result as PNG.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn process_bytes(&self, data: &[u8]) -> Result<PreprocessOutput> {
        let decoded = PixelBuffer::decode(data)?;
        let Processed { image, report } = self.run(decoded)?;
        let png = image.encode_png()?;
        debug!(png_len = png.len(), "Processed image encoded");
        Ok(PreprocessOutput { image, png, report })
    }
}

/// Preprocess `data` and hand the encoded result to `recognizer`.
///
/// The recognized text is returned exactly as the recognizer produced it.
#[instrument(skip_all, fields(data_len = data.len(), language = %options.language))]
pub fn recognize_document<R>(
    data: &[u8],
    preprocessor: &Preprocessor,
    recognizer: &R,
    options: &RecognitionOptions,
) -> Result<RecognizedDocument>
where
    R: TextRecognizer + ?Sized,
{
    let output = preprocessor.process_bytes(data)?;
    let text = recognizer.recognize(&output.png, options)?;
    info!(chars = text.len(), "Text recognized");
    Ok(RecognizedDocument { text, output })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use textprep_core::{BinarizeMode, ErrorKind, TextprepError};

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_gray_fn(width, height, |x, _| (x * 255 / (width - 1)) as u8)
    }

    fn bare_config() -> PreprocessConfig {
        PreprocessConfig {
            upscale: false,
            grayscale: false,
            binarize: false,
            ..PreprocessConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = PreprocessConfig {
            adaptive_window_size: 16,
            ..PreprocessConfig::default()
        };
        let err = Preprocessor::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn huge_upscale_factor_is_rejected_before_running() {
        let config = PreprocessConfig {
            upscale_factor: 1e5,
            ..PreprocessConfig::default()
        };
        let err = Preprocessor::new(config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn empty_canvas_aborts_the_run() {
        let upscaling = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let err = upscaling
            .run(PixelBuffer::filled(0, 5, [255, 255, 255, 255]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyCanvas);

        let plain = Preprocessor::new(bare_config()).unwrap();
        let err = plain
            .run(PixelBuffer::filled(5, 0, [255, 255, 255, 255]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyCanvas);
    }

    #[test]
    fn tone_stage_is_skipped_only_at_exact_neutral() {
        let row = || PixelBuffer::from_gray_fn(3, 1, |x, _| [100, 128, 160][x as usize]);
        let values = |buffer: &PixelBuffer| (0..3).map(|x| buffer.pixel(x, 0)[0]).collect::<Vec<_>>();

        let neutral = Preprocessor::new(bare_config()).unwrap().run(row()).unwrap();
        assert!(!neutral.report.ran(Stage::ToneAdjust));
        assert_eq!(values(&neutral.image), vec![100, 128, 160]);

        let nudged = PreprocessConfig {
            brightness: 1.01,
            ..bare_config()
        };
        let nudged = Preprocessor::new(nudged).unwrap().run(row()).unwrap();
        assert!(nudged.report.ran(Stage::ToneAdjust));
        assert_eq!(values(&nudged.image), vec![65, 128, 201]);
    }

    #[test]
    fn all_stages_off_leaves_pixels_alone() {
        let input = gradient(30, 10);
        let processed = Preprocessor::new(bare_config()).unwrap().run(input.clone()).unwrap();
        assert_eq!(processed.image, input);
        assert!(processed.report.stages.is_empty());
    }

    #[test]
    fn master_switch_skips_everything_but_upscale() {
        let config = PreprocessConfig {
            preprocess: false,
            upscale: true,
            upscale_factor: 2.0,
            ..PreprocessConfig::default()
        };
        let processed = Preprocessor::new(config).unwrap().run(gradient(20, 8)).unwrap();
        assert_eq!(processed.report.stages, vec![Stage::Upscale]);
        assert_eq!(processed.image.dimensions(), (40, 16));
        assert_eq!(processed.report.original_dimensions, (20, 8));
        assert_eq!(processed.report.final_dimensions, (40, 16));
    }

    #[test]
    fn stages_are_reported_in_order() {
        let config = PreprocessConfig {
            upscale: true,
            upscale_factor: 1.5,
            contrast: 1.2,
            sharpen: true,
            denoise: true,
            morphological_ops: true,
            deskew: true,
            ..PreprocessConfig::default()
        };
        let processed = Preprocessor::new(config).unwrap().run(gradient(40, 20)).unwrap();
        assert_eq!(
            processed.report.stages,
            vec![
                Stage::Upscale,
                Stage::Grayscale,
                Stage::ToneAdjust,
                Stage::Sharpen,
                Stage::Denoise,
                Stage::Binarize,
                Stage::MorphClose,
                Stage::Deskew,
            ]
        );
        assert!(processed.report.skew.is_some());
    }

    #[test]
    fn fixed_mode_reports_its_threshold() {
        let config = PreprocessConfig {
            binarize: true,
            binarize_mode: BinarizeMode::Fixed,
            binarize_threshold: 90,
            ..bare_config()
        };
        let processed = Preprocessor::new(config).unwrap().run(gradient(50, 4)).unwrap();
        assert_eq!(processed.report.threshold, Some(90));
        assert!(processed.image.intensities().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn adaptive_mode_has_no_global_threshold() {
        let config = PreprocessConfig {
            binarize: true,
            binarize_mode: BinarizeMode::Adaptive,
            adaptive_window_size: 7,
            ..bare_config()
        };
        let processed = Preprocessor::new(config).unwrap().run(gradient(50, 12)).unwrap();
        assert!(processed.report.ran(Stage::Binarize));
        assert_eq!(processed.report.threshold, None);
    }

    #[test]
    fn skewed_page_is_rotated_back() {
        // Black lines rising to the right by 5 degrees on white paper.
        let slope = 5.0f64.to_radians().tan();
        let page = PixelBuffer::from_gray_fn(200, 120, |x, y| {
            let level = (y as f64 + x as f64 * slope).round() as i64;
            if level >= 0 && level % 15 < 3 { 0 } else { 255 }
        });
        let config = PreprocessConfig {
            binarize: true,
            binarize_mode: BinarizeMode::Fixed,
            binarize_threshold: 128,
            deskew: true,
            ..bare_config()
        };
        let processed = Preprocessor::new(config).unwrap().run(page).unwrap();
        let skew = processed.report.skew.unwrap();
        assert!((skew.angle_degrees - 5.0).abs() <= 0.5);
        assert!(processed.report.rotated);
        assert_eq!(processed.image.dimensions(), (200, 120));

        let residual = skew::detect_skew_angle(&processed.image);
        assert!(residual.angle_degrees.abs() <= 0.5);
    }

    #[test]
    fn level_page_is_not_rotated() {
        let page = PixelBuffer::from_gray_fn(80, 60, |_, y| if y % 12 < 2 { 0 } else { 255 });
        let config = PreprocessConfig {
            deskew: true,
            ..bare_config()
        };
        let processed = Preprocessor::new(config).unwrap().run(page.clone()).unwrap();
        assert!(!processed.report.rotated);
        assert_eq!(processed.image, page);
    }

    #[test]
    fn process_bytes_rejects_garbage() {
        let preprocessor = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let err = preprocessor.process_bytes(b"not an image").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn process_bytes_round_trips_through_png() {
        let png = gradient(24, 6).encode_png().unwrap();
        let preprocessor = Preprocessor::new(bare_config()).unwrap();
        let output = preprocessor.process_bytes(&png).unwrap();
        let reread = PixelBuffer::decode(&output.png).unwrap();
        assert_eq!(reread, output.image);
    }

    struct RecordingRecognizer {
        seen: RefCell<Option<(u32, u32)>>,
    }

    impl TextRecognizer for RecordingRecognizer {
        fn recognize(&self, image: &[u8], options: &RecognitionOptions) -> Result<String> {
            let decoded = PixelBuffer::decode(image)?;
            *self.seen.borrow_mut() = Some(decoded.dimensions());
            Ok(format!("text in {}", options.language))
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _: &[u8], _: &RecognitionOptions) -> Result<String> {
            Err(TextprepError::Recognition("engine offline".into()))
        }
    }

    #[test]
    fn recognizer_receives_processed_png() {
        let png = gradient(16, 8).encode_png().unwrap();
        let preprocessor = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let recognizer = RecordingRecognizer {
            seen: RefCell::new(None),
        };
        let doc =
            recognize_document(&png, &preprocessor, &recognizer, &RecognitionOptions::default())
                .unwrap();
        assert_eq!(doc.text, "text in eng");
        // Default config upscales by 2.
        assert_eq!(*recognizer.seen.borrow(), Some((32, 16)));
        assert_eq!(doc.output.image.dimensions(), (32, 16));
    }

    #[test]
    fn recognizer_errors_propagate() {
        let png = gradient(16, 8).encode_png().unwrap();
        let preprocessor = Preprocessor::new(PreprocessConfig::default()).unwrap();
        let err = recognize_document(
            &png,
            &preprocessor,
            &FailingRecognizer,
            &RecognitionOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Recognition);
    }
}
