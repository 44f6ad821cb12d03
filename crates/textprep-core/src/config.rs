// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing configuration and persisted settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{Result, TextprepError};
use crate::recognize::RecognitionOptions;

/// Contrast values at or above this make the contrast factor's denominator
/// reach zero (`259 - contrast * 100`).
pub const CONTRAST_SINGULARITY: f32 = 2.59;

/// Binarization strategy as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinarizeMode {
    /// Global threshold taken from `binarize_threshold`.
    Fixed,
    /// Global threshold chosen by Otsu's method.
    Otsu,
    /// Local mean threshold over `adaptive_window_size` windows.
    Adaptive,
}

/// Resolved binarization strategy with its parameter attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binarization {
    Fixed(u8),
    Otsu,
    Adaptive(u32),
}

/// Tunable parameters for one preprocessing run.
///
/// Read-only for the lifetime of a run. Keys are camelCase on disk, and any
/// key missing from a stored document falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessConfig {
    /// Master switch for everything between upscaling and encoding.
    pub preprocess: bool,
    pub upscale: bool,
    /// Resampling factor, 1..=8.
    pub upscale_factor: f32,
    pub grayscale: bool,
    /// 0.5..2.59 (exclusive upper bound).
    pub contrast: f32,
    /// 0.5..=2.0, 1.0 is neutral.
    pub brightness: f32,
    pub sharpen: bool,
    pub denoise: bool,
    pub binarize: bool,
    pub binarize_mode: BinarizeMode,
    /// Used by [`BinarizeMode::Fixed`], 50..=200.
    pub binarize_threshold: u8,
    /// Used by [`BinarizeMode::Adaptive`], odd, 5..=50.
    pub adaptive_window_size: u32,
    pub morphological_ops: bool,
    /// Side of the square structuring element, 1..=5.
    pub morph_kernel_size: u32,
    pub deskew: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            preprocess: true,
            upscale: true,
            upscale_factor: 2.0,
            grayscale: true,
            contrast: 1.0,
            brightness: 1.0,
            sharpen: false,
            denoise: false,
            binarize: true,
            binarize_mode: BinarizeMode::Otsu,
            binarize_threshold: 128,
            adaptive_window_size: 15,
            morphological_ops: false,
            morph_kernel_size: 2,
            deskew: false,
        }
    }
}

impl PreprocessConfig {
    pub const MAX_UPSCALE_FACTOR: f32 = 8.0;
    pub const MIN_CONTRAST: f32 = 0.5;
    pub const MIN_BRIGHTNESS: f32 = 0.5;
    pub const MAX_BRIGHTNESS: f32 = 2.0;
    pub const MIN_THRESHOLD: u8 = 50;
    pub const MAX_THRESHOLD: u8 = 200;
    pub const MIN_WINDOW: u32 = 5;
    pub const MAX_WINDOW: u32 = 50;
    pub const MIN_KERNEL: u32 = 1;
    pub const MAX_KERNEL: u32 = 5;

    /// Check every parameter against its documented range.
    ///
    /// Parameters of disabled stages are still checked so a stored document
    /// never holds values that would fail once the stage is switched on.
    pub fn validate(&self) -> Result<()> {
        if !(1.0..=Self::MAX_UPSCALE_FACTOR).contains(&self.upscale_factor) {
            return Err(TextprepError::invalid_config(format!(
                "upscale factor must be in [1, {}], got {}",
                Self::MAX_UPSCALE_FACTOR,
                self.upscale_factor
            )));
        }
        if !(Self::MIN_CONTRAST..CONTRAST_SINGULARITY).contains(&self.contrast) {
            return Err(TextprepError::invalid_config(format!(
                "contrast must be in [{}, {}), got {}",
                Self::MIN_CONTRAST,
                CONTRAST_SINGULARITY,
                self.contrast
            )));
        }
        if !(Self::MIN_BRIGHTNESS..=Self::MAX_BRIGHTNESS).contains(&self.brightness) {
            return Err(TextprepError::invalid_config(format!(
                "brightness must be in [{}, {}], got {}",
                Self::MIN_BRIGHTNESS,
                Self::MAX_BRIGHTNESS,
                self.brightness
            )));
        }
        if !(Self::MIN_THRESHOLD..=Self::MAX_THRESHOLD).contains(&self.binarize_threshold) {
            return Err(TextprepError::invalid_config(format!(
                "binarize threshold must be in [{}, {}], got {}",
                Self::MIN_THRESHOLD,
                Self::MAX_THRESHOLD,
                self.binarize_threshold
            )));
        }
        if !(Self::MIN_WINDOW..=Self::MAX_WINDOW).contains(&self.adaptive_window_size)
            || self.adaptive_window_size % 2 == 0
        {
            return Err(TextprepError::invalid_config(format!(
                "adaptive window size must be odd and in [{}, {}], got {}",
                Self::MIN_WINDOW,
                Self::MAX_WINDOW,
                self.adaptive_window_size
            )));
        }
        if !(Self::MIN_KERNEL..=Self::MAX_KERNEL).contains(&self.morph_kernel_size) {
            return Err(TextprepError::invalid_config(format!(
                "morphology kernel size must be in [{}, {}], got {}",
                Self::MIN_KERNEL,
                Self::MAX_KERNEL,
                self.morph_kernel_size
            )));
        }
        Ok(())
    }

    /// The binarization strategy to run, or `None` when the stage is off.
    pub fn binarization(&self) -> Option<Binarization> {
        if !self.binarize {
            return None;
        }
        Some(match self.binarize_mode {
            BinarizeMode::Fixed => Binarization::Fixed(self.binarize_threshold),
            BinarizeMode::Otsu => Binarization::Otsu,
            BinarizeMode::Adaptive => Binarization::Adaptive(self.adaptive_window_size),
        })
    }

    /// Whether contrast and brightness are both at their neutral value.
    ///
    /// The pipeline skips the tone stage only in this exact case, so output is
    /// not continuous around it: the contrast factor at 1.0 is about 2.27, and
    /// brightness 1.01 already applies that stretch in full.
    pub fn is_tone_neutral(&self) -> bool {
        self.contrast == 1.0 && self.brightness == 1.0
    }
}

/// The persisted settings document: preprocessing plus recognition options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub preprocessing: PreprocessConfig,
    pub recognition: RecognitionOptions,
}

impl Settings {
    /// Parse and validate a settings document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.preprocessing.validate()?;
        Ok(settings)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&raw)?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Load settings from `path`, or return defaults if the file is absent.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(TextprepError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("No stored settings; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.preprocessing.validate()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_config_is_valid() {
        PreprocessConfig::default().validate().unwrap();
    }

    #[test]
    fn contrast_at_singularity_is_rejected() {
        let config = PreprocessConfig {
            contrast: 2.59,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        let below = PreprocessConfig {
            contrast: 2.58,
            ..Default::default()
        };
        below.validate().unwrap();
    }

    #[test]
    fn nan_contrast_is_rejected() {
        let config = PreprocessConfig {
            contrast: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn even_window_is_rejected() {
        let config = PreprocessConfig {
            adaptive_window_size: 16,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let odd = PreprocessConfig {
            adaptive_window_size: 49,
            ..Default::default()
        };
        odd.validate().unwrap();
    }

    #[test]
    fn upscale_factor_is_capped() {
        let huge = PreprocessConfig {
            upscale_factor: 1e5,
            ..Default::default()
        };
        let err = huge.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);

        let at_cap = PreprocessConfig {
            upscale_factor: PreprocessConfig::MAX_UPSCALE_FACTOR,
            ..Default::default()
        };
        at_cap.validate().unwrap();
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            PreprocessConfig {
                upscale_factor: 0.5,
                ..Default::default()
            },
            PreprocessConfig {
                brightness: 2.5,
                ..Default::default()
            },
            PreprocessConfig {
                binarize_threshold: 20,
                ..Default::default()
            },
            PreprocessConfig {
                morph_kernel_size: 0,
                ..Default::default()
            },
            PreprocessConfig {
                morph_kernel_size: 6,
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn binarization_resolves_mode() {
        let mut config = PreprocessConfig {
            binarize_mode: BinarizeMode::Adaptive,
            adaptive_window_size: 21,
            ..Default::default()
        };
        assert_eq!(config.binarization(), Some(Binarization::Adaptive(21)));

        config.binarize_mode = BinarizeMode::Fixed;
        config.binarize_threshold = 90;
        assert_eq!(config.binarization(), Some(Binarization::Fixed(90)));

        config.binarize = false;
        assert_eq!(config.binarization(), None);
    }

    #[test]
    fn partial_document_merges_with_defaults() {
        let settings =
            Settings::from_json_str(r#"{"preprocessing": {"binarizeMode": "adaptive", "deskew": true}}"#)
                .unwrap();
        assert_eq!(settings.preprocessing.binarize_mode, BinarizeMode::Adaptive);
        assert!(settings.preprocessing.deskew);
        assert_eq!(settings.preprocessing.upscale_factor, 2.0);
        assert_eq!(settings.recognition, RecognitionOptions::default());
    }

    #[test]
    fn stored_invalid_values_are_rejected() {
        let err = Settings::from_json_str(r#"{"preprocessing": {"contrast": 3.0}}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.preprocessing.sharpen = true;
        settings.preprocessing.morph_kernel_size = 3;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
