// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use textprep_imaging::scan::DEFAULT_PREVIEW_SIDE;

/// Clean up a photo or scan of text so an OCR engine can read it
#[derive(Parser, Debug)]
#[command(name = "textprep")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Image to preprocess (PNG, JPEG, ...)
    #[arg(required_unless_present_any = ["print_config", "save_config"])]
    pub input: Option<PathBuf>,

    /// Where to write the processed PNG [default: <INPUT>.processed.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file [default: $XDG_CONFIG_HOME/textprep/settings.json]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Also write a side-by-side preview (original | processed) here
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Longest side of each preview panel, in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SIDE)]
    pub preview_size: u32,

    /// Print the effective settings as JSON
    #[arg(long)]
    pub print_config: bool,

    /// Store the effective settings in the settings file
    #[arg(long)]
    pub save_config: bool,

    /// Print the pipeline report as JSON
    #[arg(long)]
    pub report: bool,

    /// Run text recognition on the processed image (needs the `ocr` feature)
    #[arg(long)]
    pub recognize: bool,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, requires = "recognize")]
    pub models: Option<PathBuf>,
}
