// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware settings and output path resolution.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "textprep";
const SETTINGS_FILE: &str = "settings.json";

/// Directory holding the persisted settings. Not created here; saving does
/// that on demand.
pub fn config_dir() -> PathBuf {
    dirs_fallback().join(APP_DIR)
}

/// Default settings document location.
pub fn settings_path() -> PathBuf {
    config_dir().join(SETTINGS_FILE)
}

/// `<dir>/<stem>.processed.png` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    input.with_file_name(format!("{stem}.processed.png"))
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
