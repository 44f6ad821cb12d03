// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// textprep: Text image preprocessor
//
// Entry point. Initialises logging, resolves settings, and runs the
// preprocessing service for one input image.

mod cli;
mod services;

use std::process::ExitCode;

use clap::Parser;
use textprep_core::Settings;
use textprep_core::error::Result;
use textprep_core::human_errors::humanize_error;
use tracing::info;

use cli::Args;
use services::config_dir;
use services::preprocess::PreprocessService;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so JSON on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, kind = ?err.kind(), "textprep failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

/// Load settings the way the flags ask for them.
///
/// An explicit `--config` file must exist; the default location falls back to
/// built-in defaults when nothing has been saved yet.
fn load_settings(args: &Args) -> Result<(Settings, std::path::PathBuf)> {
    match &args.config {
        Some(path) => Ok((Settings::load(path)?, path.clone())),
        None => {
            let path = config_dir::settings_path();
            Ok((Settings::load_or_default(&path)?, path))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let (settings, settings_path) = load_settings(&args)?;

    if args.save_config {
        settings.save(&settings_path)?;
        info!(path = %settings_path.display(), "Settings stored");
    }
    if args.print_config {
        println!("{}", settings.to_json_string()?);
    }

    let Some(input) = args.input else {
        return Ok(());
    };

    info!(input = %input.display(), "textprep starting");
    let service = PreprocessService::new(settings)?;

    let output = args
        .output
        .unwrap_or_else(|| config_dir::default_output_path(&input));
    let report = service.process_file(&input, &output).await?;
    info!(
        output = %output.display(),
        stages = ?report.stages,
        elapsed_ms = report.processing_time_ms,
        "Done"
    );

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(preview) = &args.preview {
        service
            .write_preview(&input, preview, args.preview_size)
            .await?;
    }

    if args.recognize {
        let text = service.recognize_file(&input, args.models).await?;
        println!("{text}");
    }

    Ok(())
}
