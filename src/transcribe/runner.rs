use std::path::Path;

use crate::config::Config;
use crate::error::{InvokeError, RunError};
use crate::transcribe::backend::{ProcessBackend, ToolBackend};
use crate::transcribe::command::build_invocation;
use crate::transcribe::discover::find_media_files;
use crate::transcribe::status::{FileOutcome, RunSummary};

/// Build, then run or report, the tool invocation for one file.
///
/// Failures are logged and returned as an outcome; they never abort the run.
pub fn transcribe_file(
    media_file: &Path,
    config: &Config,
    dry_run: bool,
    backend: &dyn ToolBackend,
) -> FileOutcome {
    tracing::info!("Preparing to transcribe {}...", media_file.display());
    let invocation = build_invocation(config, media_file);

    if dry_run {
        let command = invocation.to_string();
        tracing::info!("DRY RUN: Would execute the following command:");
        tracing::info!("{}", command);
        return FileOutcome::DryRun(command);
    }

    tracing::info!("Transcribing {}...", media_file.display());
    match backend.run(&invocation) {
        Ok(output) if output.status.success() => {
            tracing::info!("Successfully transcribed {}", media_file.display());
            tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
            FileOutcome::Transcribed
        }
        Ok(output) => {
            tracing::error!(
                "Error transcribing {} ({}):",
                media_file.display(),
                output.status
            );
            tracing::error!("{}", String::from_utf8_lossy(&output.stderr));
            FileOutcome::Failed
        }
        Err(e @ InvokeError::ToolMissing { .. }) => {
            tracing::error!("Error: {}", e);
            FileOutcome::ToolMissing
        }
        Err(e) => {
            tracing::error!("Error transcribing {}: {}", media_file.display(), e);
            FileOutcome::Failed
        }
    }
}

/// Scan `folder` and process every matching file in discovery order.
pub fn run_with_backend(
    folder: &Path,
    config: &Config,
    dry_run: bool,
    backend: &dyn ToolBackend,
) -> Result<RunSummary, RunError> {
    if !folder.exists() {
        return Err(RunError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(RunError::NotADirectory(folder.to_path_buf()));
    }

    tracing::info!("Scanning folder: {}", folder.display());
    let media_files = find_media_files(folder, &config.general.media_extensions);

    let mut summary = RunSummary {
        found: media_files.len(),
        ..Default::default()
    };

    if media_files.is_empty() {
        tracing::info!("No media files found to transcribe.");
        return Ok(summary);
    }

    tracing::info!("Found {} media files to transcribe.", media_files.len());
    tracing::debug!("Using {} backend", backend.name());

    // A missing tool is reported for every file, not just the first.
    for media_file in &media_files {
        summary.record(transcribe_file(media_file, config, dry_run, backend));
    }

    tracing::info!("{}", summary);
    Ok(summary)
}

/// Run against the real tool.
pub fn run_transcribe(folder: &Path, config: &Config, dry_run: bool) -> Result<RunSummary, RunError> {
    run_with_backend(folder, config, dry_run, &ProcessBackend)
}
