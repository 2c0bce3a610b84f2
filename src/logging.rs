use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Console (stderr) and log-file sink for one run.
///
/// Installed as the default subscriber for the current thread when built and
/// uninstalled when dropped, at which point the log file is flushed.
pub struct Logging {
    file: Option<Arc<File>>,
    _guard: DefaultGuard,
}

impl Logging {
    /// Console only. Used until the config (and with it the log path) is known.
    pub fn console(verbose: bool) -> Self {
        Self::install(verbose, None)
    }

    /// Console plus an append-only log file.
    pub fn with_file(path: &Path, verbose: bool) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        Ok(Self::install(verbose, Some(Arc::new(file))))
    }

    fn install(verbose: bool, file: Option<Arc<File>>) -> Self {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let console = tracing_subscriber::fmt::layer()
            .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
            .with_target(false)
            .with_writer(std::io::stderr);

        let file_layer = file.as_ref().map(|f| {
            tracing_subscriber::fmt::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::clone(f))
        });

        let guard = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file_layer)
            .set_default();

        Self {
            file,
            _guard: guard,
        }
    }
}

impl Drop for Logging {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let _ = (&**file).flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_receives_lines() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("run.log");

        {
            let _logging = Logging::with_file(&log_path, false).unwrap();
            tracing::info!("Scanning folder: media");
            tracing::debug!("hidden at info level");
        }

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("INFO"));
        assert!(content.contains("Scanning folder: media"));
        assert!(!content.contains("hidden at info level"));
    }

    #[test]
    fn test_file_is_appended() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("run.log");

        for run in ["first run", "second run"] {
            let _logging = Logging::with_file(&log_path, false).unwrap();
            tracing::info!("{run}");
        }

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("first run"));
        assert!(content.contains("second run"));
    }

    #[test]
    fn test_verbose_keeps_debug() {
        let tmp = TempDir::new().unwrap();
        let log_path = tmp.path().join("run.log");

        {
            let _logging = Logging::with_file(&log_path, true).unwrap();
            tracing::debug!("tool stdout here");
        }

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("tool stdout here"));
    }

    #[test]
    fn test_unopenable_log_path_errors() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("missing-dir").join("run.log");
        assert!(Logging::with_file(&bad, false).is_err());
    }
}
