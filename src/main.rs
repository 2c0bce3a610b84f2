mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use whisper_batch::config::{Config, CONFIG_FILE_NAME};
use whisper_batch::logging::Logging;
use whisper_batch::transcribe::runner::run_transcribe;
use whisper_batch::transcribe::status::RunStatus;

fn main() -> ExitCode {
    run(Cli::parse()).into()
}

fn run(cli: Cli) -> RunStatus {
    // Console-only until the config says where the log file goes.
    let bootstrap = Logging::console(cli.verbose);

    if cli.init_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        return match write_default_config(&path) {
            Ok(()) => {
                tracing::info!("Wrote default config to {}", path.display());
                RunStatus::Success
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                RunStatus::ConfigError
            }
        };
    }

    let (config, config_path) = match Config::load_with_path(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("{:#}", e);
            return RunStatus::ConfigError;
        }
    };

    drop(bootstrap);
    let logging = match Logging::with_file(&config.general.log_file, cli.verbose) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("{:#}", e);
            return RunStatus::ConfigError;
        }
    };
    tracing::debug!("Loaded config from {}", config_path.display());

    let Some(folder) = cli.folder else {
        tracing::error!("No folder given to scan");
        return RunStatus::FolderError;
    };

    let status = match run_transcribe(&folder, &config, cli.dry_run) {
        Ok(summary) => summary.status(),
        Err(e) => {
            tracing::error!("{}", e);
            RunStatus::from(&e)
        }
    };

    drop(logging);
    status
}

fn write_default_config(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("Refusing to overwrite existing config {}", path.display());
    }
    std::fs::write(path, Config::generate_default_commented())?;
    Ok(())
}
