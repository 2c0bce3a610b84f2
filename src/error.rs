use std::path::PathBuf;

use thiserror::Error;

/// Problems found while validating an otherwise well-formed config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`media_extensions` in [General] lists no extensions")]
    NoExtensions,

    #[error(
        "parameter `{key}` must be a boolean (true/false, yes/no, on/off, 1/0), got {value:?}"
    )]
    InvalidBoolean { key: String, value: String },

    #[error("parameter `{key}` has an unsupported {kind} value; use a string, number or boolean")]
    UnsupportedValue { key: String, kind: &'static str },
}

/// Why a child process could not be run at all.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(
        "{} executable not found. Make sure it exists relative to the working directory",
        program.display()
    )]
    ToolMissing { program: PathBuf },

    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Conditions that end a run before any file is processed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Folder not found at '{}'", .0.display())]
    FolderNotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}
