use std::fmt;

use crate::error::RunError;

/// What happened to a single media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Dry run: the command line that would have been executed.
    DryRun(String),
    Transcribed,
    /// The tool ran and exited non-zero, or could not be started.
    Failed,
    ToolMissing,
}

/// Overall result of a run, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    FilesFailed,
    ConfigError,
    FolderError,
    ToolMissing,
}

impl RunStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::FilesFailed => 1,
            Self::ConfigError => 2,
            Self::FolderError => 3,
            Self::ToolMissing => 4,
        }
    }
}

impl From<RunStatus> for std::process::ExitCode {
    fn from(status: RunStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

impl From<&RunError> for RunStatus {
    fn from(err: &RunError) -> Self {
        match err {
            RunError::FolderNotFound(_) | RunError::NotADirectory(_) => Self::FolderError,
        }
    }
}

/// Per-run tally of file outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub found: usize,
    pub transcribed: usize,
    pub failed: usize,
    pub tool_missing: usize,
    /// Commands reported in dry-run mode, in discovery order.
    pub dry_run: Vec<String>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::DryRun(command) => self.dry_run.push(command),
            FileOutcome::Transcribed => self.transcribed += 1,
            FileOutcome::Failed => self.failed += 1,
            FileOutcome::ToolMissing => self.tool_missing += 1,
        }
    }

    /// A missing tool outranks ordinary failures.
    pub fn status(&self) -> RunStatus {
        if self.tool_missing > 0 {
            RunStatus::ToolMissing
        } else if self.failed > 0 {
            RunStatus::FilesFailed
        } else {
            RunStatus::Success
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.dry_run.is_empty() {
            return write!(f, "Dry run: {} of {} files listed", self.dry_run.len(), self.found);
        }
        write!(
            f,
            "{} transcribed, {} failed, {} skipped (tool missing) of {} files",
            self.transcribed, self.failed, self.tool_missing, self.found
        )
    }
}
