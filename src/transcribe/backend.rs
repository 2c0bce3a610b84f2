use std::io::ErrorKind;
use std::process::{Command, Output};

use crate::error::InvokeError;
use crate::transcribe::command::Invocation;

/// Runs an invocation to completion and hands back what it printed.
pub trait ToolBackend {
    fn name(&self) -> &str;
    fn run(&self, invocation: &Invocation) -> Result<Output, InvokeError>;
}

/// Spawns the tool as a child process with stdout and stderr captured.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessBackend;

impl ToolBackend for ProcessBackend {
    fn name(&self) -> &str {
        "process"
    }

    fn run(&self, invocation: &Invocation) -> Result<Output, InvokeError> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => InvokeError::ToolMissing {
                    program: invocation.program.clone(),
                },
                _ => InvokeError::Spawn {
                    program: invocation.program.clone(),
                    source: e,
                },
            })
    }
}
