use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Config, Param, ParamFlag};

/// One external tool call: the program plus a discrete argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Program followed by arguments, lossily converted for display and tests.
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect()
    }
}

/// Space-joined, unquoted. For reporting only; never handed to a shell.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens().join(" "))
    }
}

/// `model_path` -> `--model-path`
pub fn flag_name(key: &str) -> String {
    format!("--{}", key.replace('_', "-"))
}

fn push_param(invocation: &mut Invocation, param: &Param) {
    match &param.flag {
        ParamFlag::Value(value) if !value.is_empty() => {
            invocation.arg(flag_name(&param.key)).arg(value);
        }
        ParamFlag::Value(_) => {}
        ParamFlag::Switch(true) => {
            invocation.arg(flag_name(&param.key));
        }
        ParamFlag::Switch(false) => {}
    }
}

/// Build the tool invocation for one media file.
pub fn build_invocation(config: &Config, media_file: &Path) -> Invocation {
    let mut invocation = Invocation::new(&config.general.executable);

    for param in &config.params {
        push_param(&mut invocation, param);
    }

    invocation
        .arg(format!("--output-{}", config.general.output_format))
        .arg("-f")
        .arg(media_file);

    invocation
}
