use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "whisper-batch",
    version,
    about = "Recursively transcribe media files in a folder."
)]
pub struct Cli {
    /// The folder to scan for media files
    #[arg(required_unless_present = "init_config")]
    pub folder: Option<PathBuf>,

    /// Print the commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level, including the tool's standard output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write a commented starter config (to --config or ./whisper-batch.toml) and exit
    #[arg(long)]
    pub init_config: bool,
}
