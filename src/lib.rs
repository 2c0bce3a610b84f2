//! Recursively transcribe media files in a folder by running the whisper.cpp
//! CLI once per file, driven by a sectioned TOML config.

pub mod config;
pub mod error;
pub mod logging;
pub mod transcribe;
