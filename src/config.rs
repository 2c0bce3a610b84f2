use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::ConfigError;

/// File name searched for in the working directory and beside the executable.
pub const CONFIG_FILE_NAME: &str = "whisper-batch.toml";

pub const DEFAULT_OUTPUT_FORMAT: &str = "txt";
pub const DEFAULT_EXECUTABLE: &str = "./whisper_cpp";
pub const DEFAULT_LOG_FILE: &str = "transcriber.log";

/// Parameters forwarded as `--key <value>`. Every other key is a boolean switch.
pub const VALUE_KEYS: [&str; 10] = [
    "model",
    "language",
    "threads",
    "prompt",
    "offset_t_ms",
    "offset_n",
    "duration_ms",
    "max_context",
    "max_len",
    "word_thold",
];

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    /// `[WhisperParams]` entries in file order.
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralConfig {
    /// Literal file name suffixes, e.g. `.wav`.
    pub media_extensions: Vec<String>,
    pub output_format: String,
    pub executable: PathBuf,
    pub log_file: PathBuf,
}

/// How a `[WhisperParams]` key is forwarded to the external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `--key <value>` when the value is non-empty.
    Value,
    /// Bare `--key` when the value is true. Unknown keys land here.
    Switch,
}

impl ParamKind {
    pub fn of(key: &str) -> Self {
        if VALUE_KEYS.contains(&key) {
            Self::Value
        } else {
            Self::Switch
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamFlag {
    Value(String),
    Switch(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub flag: ParamFlag,
}

impl Param {
    /// Classify a raw TOML entry against the closed key table.
    pub fn classify(key: &str, value: &toml::Value) -> Result<Self, ConfigError> {
        let key = key.to_ascii_lowercase();
        let text = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) => {
                return Err(ConfigError::UnsupportedValue { key, kind: "array" })
            }
            toml::Value::Table(_) => {
                return Err(ConfigError::UnsupportedValue { key, kind: "table" })
            }
        };

        let flag = match ParamKind::of(&key) {
            ParamKind::Value => ParamFlag::Value(text),
            ParamKind::Switch => ParamFlag::Switch(parse_bool(&key, &text)?),
        };
        Ok(Self { key, flag })
    }
}

/// Accepts the usual ini-style spellings, case-insensitively.
pub fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Split a comma-separated extension list, trimming whitespace and dropping
/// empty entries.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

// --- On-disk layout ---

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "General")]
    general: GeneralSection,
    #[serde(rename = "WhisperParams")]
    whisper_params: toml::Table,
}

#[derive(Debug, Deserialize)]
struct GeneralSection {
    media_extensions: Extensions,
    #[serde(default)]
    output_format: Option<String>,
    #[serde(default)]
    executable: Option<PathBuf>,
    #[serde(default)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extensions {
    List(String),
    Array(Vec<String>),
}

impl Extensions {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(list) => parse_extensions(&list),
            Self::Array(items) => items
                .iter()
                .map(|ext| ext.trim())
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Fallbacks for the optional `[General]` keys. `media_extensions` has no
/// default and is left empty.
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            media_extensions: Vec::new(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

// --- Config loading ---

impl Config {
    /// Parse and validate config text.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse config file")?;

        let media_extensions = file.general.media_extensions.into_vec();
        if media_extensions.is_empty() {
            return Err(ConfigError::NoExtensions.into());
        }

        let defaults = GeneralConfig::default();
        let output_format = file
            .general
            .output_format
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or(defaults.output_format);

        let params = file
            .whisper_params
            .iter()
            .map(|(key, value)| Param::classify(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            general: GeneralConfig {
                media_extensions,
                output_format,
                executable: file.general.executable.unwrap_or(defaults.executable),
                log_file: file.general.log_file.unwrap_or(defaults.log_file),
            },
            params,
        })
    }

    /// Find the config file: explicit path, then the working directory, then
    /// beside the executable, then the platform config directory.
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = path {
            return Some(p.to_path_buf());
        }

        let cwd = PathBuf::from(CONFIG_FILE_NAME);
        if cwd.is_file() {
            return Some(cwd);
        }

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(p) = exe_path.parent().map(|p| p.join(CONFIG_FILE_NAME)) {
                if p.is_file() {
                    return Some(p);
                }
            }
        }

        // e.g. ~/.config/whisper-batch/config.toml
        dirs::config_dir()
            .map(|d| d.join("whisper-batch").join("config.toml"))
            .filter(|p| p.is_file())
    }

    /// Load config and return the resolved file path.
    pub fn load_with_path(path: Option<&Path>) -> anyhow::Result<(Self, PathBuf)> {
        let resolved = Self::resolve_path(path).ok_or_else(|| {
            anyhow::anyhow!(
                "Config file not found (looked for ./{} and the platform config directory)",
                CONFIG_FILE_NAME
            )
        })?;

        let content = std::fs::read_to_string(&resolved).with_context(|| {
            format!("Failed to read config file {}", resolved.display())
        })?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", resolved.display()))?;
        Ok((config, resolved))
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_path(path).map(|(config, _)| config)
    }

    /// A starter config file with inline documentation.
    pub fn generate_default_commented() -> String {
        format!(
            r#"# whisper-batch configuration

[General]
# Comma-separated file name suffixes to transcribe. Matching is a plain,
# case-sensitive "ends with" check on the file name.
media_extensions = ".wav, .mp3, .m4a, .flac, .ogg"
# Output format passed to the tool as --output-<format> (txt, vtt, srt, json, ...).
output_format = "{output_format}"
# Speech-to-text executable, relative to the working directory.
executable = "{executable}"
# Log file, appended to on every run.
log_file = "{log_file}"

[WhisperParams]
# Keys are forwarded in the order written here, underscores become hyphens.
# These keys take a value and are skipped when empty:
#   {value_keys}
model = "models/ggml-base.en.bin"
language = "en"
threads = ""
# Every other key is a switch, passed as a bare flag when true.
translate = false
print_colors = false
"#,
            output_format = DEFAULT_OUTPUT_FORMAT,
            executable = DEFAULT_EXECUTABLE,
            log_file = DEFAULT_LOG_FILE,
            value_keys = VALUE_KEYS.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [General]
        media_extensions = ".wav"

        [WhisperParams]
    "#;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.general.media_extensions, vec![".wav"]);
        assert_eq!(config.general.output_format, "txt");
        assert_eq!(config.general.executable, PathBuf::from("./whisper_cpp"));
        assert_eq!(config.general.log_file, PathBuf::from("transcriber.log"));
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_omitted_keys_match_general_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        let defaults = GeneralConfig::default();
        assert_eq!(config.general.output_format, defaults.output_format);
        assert_eq!(config.general.executable, defaults.executable);
        assert_eq!(config.general.log_file, defaults.log_file);
        assert!(defaults.media_extensions.is_empty());
    }

    #[test]
    fn test_extensions_are_trimmed() {
        let config = Config::from_toml_str(
            r#"
            [General]
            media_extensions = " .wav ,.mp3,  .m4a,"
            [WhisperParams]
            "#,
        )
        .unwrap();
        assert_eq!(config.general.media_extensions, vec![".wav", ".mp3", ".m4a"]);
    }

    #[test]
    fn test_extensions_as_array() {
        let config = Config::from_toml_str(
            r#"
            [General]
            media_extensions = [".wav", " .ogg "]
            [WhisperParams]
            "#,
        )
        .unwrap();
        assert_eq!(config.general.media_extensions, vec![".wav", ".ogg"]);
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let err = Config::from_toml_str(
            r#"
            [General]
            media_extensions = " , "
            [WhisperParams]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no extensions"));
    }

    #[test]
    fn test_missing_sections_rejected() {
        assert!(Config::from_toml_str("[General]\nmedia_extensions = \".wav\"\n").is_err());
        assert!(Config::from_toml_str("[WhisperParams]\nmodel = \"x\"\n").is_err());
    }

    #[test]
    fn test_params_keep_file_order() {
        let config = Config::from_toml_str(
            r#"
            [General]
            media_extensions = ".wav"

            [WhisperParams]
            threads = "4"
            translate = true
            model = "base.bin"
            no_timestamps = "no"
            "#,
        )
        .unwrap();
        let keys: Vec<&str> = config.params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["threads", "translate", "model", "no_timestamps"]);
        assert_eq!(config.params[0].flag, ParamFlag::Value("4".to_string()));
        assert_eq!(config.params[1].flag, ParamFlag::Switch(true));
        assert_eq!(config.params[3].flag, ParamFlag::Switch(false));
    }

    #[test]
    fn test_numbers_become_text() {
        let config = Config::from_toml_str(
            r#"
            [General]
            media_extensions = ".wav"
            [WhisperParams]
            threads = 8
            word_thold = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.params[0].flag, ParamFlag::Value("8".to_string()));
        assert_eq!(config.params[1].flag, ParamFlag::Value("0.25".to_string()));
    }

    #[test]
    fn test_invalid_boolean_rejected_at_load() {
        let err = Config::from_toml_str(
            r#"
            [General]
            media_extensions = ".wav"
            [WhisperParams]
            translate = "sometimes"
            "#,
        )
        .unwrap_err();
        let err = err.downcast::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::InvalidBoolean { ref key, .. } if key == "translate"));
    }

    #[test]
    fn test_array_param_rejected() {
        let err = Config::from_toml_str(
            r#"
            [General]
            media_extensions = ".wav"
            [WhisperParams]
            model = ["a", "b"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`model`"));
    }

    #[test]
    fn test_param_keys_are_lowercased() {
        let param = Param::classify("Language", &toml::Value::String("de".into())).unwrap();
        assert_eq!(param.key, "language");
        assert_eq!(param.flag, ParamFlag::Value("de".to_string()));
    }

    #[test]
    fn test_param_kind_table() {
        for key in VALUE_KEYS {
            assert_eq!(ParamKind::of(key), ParamKind::Value);
        }
        assert_eq!(ParamKind::of("translate"), ParamKind::Switch);
        assert_eq!(ParamKind::of("some_future_flag"), ParamKind::Switch);
    }

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["1", "yes", "TRUE", "On", " true "] {
            assert!(parse_bool("k", raw).unwrap(), "{raw}");
        }
        for raw in ["0", "no", "False", "OFF"] {
            assert!(!parse_bool("k", raw).unwrap(), "{raw}");
        }
        assert!(parse_bool("k", "").is_err());
        assert!(parse_bool("k", "2").is_err());
    }

    #[test]
    fn test_blank_output_format_falls_back() {
        let config = Config::from_toml_str(
            r#"
            [General]
            media_extensions = ".wav"
            output_format = " "
            [WhisperParams]
            "#,
        )
        .unwrap();
        assert_eq!(config.general.output_format, "txt");
    }

    #[test]
    fn test_load_nonexistent_path_errors() {
        let result = Config::load(Some(Path::new("/nonexistent/whisper-batch.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_with_path_returns_resolved_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config_file = tmp.path().join("custom.toml");
        std::fs::write(
            &config_file,
            "[General]\nmedia_extensions = \".mp3\"\noutput_format = \"srt\"\n[WhisperParams]\n",
        )
        .unwrap();

        let (config, resolved) = Config::load_with_path(Some(config_file.as_path())).unwrap();
        assert_eq!(config.general.media_extensions, vec![".mp3"]);
        assert_eq!(config.general.output_format, "srt");
        assert_eq!(resolved, config_file);
    }

    #[test]
    fn test_generate_default_commented_is_valid() {
        let content = Config::generate_default_commented();
        let config = Config::from_toml_str(&content).unwrap();
        assert!(config.general.media_extensions.contains(&".wav".to_string()));
        assert_eq!(config.general.output_format, "txt");
        assert_eq!(
            config.params[0],
            Param {
                key: "model".to_string(),
                flag: ParamFlag::Value("models/ggml-base.en.bin".to_string()),
            }
        );
        assert!(content.contains("word_thold"));
    }
}
