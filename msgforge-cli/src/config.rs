//! Configuration management for the CLI.
//!
//! Loads `msgforge.toml` and merges command-line overrides on top.

use std::path::{Path, PathBuf};

use msgforge_compiler::resolver::ResolveMode;
use serde::Deserialize;

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "msgforge.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Compilation behavior.
    pub compile: CompileConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,
}

/// Compilation behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Union no-match policy: `"strict"` or `"lenient"`.
    pub mode: String,

    /// Whether `.rs` inputs are scanned for annotations in addition to
    /// `.msg` documents.
    pub scan_rust: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            mode: "strict".to_string(),
            scan_rust: true,
        }
    }
}

impl CompileConfig {
    /// The parsed resolve mode.
    pub fn resolve_mode(&self) -> CliResult<ResolveMode> {
        match self.mode.as_str() {
            "strict" => Ok(ResolveMode::Strict),
            "lenient" => Ok(ResolveMode::Lenient),
            other => Err(ConfigError::invalid_value(
                "compile.mode",
                format!("expected \"strict\" or \"lenient\", found \"{}\"", other),
            )
            .into()),
        }
    }
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Resolve mode override.
    pub mode: Option<String>,
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// With `None`, the default location is tried; a missing default file
    /// yields the default configuration, while a missing explicit path is
    /// an error.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let (config_path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        if !config_path.exists() {
            if explicit {
                return Err(ConfigError::not_found(config_path).into());
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()).into())
    }

    /// Merge command-line arguments over a loaded configuration.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(output) = &args.output {
            config.output.dir = output.clone();
        }
        if let Some(mode) = &args.mode {
            config.compile.mode = mode.clone();
        }
        config
    }

    /// The content written by `msgforge init`.
    pub fn default_config_content() -> &'static str {
        r#"# msgforge configuration

[output]
# Directory for generated Rust modules.
dir = "./generated"

[compile]
# Union no-match policy: "strict" (decode error) or "lenient" (collected
# diagnostic).
mode = "strict"
# Scan .rs sources for #[message(...)] annotations in addition to .msg files.
scan_rust = true
"#
    }
}
