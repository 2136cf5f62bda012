//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `rpc-board.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use rpc_board::BoardConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "rpc-board.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution and presentation settings passed to the library.
    pub board: BoardConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where `build` writes the tree artifact when `--output` is absent.
    pub tree_file: PathBuf,

    /// Whether `build` reports resolver diagnostics.
    pub show_diagnostics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tree_file: PathBuf::from("tree.json"),
            show_diagnostics: true,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&config_path, &content)
    }

    /// Parse and validate configuration text.
    pub fn parse(path: &Path, content: &str) -> CliResult<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> CliResult<Config> {
        if let Some(max_depth) = args.max_depth {
            config.board.max_depth = max_depth;
        }

        if let Some(ref output) = args.output {
            config.output.tree_file = output.clone();
        }

        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .board
            .validate()
            .map_err(|e| ConfigError::invalid_value("board", e.to_string()))
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# rpc-board configuration file

[board]
# Depth bound for type resolution; deeper types become an "unknown" sentinel
max_depth = 32

# Symbol names resolved to the opaque Date type instead of being expanded
opaque_type_names = ["Date"]

# Property that marks a router member as a procedure
procedure_marker = "__procedure"

# First segment of every tree and form path
root_path = "root"

# Path expanded when the tree is first shown (remove to start collapsed)
initial_expanded = "root.greeting"

# Horizontal indentation per tree level
indent_step = 30

[output]
# Tree artifact written by `rpc-board build` when --output is not given
tree_file = "tree.json"

# Print resolver diagnostics after a build
show_diagnostics = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Depth bound override.
    pub max_depth: Option<usize>,

    /// Tree artifact path override.
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.board, BoardConfig::default());
        assert_eq!(config.output.tree_file, PathBuf::from("tree.json"));
        assert!(config.output.show_diagnostics);
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config = ConfigManager::parse(
            Path::new(CONFIG_FILENAME),
            ConfigManager::default_config_content(),
        )
        .unwrap();
        assert_eq!(config.board, BoardConfig::default());
        assert_eq!(config.output.tree_file, PathBuf::from("tree.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
[board]
max_depth = 4
opaque_type_names = ["Date", "Instant"]
"#;
        let config = ConfigManager::parse(Path::new("x.toml"), toml).unwrap();
        assert_eq!(config.board.max_depth, 4);
        assert!(config.board.is_opaque("Instant"));
        assert_eq!(config.board.root_path, "root");
        assert_eq!(
            config.board.initial_expanded.as_deref(),
            Some("root.greeting")
        );
    }

    #[test]
    fn test_invalid_board_values_rejected() {
        let err = ConfigManager::parse(Path::new("x.toml"), "[board]\nmax_depth = 0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "board"
        ));

        let err = ConfigManager::parse(Path::new("x.toml"), "[board\n").unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::InvalidToml { .. })));
    }

    #[test]
    fn test_merge_cli_args() {
        let args = CliArgs {
            max_depth: Some(3),
            output: Some(PathBuf::from("out/tree.json")),
        };
        let merged = ConfigManager::merge_cli_args(Config::default(), &args).unwrap();
        assert_eq!(merged.board.max_depth, 3);
        assert_eq!(merged.output.tree_file, PathBuf::from("out/tree.json"));

        let zero = CliArgs {
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(ConfigManager::merge_cli_args(Config::default(), &zero).is_err());
    }

    #[test]
    fn test_merge_cli_args_preserves_unset() {
        let merged =
            ConfigManager::merge_cli_args(Config::default(), &CliArgs::default()).unwrap();
        assert_eq!(merged.board, BoardConfig::default());
        assert_eq!(merged.output.tree_file, PathBuf::from("tree.json"));
    }
}
