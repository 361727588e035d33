use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory used for `root`, `error_dir` and `offset` when none is configured
pub const DEFAULT_DIR: &str = "/mnt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How many rows the user may mark at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// Which kind of row the user may mark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    #[default]
    File,
    Dir,
    FileAndDir,
}

impl SelectionType {
    pub fn allows(self, is_directory: bool) -> bool {
        match self {
            SelectionType::File => !is_directory,
            SelectionType::Dir => is_directory,
            SelectionType::FileAndDir => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selection_mode: SelectionMode,
    pub selection_type: SelectionType,
    /// Topmost directory the picker opens
    pub root: PathBuf,
    /// Fallback when `root` is not a readable directory
    pub error_dir: PathBuf,
    /// Directory inside `root` to start in
    pub offset: PathBuf,
    /// File extensions to show, every file when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::default(),
            selection_type: SelectionType::default(),
            root: PathBuf::from(DEFAULT_DIR),
            error_dir: PathBuf::from(DEFAULT_DIR),
            offset: PathBuf::from(DEFAULT_DIR),
            extensions: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.expand_paths();

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/filepicker");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Directory the picker should open first.
    ///
    /// `offset` when it is a directory under `root`, otherwise `root` when it
    /// is a directory, otherwise `error_dir`.
    pub fn start_directory(&self) -> PathBuf {
        if self.offset.is_dir() && self.offset.starts_with(&self.root) {
            self.offset.clone()
        } else if self.root.is_dir() {
            self.root.clone()
        } else {
            self.error_dir.clone()
        }
    }

    pub fn directories_only(&self) -> bool {
        self.selection_type == SelectionType::Dir
    }

    // Expand shell variables and tilde in every configured directory
    fn expand_paths(&mut self) {
        for path in [&mut self.root, &mut self.error_dir, &mut self.offset] {
            if let Some(expanded) = Self::expand_path(path) {
                *path = expanded;
            }
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
