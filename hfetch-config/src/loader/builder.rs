use std::path::PathBuf;

use anyhow::Result;

use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource};
use crate::loader::manager::{ConfigManager, PrimarySource};

/// Builds a [`ConfigManager`] with command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    workspace: Option<PathBuf>,
    config_file: Option<PathBuf>,
    user_config: Option<Option<PathBuf>>,
    cli_overrides: Vec<(String, toml::Value)>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory searched for `hfetch.toml`. Defaults to the current directory.
    pub fn workspace(mut self, path: PathBuf) -> Self {
        self.workspace = Some(path);
        self
    }

    /// Use this file instead of the workspace `hfetch.toml`.
    pub fn config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Replace the user-level config path. `None` skips the user layer.
    pub fn user_config(mut self, path: Option<PathBuf>) -> Self {
        self.user_config = Some(path);
        self
    }

    /// Add an override such as `("fetch.body_mode", "raw")`.
    pub fn cli_override(mut self, key: impl Into<String>, value: toml::Value) -> Self {
        self.cli_overrides.push((key.into(), value));
        self
    }

    pub fn build(self) -> Result<ConfigManager> {
        let user_config = match self.user_config {
            Some(path) => path,
            None => ConfigManager::default_user_config_path(),
        };

        let config_file = self
            .config_file
            .or_else(ConfigManager::config_path_from_env);
        let primary = match config_file {
            Some(file) => PrimarySource::Explicit(file),
            None => {
                let workspace = match self.workspace {
                    Some(path) => path,
                    None => std::env::current_dir()?,
                };
                PrimarySource::Workspace(workspace)
            }
        };

        let mut stack = ConfigManager::collect_layers(user_config.as_deref(), &primary)?;

        if !self.cli_overrides.is_empty() {
            let mut runtime_toml = toml::Table::new();
            for (key, value) in self.cli_overrides {
                insert_dotted_key(&mut runtime_toml, &key, value);
            }
            stack.push(ConfigLayerEntry::new(
                ConfigLayerSource::Runtime,
                toml::Value::Table(runtime_toml),
            ));
        }

        ConfigManager::from_layers(stack)
    }
}

fn insert_dotted_key(table: &mut toml::Table, key: &str, value: toml::Value) {
    match key.split_once('.') {
        None => {
            table.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = table
                .entry(head.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            if !slot.is_table() {
                *slot = toml::Value::Table(toml::Table::new());
            }
            if let toml::Value::Table(child) = slot {
                insert_dotted_key(child, rest, value);
            }
        }
    }
}
