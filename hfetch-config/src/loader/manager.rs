use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::constants::paths::{CONFIG_FILE_NAME, CONFIG_PATH_ENV_VAR, USER_CONFIG_DIR};
use crate::loader::config::HfetchConfig;
use crate::loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};

/// Loads, merges and validates configuration layers.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub(crate) config: HfetchConfig,
    pub(crate) layer_stack: ConfigLayerStack,
}

/// Which file sits above the user layer.
#[derive(Debug, Clone)]
pub(crate) enum PrimarySource {
    /// Optional `hfetch.toml` inside this directory.
    Workspace(PathBuf),
    /// Required file at this path.
    Explicit(PathBuf),
}

impl ConfigManager {
    /// Load from `HFETCH_CONFIG_PATH` if set, otherwise from the current directory.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path_from_env() {
            return Self::load_from_file(&config_path).with_context(|| {
                format!(
                    "Failed to load configuration from {CONFIG_PATH_ENV_VAR}={}",
                    config_path.display()
                )
            });
        }

        Self::load_from_workspace(std::env::current_dir()?)
    }

    /// Non-blank value of `HFETCH_CONFIG_PATH`.
    pub fn config_path_from_env() -> Option<PathBuf> {
        let value = std::env::var(CONFIG_PATH_ENV_VAR).ok()?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    /// Load the user layer plus `hfetch.toml` from `workspace` when present.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let stack = Self::collect_layers(
            Self::default_user_config_path().as_deref(),
            &PrimarySource::Workspace(workspace.as_ref().to_path_buf()),
        )?;
        Self::from_layers(stack)
    }

    /// Load the user layer plus the given file, which must exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let stack = Self::collect_layers(
            Self::default_user_config_path().as_deref(),
            &PrimarySource::Explicit(path.as_ref().to_path_buf()),
        )?;
        Self::from_layers(stack)
    }

    /// `<platform config dir>/hfetch/hfetch.toml`
    pub fn default_user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    pub(crate) fn collect_layers(
        user_config: Option<&Path>,
        primary: &PrimarySource,
    ) -> Result<ConfigLayerStack> {
        let mut stack = ConfigLayerStack::default();

        // A broken user file should not block a run configured elsewhere.
        if let Some(user_path) = user_config.filter(|path| path.is_file()) {
            match Self::load_toml_from_file(user_path) {
                Ok(toml) => stack.push(ConfigLayerEntry::new(
                    ConfigLayerSource::User {
                        file: user_path.to_path_buf(),
                    },
                    toml,
                )),
                Err(err) => {
                    tracing::warn!(
                        path = %user_path.display(),
                        error = %err,
                        "skipping unreadable user configuration"
                    );
                }
            }
        }

        match primary {
            PrimarySource::Workspace(workspace) => {
                let workspace_file = workspace.join(CONFIG_FILE_NAME);
                if workspace_file.is_file() {
                    let toml = Self::load_toml_from_file(&workspace_file)?;
                    stack.push(ConfigLayerEntry::new(
                        ConfigLayerSource::Workspace {
                            file: workspace_file,
                        },
                        toml,
                    ));
                }
            }
            PrimarySource::Explicit(file) => {
                if !file.is_file() {
                    bail!("Configuration file does not exist: {}", file.display());
                }
                let toml = Self::load_toml_from_file(file)?;
                stack.push(ConfigLayerEntry::new(
                    ConfigLayerSource::Explicit { file: file.clone() },
                    toml,
                ));
            }
        }

        Ok(stack)
    }

    pub(crate) fn from_layers(layer_stack: ConfigLayerStack) -> Result<Self> {
        let config = if layer_stack.is_empty() {
            HfetchConfig::default()
        } else {
            layer_stack
                .effective_config()
                .try_into()
                .context("Failed to deserialize effective configuration")?
        };

        config
            .validate()
            .context("Configuration failed validation")?;

        tracing::debug!(
            layers = layer_stack.layers().len(),
            source = ?layer_stack.last_file(),
            "configuration loaded"
        );

        Ok(Self {
            config,
            layer_stack,
        })
    }

    fn load_toml_from_file(path: &Path) -> Result<toml::Value> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let value: toml::Value = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(value)
    }

    pub fn config(&self) -> &HfetchConfig {
        &self.config
    }

    pub fn into_config(self) -> HfetchConfig {
        self.config
    }

    /// Highest-precedence file that contributed to the configuration.
    pub fn config_path(&self) -> Option<&Path> {
        self.layer_stack.last_file()
    }

    pub fn layer_stack(&self) -> &ConfigLayerStack {
        &self.layer_stack
    }
}
