/// Default target used when neither the command line nor a config file names one.
pub const DEFAULT_TARGET_URL: &str = "https://api.github.com/";

/// Prefix the legacy string API puts in front of a failure description.
pub const LEGACY_ERROR_PREFIX: &str = "Error: ";

pub mod paths {
    /// File name looked up in the workspace and the user config directory.
    pub const CONFIG_FILE_NAME: &str = "hfetch.toml";
    /// Sub-directory of the platform config dir holding the user layer.
    pub const USER_CONFIG_DIR: &str = "hfetch";
    /// Environment variable pointing at an explicit config file.
    pub const CONFIG_PATH_ENV_VAR: &str = "HFETCH_CONFIG_PATH";
}

pub mod logging {
    /// Targets enabled when `[logging].trace_targets` is empty.
    pub const DEFAULT_TRACE_TARGETS: &[&str] = &["hfetch", "hfetch_core", "hfetch_config"];
}
