//! Configuration for `hfetch`.
//!
//! Settings are read from TOML layers (user config directory, workspace file or
//! an explicit path, then runtime overrides) and merged into a single
//! [`HfetchConfig`]. Every key is optional; an empty stack yields the defaults.

pub mod constants;
pub mod fetch;
pub mod logging;
pub mod loader;

pub use fetch::{BodyMode, FetchConfig};
pub use loader::layers::{ConfigLayerEntry, ConfigLayerSource, ConfigLayerStack};
pub use loader::{ConfigBuilder, ConfigManager, HfetchConfig, merge_toml_values};
pub use logging::{LoggingConfig, TraceLevel};
