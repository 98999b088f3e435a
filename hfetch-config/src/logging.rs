//! Logging configuration

use serde::{Deserialize, Serialize};

use crate::constants::logging::DEFAULT_TRACE_TARGETS;

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown levels fall back to the default instead of failing the whole load.
impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit tracing output to stderr.
    #[serde(default)]
    pub enable_tracing: bool,

    /// Trace level (error, warn, info, debug, trace)
    #[serde(default)]
    pub trace_level: TraceLevel,

    /// Tracing targets to enable, e.g. "hfetch_core::transport".
    #[serde(default)]
    pub trace_targets: Vec<String>,
}

impl LoggingConfig {
    /// Filter directive in `EnvFilter` syntax, e.g. `hfetch=debug,hfetch_core=debug`.
    pub fn filter_directive(&self) -> String {
        let level = self.trace_level.as_str();
        if self.trace_targets.is_empty() {
            DEFAULT_TRACE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(",")
        } else {
            self.trace_targets
                .iter()
                .map(|target| format!("{}={level}", target.trim()))
                .collect::<Vec<_>>()
                .join(",")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_info() {
        let config: LoggingConfig = toml::from_str("trace_level = \"loud\"").unwrap();
        assert_eq!(config.trace_level, TraceLevel::Info);
    }

    #[test]
    fn level_parsing_ignores_case() {
        assert_eq!(TraceLevel::parse(" DEBUG "), Some(TraceLevel::Debug));
        assert_eq!(TraceLevel::parse("nope"), None);
    }

    #[test]
    fn filter_directive_uses_default_targets() {
        let config = LoggingConfig {
            enable_tracing: true,
            trace_level: TraceLevel::Debug,
            trace_targets: Vec::new(),
        };
        assert_eq!(
            config.filter_directive(),
            "hfetch=debug,hfetch_core=debug,hfetch_config=debug"
        );
    }

    #[test]
    fn filter_directive_uses_configured_targets() {
        let config = LoggingConfig {
            enable_tracing: true,
            trace_level: TraceLevel::Warn,
            trace_targets: vec!["hfetch_core::transport".to_string()],
        };
        assert_eq!(config.filter_directive(), "hfetch_core::transport=warn");
    }
}
