//! Error types for Orbit
//!
//! Provides standardized error handling across the engine.

use thiserror::Error;

use crate::core::item::PluginType;

/// Errors that can occur in Orbit
#[derive(Debug, Error)]
pub enum OrbitError {
    /// A plugin was queried before its first successful index build
    #[error("Index of plugin {0} is not available yet")]
    IndexUnavailable(PluginType),

    /// The target plugin or item lacks the requested capability
    #[error("{capability} is not supported by plugin {plugin}")]
    NotSupported {
        plugin: PluginType,
        capability: &'static str,
    },

    /// No live plugin is registered for the given type
    #[error("No plugin registered for {0}")]
    UnknownPlugin(PluginType),

    /// The OS-level action behind an execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// A plugin could not rebuild its index from its source
    #[error("Failed to refresh index of plugin {plugin}: {message}")]
    IndexRefresh { plugin: PluginType, message: String },

    /// Every applicable plugin failed while answering a query
    #[error("Search is unavailable: every plugin failed")]
    SearchUnavailable,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON (execution log) errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Orbit operations
pub type OrbitResult<T> = Result<T, OrbitError>;
