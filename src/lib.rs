//! Orbit - plugin-based search and execution engine for a desktop launcher.
//!
//! Orbit answers every keystroke of a launcher window: it routes the query to
//! a set of search plugins (installed programs, files, web search, URLs,
//! shortcuts, shell commands, system settings and built-in commands), ranks
//! and merges their answers, and executes the result the user picks.
//!
//! # Architecture
//!
//! The library is organized into these main modules:
//!
//! - [`cli`] - Command-line front end over the engine
//! - [`config`] - Configuration loading, validation and persistence
//! - [`core`] - Ranking, routing, dispatch, index refresh and the engine facade
//! - [`plugins`] - The built-in search plugins and their registry
//! - [`executor`] - Execution actions handed to the platform
//! - [`platform`] - Platform abstraction layer (Linux, macOS, Windows)
//! - [`i18n`] - Translated labels for plugin-generated results
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use orbit::{ExecutionLog, FileConfigStore, Notifier, SearchEngine};
//! use orbit::i18n::BuiltInTranslations;
//!
//! let (notifier, _notifications) = Notifier::channel();
//! let engine = SearchEngine::new(
//!     Arc::new(FileConfigStore::default()),
//!     Arc::new(BuiltInTranslations),
//!     orbit::platform::current(),
//!     notifier,
//!     ExecutionLog::load_from(&ExecutionLog::default_path()),
//! );
//!
//! engine.refresh_all_indexes().await?;
//! let results = engine.search("fire")?;
//! engine.execute("fire", &results[0], false).await?;
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod executor;
pub mod i18n;
pub mod platform;
pub mod plugins;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigStore, FileConfigStore, MemoryConfigStore};
pub use core::frecency::ExecutionLog;
pub use core::{
    AutoCompletionResult, ExecutionOutcome, Notification, Notifier, PluginType, SearchEngine,
    SearchResultItem,
};
pub use error::{OrbitError, OrbitResult};
pub use executor::ExecutionAction;
pub use platform::{Platform, SystemCommand};
pub use plugins::{PluginRegistry, SourcePlugin};
