//! Core engine module - plugin-agnostic search and execution logic.
//!
//! This module contains everything between the UI layer and the plugins:
//! - Result types shared by every plugin
//! - Ranking and query routing
//! - Execution dispatch with input history
//! - Index refresh, periodic rescans and host notifications
//! - The execution log backing favorites

pub mod dispatch;
pub mod engine;
pub mod frecency;
pub mod history;
pub mod item;
pub mod notify;
pub mod ranking;
pub mod refresh;
pub mod router;
pub mod scheduler;

pub use engine::SearchEngine;
pub use item::{AutoCompletionResult, ExecutionOutcome, IconRef, PluginType, SearchResultItem};
pub use notify::{HostCommand, Notification, Notifier, Severity};
