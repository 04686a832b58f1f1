//! Hands a chosen result back to the plugin that produced it.

use parking_lot::Mutex;
use std::sync::Arc;

use super::history::ExecutionHistory;
use super::item::{AutoCompletionResult, SearchResultItem};
use crate::error::{OrbitError, OrbitResult};
use crate::plugins::{PluginRegistry, SourcePlugin};

pub struct ExecutionDispatcher {
    registry: PluginRegistry,
    history: Mutex<ExecutionHistory>,
}

impl ExecutionDispatcher {
    pub fn new(registry: PluginRegistry, history_capacity: usize) -> Self {
        Self {
            registry,
            history: Mutex::new(ExecutionHistory::new(history_capacity)),
        }
    }

    /// The live plugin owning `item`. Disabled plugins are not live.
    fn resolve(&self, item: &SearchResultItem) -> OrbitResult<&Arc<SourcePlugin>> {
        let plugin_type = item.origin_plugin_type;
        self.registry
            .get(plugin_type)
            .filter(|plugin| plugin.is_enabled())
            .ok_or(OrbitError::UnknownPlugin(plugin_type))
    }

    /// Execute `item`; on success `user_input` is appended to the history.
    pub async fn execute(
        &self,
        user_input: &str,
        item: &SearchResultItem,
        privileged: bool,
    ) -> OrbitResult<()> {
        let plugin = self.resolve(item)?;
        log::debug!(
            "Executing '{}' via {} (privileged: {})",
            item.name,
            plugin.plugin_type(),
            privileged
        );

        plugin.execute(item, privileged).await?;
        self.history.lock().add(user_input);
        Ok(())
    }

    pub async fn auto_complete(&self, item: &SearchResultItem) -> OrbitResult<AutoCompletionResult> {
        self.resolve(item)?.auto_complete(item).await
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        self.resolve(item)?.open_location(item).await
    }

    pub fn previous_input(&self) -> Option<String> {
        self.history.lock().previous().map(String::from)
    }

    pub fn next_input(&self) -> Option<String> {
        self.history.lock().next().map(String::from)
    }

    pub fn set_history_capacity(&self, capacity: usize) {
        let mut history = self.history.lock();
        if history.capacity() != capacity {
            history.set_capacity(capacity);
        }
    }

    /// Past inputs, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().entries().map(String::from).collect()
    }
}
