//! Search plugins - the data sources the engine aggregates.
//!
//! Every source is one variant of [`SourcePlugin`], a closed set dispatched
//! through a single capability interface. Plugins come in two classes:
//!
//! - **Indexed** plugins (programs, files, custom shortcuts, built-in commands)
//!   keep a cached index that the router fuzzy-ranks for every query.
//! - **Exclusive** plugins (command line, web search, settings, web URL) are
//!   triggered by input syntax; when one matches, it alone answers the query.
//!
//! Indexes are rebuilt into a fresh vector and swapped in whole through
//! [`IndexCell`], so a reader sees either the old or the new index.

pub mod built_in_commands;
pub mod command_line;
pub mod custom_shortcuts;
pub mod files;
pub mod operating_system_settings;
pub mod programs;
pub mod web_search;
pub mod web_url;

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::Config;
use crate::core::item::{AutoCompletionResult, PluginType, SearchResultItem};
use crate::core::notify::Notifier;
use crate::error::{OrbitError, OrbitResult};
use crate::i18n::TranslationSet;
use crate::platform::Platform;

pub use built_in_commands::BuiltInCommandsPlugin;
pub use command_line::CommandLinePlugin;
pub use custom_shortcuts::CustomShortcutsPlugin;
pub use files::FilesPlugin;
pub use operating_system_settings::OperatingSystemSettingsPlugin;
pub use programs::{FolderProgramRepository, Program, ProgramRepository, ProgramsPlugin};
pub use web_search::WebSearchPlugin;
pub use web_url::WebUrlPlugin;

/// A plugin's cached, queryable snapshot of its entries.
///
/// `None` until the first successful build.
#[derive(Debug, Default)]
pub struct IndexCell {
    current: RwLock<Option<Arc<[SearchResultItem]>>>,
}

impl IndexCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot; cheap to clone and never observed half-built.
    pub fn snapshot(&self, plugin_type: PluginType) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.current
            .read()
            .clone()
            .ok_or(OrbitError::IndexUnavailable(plugin_type))
    }

    /// Swap in a freshly built index.
    pub fn replace(&self, entries: Vec<SearchResultItem>) {
        let entries: Arc<[SearchResultItem]> = entries.into();
        *self.current.write() = Some(entries);
    }

    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }
}

/// Config reference that is replaced wholesale, never mutated in place.
#[derive(Debug)]
pub struct SharedOptions<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SharedOptions<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.current.read())
    }

    pub fn set(&self, value: T) {
        *self.current.write() = Arc::new(value);
    }
}

/// How the router treats a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginClass {
    /// Always applicable; its index is fuzzy-ranked against the input.
    Indexed,
    /// Syntax-triggered; answers the query alone when its predicate holds.
    Exclusive,
}

/// One data source. See the module docs for the two plugin classes.
pub enum SourcePlugin {
    CustomShortcuts(CustomShortcutsPlugin),
    Programs(ProgramsPlugin),
    Files(FilesPlugin),
    BuiltInCommands(BuiltInCommandsPlugin),
    CommandLine(CommandLinePlugin),
    WebSearch(WebSearchPlugin),
    OperatingSystemSettings(OperatingSystemSettingsPlugin),
    WebUrl(WebUrlPlugin),
}

macro_rules! dispatch {
    ($self:expr, $plugin:ident => $body:expr) => {
        match $self {
            SourcePlugin::CustomShortcuts($plugin) => $body,
            SourcePlugin::Programs($plugin) => $body,
            SourcePlugin::Files($plugin) => $body,
            SourcePlugin::BuiltInCommands($plugin) => $body,
            SourcePlugin::CommandLine($plugin) => $body,
            SourcePlugin::WebSearch($plugin) => $body,
            SourcePlugin::OperatingSystemSettings($plugin) => $body,
            SourcePlugin::WebUrl($plugin) => $body,
        }
    };
}

impl SourcePlugin {
    pub fn plugin_type(&self) -> PluginType {
        match self {
            SourcePlugin::CustomShortcuts(_) => PluginType::CustomShortcuts,
            SourcePlugin::Programs(_) => PluginType::Programs,
            SourcePlugin::Files(_) => PluginType::Files,
            SourcePlugin::BuiltInCommands(_) => PluginType::BuiltInCommands,
            SourcePlugin::CommandLine(_) => PluginType::CommandLine,
            SourcePlugin::WebSearch(_) => PluginType::WebSearch,
            SourcePlugin::OperatingSystemSettings(_) => PluginType::OperatingSystemSettings,
            SourcePlugin::WebUrl(_) => PluginType::WebUrl,
        }
    }

    pub fn class(&self) -> PluginClass {
        match self {
            SourcePlugin::CustomShortcuts(_)
            | SourcePlugin::Programs(_)
            | SourcePlugin::Files(_)
            | SourcePlugin::BuiltInCommands(_) => PluginClass::Indexed,
            SourcePlugin::CommandLine(_)
            | SourcePlugin::WebSearch(_)
            | SourcePlugin::OperatingSystemSettings(_)
            | SourcePlugin::WebUrl(_) => PluginClass::Exclusive,
        }
    }

    pub fn is_enabled(&self) -> bool {
        dispatch!(self, p => p.is_enabled())
    }

    /// Whether this plugin applies to `input`. Indexed plugins always apply.
    pub fn is_valid(&self, input: &str) -> bool {
        match self {
            SourcePlugin::CommandLine(p) => p.is_valid(input),
            SourcePlugin::WebSearch(p) => p.is_valid(input),
            SourcePlugin::OperatingSystemSettings(p) => p.is_valid(input),
            SourcePlugin::WebUrl(p) => p.is_valid(input),
            _ => true,
        }
    }

    /// Read the cached index. Fails with `IndexUnavailable` before the first build.
    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        dispatch!(self, p => p.get_all())
    }

    /// Results of an exclusive plugin for `input`.
    ///
    /// Indexed plugins return their whole index; ranking happens in the router.
    pub fn search(&self, input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        match self {
            SourcePlugin::CommandLine(p) => p.search(input),
            SourcePlugin::WebSearch(p) => p.search(input),
            SourcePlugin::OperatingSystemSettings(p) => p.search(input),
            SourcePlugin::WebUrl(p) => p.search(input),
            _ => Ok(self.get_all()?.to_vec()),
        }
    }

    /// Whether the plugin keeps an index that `refresh_index` rebuilds.
    pub fn has_index(&self) -> bool {
        !matches!(
            self,
            SourcePlugin::CommandLine(_) | SourcePlugin::WebSearch(_) | SourcePlugin::WebUrl(_)
        )
    }

    /// Rebuild the index from its authoritative source and swap it in.
    pub async fn refresh_index(&self) -> OrbitResult<()> {
        match self {
            SourcePlugin::CustomShortcuts(p) => p.refresh_index().await,
            SourcePlugin::Programs(p) => p.refresh_index().await,
            SourcePlugin::Files(p) => p.refresh_index().await,
            SourcePlugin::BuiltInCommands(p) => p.refresh_index().await,
            SourcePlugin::OperatingSystemSettings(p) => p.refresh_index().await,
            // Stateless sources have nothing to rebuild
            SourcePlugin::CommandLine(_) | SourcePlugin::WebSearch(_) | SourcePlugin::WebUrl(_) => {
                Ok(())
            }
        }
    }

    /// Drop derived artifacts without invalidating the index.
    pub async fn clear_cache(&self) -> OrbitResult<()> {
        match self {
            SourcePlugin::Programs(p) => p.clear_cache().await,
            _ => Ok(()),
        }
    }

    pub async fn execute(&self, item: &SearchResultItem, privileged: bool) -> OrbitResult<()> {
        dispatch!(self, p => p.execute(item, privileged).await)
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        if !item.open_location_supported {
            return Err(self.not_supported("open location"));
        }

        match self {
            SourcePlugin::Programs(p) => p.open_location(item).await,
            SourcePlugin::Files(p) => p.open_location(item).await,
            SourcePlugin::CustomShortcuts(p) => p.open_location(item).await,
            _ => Err(self.not_supported("open location")),
        }
    }

    pub async fn auto_complete(&self, item: &SearchResultItem) -> OrbitResult<AutoCompletionResult> {
        if !item.auto_completion_supported {
            return Err(self.not_supported("auto completion"));
        }

        match self {
            SourcePlugin::Files(p) => p.auto_complete(item),
            _ => Err(self.not_supported("auto completion")),
        }
    }

    /// Swap in the plugin's slice of `config`. Never blocks readers of the index.
    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        dispatch!(self, p => p.update_config(config, translation))
    }

    fn not_supported(&self, capability: &'static str) -> OrbitError {
        OrbitError::NotSupported {
            plugin: self.plugin_type(),
            capability,
        }
    }
}

/// The live plugin set, in registration order.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<SourcePlugin>>,
}

impl PluginRegistry {
    /// Register plugins in the given order. Later duplicates of a type are ignored.
    pub fn new(plugins: Vec<SourcePlugin>) -> Self {
        let mut registered: Vec<Arc<SourcePlugin>> = Vec::with_capacity(plugins.len());
        for plugin in plugins {
            if registered.iter().any(|p| p.plugin_type() == plugin.plugin_type()) {
                log::warn!("Plugin {} registered twice, ignoring", plugin.plugin_type());
                continue;
            }
            registered.push(Arc::new(plugin));
        }
        Self {
            plugins: registered,
        }
    }

    /// Every built-in plugin, configured from `config`.
    pub fn standard(
        config: &Config,
        translation: &TranslationSet,
        platform: Arc<dyn Platform>,
        notifier: Notifier,
        programs: Arc<dyn ProgramRepository>,
    ) -> Self {
        Self::new(vec![
            SourcePlugin::CustomShortcuts(CustomShortcutsPlugin::new(
                config.custom_shortcuts.clone(),
                Arc::clone(&platform),
            )),
            SourcePlugin::Programs(ProgramsPlugin::new(
                config.programs.clone(),
                programs,
                Arc::clone(&platform),
            )),
            SourcePlugin::Files(FilesPlugin::new(config.files.clone(), Arc::clone(&platform))),
            SourcePlugin::BuiltInCommands(BuiltInCommandsPlugin::new(
                config.built_in_commands.clone(),
                translation.clone(),
                Arc::clone(&platform),
                notifier,
            )),
            SourcePlugin::CommandLine(CommandLinePlugin::new(
                config.command_line.clone(),
                translation.clone(),
                Arc::clone(&platform),
            )),
            SourcePlugin::WebSearch(WebSearchPlugin::new(
                config.web_search.clone(),
                translation.clone(),
                Arc::clone(&platform),
            )),
            SourcePlugin::OperatingSystemSettings(OperatingSystemSettingsPlugin::new(
                config.operating_system_settings.clone(),
                translation.clone(),
                Arc::clone(&platform),
            )),
            SourcePlugin::WebUrl(WebUrlPlugin::new(
                config.web_url.clone(),
                translation.clone(),
                platform,
            )),
        ])
    }

    pub fn get(&self, plugin_type: PluginType) -> Option<&Arc<SourcePlugin>> {
        self.plugins.iter().find(|p| p.plugin_type() == plugin_type)
    }

    /// All plugins with their registration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<SourcePlugin>)> {
        self.plugins.iter().enumerate()
    }

    /// Enabled plugins with their registration order.
    pub fn enabled(&self) -> impl Iterator<Item = (usize, &Arc<SourcePlugin>)> {
        self.iter().filter(|(_, p)| p.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
