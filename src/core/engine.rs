//! The single entry point the UI layer talks to.
//!
//! `SearchEngine` composes the query router, execution dispatcher, index
//! refresher and rescan scheduler over one plugin registry, and owns the live
//! configuration. Config is swapped as a whole, never edited in place.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use super::dispatch::ExecutionDispatcher;
use super::frecency::ExecutionLog;
use super::item::{AutoCompletionResult, ExecutionOutcome, PluginType, SearchResultItem};
use super::notify::Notifier;
use super::refresh::IndexRefresher;
use super::router::QueryRouter;
use super::scheduler::RescanScheduler;
use crate::config::{Config, ConfigStore};
use crate::error::OrbitResult;
use crate::i18n::{TranslationProvider, TranslationSet};
use crate::platform::Platform;
use crate::plugins::{FolderProgramRepository, PluginClass, PluginRegistry, SourcePlugin};

pub struct SearchEngine {
    config: RwLock<Arc<Config>>,
    translation: RwLock<Arc<TranslationSet>>,
    config_store: Arc<dyn ConfigStore>,
    translations: Arc<dyn TranslationProvider>,
    notifier: Notifier,
    registry: PluginRegistry,
    router: QueryRouter,
    refresher: IndexRefresher,
    scheduler: RescanScheduler,
    dispatcher: ExecutionDispatcher,
    execution_log: Mutex<ExecutionLog>,
}

impl SearchEngine {
    /// Engine over the built-in plugins, launching through `platform`.
    ///
    /// Arms the rescan timer, so it must be created inside a Tokio runtime.
    /// Indexes start empty; call [`SearchEngine::refresh_all_indexes`] once.
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        translations: Arc<dyn TranslationProvider>,
        platform: Arc<dyn Platform>,
        notifier: Notifier,
        execution_log: ExecutionLog,
    ) -> Self {
        let plugin_notifier = notifier.clone();
        Self::with_registry(
            config_store,
            translations,
            notifier,
            execution_log,
            move |config, translation| {
                PluginRegistry::standard(
                    config,
                    translation,
                    platform,
                    plugin_notifier,
                    Arc::new(FolderProgramRepository),
                )
            },
        )
    }

    /// Engine over a custom plugin set, built from the loaded config.
    pub fn with_registry<F>(
        config_store: Arc<dyn ConfigStore>,
        translations: Arc<dyn TranslationProvider>,
        notifier: Notifier,
        execution_log: ExecutionLog,
        build_registry: F,
    ) -> Self
    where
        F: FnOnce(&Config, &TranslationSet) -> PluginRegistry,
    {
        let mut config = config_store.get_config();
        config.validate();
        let translation = translations.get_strings(config.general.language);

        let registry = build_registry(&config, &translation);
        for (_, plugin) in registry.iter() {
            plugin.update_config(&config, &translation);
        }

        let refresher = IndexRefresher::new(notifier.clone());
        let scheduler = RescanScheduler::new(refresher.clone(), registry.clone());
        scheduler.arm(
            config.general.rescan_enabled,
            config.general.rescan_interval_in_seconds,
        );

        log::info!(
            "Search engine ready with {} plugins on {}",
            registry.len(),
            crate::platform::name()
        );

        Self {
            dispatcher: ExecutionDispatcher::new(registry.clone(), config.general.history_capacity),
            config: RwLock::new(Arc::new(config)),
            translation: RwLock::new(Arc::new(translation)),
            config_store,
            translations,
            notifier,
            registry,
            router: QueryRouter::new(),
            refresher,
            scheduler,
            execution_log: Mutex::new(execution_log),
        }
    }

    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config.read())
    }

    pub fn translation(&self) -> Arc<TranslationSet> {
        Arc::clone(&self.translation.read())
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn is_rescan_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Ranked results for `user_input`; favorites for blank input.
    pub fn search(&self, user_input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        if user_input.trim().is_empty() {
            return Ok(self.get_favorites());
        }

        let config = self.config();
        let translation = self.translation();
        self.router.search(
            &self.registry,
            user_input,
            config.appearance.max_search_results_per_page,
            &translation,
        )
    }

    /// The most frecent executed items that still exist.
    ///
    /// Indexed items are resolved against the current index so renamed or
    /// removed entries drop out; items of syntax-triggered plugins are
    /// returned as they were executed.
    pub fn get_favorites(&self) -> Vec<SearchResultItem> {
        let count = self.config().general.favorites_count;
        let log = self.execution_log.lock();

        log.ranked()
            .into_iter()
            .filter_map(|entry| {
                let plugin = self
                    .registry
                    .get(entry.item.origin_plugin_type)
                    .filter(|p| p.is_enabled())?;
                live_item(plugin, &entry.item)
            })
            .take(count)
            .collect()
    }

    /// Execute `item`, chosen while `user_input` was typed.
    ///
    /// On success the input joins the history and the item the execution log.
    pub async fn execute(
        &self,
        user_input: &str,
        item: &SearchResultItem,
        privileged: bool,
    ) -> OrbitResult<ExecutionOutcome> {
        self.dispatcher.execute(user_input, item, privileged).await?;

        let config = self.config();
        if config.general.log_execution {
            self.execution_log.lock().log_usage(item);
        }

        Ok(ExecutionOutcome {
            hide_main_window: item.hide_main_window_after_execution
                && config.general.hide_main_window_after_execution,
        })
    }

    pub async fn auto_complete(&self, item: &SearchResultItem) -> OrbitResult<AutoCompletionResult> {
        self.dispatcher.auto_complete(item).await
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        self.dispatcher.open_location(item).await
    }

    pub fn previous_input(&self) -> Option<String> {
        self.dispatcher.previous_input()
    }

    pub fn next_input(&self) -> Option<String> {
        self.dispatcher.next_input()
    }

    pub async fn refresh_all_indexes(&self) -> OrbitResult<()> {
        let result = self.refresher.refresh_all(&self.registry).await;
        self.report(&result, |t| t.successfully_refreshed_indexes.clone());
        result
    }

    pub async fn refresh_index_by_plugin(&self, plugin_type: PluginType) -> OrbitResult<()> {
        let result = self.refresher.refresh_one(&self.registry, plugin_type).await;
        self.report(&result, |t| t.successfully_refreshed_indexes.clone());
        result
    }

    pub async fn clear_caches(&self) -> OrbitResult<()> {
        let result = self.refresher.clear_caches(&self.registry).await;
        self.report(&result, |t| t.successfully_cleared_caches.clone());
        result
    }

    /// Forget every logged execution; favorites become empty.
    pub fn clear_execution_log(&self) -> OrbitResult<()> {
        self.execution_log.lock().clear()
    }

    /// Persist and apply a new configuration.
    ///
    /// Only plugins whose enablement or options changed get the new config and
    /// a refresh; the rescan timer is re-armed only when its own fields
    /// changed. Anything else (window width, result count) takes effect on
    /// the next query without touching an index.
    pub async fn update_config(&self, new_config: Config) -> OrbitResult<()> {
        let mut new_config = new_config;
        new_config.validate();

        let old_config = self.config();
        if *old_config == new_config {
            log::debug!("Config unchanged");
            return Ok(());
        }

        self.config_store.save_config(&new_config)?;

        let translation = if old_config.general.language != new_config.general.language {
            Arc::new(self.translations.get_strings(new_config.general.language))
        } else {
            self.translation()
        };

        let changed: Vec<PluginType> = PluginType::ALL
            .into_iter()
            .filter(|t| {
                old_config.plugin_enabled(*t) != new_config.plugin_enabled(*t)
                    || old_config.plugin_options_changed(&new_config, *t)
            })
            .collect();

        *self.translation.write() = Arc::clone(&translation);
        *self.config.write() = Arc::new(new_config.clone());

        for plugin_type in &changed {
            if let Some(plugin) = self.registry.get(*plugin_type) {
                plugin.update_config(&new_config, &translation);
            }
        }

        self.dispatcher
            .set_history_capacity(new_config.general.history_capacity);

        if old_config.rescan_changed(&new_config) {
            self.scheduler.arm(
                new_config.general.rescan_enabled,
                new_config.general.rescan_interval_in_seconds,
            );
        }

        for plugin_type in changed {
            let indexed = self.registry.get(plugin_type).is_some_and(|p| p.has_index());
            if !indexed || !new_config.plugin_enabled(plugin_type) {
                continue;
            }
            if let Err(e) = self.refresher.refresh_one(&self.registry, plugin_type).await {
                log::error!("Failed to refresh {} after config change: {}", plugin_type, e);
                self.notifier.error(e.to_string());
            }
        }

        self.notifier
            .info(translation.successfully_updated_config.clone());
        Ok(())
    }

    /// Stop the rescan timer and persist state before exit.
    pub async fn shutdown(&self) -> OrbitResult<()> {
        self.scheduler.disarm();

        if self.config().general.clear_caches_on_exit {
            if let Err(e) = self.refresher.clear_caches(&self.registry).await {
                log::error!("Failed to clear caches on exit: {}", e);
            }
        }

        self.execution_log.lock().flush()
    }

    fn report<T>(&self, result: &OrbitResult<T>, success: impl FnOnce(&TranslationSet) -> String) {
        match result {
            Ok(_) => self.notifier.info(success(&*self.translation())),
            Err(e) => self.notifier.error(e.to_string()),
        }
    }
}

fn live_item(plugin: &SourcePlugin, logged: &SearchResultItem) -> Option<SearchResultItem> {
    match plugin.class() {
        PluginClass::Exclusive => Some(logged.clone()),
        PluginClass::Indexed => plugin
            .get_all()
            .ok()?
            .iter()
            .find(|item| item.execution_argument == logged.execution_argument)
            .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::core::notify::{Notification, Severity};
    use crate::core::router::NO_RESULTS_ARGUMENT;
    use crate::error::OrbitError;
    use crate::i18n::{BuiltInTranslations, Language};
    use crate::platform::testing::RecordingPlatform;
    use crate::plugins::programs::testing::{program, StaticProgramRepository};
    use tokio::sync::mpsc::UnboundedReceiver;

    struct Fixture {
        engine: SearchEngine,
        platform: Arc<RecordingPlatform>,
        programs: Arc<StaticProgramRepository>,
        store: Arc<MemoryConfigStore>,
        rx: UnboundedReceiver<Notification>,
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        // Keep tests away from the real home directory
        config.files.enabled = false;
        config
    }

    fn fixture_with(config: Config) -> Fixture {
        let platform = Arc::new(RecordingPlatform::default());
        let programs = Arc::new(StaticProgramRepository::new(vec![
            program("Calculator", &["math"]),
            program("Firefox", &["browser"]),
        ]));
        let store = Arc::new(MemoryConfigStore::new(config));
        let (notifier, rx) = Notifier::channel();

        let registry_platform: Arc<dyn Platform> = platform.clone();
        let registry_programs = programs.clone();
        let registry_notifier = notifier.clone();
        let engine = SearchEngine::with_registry(
            store.clone(),
            Arc::new(BuiltInTranslations),
            notifier,
            ExecutionLog::new(),
            move |config, translation| {
                PluginRegistry::standard(
                    config,
                    translation,
                    registry_platform,
                    registry_notifier,
                    registry_programs,
                )
            },
        );

        Fixture {
            engine,
            platform,
            programs,
            store,
            rx,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(test_config())
    }

    fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            received.push(notification);
        }
        received
    }

    #[tokio::test]
    async fn test_web_search_query() {
        let f = fixture();

        let results = f.engine.search("g hello").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].origin_plugin_type, PluginType::WebSearch);
        assert_eq!(results[0].execution_argument, "https://google.com/search?q=hello");
    }

    #[tokio::test]
    async fn test_refresh_then_search() {
        let mut f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();

        let results = f.engine.search("calc").unwrap();
        assert_eq!(results[0].name, "Calculator");

        let notifications = drain(&mut f.rx);
        assert_eq!(notifications[0], Notification::IndexRefreshStarted);
        assert_eq!(notifications[1], Notification::IndexRefreshCompleted);
        assert!(matches!(
            &notifications[2],
            Notification::Message { severity: Severity::Info, .. }
        ));
    }

    #[tokio::test]
    async fn test_no_results_item_is_not_executable() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();

        let results = f.engine.search("qqqqqq").unwrap();
        assert_eq!(results[0].execution_argument, NO_RESULTS_ARGUMENT);

        let err = f.engine.execute("qqqqqq", &results[0], false).await.unwrap_err();
        assert!(matches!(err, OrbitError::UnknownPlugin(PluginType::Internal)));
        assert_eq!(f.engine.previous_input(), None);
    }

    #[tokio::test]
    async fn test_execute_records_history_and_favorites() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();
        let firefox = f.engine.search("fire").unwrap().remove(0);

        let outcome = f.engine.execute("fire", &firefox, false).await.unwrap();

        assert!(outcome.hide_main_window);
        assert_eq!(f.platform.calls(), vec!["launch:firefox:false"]);
        assert_eq!(f.engine.previous_input().as_deref(), Some("fire"));
        assert_eq!(f.engine.search("  ").unwrap(), vec![firefox]);
    }

    #[tokio::test]
    async fn test_global_hide_setting_wins() {
        let mut config = test_config();
        config.general.hide_main_window_after_execution = false;
        let f = fixture_with(config);
        let item = f.engine.search("g rust").unwrap().remove(0);

        let outcome = f.engine.execute("g rust", &item, false).await.unwrap();

        assert!(!outcome.hide_main_window);
    }

    #[tokio::test]
    async fn test_execution_log_can_be_disabled_and_cleared() {
        let mut config = test_config();
        config.general.log_execution = false;
        let f = fixture_with(config);
        let item = f.engine.search("g rust").unwrap().remove(0);

        f.engine.execute("g rust", &item, false).await.unwrap();
        assert!(f.engine.get_favorites().is_empty());

        let mut config = test_config();
        config.general.log_execution = true;
        f.engine.update_config(config).await.unwrap();
        f.engine.execute("g rust", &item, false).await.unwrap();
        assert_eq!(f.engine.get_favorites().len(), 1);

        f.engine.clear_execution_log().unwrap();
        assert!(f.engine.get_favorites().is_empty());
    }

    #[tokio::test]
    async fn test_window_width_change_refreshes_nothing() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();
        assert_eq!(f.programs.loads(), 1);

        let mut config = test_config();
        config.appearance.window_width = 900;
        f.engine.update_config(config.clone()).await.unwrap();

        assert_eq!(f.programs.loads(), 1);
        assert!(f.engine.is_rescan_armed());
        assert_eq!(f.store.get_config(), config);
    }

    #[tokio::test]
    async fn test_changed_plugin_options_refresh_that_plugin() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();

        let mut config = test_config();
        config.programs.folders = vec!["/opt/apps".to_string()];
        f.engine.update_config(config).await.unwrap();

        assert_eq!(f.programs.loads(), 2);
    }

    #[tokio::test]
    async fn test_disabling_plugin_hides_results_without_refresh() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();

        let mut config = test_config();
        config.programs.enabled = false;
        f.engine.update_config(config).await.unwrap();

        assert_eq!(f.programs.loads(), 1);
        let results = f.engine.search("calc").unwrap();
        assert!(results.iter().all(|r| r.origin_plugin_type != PluginType::Programs));

        f.engine.refresh_all_indexes().await.unwrap();
        assert_eq!(f.programs.loads(), 1);
    }

    #[tokio::test]
    async fn test_disabling_rescan_disarms_scheduler() {
        let f = fixture();
        assert!(f.engine.is_rescan_armed());

        let mut config = test_config();
        config.general.rescan_enabled = false;
        f.engine.update_config(config).await.unwrap();

        assert!(!f.engine.is_rescan_armed());
    }

    #[tokio::test]
    async fn test_language_change_relabels_commands() {
        let f = fixture();
        f.engine.refresh_all_indexes().await.unwrap();

        let mut config = test_config();
        config.general.language = Language::German;
        f.engine.update_config(config).await.unwrap();

        let results = f.engine.search("beenden").unwrap();
        assert_eq!(results[0].name, "Orbit beenden");
        assert_eq!(f.programs.loads(), 1);

        let web = f.engine.search("g hello").unwrap();
        assert_eq!(web[0].name, "Mit Google nach 'hello' suchen");
        let shell = f.engine.search("> ls").unwrap();
        assert_eq!(shell[0].name, TranslationSet::german().run_command_label("ls"));
        let url = f.engine.search("example.com").unwrap();
        assert_eq!(url[0].name, "Im Standardbrowser öffnen");
    }

    #[tokio::test]
    async fn test_unknown_plugin_refresh_fails() {
        let platform: Arc<dyn Platform> = Arc::new(RecordingPlatform::default());
        let engine = SearchEngine::with_registry(
            Arc::new(MemoryConfigStore::new(test_config())),
            Arc::new(BuiltInTranslations),
            Notifier::disabled(),
            ExecutionLog::new(),
            move |config, translation| {
                PluginRegistry::new(vec![SourcePlugin::WebUrl(crate::plugins::WebUrlPlugin::new(
                    config.web_url.clone(),
                    translation.clone(),
                    platform,
                ))])
            },
        );

        assert!(matches!(
            engine.refresh_index_by_plugin(PluginType::Programs).await,
            Err(OrbitError::UnknownPlugin(PluginType::Programs))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_disarms_scheduler() {
        let f = fixture();
        f.engine.shutdown().await.unwrap();
        assert!(!f.engine.is_rescan_armed());
    }
}
