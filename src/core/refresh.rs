//! Index rebuilds across plugins with per-plugin failure isolation.

use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::item::PluginType;
use super::notify::{Notification, Notifier};
use crate::error::{OrbitError, OrbitResult};
use crate::plugins::{PluginRegistry, SourcePlugin};

/// Announces a refresh and reports its end on every exit path.
struct RefreshGuard<'a> {
    notifier: &'a Notifier,
}

impl<'a> RefreshGuard<'a> {
    fn start(notifier: &'a Notifier) -> Self {
        notifier.send(Notification::IndexRefreshStarted);
        Self { notifier }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.notifier.send(Notification::IndexRefreshCompleted);
    }
}

/// Run `operation` on every plugin concurrently and wait for all of them.
///
/// Failures are logged and isolated. The result is an error only if every
/// plugin failed, carrying the first failure in registration order.
async fn fan_out<'a, F, Fut>(
    plugins: impl Iterator<Item = (usize, &'a Arc<SourcePlugin>)>,
    operation_name: &'static str,
    operation: F,
) -> OrbitResult<()>
where
    F: Fn(Arc<SourcePlugin>) -> Fut,
    Fut: Future<Output = OrbitResult<()>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for (order, plugin) in plugins {
        let plugin_type = plugin.plugin_type();
        let pending = operation(Arc::clone(plugin));
        tasks.spawn(async move { (order, plugin_type, pending.await) });
    }

    let total = tasks.len();
    let mut failures: Vec<(usize, OrbitError)> = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, plugin_type, Ok(()))) => {
                log::debug!("{} succeeded for {}", operation_name, plugin_type);
            }
            Ok((order, plugin_type, Err(e))) => {
                log::error!("{} failed for {}: {}", operation_name, plugin_type, e);
                failures.push((order, e));
            }
            Err(e) => {
                log::error!("{} task panicked: {}", operation_name, e);
                failures.push((usize::MAX, OrbitError::ExecutionFailed(e.to_string())));
            }
        }
    }

    let failed = failures.len();
    if total > 0 && failed == total {
        failures.sort_by_key(|(order, _)| *order);
        if let Some((_, first)) = failures.into_iter().next() {
            return Err(first);
        }
    }

    log::info!("{}: {} of {} plugins succeeded", operation_name, total - failed, total);
    Ok(())
}

#[derive(Clone, Default)]
pub struct IndexRefresher {
    notifier: Notifier,
}

impl IndexRefresher {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Rebuild every enabled plugin's index concurrently.
    ///
    /// Waits for all plugins to settle and fails only if every one failed.
    pub async fn refresh_all(&self, registry: &PluginRegistry) -> OrbitResult<()> {
        let _guard = RefreshGuard::start(&self.notifier);
        fan_out(registry.enabled(), "Index refresh", |plugin| async move {
            plugin.refresh_index().await
        })
        .await
    }

    /// Drop every plugin's derived artifacts, with the same isolation as `refresh_all`.
    pub async fn clear_caches(&self, registry: &PluginRegistry) -> OrbitResult<()> {
        fan_out(registry.iter(), "Cache clearing", |plugin| async move {
            plugin.clear_cache().await
        })
        .await
    }

    /// Rebuild one plugin's index. Disabled plugins are skipped.
    pub async fn refresh_one(
        &self,
        registry: &PluginRegistry,
        plugin_type: PluginType,
    ) -> OrbitResult<()> {
        let plugin = registry
            .get(plugin_type)
            .ok_or(OrbitError::UnknownPlugin(plugin_type))?;

        if !plugin.is_enabled() {
            log::debug!("Not refreshing disabled plugin {}", plugin_type);
            return Ok(());
        }

        let _guard = RefreshGuard::start(&self.notifier);
        plugin.refresh_index().await?;
        log::debug!("Refreshed index of {}", plugin_type);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ProgramsOptions};
    use crate::i18n::TranslationSet;
    use crate::platform::testing::RecordingPlatform;
    use crate::plugins::programs::testing::{program, StaticProgramRepository};
    use crate::plugins::{BuiltInCommandsPlugin, ProgramsPlugin};

    fn programs(repository: Arc<StaticProgramRepository>) -> SourcePlugin {
        SourcePlugin::Programs(ProgramsPlugin::new(
            ProgramsOptions::default(),
            repository,
            Arc::new(RecordingPlatform::default()),
        ))
    }

    fn built_in_commands() -> SourcePlugin {
        SourcePlugin::BuiltInCommands(BuiltInCommandsPlugin::new(
            Default::default(),
            TranslationSet::english(),
            Arc::new(RecordingPlatform::default()),
            Notifier::disabled(),
        ))
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
        let mut received = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            received.push(notification);
        }
        received
    }

    #[tokio::test]
    async fn test_one_failure_does_not_fail_refresh_all() {
        let registry = PluginRegistry::new(vec![
            programs(Arc::new(StaticProgramRepository::failing())),
            built_in_commands(),
        ]);

        IndexRefresher::default().refresh_all(&registry).await.unwrap();

        let commands = registry.get(PluginType::BuiltInCommands).unwrap();
        assert!(!commands.get_all().unwrap().is_empty());
        assert!(registry.get(PluginType::Programs).unwrap().get_all().is_err());
    }

    #[tokio::test]
    async fn test_every_failure_fails_refresh_all() {
        let registry = PluginRegistry::new(vec![programs(Arc::new(
            StaticProgramRepository::failing(),
        ))]);

        let err = IndexRefresher::default().refresh_all(&registry).await.unwrap_err();

        assert!(matches!(err, OrbitError::IndexRefresh { plugin: PluginType::Programs, .. }));
    }

    #[tokio::test]
    async fn test_completion_is_reported_on_failure() {
        let (notifier, mut rx) = Notifier::channel();
        let registry = PluginRegistry::new(vec![programs(Arc::new(
            StaticProgramRepository::failing(),
        ))]);

        let _ = IndexRefresher::new(notifier).refresh_all(&registry).await;

        assert_eq!(
            drain(&mut rx),
            vec![Notification::IndexRefreshStarted, Notification::IndexRefreshCompleted]
        );
    }

    #[tokio::test]
    async fn test_disabled_plugins_are_not_refreshed() {
        let repository = Arc::new(StaticProgramRepository::new(vec![program("Firefox", &[])]));
        let registry = PluginRegistry::new(vec![programs(repository.clone())]);
        let mut config = Config::default();
        config.programs.enabled = false;
        registry
            .get(PluginType::Programs)
            .unwrap()
            .update_config(&config, &TranslationSet::english());

        let refresher = IndexRefresher::default();
        refresher.refresh_all(&registry).await.unwrap();
        refresher.refresh_one(&registry, PluginType::Programs).await.unwrap();

        assert_eq!(repository.loads(), 0);
    }

    #[tokio::test]
    async fn test_clear_caches_touches_every_plugin() {
        let registry = PluginRegistry::new(vec![
            programs(Arc::new(StaticProgramRepository::failing())),
            built_in_commands(),
        ]);

        IndexRefresher::default().clear_caches(&registry).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_one() {
        let repository = Arc::new(StaticProgramRepository::new(vec![program("Firefox", &[])]));
        let registry = PluginRegistry::new(vec![programs(repository.clone())]);
        let refresher = IndexRefresher::default();

        refresher.refresh_one(&registry, PluginType::Programs).await.unwrap();
        assert_eq!(repository.loads(), 1);

        assert!(matches!(
            refresher.refresh_one(&registry, PluginType::Files).await,
            Err(OrbitError::UnknownPlugin(PluginType::Files))
        ));
    }
}
