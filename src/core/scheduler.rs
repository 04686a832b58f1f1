//! Periodic full index rebuilds.
//!
//! At most one timer task exists at a time: arming always aborts the previous
//! task before spawning a new one. A rescan already under way when the timer
//! is cancelled still runs to completion.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::refresh::IndexRefresher;
use crate::plugins::PluginRegistry;

/// Floor for the configured rescan interval.
pub const MINIMUM_INTERVAL_SECS: u64 = 10;

/// The interval actually used for a configured value in seconds.
pub fn effective_interval(configured_secs: u64) -> Duration {
    Duration::from_secs(configured_secs.max(MINIMUM_INTERVAL_SECS))
}

pub struct RescanScheduler {
    refresher: IndexRefresher,
    registry: PluginRegistry,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl RescanScheduler {
    pub fn new(refresher: IndexRefresher, registry: PluginRegistry) -> Self {
        Self {
            refresher,
            registry,
            task_handle: Mutex::new(None),
        }
    }

    /// Cancel any running timer and, if `enabled`, start a new one.
    ///
    /// The first tick fires one full interval from now. Must be called from
    /// within a Tokio runtime.
    pub fn arm(&self, enabled: bool, interval_secs: u64) {
        let mut task_handle = self.task_handle.lock();
        if let Some(previous) = task_handle.take() {
            previous.abort();
        }

        if !enabled {
            log::debug!("Rescan disabled");
            return;
        }

        let period = effective_interval(interval_secs);
        if period.as_secs() != interval_secs {
            log::debug!(
                "Rescan interval {}s raised to the {}s minimum",
                interval_secs,
                MINIMUM_INTERVAL_SECS
            );
        }
        log::info!("Rescanning indexes every {}s", period.as_secs());

        let refresher = self.refresher.clone();
        let registry = self.registry.clone();
        *task_handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                // Outlives the timer task if it is aborted mid-rescan
                let rescan = tokio::spawn({
                    let refresher = refresher.clone();
                    let registry = registry.clone();
                    async move { refresher.refresh_all(&registry).await }
                });
                match rescan.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => log::error!("Scheduled rescan failed: {}", e),
                    Err(e) => log::error!("Scheduled rescan panicked: {}", e),
                }
            }
        }));
    }

    /// Cancel the timer. Indexes are left as they are.
    pub fn disarm(&self) {
        self.arm(false, 0);
    }

    pub fn is_armed(&self) -> bool {
        self.task_handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RescanScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgramsOptions;
    use crate::core::item::PluginType;
    use crate::core::notify::{Notification, Notifier};
    use crate::platform::testing::RecordingPlatform;
    use crate::plugins::programs::testing::program;
    use crate::plugins::{Program, ProgramRepository, ProgramsPlugin, SourcePlugin};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc, Mutex as StdMutex};
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::sleep;

    fn scheduler() -> (RescanScheduler, UnboundedReceiver<Notification>) {
        let (notifier, rx) = Notifier::channel();
        let scheduler = RescanScheduler::new(IndexRefresher::new(notifier), PluginRegistry::default());
        (scheduler, rx)
    }

    fn refreshes(rx: &mut UnboundedReceiver<Notification>) -> usize {
        let mut count = 0;
        while let Ok(notification) = rx.try_recv() {
            if notification == Notification::IndexRefreshStarted {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn test_effective_interval_has_floor() {
        assert_eq!(effective_interval(2), Duration::from_secs(10));
        assert_eq!(effective_interval(0), Duration::from_secs(10));
        assert_eq!(effective_interval(300), Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_interval_ticks_at_floor() {
        let (scheduler, mut rx) = scheduler();
        scheduler.arm(true, 2);

        sleep(Duration::from_secs(9)).await;
        assert_eq!(refreshes(&mut rx), 0);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(refreshes(&mut rx), 1);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(refreshes(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_timer() {
        let (scheduler, mut rx) = scheduler();
        scheduler.arm(true, 10);

        sleep(Duration::from_secs(5)).await;
        scheduler.arm(true, 20);

        // The first timer would have fired at 10s
        sleep(Duration::from_secs(10)).await;
        assert_eq!(refreshes(&mut rx), 0);

        sleep(Duration::from_secs(11)).await;
        assert_eq!(refreshes(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_stops_ticks() {
        let (scheduler, mut rx) = scheduler();
        scheduler.arm(true, 10);
        assert!(scheduler.is_armed());

        scheduler.disarm();
        tokio::task::yield_now().await;
        assert!(!scheduler.is_armed());

        sleep(Duration::from_secs(60)).await;
        assert_eq!(refreshes(&mut rx), 0);
    }

    /// Blocks inside `load` until the test releases it.
    struct GatedRepository {
        started: AtomicBool,
        release: StdMutex<mpsc::Receiver<()>>,
    }

    impl ProgramRepository for GatedRepository {
        fn load(&self, _options: &ProgramsOptions) -> Result<Vec<Program>, String> {
            self.started.store(true, Ordering::SeqCst);
            let release = self.release.lock().map_err(|e| e.to_string())?;
            release.recv().map_err(|e| e.to_string())?;
            Ok(vec![program("Firefox", &[])])
        }
    }

    async fn wait_until(condition: impl Fn() -> bool) -> bool {
        for _ in 0..2000 {
            if condition() {
                return true;
            }
            tokio::task::yield_now().await;
            std::thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_lets_running_rescan_finish() {
        let (release_tx, release_rx) = mpsc::channel();
        let repository = Arc::new(GatedRepository {
            started: AtomicBool::new(false),
            release: StdMutex::new(release_rx),
        });
        let registry = PluginRegistry::new(vec![SourcePlugin::Programs(ProgramsPlugin::new(
            ProgramsOptions::default(),
            repository.clone(),
            Arc::new(RecordingPlatform::default()),
        ))]);
        let scheduler = RescanScheduler::new(IndexRefresher::default(), registry.clone());
        scheduler.arm(true, 10);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(wait_until(|| repository.started.load(Ordering::SeqCst)).await);

        scheduler.arm(true, 30);
        release_tx.send(()).unwrap();
        drop(release_tx);

        let programs = registry.get(PluginType::Programs).unwrap();
        assert!(wait_until(|| programs.get_all().is_ok()).await);
        assert_eq!(programs.get_all().unwrap()[0].name, "Firefox");
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_arm_spawns_nothing() {
        let (scheduler, _rx) = scheduler();
        scheduler.arm(false, 10);
        assert!(!scheduler.is_armed());
    }
}
