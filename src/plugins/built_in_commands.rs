//! Launcher commands (exit, refresh indexes, ...) and system power commands.
//!
//! Launcher commands are handed to the host as notifications; system
//! commands go straight to the platform.

use std::sync::Arc;

use super::{IndexCell, SharedOptions};
use crate::config::{BuiltInCommandsOptions, Config};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::core::notify::{HostCommand, Notification, Notifier};
use crate::error::{OrbitError, OrbitResult};
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::{Platform, SystemCommand};

const HOST_PREFIX: &str = "orbit:";
const SYSTEM_PREFIX: &str = "system:";

pub struct BuiltInCommandsPlugin {
    options: SharedOptions<BuiltInCommandsOptions>,
    translation: SharedOptions<TranslationSet>,
    index: IndexCell,
    platform: Arc<dyn Platform>,
    notifier: Notifier,
}

impl BuiltInCommandsPlugin {
    pub fn new(
        options: BuiltInCommandsOptions,
        translation: TranslationSet,
        platform: Arc<dyn Platform>,
        notifier: Notifier,
    ) -> Self {
        Self {
            options: SharedOptions::new(options),
            translation: SharedOptions::new(translation),
            index: IndexCell::new(),
            platform,
            notifier,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.index.snapshot(PluginType::BuiltInCommands)
    }

    pub async fn refresh_index(&self) -> OrbitResult<()> {
        let translation = self.translation.get();

        let host = HostCommand::ALL.iter().map(|command| {
            let item = SearchResultItem::new(
                translation.command_label(command.key()),
                format!("{}{}", HOST_PREFIX, command.key()),
                PluginType::BuiltInCommands,
            )
            .with_description(translation.built_in_command.clone())
            .with_icon(IconRef::Svg(icons::SETTINGS.to_string()))
            .with_tags(vec![command.key().to_string()]);

            // The window stays up while the index refresh it reports on runs
            match command {
                HostCommand::RefreshIndexes | HostCommand::ClearCaches => item.keep_window_open(),
                _ => item,
            }
        });

        let system = SystemCommand::ALL.iter().map(|command| {
            SearchResultItem::new(
                translation.command_label(command.key()),
                format!("{}{}", SYSTEM_PREFIX, command.key()),
                PluginType::BuiltInCommands,
            )
            .with_description(translation.system_command.clone())
            .with_icon(IconRef::Svg(icons::WARNING.to_string()))
            .with_tags(vec![command.key().to_string()])
        });

        self.index.replace(host.chain(system).collect());
        Ok(())
    }

    pub async fn execute(&self, item: &SearchResultItem, _privileged: bool) -> OrbitResult<()> {
        let argument = item.execution_argument.as_str();

        if let Some(key) = argument.strip_prefix(HOST_PREFIX) {
            let command: HostCommand = key.parse().map_err(OrbitError::ExecutionFailed)?;
            log::info!("Requesting host command {}", command.key());
            self.notifier.send(Notification::CommandRequested { command });
            return Ok(());
        }

        if let Some(key) = argument.strip_prefix(SYSTEM_PREFIX) {
            let command: SystemCommand = key.parse().map_err(OrbitError::ExecutionFailed)?;
            return ExecutionAction::SystemCommand { command }
                .perform(Arc::clone(&self.platform), false)
                .await;
        }

        Err(OrbitError::ExecutionFailed(format!(
            "Unknown built-in command: {}",
            argument
        )))
    }

    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        self.options.set(config.built_in_commands.clone());
        self.translation.set(translation.clone());
    }
}
