//! Settings panels, reachable through `settings <term>`.

use std::sync::Arc;

use super::{IndexCell, SharedOptions};
use crate::config::{Config, OperatingSystemSettingsOptions};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::core::ranking::Ranker;
use crate::error::OrbitResult;
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

/// Platform-neutral setting keys; each `Platform` maps them to its own panels.
pub const SETTING_KEYS: [&str; 16] = [
    "display",
    "sound",
    "network",
    "wifi",
    "bluetooth",
    "power",
    "notifications",
    "privacy",
    "datetime",
    "keyboard",
    "mouse",
    "printers",
    "users",
    "about",
    "wallpaper",
    "applications",
];

pub struct OperatingSystemSettingsPlugin {
    options: SharedOptions<OperatingSystemSettingsOptions>,
    translation: SharedOptions<TranslationSet>,
    index: IndexCell,
    ranker: Ranker,
    platform: Arc<dyn Platform>,
}

impl OperatingSystemSettingsPlugin {
    pub fn new(
        options: OperatingSystemSettingsOptions,
        translation: TranslationSet,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            options: SharedOptions::new(options),
            translation: SharedOptions::new(translation),
            index: IndexCell::new(),
            ranker: Ranker::new(),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    /// Valid for the bare prefix or the prefix followed by a space.
    pub fn is_valid(&self, input: &str) -> bool {
        self.term(input).is_some()
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.index.snapshot(PluginType::OperatingSystemSettings)
    }

    /// All settings for a bare prefix, otherwise the ranked matches.
    pub fn search(&self, input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        let term = match self.term(input) {
            Some(term) => term,
            None => return Ok(Vec::new()),
        };

        let entries = self.get_all()?;
        if term.is_empty() {
            return Ok(entries.to_vec());
        }

        Ok(self
            .ranker
            .rank([(0, &entries[..])], &term)
            .into_iter()
            .map(|ranked| ranked.item.clone())
            .collect())
    }

    pub async fn refresh_index(&self) -> OrbitResult<()> {
        let translation = self.translation.get();
        let entries = SETTING_KEYS
            .iter()
            .map(|key| {
                SearchResultItem::new(
                    translation.setting_label(key),
                    *key,
                    PluginType::OperatingSystemSettings,
                )
                .with_description(translation.operating_system_setting.clone())
                .with_icon(IconRef::Svg(icons::SETTINGS.to_string()))
                .with_tags(vec![key.to_string()])
            })
            .collect();

        self.index.replace(entries);
        Ok(())
    }

    pub async fn execute(&self, item: &SearchResultItem, _privileged: bool) -> OrbitResult<()> {
        ExecutionAction::OpenSystemSetting {
            key: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        self.options.set(config.operating_system_settings.clone());
        self.translation.set(translation.clone());
    }

    fn term(&self, input: &str) -> Option<String> {
        let options = self.options.get();
        if options.prefix.is_empty() {
            return None;
        }

        let lower = input.to_lowercase();
        let prefix = options.prefix.to_lowercase();
        let rest = lower.strip_prefix(prefix.as_str())?;
        if rest.is_empty() {
            return Some(String::new());
        }
        rest.strip_prefix(' ').map(|term| term.trim().to_string())
    }
}
