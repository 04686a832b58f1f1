//! User-defined shortcuts to URLs, files and shell commands.

use std::sync::Arc;

use super::{IndexCell, SharedOptions};
use crate::config::{expand_folder, Config, CustomShortcut, CustomShortcutsOptions, ShortcutType};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::error::{OrbitError, OrbitResult};
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

pub struct CustomShortcutsPlugin {
    options: SharedOptions<CustomShortcutsOptions>,
    index: IndexCell,
    platform: Arc<dyn Platform>,
}

impl CustomShortcutsPlugin {
    pub fn new(options: CustomShortcutsOptions, platform: Arc<dyn Platform>) -> Self {
        Self {
            options: SharedOptions::new(options),
            index: IndexCell::new(),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        self.index.snapshot(PluginType::CustomShortcuts)
    }

    pub async fn refresh_index(&self) -> OrbitResult<()> {
        let options = self.options.get();
        let entries = options
            .shortcuts
            .iter()
            .filter_map(|shortcut| {
                if shortcut.execution_argument.trim().is_empty() {
                    log::warn!("Skipping shortcut '{}' without an execution argument", shortcut.name);
                    return None;
                }
                Some(shortcut_item(shortcut))
            })
            .collect();

        self.index.replace(entries);
        Ok(())
    }

    pub async fn execute(&self, item: &SearchResultItem, privileged: bool) -> OrbitResult<()> {
        let (shortcut_type, argument) = decode(&item.execution_argument)?;
        let action = match shortcut_type {
            ShortcutType::Url => ExecutionAction::OpenUrl {
                url: argument.to_string(),
            },
            ShortcutType::FilePath => ExecutionAction::OpenFile {
                path: expand_folder(argument).to_string_lossy().into_owned(),
            },
            ShortcutType::Command => ExecutionAction::RunShellCommand {
                command: argument.to_string(),
            },
        };
        action.perform(Arc::clone(&self.platform), privileged).await
    }

    pub async fn open_location(&self, item: &SearchResultItem) -> OrbitResult<()> {
        match decode(&item.execution_argument)? {
            (ShortcutType::FilePath, path) => {
                ExecutionAction::OpenLocation {
                    path: expand_folder(path).to_string_lossy().into_owned(),
                }
                .perform(Arc::clone(&self.platform), false)
                .await
            }
            _ => Err(OrbitError::NotSupported {
                plugin: PluginType::CustomShortcuts,
                capability: "open location",
            }),
        }
    }

    pub fn update_config(&self, config: &Config, _translation: &TranslationSet) {
        self.options.set(config.custom_shortcuts.clone());
    }
}

fn type_key(shortcut_type: ShortcutType) -> &'static str {
    match shortcut_type {
        ShortcutType::Url => "url",
        ShortcutType::FilePath => "file-path",
        ShortcutType::Command => "command",
    }
}

/// Execution arguments carry the shortcut type: `url:https://...`.
fn encode(shortcut: &CustomShortcut) -> String {
    format!(
        "{}:{}",
        type_key(shortcut.shortcut_type),
        shortcut.execution_argument.trim()
    )
}

fn decode(execution_argument: &str) -> OrbitResult<(ShortcutType, &str)> {
    let (key, argument) = execution_argument.split_once(':').ok_or_else(|| {
        OrbitError::ExecutionFailed(format!("Malformed shortcut argument: {}", execution_argument))
    })?;

    let shortcut_type = [ShortcutType::Url, ShortcutType::FilePath, ShortcutType::Command]
        .into_iter()
        .find(|t| type_key(*t) == key)
        .ok_or_else(|| OrbitError::ExecutionFailed(format!("Unknown shortcut type: {}", key)))?;

    Ok((shortcut_type, argument))
}

fn shortcut_item(shortcut: &CustomShortcut) -> SearchResultItem {
    let icon = match (&shortcut.icon, shortcut.shortcut_type) {
        (Some(path), _) => IconRef::Path(path.clone()),
        (None, ShortcutType::Url) => IconRef::Svg(icons::GLOBE.to_string()),
        (None, ShortcutType::FilePath) => IconRef::Svg(icons::FILE.to_string()),
        (None, ShortcutType::Command) => IconRef::Svg(icons::TERMINAL.to_string()),
    };

    let description = if shortcut.description.is_empty() {
        shortcut.execution_argument.clone()
    } else {
        shortcut.description.clone()
    };

    SearchResultItem::new(shortcut.name.clone(), encode(shortcut), PluginType::CustomShortcuts)
        .with_description(description)
        .with_icon(icon)
        .with_tags(shortcut.tags.clone())
        .open_location(shortcut.shortcut_type == ShortcutType::FilePath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingPlatform;

    fn shortcut(shortcut_type: ShortcutType, name: &str, argument: &str) -> CustomShortcut {
        CustomShortcut {
            shortcut_type,
            name: name.to_string(),
            description: String::new(),
            execution_argument: argument.to_string(),
            tags: vec!["mine".to_string()],
            icon: None,
        }
    }

    fn plugin(platform: Arc<RecordingPlatform>) -> CustomShortcutsPlugin {
        let options = CustomShortcutsOptions {
            enabled: true,
            shortcuts: vec![
                shortcut(ShortcutType::Url, "Rust docs", "https://doc.rust-lang.org"),
                shortcut(ShortcutType::FilePath, "Notes", "/home/user/notes.md"),
                shortcut(ShortcutType::Command, "Update", "sudo apt update"),
                shortcut(ShortcutType::Command, "Broken", "  "),
            ],
        };
        CustomShortcutsPlugin::new(options, platform)
    }

    #[tokio::test]
    async fn test_refresh_skips_empty_arguments() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        plugin.refresh_index().await.unwrap();

        let entries = plugin.get_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.execution_argument.is_empty()));
        assert!(entries[1].open_location_supported);
        assert!(!entries[0].open_location_supported);
    }

    #[tokio::test]
    async fn test_execute_by_type() {
        let platform = Arc::new(RecordingPlatform::default());
        let plugin = plugin(platform.clone());
        plugin.refresh_index().await.unwrap();

        for item in plugin.get_all().unwrap().iter() {
            plugin.execute(item, false).await.unwrap();
        }

        assert_eq!(
            platform.calls(),
            vec![
                "url:https://doc.rust-lang.org",
                "file:/home/user/notes.md",
                "shell:sudo apt update:false",
            ]
        );
    }

    #[tokio::test]
    async fn test_open_location_for_file_shortcuts() {
        let platform = Arc::new(RecordingPlatform::default());
        let plugin = plugin(platform.clone());
        plugin.refresh_index().await.unwrap();
        let entries = plugin.get_all().unwrap();

        plugin.open_location(&entries[1]).await.unwrap();
        assert!(plugin.open_location(&entries[0]).await.is_err());

        assert_eq!(platform.calls(), vec!["file:/home/user"]);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(decode("ftp:somewhere").is_err());
        assert!(decode("no-separator").is_err());
        assert_eq!(
            decode("url:https://x.org").unwrap(),
            (ShortcutType::Url, "https://x.org")
        );
    }
}
