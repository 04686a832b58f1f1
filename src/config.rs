//! Configuration loading, validation and persistence.
//!
//! The engine never mutates a `Config` in place: a new value is built by the
//! caller and applied through `SearchEngine::update_config`.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::item::PluginType;
use crate::error::{OrbitError, OrbitResult};
use crate::i18n::Language;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralOptions,
    pub appearance: AppearanceOptions,
    pub programs: ProgramsOptions,
    pub files: FilesOptions,
    pub web_search: WebSearchOptions,
    pub web_url: WebUrlOptions,
    pub custom_shortcuts: CustomShortcutsOptions,
    pub command_line: CommandLineOptions,
    pub operating_system_settings: OperatingSystemSettingsOptions,
    pub built_in_commands: BuiltInCommandsOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralOptions {
    pub language: Language,
    pub rescan_enabled: bool,
    pub rescan_interval_in_seconds: u64,
    pub hide_main_window_after_execution: bool,
    pub log_execution: bool,
    pub clear_caches_on_exit: bool,
    pub history_capacity: usize,
    pub favorites_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceOptions {
    pub window_width: u32,
    pub max_search_results_per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramsOptions {
    pub enabled: bool,
    pub folders: Vec<String>,
    /// File extensions (without dot) treated as launchable programs.
    pub file_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesOptions {
    pub enabled: bool,
    pub folders: Vec<String>,
    pub max_depth: usize,
    pub include_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchEngine {
    pub name: String,
    pub prefix: String,
    /// URL template. `{query}` is replaced by the encoded search term;
    /// without the placeholder the term is appended.
    pub url: String,
}

impl WebSearchEngine {
    pub fn has_query_placeholder(&self) -> bool {
        self.url.contains("{query}")
    }

    pub fn resolve_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        if self.has_query_placeholder() {
            self.url.replace("{query}", &encoded)
        } else {
            format!("{}{}", self.url, encoded)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchOptions {
    pub enabled: bool,
    pub engines: Vec<WebSearchEngine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebUrlOptions {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortcutType {
    Url,
    FilePath,
    Command,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomShortcut {
    #[serde(rename = "type")]
    pub shortcut_type: ShortcutType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub execution_argument: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomShortcutsOptions {
    pub enabled: bool,
    pub shortcuts: Vec<CustomShortcut>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandLineOptions {
    pub enabled: bool,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystemSettingsOptions {
    pub enabled: bool,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltInCommandsOptions {
    pub enabled: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralOptions::default(),
            appearance: AppearanceOptions::default(),
            programs: ProgramsOptions::default(),
            files: FilesOptions::default(),
            web_search: WebSearchOptions::default(),
            web_url: WebUrlOptions::default(),
            custom_shortcuts: CustomShortcutsOptions::default(),
            command_line: CommandLineOptions::default(),
            operating_system_settings: OperatingSystemSettingsOptions::default(),
            built_in_commands: BuiltInCommandsOptions::default(),
        }
    }
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            language: Language::English,
            rescan_enabled: true,
            rescan_interval_in_seconds: 300,
            hide_main_window_after_execution: true,
            log_execution: true,
            clear_caches_on_exit: false,
            history_capacity: 50,
            favorites_count: 8,
        }
    }
}

impl Default for AppearanceOptions {
    fn default() -> Self {
        Self {
            window_width: 600,
            max_search_results_per_page: 8,
        }
    }
}

impl Default for ProgramsOptions {
    fn default() -> Self {
        let (folders, file_extensions): (Vec<&str>, Vec<&str>) = if cfg!(target_os = "windows") {
            (
                vec![
                    "C:\\ProgramData\\Microsoft\\Windows\\Start Menu",
                    "~\\AppData\\Roaming\\Microsoft\\Windows\\Start Menu",
                    "~\\Desktop",
                ],
                vec!["lnk", "appref-ms", "url", "exe"],
            )
        } else if cfg!(target_os = "macos") {
            (vec!["/Applications", "/System/Applications", "~/Applications"], vec!["app"])
        } else {
            (
                vec![
                    "/usr/share/applications",
                    "/usr/local/share/applications",
                    "~/.local/share/applications",
                    "~/.local/share/flatpak/exports/share/applications",
                    "/var/lib/snapd/desktop/applications",
                ],
                vec!["desktop"],
            )
        };

        Self {
            enabled: true,
            folders: folders.into_iter().map(String::from).collect(),
            file_extensions: file_extensions.into_iter().map(String::from).collect(),
        }
    }
}

impl Default for FilesOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            folders: vec![
                "~/Desktop".to_string(),
                "~/Documents".to_string(),
                "~/Downloads".to_string(),
            ],
            max_depth: 2,
            include_hidden: false,
        }
    }
}

impl Default for WebSearchOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            engines: vec![
                WebSearchEngine {
                    name: "Google".to_string(),
                    prefix: "g".to_string(),
                    url: "https://google.com/search?q={query}".to_string(),
                },
                WebSearchEngine {
                    name: "DuckDuckGo".to_string(),
                    prefix: "d".to_string(),
                    url: "https://duckduckgo.com/?q={query}".to_string(),
                },
            ],
        }
    }
}

impl Default for WebUrlOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for CustomShortcutsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            shortcuts: Vec::new(),
        }
    }
}

impl Default for CommandLineOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: ">".to_string(),
        }
    }
}

impl Default for OperatingSystemSettingsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: "settings".to_string(),
        }
    }
}

impl Default for BuiltInCommandsOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        let mut config = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        log::error!("Failed to parse config {}: {}", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::error!("Failed to read config {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    /// Validate and clamp config values to acceptable ranges
    pub fn validate(&mut self) {
        // Clamp window_width to reasonable range (400 - 1200)
        self.appearance.window_width = self.appearance.window_width.clamp(400, 1200);

        // Clamp max results to reasonable range (1 - 50)
        self.appearance.max_search_results_per_page =
            self.appearance.max_search_results_per_page.clamp(1, 50);

        self.general.history_capacity = self.general.history_capacity.clamp(1, 1000);
        self.general.favorites_count = self.general.favorites_count.min(50);
        self.files.max_depth = self.files.max_depth.clamp(1, 8);
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> OrbitResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                OrbitError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    /// Whether the plugin of the given type is switched on.
    pub fn plugin_enabled(&self, plugin_type: PluginType) -> bool {
        match plugin_type {
            PluginType::Programs => self.programs.enabled,
            PluginType::Files => self.files.enabled,
            PluginType::WebSearch => self.web_search.enabled,
            PluginType::WebUrl => self.web_url.enabled,
            PluginType::CustomShortcuts => self.custom_shortcuts.enabled,
            PluginType::CommandLine => self.command_line.enabled,
            PluginType::OperatingSystemSettings => self.operating_system_settings.enabled,
            PluginType::BuiltInCommands => self.built_in_commands.enabled,
            PluginType::Internal => false,
        }
    }

    /// Whether the options owned by `plugin_type` differ between `self` and `other`.
    ///
    /// Plugins with translated labels also count a language change as their own.
    pub fn plugin_options_changed(&self, other: &Config, plugin_type: PluginType) -> bool {
        let language_changed = self.general.language != other.general.language;
        match plugin_type {
            PluginType::Programs => self.programs != other.programs,
            PluginType::Files => self.files != other.files,
            PluginType::WebSearch => language_changed || self.web_search != other.web_search,
            PluginType::WebUrl => language_changed || self.web_url != other.web_url,
            PluginType::CustomShortcuts => self.custom_shortcuts != other.custom_shortcuts,
            PluginType::CommandLine => language_changed || self.command_line != other.command_line,
            PluginType::OperatingSystemSettings => {
                language_changed
                    || self.operating_system_settings != other.operating_system_settings
            }
            PluginType::BuiltInCommands => {
                language_changed || self.built_in_commands != other.built_in_commands
            }
            PluginType::Internal => false,
        }
    }

    /// Whether the rescan timer needs re-arming when moving from `self` to `other`.
    pub fn rescan_changed(&self, other: &Config) -> bool {
        self.general.rescan_enabled != other.general.rescan_enabled
            || self.general.rescan_interval_in_seconds != other.general.rescan_interval_in_seconds
    }
}

/// Orbit's configuration directory (`~/.config/orbit` on Linux).
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| {
            // Fallback: ~ is not expanded by PathBuf, so use dirs::home_dir
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_else(|| PathBuf::from("/tmp"))
        })
        .join("orbit")
}

/// Orbit's data directory (`~/.local/share/orbit` on Linux).
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".local/share"))
                .unwrap_or_else(|| PathBuf::from("/tmp"))
        })
        .join("orbit")
}

/// Expand `~` and environment variables in a configured folder.
pub fn expand_folder(folder: &str) -> PathBuf {
    match shellexpand::full(folder) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(folder).as_ref()),
    }
}

/// Source and sink for the persisted configuration.
pub trait ConfigStore: Send + Sync {
    fn get_config(&self) -> Config;
    fn save_config(&self, config: &Config) -> OrbitResult<()>;
}

/// TOML file backed store.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(Config::config_path())
    }
}

impl ConfigStore for FileConfigStore {
    fn get_config(&self) -> Config {
        Config::load_from(&self.path)
    }

    fn save_config(&self, config: &Config) -> OrbitResult<()> {
        config.save_to(&self.path)
    }
}

/// In-memory store for embedding hosts that persist config themselves.
#[derive(Default)]
pub struct MemoryConfigStore {
    config: RwLock<Config>,
}

impl MemoryConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_config(&self) -> Config {
        self.config.read().clone()
    }

    fn save_config(&self, config: &Config) -> OrbitResult<()> {
        *self.config.write() = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_clamps_ranges() {
        let mut config = Config::default();
        config.appearance.window_width = 5000;
        config.appearance.max_search_results_per_page = 0;
        config.files.max_depth = 100;
        config.validate();

        assert_eq!(config.appearance.window_width, 1200);
        assert_eq!(config.appearance.max_search_results_per_page, 1);
        assert_eq!(config.files.max_depth, 8);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.general.rescan_interval_in_seconds = 42;
        config.custom_shortcuts.shortcuts.push(CustomShortcut {
            shortcut_type: ShortcutType::Url,
            name: "Rust docs".to_string(),
            description: String::new(),
            execution_argument: "https://doc.rust-lang.org".to_string(),
            tags: vec!["std".to_string()],
            icon: None,
        });
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is [not toml").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general]\nrescan_enabled = false\n").unwrap();

        let config = Config::load_from(&path);
        assert!(!config.general.rescan_enabled);
        assert_eq!(config.general.rescan_interval_in_seconds, 300);
        assert!(config.programs.enabled);
    }

    #[test]
    fn test_web_search_resolve_url() {
        let placeholder = WebSearchEngine {
            name: "Google".to_string(),
            prefix: "g".to_string(),
            url: "https://google.com/search?q={query}".to_string(),
        };
        let appended = WebSearchEngine {
            url: "https://google.com/search?q=".to_string(),
            ..placeholder.clone()
        };

        assert_eq!(placeholder.resolve_url("hello"), "https://google.com/search?q=hello");
        assert_eq!(appended.resolve_url("hello world"), "https://google.com/search?q=hello%20world");
    }

    #[test]
    fn test_window_width_is_not_a_plugin_change() {
        let old = Config::default();
        let mut new = old.clone();
        new.appearance.window_width = 800;

        for plugin_type in PluginType::ALL {
            assert!(!old.plugin_options_changed(&new, plugin_type));
        }
        assert!(!old.rescan_changed(&new));
    }

    #[test]
    fn test_language_change_touches_translated_plugins() {
        let old = Config::default();
        let mut new = old.clone();
        new.general.language = Language::German;

        assert!(old.plugin_options_changed(&new, PluginType::OperatingSystemSettings));
        assert!(old.plugin_options_changed(&new, PluginType::BuiltInCommands));
        assert!(old.plugin_options_changed(&new, PluginType::WebSearch));
        assert!(old.plugin_options_changed(&new, PluginType::WebUrl));
        assert!(old.plugin_options_changed(&new, PluginType::CommandLine));
        assert!(!old.plugin_options_changed(&new, PluginType::Programs));
        assert!(!old.plugin_options_changed(&new, PluginType::Files));
        assert!(!old.plugin_options_changed(&new, PluginType::CustomShortcuts));
    }
}
