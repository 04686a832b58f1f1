//! Result types shared by every plugin and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the plugin that produced a result.
///
/// Registration order in the engine follows the declaration order of
/// [`PluginType::ALL`], which is also the final ranking tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginType {
    CustomShortcuts,
    Programs,
    Files,
    BuiltInCommands,
    CommandLine,
    WebSearch,
    OperatingSystemSettings,
    WebUrl,
    /// Items produced by the engine itself, such as the "no results" placeholder.
    /// Never registered, so executing such an item fails with `UnknownPlugin`.
    Internal,
}

impl PluginType {
    /// Every registrable plugin type, in registration order.
    pub const ALL: [PluginType; 8] = [
        PluginType::CustomShortcuts,
        PluginType::Programs,
        PluginType::Files,
        PluginType::BuiltInCommands,
        PluginType::CommandLine,
        PluginType::WebSearch,
        PluginType::OperatingSystemSettings,
        PluginType::WebUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginType::CustomShortcuts => "custom-shortcuts",
            PluginType::Programs => "programs",
            PluginType::Files => "files",
            PluginType::BuiltInCommands => "built-in-commands",
            PluginType::CommandLine => "command-line",
            PluginType::WebSearch => "web-search",
            PluginType::OperatingSystemSettings => "operating-system-settings",
            PluginType::WebUrl => "web-url",
            PluginType::Internal => "internal",
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PluginType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluginType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown plugin type: {}", s))
    }
}

/// Icon attached to a result: a resource path or inline SVG markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum IconRef {
    Path(String),
    Svg(String),
}

impl Default for IconRef {
    fn default() -> Self {
        IconRef::Svg(icons::GENERIC.to_string())
    }
}

/// A single search result as handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub name: String,
    pub description: Option<String>,
    /// Opaque token interpreted by the owning plugin. Never empty.
    pub execution_argument: String,
    pub icon: IconRef,
    /// Extra matchable strings (aliases, keywords).
    pub tags: Vec<String>,
    pub origin_plugin_type: PluginType,
    pub hide_main_window_after_execution: bool,
    pub open_location_supported: bool,
    pub auto_completion_supported: bool,
}

impl SearchResultItem {
    /// Create an item with no tags and no optional capabilities.
    pub fn new(
        name: impl Into<String>,
        execution_argument: impl Into<String>,
        origin_plugin_type: PluginType,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            execution_argument: execution_argument.into(),
            icon: IconRef::default(),
            tags: Vec::new(),
            origin_plugin_type,
            hide_main_window_after_execution: true,
            open_location_supported: false,
            auto_completion_supported: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn open_location(mut self, supported: bool) -> Self {
        self.open_location_supported = supported;
        self
    }

    pub fn auto_completion(mut self, supported: bool) -> Self {
        self.auto_completion_supported = supported;
        self
    }

    pub fn keep_window_open(mut self) -> Self {
        self.hide_main_window_after_execution = false;
        self
    }

    /// Key used for deduplication across plugins.
    pub fn identity(&self) -> (&str, &str) {
        (&self.name, &self.execution_argument)
    }
}

/// The rewritten user input produced by auto-completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCompletionResult {
    pub updated_user_input: String,
}

/// What the UI should do once an execution succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub hide_main_window: bool,
}

/// Inline SVG icons for results that have no file-backed icon.
pub mod icons {
    pub const GENERIC: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="9" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const GLOBE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="10" fill="none" stroke="currentColor" stroke-width="2"/><path d="M2 12h20M12 2a15 15 0 0 1 0 20M12 2a15 15 0 0 0 0 20" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const SEARCH: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="10" cy="10" r="7" fill="none" stroke="currentColor" stroke-width="2"/><path d="M15 15l7 7" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const TERMINAL: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 6l6 6-6 6M12 18h8" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const SETTINGS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="3" fill="none" stroke="currentColor" stroke-width="2"/><path d="M12 1v4M12 19v4M1 12h4M19 12h4M4.2 4.2l2.8 2.8M17 17l2.8 2.8M4.2 19.8L7 17M17 7l2.8-2.8" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const FILE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M6 2h8l4 4v16H6z" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const FOLDER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M2 5h7l2 2h11v13H2z" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
    pub const WARNING: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M12 2L1 21h22zM12 9v5M12 17v2" fill="none" stroke="currentColor" stroke-width="2"/></svg>"#;
}
