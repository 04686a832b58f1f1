//! Opens URL-shaped input directly in the browser.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

use super::SharedOptions;
use crate::config::{Config, WebUrlOptions};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::error::OrbitResult;
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

/// Top-level domains recognised without an explicit scheme.
///
/// Kept short so file names like `notes.txt` still reach the file index.
static KNOWN_TLDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "com", "org", "net", "io", "dev", "app", "edu", "gov", "info", "co", "me", "ai", "rs",
        "de", "ch", "at", "uk", "fr", "nl", "eu", "us", "ca", "jp", "tv",
    ]
    .into_iter()
    .collect()
});

pub struct WebUrlPlugin {
    options: SharedOptions<WebUrlOptions>,
    translation: SharedOptions<TranslationSet>,
    platform: Arc<dyn Platform>,
}

impl WebUrlPlugin {
    pub fn new(options: WebUrlOptions, translation: TranslationSet, platform: Arc<dyn Platform>) -> Self {
        Self {
            options: SharedOptions::new(options),
            translation: SharedOptions::new(translation),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    pub fn is_valid(&self, input: &str) -> bool {
        looks_like_url(input.trim())
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        Ok(Arc::from(Vec::new()))
    }

    pub fn search(&self, input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        let input = input.trim();
        if !looks_like_url(input) {
            return Ok(Vec::new());
        }

        let url = normalize(input);
        let translation = self.translation.get();
        Ok(vec![SearchResultItem::new(
            translation.open_in_browser.clone(),
            url.clone(),
            PluginType::WebUrl,
        )
        .with_description(url)
        .with_icon(IconRef::Svg(icons::GLOBE.to_string()))])
    }

    pub async fn execute(&self, item: &SearchResultItem, _privileged: bool) -> OrbitResult<()> {
        ExecutionAction::OpenUrl {
            url: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        self.options.set(config.web_url.clone());
        self.translation.set(translation.clone());
    }
}

fn has_scheme(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Prefix scheme-less input with `https://`.
fn normalize(input: &str) -> String {
    if has_scheme(input) {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

fn looks_like_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }

    if has_scheme(input) {
        let rest = input.split_once("://").map(|(_, rest)| rest).unwrap_or("");
        return !rest.is_empty();
    }

    let host = input.split(['/', '?', '#']).next().unwrap_or("");
    let host = host.split(':').next().unwrap_or("").to_lowercase();

    if host.starts_with("www.") && host.len() > 4 {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return false;
    }

    let valid_labels = labels
        .iter()
        .all(|l| l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    let tld = labels[labels.len() - 1];

    valid_labels && KNOWN_TLDS.contains(tld)
}
