//! Prefix-triggered web searches: `g rust traits` searches Google.

use std::sync::Arc;

use super::SharedOptions;
use crate::config::{Config, WebSearchEngine, WebSearchOptions};
use crate::core::item::{icons, IconRef, PluginType, SearchResultItem};
use crate::error::OrbitResult;
use crate::executor::ExecutionAction;
use crate::i18n::TranslationSet;
use crate::platform::Platform;

pub struct WebSearchPlugin {
    options: SharedOptions<WebSearchOptions>,
    translation: SharedOptions<TranslationSet>,
    platform: Arc<dyn Platform>,
}

impl WebSearchPlugin {
    pub fn new(
        options: WebSearchOptions,
        translation: TranslationSet,
        platform: Arc<dyn Platform>,
    ) -> Self {
        Self {
            options: SharedOptions::new(options),
            translation: SharedOptions::new(translation),
            platform,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.get().enabled
    }

    /// Valid when the input starts with an engine prefix followed by a space.
    pub fn is_valid(&self, input: &str) -> bool {
        let options = self.options.get();
        options
            .engines
            .iter()
            .any(|engine| search_term(engine, input).is_some())
    }

    pub fn get_all(&self) -> OrbitResult<Arc<[SearchResultItem]>> {
        Ok(Arc::from(Vec::new()))
    }

    /// One result per engine whose prefix matches.
    pub fn search(&self, input: &str) -> OrbitResult<Vec<SearchResultItem>> {
        let options = self.options.get();
        let translation = self.translation.get();

        let results = options
            .engines
            .iter()
            .filter_map(|engine| {
                let term = search_term(engine, input)?;
                if term.is_empty() {
                    return None;
                }

                let url = engine.resolve_url(term);
                Some(
                    SearchResultItem::new(
                        translation.search_with_label(&engine.name, term),
                        url.clone(),
                        PluginType::WebSearch,
                    )
                    .with_description(url)
                    .with_icon(IconRef::Svg(icons::SEARCH.to_string())),
                )
            })
            .collect();

        Ok(results)
    }

    pub async fn execute(&self, item: &SearchResultItem, _privileged: bool) -> OrbitResult<()> {
        ExecutionAction::OpenUrl {
            url: item.execution_argument.clone(),
        }
        .perform(Arc::clone(&self.platform), false)
        .await
    }

    pub fn update_config(&self, config: &Config, translation: &TranslationSet) {
        self.options.set(config.web_search.clone());
        self.translation.set(translation.clone());
    }
}

/// The trimmed search term when `input` addresses `engine`.
fn search_term<'a>(engine: &WebSearchEngine, input: &'a str) -> Option<&'a str> {
    if engine.prefix.is_empty() {
        return None;
    }

    let rest = input.strip_prefix(engine.prefix.as_str())?;
    let term = rest.strip_prefix(' ')?;
    Some(term.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingPlatform;

    fn plugin(platform: Arc<RecordingPlatform>) -> WebSearchPlugin {
        WebSearchPlugin::new(WebSearchOptions::default(), TranslationSet::english(), platform)
    }

    #[test]
    fn test_prefix_needs_trailing_space() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));

        assert!(plugin.is_valid("g hello"));
        assert!(plugin.is_valid("d rust"));
        assert!(!plugin.is_valid("ghello"));
        assert!(!plugin.is_valid("google"));
        assert!(!plugin.is_valid("x hello"));
    }

    #[test]
    fn test_search_builds_engine_url() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));

        let results = plugin.search("g hello").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].execution_argument, "https://google.com/search?q=hello");
        assert_eq!(results[0].name, "Search Google for 'hello'");
        assert_eq!(results[0].origin_plugin_type, PluginType::WebSearch);
    }

    #[test]
    fn test_blank_term_yields_nothing() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        assert!(plugin.search("g   ").unwrap().is_empty());
    }

    #[test]
    fn test_term_is_url_encoded() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        let results = plugin.search("d rust & go").unwrap();
        assert_eq!(results[0].execution_argument, "https://duckduckgo.com/?q=rust%20%26%20go");
    }

    #[tokio::test]
    async fn test_execute_opens_url() {
        let platform = Arc::new(RecordingPlatform::default());
        let plugin = plugin(platform.clone());
        let item = plugin.search("g hello").unwrap().remove(0);

        plugin.execute(&item, false).await.unwrap();

        assert_eq!(platform.calls(), vec!["url:https://google.com/search?q=hello"]);
    }

    #[test]
    fn test_update_config_swaps_engines() {
        let plugin = plugin(Arc::new(RecordingPlatform::default()));
        let mut config = Config::default();
        config.web_search.engines = vec![WebSearchEngine {
            name: "Crates".to_string(),
            prefix: "c".to_string(),
            url: "https://crates.io/search?q=".to_string(),
        }];

        plugin.update_config(&config, &TranslationSet::english());

        assert!(!plugin.is_valid("g hello"));
        assert_eq!(
            plugin.search("c serde").unwrap()[0].execution_argument,
            "https://crates.io/search?q=serde"
        );
    }
}
