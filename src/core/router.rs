//! Routes a query to the applicable plugins and merges their answers.
//!
//! Exclusive plugins are consulted first, in registration order; the first
//! whose predicate holds answers alone. Otherwise every enabled indexed
//! plugin's snapshot is ranked together, deduplicated and truncated. A plugin
//! that fails is logged and left out; only when every applicable plugin fails
//! does the query fail.

use std::collections::HashMap;

use super::item::{icons, IconRef, PluginType, SearchResultItem};
use super::ranking::Ranker;
use crate::error::{OrbitError, OrbitResult};
use crate::i18n::TranslationSet;
use crate::plugins::{PluginClass, PluginRegistry};

/// Execution argument of the placeholder shown when nothing matched.
pub const NO_RESULTS_ARGUMENT: &str = "orbit:no-results";

#[derive(Default)]
pub struct QueryRouter {
    ranker: Ranker,
}

impl QueryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a non-empty query.
    ///
    /// Never returns an empty list: zero matches yield the "no results" item.
    pub fn search(
        &self,
        registry: &PluginRegistry,
        input: &str,
        max_results: usize,
        translation: &TranslationSet,
    ) -> OrbitResult<Vec<SearchResultItem>> {
        let input = input.trim();

        let exclusive = registry
            .enabled()
            .find(|(_, p)| p.class() == PluginClass::Exclusive && p.is_valid(input));

        let mut results = match exclusive {
            Some((_, plugin)) => plugin.search(input).map_err(|e| {
                log::error!("Plugin {} failed to answer '{}': {}", plugin.plugin_type(), input, e);
                OrbitError::SearchUnavailable
            })?,
            None => self.search_indexes(registry, input)?,
        };

        results.truncate(max_results);
        if results.is_empty() {
            results.push(no_results_item(translation));
        }
        Ok(results)
    }

    fn search_indexes(
        &self,
        registry: &PluginRegistry,
        input: &str,
    ) -> OrbitResult<Vec<SearchResultItem>> {
        let mut applicable = 0;
        let mut snapshots = Vec::new();

        for (order, plugin) in registry
            .enabled()
            .filter(|(_, p)| p.class() == PluginClass::Indexed)
        {
            applicable += 1;
            match plugin.get_all() {
                Ok(entries) => snapshots.push((order, entries)),
                Err(e) => log::error!("Skipping plugin {} for '{}': {}", plugin.plugin_type(), input, e),
            }
        }

        if applicable > 0 && snapshots.is_empty() {
            return Err(OrbitError::SearchUnavailable);
        }

        let ranked = self.ranker.rank(
            snapshots.iter().map(|(order, entries)| (*order, &entries[..])),
            input,
        );

        Ok(dedup(ranked.into_iter().map(|r| r.item)))
    }
}

/// Drop repeated `(name, execution argument)` pairs, keeping the first
/// position and the union of all tags.
fn dedup<'a>(items: impl Iterator<Item = &'a SearchResultItem>) -> Vec<SearchResultItem> {
    let mut positions: HashMap<(&'a str, &'a str), usize> = HashMap::new();
    let mut merged: Vec<SearchResultItem> = Vec::new();

    for item in items {
        match positions.get(&item.identity()) {
            Some(&position) => {
                let existing = &mut merged[position];
                for tag in &item.tags {
                    if !existing.tags.contains(tag) {
                        existing.tags.push(tag.clone());
                    }
                }
            }
            None => {
                positions.insert(item.identity(), merged.len());
                merged.push(item.clone());
            }
        }
    }

    merged
}

/// The placeholder rendered when a query matched nothing. Not executable.
pub fn no_results_item(translation: &TranslationSet) -> SearchResultItem {
    SearchResultItem::new(
        translation.no_search_results_found.clone(),
        NO_RESULTS_ARGUMENT,
        PluginType::Internal,
    )
    .with_description(translation.no_search_results_found_description.clone())
    .with_icon(IconRef::Svg(icons::WARNING.to_string()))
    .keep_window_open()
}
