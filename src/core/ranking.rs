//! Fuzzy relevance ranking for indexed results.
//!
//! A result is scored by the best way its name or tags match the query:
//!
//! 1. the name starts with the query
//! 2. the name contains the query
//! 3. the name contains the query as a subsequence
//! 4. only a tag matches (substring or subsequence)
//!
//! Within the same tier, shorter names come first, then the registration
//! order of the owning plugin, then the plugin's own index order. Raw skim
//! scores only decide whether something matches at all; they are not
//! comparable across names of different lengths and never reorder results.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::item::SearchResultItem;

/// How a result matched the query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    NamePrefix,
    NameSubstring,
    NameFuzzy,
    Tag,
}

/// A matched result together with its full sort key.
#[derive(Debug, Clone)]
pub struct RankedItem<'a> {
    pub item: &'a SearchResultItem,
    pub kind: MatchKind,
    name_len: usize,
    plugin_order: usize,
    entry_order: usize,
}

impl RankedItem<'_> {
    fn sort_key(&self) -> (MatchKind, usize, usize, usize) {
        (self.kind, self.name_len, self.plugin_order, self.entry_order)
    }
}

/// Scores index entries against free-text input.
pub struct Ranker {
    matcher: SkimMatcherV2,
}

impl Ranker {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Classify how `item` matches `query_lower` (already lowercased), if at all.
    pub fn match_kind(&self, item: &SearchResultItem, query_lower: &str) -> Option<MatchKind> {
        if query_lower.is_empty() {
            return None;
        }

        let name = item.name.to_lowercase();
        if name.starts_with(query_lower) {
            return Some(MatchKind::NamePrefix);
        }
        if name.contains(query_lower) {
            return Some(MatchKind::NameSubstring);
        }
        if self.matcher.fuzzy_match(&name, query_lower).is_some() {
            return Some(MatchKind::NameFuzzy);
        }

        let tag_matches = item.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            tag.contains(query_lower) || self.matcher.fuzzy_match(&tag, query_lower).is_some()
        });
        tag_matches.then_some(MatchKind::Tag)
    }

    /// Rank the entries of several plugins against `query`.
    ///
    /// `sources` yields each plugin's entries paired with its registration order.
    pub fn rank<'a, I>(&self, sources: I, query: &str) -> Vec<RankedItem<'a>>
    where
        I: IntoIterator<Item = (usize, &'a [SearchResultItem])>,
    {
        let query_lower = query.trim().to_lowercase();

        let mut ranked: Vec<RankedItem<'a>> = sources
            .into_iter()
            .flat_map(|(plugin_order, entries)| {
                entries
                    .iter()
                    .enumerate()
                    .map(move |(entry_order, item)| (plugin_order, entry_order, item))
            })
            .filter_map(|(plugin_order, entry_order, item)| {
                let kind = self.match_kind(item, &query_lower)?;
                Some(RankedItem {
                    item,
                    kind,
                    name_len: item.name.chars().count(),
                    plugin_order,
                    entry_order,
                })
            })
            .collect();

        ranked.sort_by_key(|r| r.sort_key());
        ranked
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}
