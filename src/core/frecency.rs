//! Execution log: what was executed, how often and how recently.
//!
//! Entries are ranked by frecency, Firefox's exponential decay over
//! frequency and recency:
//!
//! ```text
//! score = 0.4 × ln(count + 1) × 10 + 0.6 × e^(-λ × age_days) × 100
//! λ = ln(2) / half_life_days
//! ```
//!
//! The highest-scoring entries are the user's favorites.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::item::{PluginType, SearchResultItem};
use crate::error::OrbitResult;

/// Half-life in days for the exponential decay function.
const HALF_LIFE_DAYS: f64 = 14.0;

/// Decay constant: λ = ln(2) / half_life
const LAMBDA: f64 = std::f64::consts::LN_2 / HALF_LIFE_DAYS;

/// Maximum age in days before an entry is pruned.
const MAX_AGE_DAYS: u64 = 90;

/// Debounce interval for saving (in number of updates).
const SAVE_DEBOUNCE_COUNT: u32 = 5;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn entry_key(plugin: PluginType, execution_argument: &str) -> String {
    format!("{}:{}", plugin, execution_argument)
}

/// One executed result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    /// The item as it looked when last executed.
    pub item: SearchResultItem,
    pub count: u32,
    /// Unix timestamp of last use.
    pub last_used: u64,
    /// Unix timestamp of first use.
    pub first_used: u64,
}

impl UsageEntry {
    fn new(item: SearchResultItem) -> Self {
        let now = now_secs();
        Self {
            item,
            count: 1,
            last_used: now,
            first_used: now,
        }
    }

    fn record_usage(&mut self, item: &SearchResultItem) {
        self.count += 1;
        self.last_used = now_secs();
        self.item = item.clone();
    }

    fn age_days(&self) -> f64 {
        let age_secs = now_secs().saturating_sub(self.last_used);
        age_secs as f64 / 86400.0
    }

    pub fn score(&self) -> f64 {
        let freq_score = (self.count as f64 + 1.0).ln();
        let recency_score = (-LAMBDA * self.age_days()).exp();

        0.4 * freq_score * 10.0 + 0.6 * recency_score * 100.0
    }
}

/// Persistent execution log.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    /// Keyed by `<plugin>:<execution argument>`.
    entries: HashMap<String, UsageEntry>,

    #[serde(skip)]
    updates_since_save: u32,

    #[serde(skip)]
    data_path: Option<PathBuf>,
}

impl ExecutionLog {
    /// In-memory log that is never written to disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<data dir>/orbit/execution-log.json`.
    pub fn default_path() -> PathBuf {
        crate::config::data_dir().join("execution-log.json")
    }

    /// Load the log stored at `path`.
    ///
    /// Returns an empty log if the file doesn't exist or is corrupted.
    pub fn load_from(path: &Path) -> Self {
        let mut log = if path.exists() {
            match fs::read_to_string(path).map(|c| serde_json::from_str::<ExecutionLog>(&c)) {
                Ok(Ok(log)) => log,
                Ok(Err(e)) => {
                    log::warn!("Ignoring corrupt execution log {}: {}", path.display(), e);
                    Self::default()
                }
                Err(e) => {
                    log::warn!("Failed to read execution log {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        log.data_path = Some(path.to_path_buf());
        log.prune_old();
        log
    }

    /// Frecency of an item; 0.0 if it was never executed.
    pub fn calculate(&self, plugin: PluginType, execution_argument: &str) -> f64 {
        self.entries
            .get(&entry_key(plugin, execution_argument))
            .map(UsageEntry::score)
            .unwrap_or(0.0)
    }

    /// Record an execution. Saves every few updates.
    pub fn log_usage(&mut self, item: &SearchResultItem) {
        self.entries
            .entry(entry_key(item.origin_plugin_type, &item.execution_argument))
            .and_modify(|e| e.record_usage(item))
            .or_insert_with(|| UsageEntry::new(item.clone()));

        self.updates_since_save += 1;
        if self.updates_since_save >= SAVE_DEBOUNCE_COUNT {
            self.save_logged();
        }
    }

    /// Entries by descending frecency; most recent first on ties.
    pub fn ranked(&self) -> Vec<&UsageEntry> {
        let mut ranked: Vec<(f64, &String, &UsageEntry)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.score(), key, entry))
            .collect();

        ranked.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.2.last_used.cmp(&a.2.last_used))
                .then_with(|| a.1.cmp(b.1))
        });

        ranked.into_iter().map(|(_, _, entry)| entry).collect()
    }

    /// Forget everything and persist the empty log.
    pub fn clear(&mut self) -> OrbitResult<()> {
        self.entries.clear();
        self.save()
    }

    /// Remove entries not used in MAX_AGE_DAYS.
    pub fn prune_old(&mut self) {
        let cutoff_secs = now_secs().saturating_sub(MAX_AGE_DAYS * 86400);

        let before_count = self.entries.len();
        self.entries.retain(|_, e| e.last_used > cutoff_secs);

        if self.entries.len() != before_count {
            log::debug!("Pruned {} stale execution log entries", before_count - self.entries.len());
            self.save_logged();
        }
    }

    /// Write the log to disk. In-memory logs are left alone.
    pub fn save(&mut self) -> OrbitResult<()> {
        self.updates_since_save = 0;

        let Some(path) = self.data_path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Force an immediate save if anything changed (e.g., on shutdown).
    pub fn flush(&mut self) -> OrbitResult<()> {
        if self.updates_since_save > 0 {
            self.save()?;
        }
        Ok(())
    }

    fn save_logged(&mut self) {
        if let Err(e) = self.save() {
            log::error!("Failed to save execution log: {}", e);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
