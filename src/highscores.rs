//! High score leaderboard
//!
//! Persisted as one JSON list, keeps the top 20 runs ranked by score then
//! distance. Every write re-reads the stored list so ranks always come from
//! the full canonical ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 20;

/// Rows per page in the scores table
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    #[serde(default)]
    pub distance: u64,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

impl ScoreEntry {
    pub fn new(name: &str, score: u64, distance: u64, timestamp: f64) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() { "Anonymous".to_string() } else { name.to_string() },
            score,
            distance,
            timestamp,
        }
    }

    fn same_run(&self, other: &ScoreEntry) -> bool {
        self.name == other.name && self.score == other.score && self.timestamp == other.timestamp
    }
}

/// Canonical order: score desc, then distance desc
fn canonical_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then(b.distance.cmp(&a.distance))
}

/// Column to sort the table by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Name,
    #[default]
    Score,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Ascending,
    #[default]
    Descending,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
}

impl ScoreLedger {
    /// Storage key for the whole list
    const STORAGE_KEY: &'static str = "runner:highscores";

    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Build a ledger from arbitrary entries (sorted and capped)
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        entries.sort_by(canonical_order);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Load from the store, empty on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Vec<ScoreEntry>>(store, Self::STORAGE_KEY) {
            Ok(Some(entries)) => {
                log::info!("Loaded {} high scores", entries.len());
                Self::from_entries(entries)
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, &self.entries)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Append an entry, re-rank, cap and persist.
    ///
    /// Returns the entry's 1-indexed rank, or None if it fell off the list.
    /// A failed read writes nothing; only a corrupt list is started over.
    pub fn record(
        &mut self,
        store: &mut dyn KeyValueStore,
        entry: ScoreEntry,
    ) -> Result<Option<usize>, StoreError> {
        let mut entries = match load_json::<Vec<ScoreEntry>>(store, Self::STORAGE_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(StoreError::Serde(e)) => {
                log::warn!("Replacing corrupt high scores: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        entries.push(entry.clone());
        *self = Self::from_entries(entries);
        self.save(store)?;
        Ok(self.canonical_rank(&entry))
    }

    /// Empty the persisted list. Authorization is the caller's problem.
    pub fn clear(&mut self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        self.entries.clear();
        store.remove(Self::STORAGE_KEY)?;
        log::info!("High scores cleared");
        Ok(())
    }

    /// Canonically sorted entries, optionally filtered by a
    /// case-insensitive substring of the name
    pub fn query(&self, filter: Option<&str>) -> Vec<ScoreEntry> {
        let needle = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// 1-indexed position in the full canonical list
    pub fn canonical_rank(&self, entry: &ScoreEntry) -> Option<usize> {
        self.entries.iter().position(|e| e.same_run(entry)).map(|i| i + 1)
    }

    /// Entries re-sorted for display
    pub fn sorted_by(&self, key: SortKey, dir: SortDir, filter: Option<&str>) -> Vec<ScoreEntry> {
        let mut list = self.query(filter);
        list.sort_by(|a, b| {
            // Descending is the natural reading for score and distance
            let desc = match key {
                SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()).reverse(),
                SortKey::Score => canonical_order(a, b),
                SortKey::Distance => b.distance.cmp(&a.distance).then(b.score.cmp(&a.score)),
            };
            match dir {
                SortDir::Descending => desc,
                SortDir::Ascending => desc.reverse(),
            }
        });
        list
    }

    /// Check if a run would make the board
    pub fn qualifies(&self, score: u64, distance: u64) -> bool {
        self.potential_rank(score, distance).is_some()
    }

    /// Rank a run would get (1-indexed), None if it doesn't place.
    ///
    /// Ties go to the earlier entry, matching where `record` inserts.
    pub fn potential_rank(&self, score: u64, distance: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let candidate = ScoreEntry::new("", score, distance, 0.0);
        let rank = self
            .entries
            .iter()
            .position(|e| canonical_order(&candidate, e) == Ordering::Less)
            .unwrap_or(self.entries.len())
            + 1;
        (rank <= MAX_HIGH_SCORES).then_some(rank)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// One page of a list (0-indexed page)
pub fn page(list: &[ScoreEntry], page: usize, page_size: usize) -> &[ScoreEntry] {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size).min(list.len());
    let end = start.saturating_add(page_size).min(list.len());
    &list[start..end]
}

/// Number of pages needed for `len` rows
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}
