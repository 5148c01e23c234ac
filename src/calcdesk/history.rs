//! Calculation history shared by both calculator engines.
//!
//! Entries are kept newest first. The basic calculator keeps every entry, the
//! scientific calculator caps its log and evicts the oldest entry once the cap
//! is exceeded.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A textual expression paired with the result string it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }
}

/// Newest-first log of [`HistoryEntry`] values with an optional size cap.
///
/// # Example
///
/// ```rust
/// use calcdesk::history::{History, HistoryEntry};
///
/// let mut history = History::bounded(2);
/// history.record(HistoryEntry::new("1 + 1", "2"));
/// history.record(HistoryEntry::new("2 + 2", "4"));
/// history.record(HistoryEntry::new("3 + 3", "6"));
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.latest().unwrap().result, "6");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: Option<usize>,
}

impl History {
    /// A history that never evicts.
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            limit: None,
        }
    }

    /// A history holding at most `limit` entries.
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit: Some(limit),
        }
    }

    /// Prepend an entry, evicting from the old end when over the cap.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                if let Some(evicted) = self.entries.pop_back() {
                    log::debug!("history full, evicting `{}`", evicted.expression);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned newest-first copy, handy for rendering.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::unbounded()
    }
}
