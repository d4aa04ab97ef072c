//! Browser domain model.
//!
//! A browser shows one fixed-size page of an immutable result set at a
//! time. Pages are derived from `(set, page index)` on demand and never
//! stored, so the rendered view can always be recomputed from session
//! state alone.

use std::sync::Arc;

/// Number of records shown per page.
pub const PAGE_SIZE: usize = 20;

/// One display-ready row of a result set.
///
/// `id` keys the secondary fetch performed on selection; `text` is what is
/// rendered and what the search filter matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: String,
    pub text: String,
}

impl DisplayRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// An ordered, immutable sequence of display records.
///
/// Produced once by the originating query and shared cheaply between the
/// base and the filtered view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    records: Arc<[DisplayRecord]>,
}

impl ResultSet {
    pub fn new(records: Vec<DisplayRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&DisplayRecord> {
        self.records.get(index)
    }

    /// Number of pages this set spans. An empty set still has one page so
    /// the "no records" state renders like any other page.
    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// The records of the given 1-indexed page. The last page may be short.
    pub fn page_slice(&self, page: usize) -> &[DisplayRecord] {
        debug_assert!(page >= 1);
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.records.len());
        if start >= self.records.len() {
            &[]
        } else {
            &self.records[start..end]
        }
    }

    /// Case-insensitive substring match of `query` against every record's
    /// display text.
    pub fn matching(&self, query: &str) -> Vec<DisplayRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.text.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl FromIterator<DisplayRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = DisplayRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Enabled/disabled state of the control surface, recomputed after every
/// mutating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFlags {
    /// Previous-page button; disabled on the first page.
    pub prev: bool,
    /// Next-page button; disabled on the last page.
    pub next: bool,
    /// Search entry; disabled while a filter is active.
    pub filter: bool,
    /// Filter reset; disabled while unfiltered.
    pub reset: bool,
}

impl ControlFlags {
    /// All controls off. Used for the final render after expiry.
    pub const DISABLED: Self = Self {
        prev: false,
        next: false,
        filter: false,
        reset: false,
    };
}

/// A fully rendered page: display lines plus the control surface state.
///
/// Rendering has edit semantics - each new `RenderedPage` replaces the
/// previous one in place, so stale duplicates never accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub lines: Vec<String>,
    pub footer: String,
    pub controls: ControlFlags,
    pub expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize) -> ResultSet {
        (0..n)
            .map(|i| DisplayRecord::new(format!("id-{i}"), format!("record {i}")))
            .collect()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(set_of(0).page_count(), 1);
        assert_eq!(set_of(1).page_count(), 1);
        assert_eq!(set_of(20).page_count(), 1);
        assert_eq!(set_of(21).page_count(), 2);
        assert_eq!(set_of(45).page_count(), 3);
    }

    #[test]
    fn pages_concatenate_back_to_the_set() {
        let set = set_of(45);
        let mut rebuilt = Vec::new();
        for page in 1..=set.page_count() {
            let slice = set.page_slice(page);
            assert!(slice.len() <= PAGE_SIZE);
            rebuilt.extend_from_slice(slice);
        }
        assert_eq!(rebuilt, set.records());
    }

    #[test]
    fn last_page_may_be_short() {
        let set = set_of(45);
        assert_eq!(set.page_slice(1).len(), 20);
        assert_eq!(set.page_slice(2).len(), 20);
        assert_eq!(set.page_slice(3).len(), 5);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let set = ResultSet::new(vec![
            DisplayRecord::new("1", "A1 - Alpha"),
            DisplayRecord::new("2", "B2 - Beta"),
        ]);
        let hits = set.matching("alpha");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "A1 - Alpha");
        assert!(set.matching("GAMMA").is_empty());
    }
}
