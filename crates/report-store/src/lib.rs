//! In-memory result store for analysis records.
//!
//! Keyed by `request_id`, safe for concurrent access from request handlers.
//! Records are inserted and replaced as whole values, so a reader never
//! observes a half-written record. Constructed once at startup and handed to
//! the orchestrator and service by `Arc`; there is no ambient global state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use advisor_core::{AnalysisRecord, AnalysisStatus, ServiceStats};

/// Stored record plus its insertion sequence. The sequence survives
/// overwrites so in-place status updates do not reshuffle listing order
/// among records created at the same instant.
struct Stored {
    record: AnalysisRecord,
    seq: u64,
}

#[derive(Default)]
pub struct ReportStore {
    records: DashMap<String, Stored>,
    next_seq: AtomicU64,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by `request_id`. Overwrite is intentional: the
    /// orchestrator writes the whole record back after every phase.
    pub fn put(&self, record: AnalysisRecord) {
        match self.records.entry(record.request_id.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().record = record;
            }
            Entry::Vacant(vacant) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Stored { record, seq });
            }
        }
    }

    /// Point lookup. Absence is not an error.
    pub fn get(&self, request_id: &str) -> Option<AnalysisRecord> {
        self.records.get(request_id).map(|s| s.record.clone())
    }

    /// Records sorted by `created_at` descending (newest first), ties broken
    /// by insertion order, optionally filtered to one status, truncated to
    /// `limit`.
    pub fn list(&self, status: Option<AnalysisStatus>, limit: usize) -> Vec<AnalysisRecord> {
        let mut entries: Vec<(u64, AnalysisRecord)> = self
            .records
            .iter()
            .filter(|s| status.is_none_or(|wanted| s.record.status == wanted))
            .map(|s| (s.seq, s.record.clone()))
            .collect();

        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_a.cmp(seq_b))
        });

        entries
            .into_iter()
            .take(limit)
            .map(|(_, record)| record)
            .collect()
    }

    /// Remove by id, returning whether a record was removed.
    pub fn delete(&self, request_id: &str) -> bool {
        self.records.remove(request_id).is_some()
    }

    /// Remove every record older than `days` days, regardless of status.
    /// Returns the number removed.
    pub fn cleanup_older_than(&self, days: i64) -> usize {
        let cutoff = Utc::now() - Duration::days(days);
        let before = self.records.len();
        self.records.retain(|_, s| s.record.created_at >= cutoff);
        let removed = before - self.records.len();
        if removed > 0 {
            tracing::info!("Cleaned up {} analyses older than {} days", removed, days);
        }
        removed
    }

    pub fn stats(&self) -> ServiceStats {
        let mut status_counts: HashMap<String, usize> = HashMap::new();
        let recent_cutoff = Utc::now() - Duration::hours(24);
        let mut recent = 0;

        for entry in self.records.iter() {
            *status_counts
                .entry(entry.record.status.as_str().to_string())
                .or_insert(0) += 1;
            if entry.record.created_at > recent_cutoff {
                recent += 1;
            }
        }

        ServiceStats {
            total_analyses: self.records.len(),
            status_counts,
            recent_analyses: recent,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: &str) -> AnalysisRecord {
        AnalysisRecord::new(id.to_string(), vec!["AAPL".to_string()])
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = ReportStore::new();
        store.put(record("a"));
        assert_eq!(store.get("a").unwrap().request_id, "a");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_delete_semantics() {
        let store = ReportStore::new();
        store.put(record("a"));
        assert!(!store.delete("missing"));
        assert_eq!(store.len(), 1);
        assert!(store.delete("a"));
        assert!(store.get("a").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_newest_first() {
        let store = ReportStore::new();
        let now = Utc::now();
        for (i, id) in ["old", "mid", "new"].iter().enumerate() {
            let mut r = record(id);
            r.created_at = now - Duration::hours(3 - i as i64);
            store.put(r);
        }
        let listed = store.list(None, 50);
        let ids: Vec<&str> = listed.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_list_ties_broken_by_insertion_order() {
        let store = ReportStore::new();
        let now = Utc::now();
        for id in ["first", "second", "third"] {
            let mut r = record(id);
            r.created_at = now;
            store.put(r);
        }
        let ids: Vec<String> = store
            .list(None, 50)
            .into_iter()
            .map(|r| r.request_id)
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_overwrite_keeps_insertion_order() {
        let store = ReportStore::new();
        let now = Utc::now();
        let mut a = record("a");
        a.created_at = now;
        let mut b = record("b");
        b.created_at = now;
        store.put(a);
        store.put(b.clone());

        // In-place status update of "a" must not move it behind "b".
        let mut updated = store.get("a").unwrap();
        updated.mark_completed();
        store.put(updated);

        let ids: Vec<String> = store
            .list(None, 50)
            .into_iter()
            .map(|r| r.request_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_list_filter_and_limit() {
        let store = ReportStore::new();
        for i in 0..5 {
            let mut r = record(&format!("r{i}"));
            if i % 2 == 0 {
                r.mark_completed();
            }
            store.put(r);
        }
        let completed = store.list(Some(AnalysisStatus::Completed), 50);
        assert_eq!(completed.len(), 3);
        assert!(completed
            .iter()
            .all(|r| r.status == AnalysisStatus::Completed));

        assert_eq!(store.list(None, 2).len(), 2);
    }

    #[test]
    fn test_cleanup_zero_days_removes_all() {
        let store = ReportStore::new();
        for i in 0..3 {
            let mut r = record(&format!("r{i}"));
            r.created_at = Utc::now() - Duration::seconds(1);
            store.put(r);
        }
        assert_eq!(store.cleanup_older_than(0), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_far_horizon_removes_none() {
        let store = ReportStore::new();
        store.put(record("a"));
        assert_eq!(store.cleanup_older_than(100_000), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_stats_counts() {
        let store = ReportStore::new();
        let mut completed = record("done");
        completed.mark_completed();
        store.put(completed);

        let mut failed = record("bad");
        failed.mark_failed("agent timeout");
        store.put(failed);

        let mut stale = record("stale");
        stale.created_at = Utc::now() - Duration::days(2);
        store.put(stale);

        let stats = store.stats();
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.status_counts.get("completed"), Some(&1));
        assert_eq!(stats.status_counts.get("failed"), Some(&1));
        assert_eq!(stats.status_counts.get("in_progress"), Some(&1));
        assert_eq!(stats.recent_analyses, 2);
    }
}
