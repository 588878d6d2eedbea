//! In-memory MatchStore used by the sync-engine tests. Mirrors the Mongo
//! adapter's versioning semantics exactly, including the conflict paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bson::DateTime as BsonDateTime;

use super::{matches_filter, sort_matches, MatchFilter, MatchSort, MatchStore, StoreError};
use crate::models::match_record::MatchRecord;

#[derive(Default)]
pub struct MemoryMatchStore {
    records: Mutex<HashMap<String, MatchRecord>>,
    /// Fail the next N upserts with VersionConflict regardless of version.
    /// Lets tests drive the persist retry loop deterministically.
    forced_conflicts: AtomicUsize,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_conflicts(&self, n: usize) {
        self.forced_conflicts.store(n, Ordering::SeqCst);
    }

    pub fn insert_raw(&self, record: MatchRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.match_id.clone(), record);
    }

    pub fn get(&self, match_id: &str) -> Option<MatchRecord> {
        self.records.lock().unwrap().get(match_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(match_id).cloned())
    }

    async fn find_matches(
        &self,
        filter: &MatchFilter,
        sort: MatchSort,
        limit: Option<i64>,
    ) -> Result<Vec<MatchRecord>, StoreError> {
        let mut records: Vec<MatchRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| matches_filter(r, filter))
            .cloned()
            .collect();

        sort_matches(&mut records, sort);

        if let Some(limit) = limit {
            records.truncate(limit.max(0) as usize);
        }

        Ok(records)
    }

    async fn upsert_versioned(
        &self,
        record: &MatchRecord,
        expected_version: i64,
    ) -> Result<MatchRecord, StoreError> {
        if self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::VersionConflict(record.match_id.clone()));
        }

        let mut records = self.records.lock().unwrap();
        let current_version = records.get(&record.match_id).map(|r| r.version).unwrap_or(0);

        if current_version != expected_version {
            return Err(StoreError::VersionConflict(record.match_id.clone()));
        }

        let mut next = record.clone();
        next.version = expected_version + 1;

        let now = BsonDateTime::now();
        next.updated_at = Some(now);
        if next.created_at.is_none() {
            next.created_at = Some(now);
        }

        records.insert(next.match_id.clone(), next.clone());
        Ok(next)
    }

    async fn purge(&self, match_id: &str) -> Result<bool, StoreError> {
        Ok(self.records.lock().unwrap().remove(match_id).is_some())
    }
}
