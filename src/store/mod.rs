//! Cache store adapter. All MatchRecord writes in the whole service go
//! through [`MatchStore::upsert_versioned`] - the merge engine is the sole
//! writer path, everything else is lock-free reads.

pub mod mongo;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bson::DateTime as BsonDateTime;
use thiserror::Error;

use crate::models::match_record::{CanonicalStatus, MatchRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The record changed since it was last read. Resolved by the merge
    /// engine's re-read-and-retry loop, never surfaced raw.
    #[error("version conflict on match {0}")]
    VersionConflict(String),

    #[error("store error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Typed query surface for match listings. Kept deliberately small: exact
/// status filter, recency window, case-insensitive text search, limit.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    /// Keep only records in one of these statuses (empty = all).
    pub statuses: Vec<CanonicalStatus>,
    /// Keep records whose `end_date` is at or after this instant, or which
    /// have no `end_date` yet. Used for the "exclude long-ended matches
    /// from live listings" consumer window.
    pub ended_at_or_after: Option<BsonDateTime>,
    /// Case-insensitive substring match on title or team names.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSort {
    /// Priority descending, then start date descending.
    PriorityThenRecent,
    StartDateAsc,
    UpdatedDesc,
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError>;

    async fn find_matches(
        &self,
        filter: &MatchFilter,
        sort: MatchSort,
        limit: Option<i64>,
    ) -> Result<Vec<MatchRecord>, StoreError>;

    /// Write `record` if and only if the stored version still equals
    /// `expected_version` (0 means "no prior record"). On success returns
    /// the stored record with its bumped version and fresh `updated_at`.
    async fn upsert_versioned(
        &self,
        record: &MatchRecord,
        expected_version: i64,
    ) -> Result<MatchRecord, StoreError>;

    /// Administrative hard delete. Normal operation never calls this.
    async fn purge(&self, match_id: &str) -> Result<bool, StoreError>;
}

/// In-process filter/sort shared by both store implementations, so listing
/// semantics cannot drift between Mongo and the test store.
pub(crate) fn matches_filter(record: &MatchRecord, filter: &MatchFilter) -> bool {
    if !filter.statuses.is_empty() && !filter.statuses.contains(&record.status) {
        return false;
    }

    if let Some(cutoff) = filter.ended_at_or_after {
        if let Some(end) = record.end_date {
            if end.timestamp_millis() < cutoff.timestamp_millis() {
                return false;
            }
        }
    }

    if let Some(text) = &filter.text {
        let needle = text.to_lowercase();
        let in_title = record.title.to_lowercase().contains(&needle)
            || record.short_title.to_lowercase().contains(&needle);
        let in_teams = record.teams.iter().any(|t| {
            t.team_name.to_lowercase().contains(&needle)
                || t.team_short_name.to_lowercase().contains(&needle)
        });
        if !in_title && !in_teams {
            return false;
        }
    }

    true
}

pub(crate) fn sort_matches(records: &mut [MatchRecord], sort: MatchSort) {
    match sort {
        MatchSort::PriorityThenRecent => records.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.start_date.timestamp_millis().cmp(&a.start_date.timestamp_millis()))
        }),
        MatchSort::StartDateAsc => records.sort_by_key(|r| r.start_date.timestamp_millis()),
        MatchSort::UpdatedDesc => records.sort_by_key(|r| {
            std::cmp::Reverse(r.updated_at.map(|t| t.timestamp_millis()).unwrap_or(0))
        }),
    }
}
