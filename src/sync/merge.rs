//! Merge engine: reconcile a freshly built candidate record with whatever
//! the cache already holds, then persist through the versioned upsert.
//! This is the only writer path for MatchRecord in the whole service.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::models::match_record::{CanonicalStatus, MatchRecord};
use crate::store::{MatchStore, StoreError};

/// Total write attempts per sync cycle before the conflict surfaces.
const MAX_PERSIST_ATTEMPTS: u32 = 3;
const PERSIST_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Combine the cached record with new data. Rules, in order:
///
/// * no existing record - the candidate is taken verbatim (first insert);
/// * a terminal status on the existing record sticks, unless this is an
///   explicit admin override;
/// * an existing LIVE status is not regressed by a non-terminal candidate
///   (transient "upcoming" misclassifications mid-match);
/// * sub-resource blobs are additive - the candidate overwrites only the
///   blobs it actually carries;
/// * `raw` is a diagnostic snapshot, replaced wholesale by the latest fetch;
/// * an empty or all-zero candidate team list never clobbers real scores.
pub fn merge(
    existing: Option<&MatchRecord>,
    candidate: MatchRecord,
    admin_override: bool,
) -> MatchRecord {
    let existing = match existing {
        Some(e) => e,
        None => {
            let mut first = candidate;
            first.version = 0;
            first.sync_is_live();
            return first;
        }
    };

    let mut merged = candidate;

    merged.status = resolve_status(existing.status, merged.status, admin_override);

    // Additive sub-resources: a partial fetch must not erase blobs it
    // didn't touch.
    if merged.scorecard.is_none() {
        merged.scorecard = existing.scorecard.clone();
    }
    if merged.historical_scorecard.is_none() {
        merged.historical_scorecard = existing.historical_scorecard.clone();
    }
    if merged.commentary.is_none() {
        merged.commentary = existing.commentary.clone();
    }
    if merged.historical_commentary.is_none() {
        merged.historical_commentary = existing.historical_commentary.clone();
    }
    if merged.overs.is_none() {
        merged.overs = existing.overs.clone();
    }

    if merged.raw.is_none() {
        merged.raw = existing.raw.clone();
    }

    // Zero-score guard: a fetch that came back scoreless must not wipe
    // scores we already have.
    let candidate_has_scores = merged.teams.len() == 2 && merged.has_score_data();
    if !candidate_has_scores && existing.has_score_data() {
        merged.teams = existing.teams.clone();
    }

    if merged.end_date.is_none() {
        merged.end_date = existing.end_date;
    }

    merged.created_at = existing.created_at;
    merged.version = existing.version;
    merged.sync_is_live();

    merged
}

fn resolve_status(
    existing: CanonicalStatus,
    candidate: CanonicalStatus,
    admin_override: bool,
) -> CanonicalStatus {
    if admin_override {
        return candidate;
    }

    if existing.is_terminal() {
        if candidate != existing {
            debug!(
                "keeping terminal status {:?} over candidate {:?}",
                existing, candidate
            );
        }
        return existing;
    }

    if existing == CanonicalStatus::Live && !candidate.is_terminal() {
        return CanonicalStatus::Live;
    }

    candidate
}

/// All writers go through here: read, merge against the fresh existing
/// record, attempt the versioned upsert, and on a conflict re-read and
/// re-merge. The losing writer of a race never silently overwrites.
pub struct MergeEngine {
    store: Arc<dyn MatchStore>,
}

impl MergeEngine {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        MergeEngine { store }
    }

    pub fn store(&self) -> &Arc<dyn MatchStore> {
        &self.store
    }

    pub async fn persist(&self, candidate: MatchRecord) -> Result<MatchRecord, StoreError> {
        self.persist_inner(candidate, false).await
    }

    /// Admin-only path: the single way to move a match out of a terminal
    /// status.
    pub async fn persist_with_override(
        &self,
        candidate: MatchRecord,
    ) -> Result<MatchRecord, StoreError> {
        self.persist_inner(candidate, true).await
    }

    async fn persist_inner(
        &self,
        candidate: MatchRecord,
        admin_override: bool,
    ) -> Result<MatchRecord, StoreError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let existing = self.store.find_by_match_id(&candidate.match_id).await?;
            let expected_version = existing.as_ref().map(|e| e.version).unwrap_or(0);
            let merged = merge(existing.as_ref(), candidate.clone(), admin_override);

            match self.store.upsert_versioned(&merged, expected_version).await {
                Ok(stored) => return Ok(stored),
                Err(StoreError::VersionConflict(id)) if attempt < MAX_PERSIST_ATTEMPTS => {
                    warn!(
                        "version conflict persisting match {} (attempt {}/{}), re-merging",
                        id, attempt, MAX_PERSIST_ATTEMPTS
                    );
                    tokio::time::sleep(PERSIST_RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
