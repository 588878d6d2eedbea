// store/mongo.rs
use async_trait::async_trait;
use bson::{doc, DateTime as BsonDateTime, Document};
use futures_util::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use tracing::{debug, info};

use super::{matches_filter, sort_matches, MatchFilter, MatchSort, MatchStore, StoreError};
use crate::models::match_record::MatchRecord;

const MATCHES_COLLECTION: &str = "matches";

// Mongo duplicate-key error, raised when a conflicting upsert races us.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoMatchStore {
    collection: Collection<MatchRecord>,
}

impl MongoMatchStore {
    pub fn new(db: &Database) -> Self {
        MongoMatchStore {
            collection: db.collection(MATCHES_COLLECTION),
        }
    }

    /// Unique index on match_id backs both upsert idempotence and the
    /// duplicate-key path of the optimistic-concurrency check.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "match_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        info!("✅ ensured unique index on matches.match_id");
        Ok(())
    }

    fn status_filter(filter: &MatchFilter) -> Document {
        // Status narrowing happens in the query; the recency window and
        // text search are applied in-process via the shared helpers so
        // both store implementations behave identically.
        let mut query = doc! {};
        if !filter.statuses.is_empty() {
            let statuses: Vec<&str> = filter.statuses.iter().map(|s| s.as_str()).collect();
            query.insert("status", doc! { "$in": statuses });
        }
        query
    }
}

#[async_trait]
impl MatchStore for MongoMatchStore {
    async fn find_by_match_id(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let record = self
            .collection
            .find_one(doc! { "match_id": match_id })
            .await?;
        Ok(record)
    }

    async fn find_matches(
        &self,
        filter: &MatchFilter,
        sort: MatchSort,
        limit: Option<i64>,
    ) -> Result<Vec<MatchRecord>, StoreError> {
        let query = Self::status_filter(filter);
        debug!("matches query: {:?}", query);

        let cursor = self.collection.find(query).await?;
        let mut records: Vec<MatchRecord> = cursor.try_collect().await?;

        records.retain(|r| matches_filter(r, filter));
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
        let mut next = record.clone();
        next.version = expected_version + 1;

        let now = BsonDateTime::now();
        next.updated_at = Some(now);
        if next.created_at.is_none() {
            next.created_at = Some(now);
        }

        let doc = bson::to_document(&next)?;
        let filter = doc! {
            "match_id": &next.match_id,
            "version": expected_version,
        };

        // First write of a match (expected 0) is allowed to insert; later
        // writes must hit the exact version they read.
        let result = self
            .collection
            .update_one(filter, doc! { "$set": doc })
            .upsert(expected_version == 0)
            .await;

        match result {
            Ok(outcome) => {
                if outcome.matched_count == 0 && outcome.upserted_id.is_none() {
                    return Err(StoreError::VersionConflict(next.match_id.clone()));
                }
                Ok(next)
            }
            Err(e) => {
                // A racing first-insert trips the unique match_id index.
                if let ErrorKind::Write(WriteFailure::WriteError(we)) = &*e.kind {
                    if we.code == DUPLICATE_KEY_CODE {
                        return Err(StoreError::VersionConflict(next.match_id.clone()));
                    }
                }
                Err(e.into())
            }
        }
    }

    async fn purge(&self, match_id: &str) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "match_id": match_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

/// Last-write-wins upsert keyed by a natural id, shared by the simple sync
/// jobs (news, players, teams, venues, rankings). No version stamp - these
/// documents carry no lifecycle.
pub async fn upsert_by_key(
    db: &Database,
    collection: &str,
    key_field: &str,
    key: &str,
    mut document: Document,
) -> Result<(), StoreError> {
    let now = BsonDateTime::now();
    document.insert("updated_at", now);

    let coll: Collection<Document> = db.collection(collection);
    coll.update_one(
        doc! { key_field: key },
        doc! {
            "$set": document,
            "$setOnInsert": { "created_at": now },
        },
    )
    .upsert(true)
    .await?;

    Ok(())
}
