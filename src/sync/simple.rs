//! Simple sync jobs: news, rankings, teams, players, venues. These share
//! the match synchronizer's degradation policy (serve cache on any
//! provider trouble) but carry no lifecycle - just a flat TTL and
//! last-write-wins upserts keyed by the natural provider id.

use std::sync::Arc;

use bson::{doc, DateTime as BsonDateTime, Document};
use chrono::{Duration, Utc};
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AppError, Result};
use crate::models::news::NewsArticle;
use crate::models::ranking::{RankingEntry, RankingTable};
use crate::provider::client::CricketDataClient;
use crate::provider::shapes::{get_i64, get_str};
use crate::store::mongo::upsert_by_key;

const NEWS_COLLECTION: &str = "news";
const RANKINGS_COLLECTION: &str = "rankings";

pub struct SimpleSyncService {
    db: Database,
    provider: Option<Arc<CricketDataClient>>,
    ttl_minutes: i64,
}

impl SimpleSyncService {
    pub fn new(db: Database, provider: Option<Arc<CricketDataClient>>, ttl_minutes: i64) -> Self {
        SimpleSyncService {
            db,
            provider,
            ttl_minutes,
        }
    }

    pub async fn news(&self) -> Result<Vec<NewsArticle>> {
        if let Some(provider) = self.provider_if_stale(NEWS_COLLECTION, None).await? {
            match provider.fetch_news_index().await {
                Ok(payload) => {
                    for (story_id, doc) in parse_news_list(&payload) {
                        if let Err(e) =
                            upsert_by_key(&self.db, NEWS_COLLECTION, "story_id", &story_id, doc)
                                .await
                        {
                            warn!("failed to upsert news story {}: {}", story_id, e);
                        }
                    }
                }
                Err(e) => warn!("news fetch failed ({}), serving cache", e),
            }
        }

        let collection: Collection<NewsArticle> = self.db.collection(NEWS_COLLECTION);
        let cursor = collection
            .find(doc! {})
            .sort(doc! { "published_at": -1 })
            .limit(50)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn rankings(&self, category: &str, format: &str) -> Result<RankingTable> {
        let key = format!("{}:{}", category, format);

        if let Some(provider) = self
            .provider_if_stale(RANKINGS_COLLECTION, Some(doc! { "ranking_key": &key }))
            .await?
        {
            match provider.fetch_rankings(category, format).await {
                Ok(payload) => {
                    let doc = rankings_doc(category, format, &payload);
                    if let Err(e) =
                        upsert_by_key(&self.db, RANKINGS_COLLECTION, "ranking_key", &key, doc).await
                    {
                        warn!("failed to upsert rankings {}: {}", key, e);
                    }
                }
                Err(e) => warn!("rankings fetch failed ({}), serving cache", e),
            }
        }

        let collection: Collection<RankingTable> = self.db.collection(RANKINGS_COLLECTION);
        collection
            .find_one(doc! { "ranking_key": &key })
            .await?
            .ok_or(AppError::DocumentNotFound)
    }

    /// Generic stale-triggered entity refresh for teams, players and
    /// venues: fetch on miss or TTL expiry, serve cache otherwise.
    pub async fn entity(&self, collection: &str, key_field: &str, id: &str) -> Result<Document> {
        let coll: Collection<Document> = self.db.collection(collection);
        let cached = coll.find_one(doc! { key_field: id }).await?;

        let fresh = cached
            .as_ref()
            .and_then(|d| d.get_datetime("updated_at").ok())
            .map(|ts| !self.expired(*ts))
            .unwrap_or(false);

        if fresh {
            return Ok(cached.expect("fresh cached entity"));
        }

        if let Some(provider) = &self.provider {
            let fetched = match collection {
                "teams" => provider.fetch_team(id).await,
                "players" => provider.fetch_player(id).await,
                "venues" => provider.fetch_venue(id).await,
                other => {
                    return Err(AppError::invalid_query(format!(
                        "unknown entity collection: {}",
                        other
                    )))
                }
            };

            match fetched {
                Ok(payload) => {
                    let doc = entity_doc(key_field, id, &payload);
                    if let Err(e) = upsert_by_key(&self.db, collection, key_field, id, doc).await {
                        warn!("failed to upsert {} {}: {}", collection, id, e);
                    }
                }
                Err(e) => {
                    debug!("{} fetch failed for {} ({}), serving cache", collection, id, e);
                }
            }
        }

        coll.find_one(doc! { key_field: id })
            .await?
            .ok_or(AppError::DocumentNotFound)
    }

    /// Returns the provider handle when the collection's newest document
    /// has outlived the TTL (or the collection is empty). None means the
    /// cache is fresh or there is no provider - either way, don't fetch.
    async fn provider_if_stale(
        &self,
        collection: &str,
        filter: Option<Document>,
    ) -> Result<Option<Arc<CricketDataClient>>> {
        let provider = match &self.provider {
            Some(p) => p.clone(),
            None => return Ok(None),
        };

        let coll: Collection<Document> = self.db.collection(collection);
        let newest = coll
            .find(filter.unwrap_or_default())
            .sort(doc! { "updated_at": -1 })
            .limit(1)
            .await?
            .try_next()
            .await?;

        let fresh = newest
            .and_then(|d| d.get_datetime("updated_at").ok().copied())
            .map(|ts| !self.expired(ts))
            .unwrap_or(false);

        Ok(if fresh { None } else { Some(provider) })
    }

    fn expired(&self, updated_at: BsonDateTime) -> bool {
        Utc::now() - updated_at.to_chrono() >= Duration::minutes(self.ttl_minutes)
    }
}

/// Reshape the provider's news index (`storyList` with interleaved ad
/// entries) into upsertable documents.
fn parse_news_list(payload: &Value) -> Vec<(String, Document)> {
    let mut out = Vec::new();

    let stories = match payload.get("storyList").and_then(Value::as_array) {
        Some(arr) => arr,
        None => return out,
    };

    for wrapper in stories {
        // Ad entries carry no "story" key.
        let story = match wrapper.get("story") {
            Some(s) => s,
            None => continue,
        };

        let story_id = match get_str(story, &["id", "storyId"]) {
            Some(id) => id,
            None => continue,
        };

        let mut doc = doc! {
            "story_id": &story_id,
            "headline": get_str(story, &["hline", "headline"]).unwrap_or_default(),
            "intro": get_str(story, &["intro"]).unwrap_or_default(),
            "context": get_str(story, &["context"]).unwrap_or_default(),
        };
        if let Some(pub_ms) = get_i64(story, &["pubTime", "publishedAt"]) {
            doc.insert("published_at", BsonDateTime::from_millis(pub_ms));
        }
        if let Some(image_id) = get_str(story, &["imageId"]) {
            doc.insert("image_id", image_id);
        }
        if let Ok(raw) = bson::to_bson(story) {
            doc.insert("raw", raw);
        }

        out.push((story_id, doc));
    }

    out
}

fn rankings_doc(category: &str, format: &str, payload: &Value) -> Document {
    let entries: Vec<RankingEntry> = payload
        .get("rank")
        .and_then(Value::as_array)
        .map(|ranks| {
            ranks
                .iter()
                .map(|r| RankingEntry {
                    rank: get_i64(r, &["rank"]).unwrap_or(0),
                    name: get_str(r, &["name"]).unwrap_or_default(),
                    country: get_str(r, &["country"]).unwrap_or_default(),
                    rating: get_i64(r, &["rating"]).unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut doc = doc! {
        "category": category,
        "format": format,
        "entries": bson::to_bson(&entries).unwrap_or(bson::Bson::Array(vec![])),
    };
    if let Ok(raw) = bson::to_bson(payload) {
        doc.insert("raw", raw);
    }
    doc
}

/// Flatten an entity payload into a cache document, keeping the raw
/// payload alongside a few normalized fields.
fn entity_doc(key_field: &str, id: &str, payload: &Value) -> Document {
    let mut doc = doc! { key_field: id };

    for (target, aliases) in [
        ("name", &["name", "teamName", "ground", "fullName"][..]),
        ("short_name", &["shortName", "teamSName"][..]),
        ("city", &["city"][..]),
        ("country", &["country", "intlTeam"][..]),
        ("role", &["role"][..]),
        ("batting_style", &["bat", "battingStyle"][..]),
        ("bowling_style", &["bowl", "bowlingStyle"][..]),
    ] {
        if let Some(value) = get_str(payload, aliases) {
            doc.insert(target, value);
        }
    }

    if let Ok(raw) = bson::to_bson(payload) {
        doc.insert("raw", raw);
    }

    doc
}
