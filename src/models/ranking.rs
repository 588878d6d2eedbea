use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// ICC ranking cache document - `rankings` collection.
// Keyed by "{category}:{format}" e.g. "batsmen:odi", one document per table.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingTable {
    pub ranking_key: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub entries: Vec<RankingEntry>,
    pub raw: Option<Value>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub rating: i64,
}
