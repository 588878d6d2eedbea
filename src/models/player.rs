use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// Player cache document - `players` collection
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub batting_style: String,
    #[serde(default)]
    pub bowling_style: String,
    pub image_id: Option<String>,
    pub raw: Option<Value>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}
