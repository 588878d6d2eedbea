use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// Team cache document - `teams` collection
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub team_type: String,
    pub image_id: Option<String>,
    pub raw: Option<Value>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}
