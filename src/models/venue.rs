use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// Venue cache document - `venues` collection
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDoc {
    pub venue_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub capacity: Option<i64>,
    pub raw: Option<Value>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}
