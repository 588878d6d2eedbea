use bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

// News article cache document - `news` collection
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub story_id: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub context: String,
    pub published_at: Option<BsonDateTime>,
    pub image_id: Option<String>,
    pub raw: Option<Value>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize)]
pub struct NewsListResponse {
    pub articles: Vec<NewsArticle>,
    pub count: usize,
}
