use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub price: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
