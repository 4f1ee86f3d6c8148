use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeoPageRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub url: String,
    pub title: String,
    pub h1: String,
    pub meta_desc: String,
    pub score: i32,
    pub issues_json: Option<String>,
    pub last_checked: DateTime<Utc>,
}
