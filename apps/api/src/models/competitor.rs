use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::decode_json_column;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompetitorRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: Option<String>,
    pub url: String,
    pub socials_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CompetitorRow {
    pub fn socials(&self) -> BTreeMap<String, String> {
        decode_json_column(self.socials_json.as_deref())
    }
}
