use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::decode_json_column;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub site_url: String,
    pub logo_url: Option<String>,
    pub socials_json: Option<String>,
    pub colors_json: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The business being marketed, with its JSON columns decoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessProfile {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub site_url: String,
    pub logo_url: Option<String>,
    pub socials: BTreeMap<String, String>,
    pub colors: BTreeMap<String, String>,
}

impl From<CompanyRow> for BusinessProfile {
    fn from(row: CompanyRow) -> Self {
        Self {
            socials: decode_json_column(row.socials_json.as_deref()),
            colors: decode_json_column(row.colors_json.as_deref()),
            id: row.id,
            name: row.name,
            description: row.description,
            tone: row.tone,
            site_url: row.site_url,
            logo_url: row.logo_url,
        }
    }
}
