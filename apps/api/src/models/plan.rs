use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPlanRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub week_start: NaiveDate,
    pub platform: String,
    pub status: String,
    /// Snapshot of the generated plan as returned by the builder.
    pub plan: Value,
    pub created_at: DateTime<Utc>,
}

/// Plan listing without the snapshot column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPlanSummaryRow {
    pub id: Uuid,
    pub week_start: NaiveDate,
    pub platform: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub platform: String,
    pub scheduled_at: DateTime<Utc>,
    pub caption: String,
    pub hashtags: String,
    pub image_prompt: String,
    pub status: String,
}
