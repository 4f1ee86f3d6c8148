use aws_sdk_s3::primitives::ByteStream;
use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::export::csv::to_csv;
use crate::planning::store::{find_plan, list_posts};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub plan_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub storage_key: String,
    pub csv: String,
}

pub fn export_key(plan_id: Uuid, unix_millis: i64) -> String {
    format!("exports/plan_{plan_id}_{unix_millis}.csv")
}

/// POST /api/export/csv
///
/// Renders the plan's posts (schedule order) as CSV and stores it in the bucket.
pub async fn handle_export(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExportRequest>,
) -> Result<Json<ExportResponse>, AppError> {
    let plan_id = req
        .plan_id
        .ok_or_else(|| AppError::Validation("plan_id required".to_string()))?;
    if find_plan(&state.db, plan_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Plan {plan_id} not found")));
    }

    let posts = list_posts(&state.db, plan_id).await?;
    let csv = to_csv(&posts);
    let storage_key = export_key(plan_id, Utc::now().timestamp_millis());

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&storage_key)
        .body(ByteStream::from(csv.clone().into_bytes()))
        .content_type("text/csv")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Export upload failed: {e}")))?;

    info!(
        "Exported {} posts of plan {plan_id} to s3://{}/{}",
        posts.len(),
        state.config.s3_bucket,
        storage_key
    );
    Ok(Json(ExportResponse { storage_key, csv }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_key_format() {
        assert_eq!(
            export_key(Uuid::nil(), 1_760_000_000_000),
            "exports/plan_00000000-0000-0000-0000-000000000000_1760000000000.csv"
        );
    }
}
