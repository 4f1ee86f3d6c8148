use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::company::handlers::CompanyQuery;
use crate::company::store::require_company;
use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::models::decode_json_column;
use crate::models::seo::SeoPageRow;
use crate::seo::audit::{SeoAudit, SeoIssue};
use crate::seo::store::{list_pages, upsert_audit};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub company_id: Option<Uuid>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditInput {
    pub company_id: Uuid,
    pub url: String,
}

impl AuditQuery {
    pub fn validate(self) -> Result<AuditInput, AppError> {
        let url = self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        match (self.company_id, url) {
            (Some(company_id), Some(url)) => Ok(AuditInput { company_id, url }),
            _ => Err(AppError::Validation(
                "url and company_id required".to_string(),
            )),
        }
    }
}

/// Stored audit with its issue list decoded.
#[derive(Debug, Serialize)]
pub struct SeoPageView {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub h1: String,
    pub meta_desc: String,
    pub score: i32,
    pub issues: Vec<SeoIssue>,
    pub last_checked: DateTime<Utc>,
}

impl From<SeoPageRow> for SeoPageView {
    fn from(row: SeoPageRow) -> Self {
        Self {
            issues: decode_json_column(row.issues_json.as_deref()),
            id: row.id,
            url: row.url,
            title: row.title,
            h1: row.h1,
            meta_desc: row.meta_desc,
            score: row.score,
            last_checked: row.last_checked,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeoPageListResponse {
    pub pages: Vec<SeoPageView>,
}

/// GET /api/seo/audit?company_id=&url=
pub async fn handle_audit(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AuditQuery>,
) -> Result<Json<SeoAudit>, AppError> {
    let input = query.validate()?;
    let company = require_company(&state.db, input.company_id).await?;

    let audit = state.auditor.audit(&input.url).await;
    upsert_audit(&state.db, company.id, &audit).await?;

    info!(
        "Audited {} for company {}: score {}",
        audit.url, company.id, audit.score
    );
    Ok(Json(audit))
}

/// GET /api/seo/pages?company_id=
pub async fn handle_list_pages(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompanyQuery>,
) -> Result<Json<SeoPageListResponse>, AppError> {
    let rows = list_pages(&state.db, query.company_id()?).await?;
    Ok(Json(SeoPageListResponse {
        pages: rows.into_iter().map(SeoPageView::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::audit::IssueKind;

    #[test]
    fn test_audit_query_requires_both_fields() {
        let missing_url = AuditQuery {
            company_id: Some(Uuid::new_v4()),
            url: Some("   ".to_string()),
        };
        assert!(matches!(
            missing_url.validate(),
            Err(AppError::Validation(msg)) if msg == "url and company_id required"
        ));
        let missing_company = AuditQuery {
            company_id: None,
            url: Some("https://vinet.test".to_string()),
        };
        assert!(missing_company.validate().is_err());
    }

    #[test]
    fn test_view_decodes_issues_and_tolerates_garbage() {
        let row = |issues_json: Option<&str>| SeoPageRow {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            url: "https://vinet.test".to_string(),
            title: String::new(),
            h1: String::new(),
            meta_desc: String::new(),
            score: 88,
            issues_json: issues_json.map(String::from),
            last_checked: Utc::now(),
        };

        let view = SeoPageView::from(row(Some(r#"[{"id":"links","msg":"Low internal link count"}]"#)));
        assert_eq!(view.issues.len(), 1);
        assert_eq!(view.issues[0].id, IssueKind::Links);

        let view = SeoPageView::from(row(Some("{broken")));
        assert!(view.issues.is_empty());
    }
}
