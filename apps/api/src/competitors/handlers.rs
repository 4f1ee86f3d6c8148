use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::company::handlers::CompanyQuery;
use crate::company::store::require_company;
use crate::competitors::snapshot::{analyze, CompetitorSnapshot, CompetitorTarget};
use crate::competitors::store::{insert_competitors, list_competitors, NewCompetitor};
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::competitor::CompetitorRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompetitorEntry {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct AddCompetitorsRequest {
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub competitors: Vec<CompetitorEntry>,
}

impl AddCompetitorsRequest {
    pub fn validate(self) -> Result<(Uuid, Vec<NewCompetitor>), AppError> {
        let company_id = self
            .company_id
            .ok_or_else(|| AppError::Validation("company_id required".to_string()))?;
        let competitors = self
            .competitors
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let url = entry
                    .url
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| AppError::Validation(format!("competitors[{i}].url required")))?;
                Ok(NewCompetitor {
                    name: entry.name.filter(|n| !n.trim().is_empty()),
                    url,
                    socials: entry.socials,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok((company_id, competitors))
    }
}

#[derive(Debug, Serialize)]
pub struct AddCompetitorsResponse {
    pub added: usize,
}

#[derive(Debug, Serialize)]
pub struct CompetitorView {
    pub id: Uuid,
    pub name: Option<String>,
    pub url: String,
    pub socials: BTreeMap<String, String>,
}

impl From<&CompetitorRow> for CompetitorView {
    fn from(row: &CompetitorRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            url: row.url.clone(),
            socials: row.socials(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompetitorAnalysisResponse {
    pub competitors: Vec<CompetitorView>,
    pub analysis: Vec<CompetitorSnapshot>,
}

/// POST /api/competitors
pub async fn handle_add_competitors(
    State(state): State<AppState>,
    AppJson(req): AppJson<AddCompetitorsRequest>,
) -> Result<Json<AddCompetitorsResponse>, AppError> {
    let (company_id, competitors) = req.validate()?;
    require_company(&state.db, company_id).await?;
    insert_competitors(&state.db, company_id, &competitors).await?;
    Ok(Json(AddCompetitorsResponse {
        added: competitors.len(),
    }))
}

/// GET /api/competitors?company_id=
///
/// Lists stored competitors and snapshots each one live.
pub async fn handle_analyze_competitors(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompanyQuery>,
) -> Result<Json<CompetitorAnalysisResponse>, AppError> {
    let rows = list_competitors(&state.db, query.company_id()?).await?;
    let targets: Vec<CompetitorTarget> = rows
        .iter()
        .map(|row| CompetitorTarget {
            id: row.id,
            url: row.url.clone(),
        })
        .collect();

    let analysis = analyze(&state.fetcher, &targets).await;
    Ok(Json(CompetitorAnalysisResponse {
        competitors: rows.iter().map(CompetitorView::from).collect(),
        analysis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competitor_without_url_is_rejected() {
        let req: AddCompetitorsRequest = serde_json::from_str(
            r#"{"company_id":"6f1c2a9e-3b8d-4c1e-9f7a-2d5b8e0c4a11","competitors":[{"url":"https://a.test"},{"name":"B"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            req.validate(),
            Err(AppError::Validation(msg)) if msg == "competitors[1].url required"
        ));
    }

    #[test]
    fn test_competitor_list_defaults_to_empty() {
        let req: AddCompetitorsRequest =
            serde_json::from_str(r#"{"company_id":"6f1c2a9e-3b8d-4c1e-9f7a-2d5b8e0c4a11"}"#)
                .unwrap();
        let (_, competitors) = req.validate().unwrap();
        assert!(competitors.is_empty());
    }
}
