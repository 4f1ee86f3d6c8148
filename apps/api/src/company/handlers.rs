use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::company::store::{insert_company, latest_company, require_company, NewCompany};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::company::BusinessProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub site_url: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl CreateCompanyRequest {
    pub fn validate(self) -> Result<NewCompany, AppError> {
        let name = non_blank(self.name)
            .ok_or_else(|| AppError::Validation("name required".to_string()))?;
        let site_url = non_blank(self.site_url)
            .ok_or_else(|| AppError::Validation("site_url required".to_string()))?;
        Ok(NewCompany {
            name,
            description: non_blank(self.description),
            tone: non_blank(self.tone),
            site_url,
            logo_url: non_blank(self.logo_url),
            socials: self.socials,
            colors: self.colors,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `?company_id=` query shared by the per-company listing endpoints.
#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    pub company_id: Option<Uuid>,
}

impl CompanyQuery {
    pub fn company_id(&self) -> Result<Uuid, AppError> {
        self.company_id
            .ok_or_else(|| AppError::Validation("company_id required".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct CreateCompanyResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company: Option<BusinessProfile>,
}

/// POST /api/company
pub async fn handle_create_company(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateCompanyRequest>,
) -> Result<Json<CreateCompanyResponse>, AppError> {
    let company = req.validate()?;
    let id = insert_company(&state.db, &company).await?;
    Ok(Json(CreateCompanyResponse { id }))
}

/// GET /api/company
///
/// Returns the most recently created profile, or `null` when none exists.
pub async fn handle_latest_company(
    State(state): State<AppState>,
) -> Result<Json<CompanyResponse>, AppError> {
    let company = latest_company(&state.db).await?;
    Ok(Json(CompanyResponse { company }))
}

/// GET /api/company/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<BusinessProfile>, AppError> {
    Ok(Json(require_company(&state.db, id).await?))
}
