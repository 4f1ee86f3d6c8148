use std::collections::BTreeMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::company::{BusinessProfile, CompanyRow};

/// Validated input for creating a business profile.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub site_url: String,
    pub logo_url: Option<String>,
    pub socials: BTreeMap<String, String>,
    pub colors: BTreeMap<String, String>,
}

pub async fn insert_company(pool: &PgPool, company: &NewCompany) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO companies
            (id, name, description, tone, site_url, logo_url, socials_json, colors_json)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(&company.name)
    .bind(&company.description)
    .bind(&company.tone)
    .bind(&company.site_url)
    .bind(&company.logo_url)
    .bind(serde_json::to_string(&company.socials).unwrap_or_else(|_| "{}".to_string()))
    .bind(serde_json::to_string(&company.colors).unwrap_or_else(|_| "{}".to_string()))
    .execute(pool)
    .await?;

    info!("Created company {id} ({})", company.name);
    Ok(id)
}

pub async fn find_company(pool: &PgPool, id: Uuid) -> Result<Option<BusinessProfile>, AppError> {
    let row = sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(BusinessProfile::from))
}

/// Loads a company or fails with `NotFound`.
pub async fn require_company(pool: &PgPool, id: Uuid) -> Result<BusinessProfile, AppError> {
    find_company(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

pub async fn latest_company(pool: &PgPool) -> Result<Option<BusinessProfile>, AppError> {
    let row = sqlx::query_as::<_, CompanyRow>(
        "SELECT * FROM companies ORDER BY created_at DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(row.map(BusinessProfile::from))
}
