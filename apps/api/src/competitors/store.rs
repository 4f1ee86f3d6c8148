use std::collections::BTreeMap;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::competitor::CompetitorRow;

/// Validated competitor entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompetitor {
    pub name: Option<String>,
    pub url: String,
    pub socials: BTreeMap<String, String>,
}

/// Appends competitors; duplicates are not detected.
pub async fn insert_competitors(
    pool: &PgPool,
    company_id: Uuid,
    competitors: &[NewCompetitor],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for competitor in competitors {
        sqlx::query(
            r#"
            INSERT INTO competitors (id, company_id, name, url, socials_json)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&competitor.name)
        .bind(&competitor.url)
        .bind(serde_json::to_string(&competitor.socials).unwrap_or_else(|_| "{}".to_string()))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(
        "Added {} competitors for company {company_id}",
        competitors.len()
    );
    Ok(())
}

pub async fn list_competitors(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<CompetitorRow>, AppError> {
    Ok(sqlx::query_as::<_, CompetitorRow>(
        "SELECT * FROM competitors WHERE company_id = $1 ORDER BY created_at, id",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?)
}
