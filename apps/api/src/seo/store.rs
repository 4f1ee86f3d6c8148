use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::seo::SeoPageRow;
use crate::seo::audit::SeoAudit;

const PAGE_LISTING_LIMIT: i64 = 100;

/// Writes the latest audit for `(company_id, url)`, replacing any earlier snapshot.
pub async fn upsert_audit(
    pool: &PgPool,
    company_id: Uuid,
    audit: &SeoAudit,
) -> Result<(), AppError> {
    let issues_json = serde_json::to_string(&audit.issues).unwrap_or_else(|_| "[]".to_string());
    sqlx::query(
        r#"
        INSERT INTO seo_pages
            (id, company_id, url, title, h1, meta_desc, score, issues_json, last_checked)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (company_id, url) DO UPDATE SET
            title = EXCLUDED.title,
            h1 = EXCLUDED.h1,
            meta_desc = EXCLUDED.meta_desc,
            score = EXCLUDED.score,
            issues_json = EXCLUDED.issues_json,
            last_checked = EXCLUDED.last_checked
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(company_id)
    .bind(&audit.url)
    .bind(&audit.title)
    .bind(&audit.h1)
    .bind(&audit.meta_desc)
    .bind(i32::try_from(audit.score).unwrap_or(0))
    .bind(issues_json)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recently checked pages first.
pub async fn list_pages(pool: &PgPool, company_id: Uuid) -> Result<Vec<SeoPageRow>, AppError> {
    Ok(sqlx::query_as::<_, SeoPageRow>(
        r#"
        SELECT * FROM seo_pages
        WHERE company_id = $1
        ORDER BY last_checked DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(company_id)
    .bind(PAGE_LISTING_LIMIT)
    .fetch_all(pool)
    .await?)
}
