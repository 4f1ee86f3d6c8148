use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::products::ProductRecord;
use crate::models::product::ProductRow;

/// Inserts an extraction batch in one transaction; any failing row aborts the batch.
pub async fn insert_products(
    pool: &PgPool,
    company_id: Uuid,
    products: &[ProductRecord],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for product in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, company_id, title, url, summary, price, images, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&product.title)
        .bind(&product.url)
        .bind(&product.summary)
        .bind(&product.price)
        .bind(&product.images)
        .bind(&product.tags)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(
        "Stored {} products for company {company_id}",
        products.len()
    );
    Ok(())
}

/// Oldest-first product records for a company, capped at `limit`.
pub async fn list_products(
    pool: &PgPool,
    company_id: Uuid,
    limit: i64,
) -> Result<Vec<ProductRecord>, AppError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE company_id = $1 ORDER BY created_at, id LIMIT $2",
    )
    .bind(company_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ProductRecord {
            title: row.title,
            url: row.url,
            summary: row.summary,
            price: row.price,
            images: row.images,
            tags: row.tags,
        })
        .collect())
}
