use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::plan::{ContentPlanRow, ContentPlanSummaryRow, PostRow};
use crate::planning::builder::WeeklyPlan;

const PLAN_LISTING_LIMIT: i64 = 20;

/// Persists the plan row (with its JSON snapshot) and one draft post per planned post.
/// Both writes share a transaction so the snapshot and the post rows never diverge.
pub async fn insert_plan(
    pool: &PgPool,
    company_id: Uuid,
    week_start: NaiveDate,
    plan: &WeeklyPlan,
) -> Result<Uuid, AppError> {
    let plan_id = Uuid::new_v4();
    let snapshot = json!({ "posts": plan.posts, "count": plan.count() });

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO content_plans (id, company_id, week_start, platform, status, plan)
        VALUES ($1, $2, $3, 'multi', 'draft', $4)
        "#,
    )
    .bind(plan_id)
    .bind(company_id)
    .bind(week_start)
    .bind(&snapshot)
    .execute(&mut *tx)
    .await?;

    for post in &plan.posts {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, plan_id, platform, scheduled_at, caption, hashtags, image_prompt, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plan_id)
        .bind(post.platform.as_str())
        .bind(post.scheduled_at)
        .bind(&post.caption)
        .bind(post.hashtags.join(" "))
        .bind(&post.image_prompt)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(
        "Stored plan {plan_id} for company {company_id} with {} posts",
        plan.count()
    );
    Ok(plan_id)
}

pub async fn find_plan(pool: &PgPool, plan_id: Uuid) -> Result<Option<ContentPlanRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ContentPlanRow>("SELECT * FROM content_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Latest plans first.
pub async fn list_plans(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<ContentPlanSummaryRow>, AppError> {
    Ok(sqlx::query_as::<_, ContentPlanSummaryRow>(
        r#"
        SELECT id, week_start, platform, status
        FROM content_plans
        WHERE company_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(company_id)
    .bind(PLAN_LISTING_LIMIT)
    .fetch_all(pool)
    .await?)
}

/// Posts of a plan in schedule order.
pub async fn list_posts(pool: &PgPool, plan_id: Uuid) -> Result<Vec<PostRow>, AppError> {
    Ok(sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, plan_id, platform, scheduled_at, caption, hashtags, image_prompt, status
        FROM posts
        WHERE plan_id = $1
        ORDER BY scheduled_at, platform, id
        "#,
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await?)
}
