use axum::{extract::State, Json};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::company::handlers::CompanyQuery;
use crate::company::store::require_company;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::ingest::store::list_products;
use crate::models::plan::{ContentPlanRow, ContentPlanSummaryRow, PostRow};
use crate::planning::builder::{build_weekly_plan, Platform};
use crate::planning::store::{find_plan, insert_plan, list_plans, list_posts};
use crate::state::AppState;

/// Upper bound on stored products fed into one plan.
const PLAN_PRODUCT_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub company_id: Option<Uuid>,
    pub week_start: Option<NaiveDate>,
    pub platforms: Option<Vec<Platform>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    pub company_id: Uuid,
    pub week_start: NaiveDate,
    pub platforms: Vec<Platform>,
}

impl PlanRequest {
    pub fn validate(self) -> Result<PlanInput, AppError> {
        let (Some(company_id), Some(week_start)) = (self.company_id, self.week_start) else {
            return Err(AppError::Validation(
                "company_id and week_start required".to_string(),
            ));
        };
        Ok(PlanInput {
            company_id,
            week_start,
            platforms: self.platforms.unwrap_or_else(|| Platform::ALL.to_vec()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan_id: Uuid,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<ContentPlanSummaryRow>,
}

#[derive(Debug, Deserialize)]
pub struct PlanQuery {
    pub plan_id: Option<Uuid>,
}

impl PlanQuery {
    pub fn plan_id(&self) -> Result<Uuid, AppError> {
        self.plan_id
            .ok_or_else(|| AppError::Validation("plan_id required".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostRow>,
}

/// POST /api/plan/week
///
/// Builds a 7-day schedule starting today (server-local calendar) from the
/// company's stored products. `week_start` is recorded on the plan row.
pub async fn handle_plan_week(
    State(state): State<AppState>,
    AppJson(req): AppJson<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let input = req.validate()?;
    let company = require_company(&state.db, input.company_id).await?;
    let products = list_products(&state.db, company.id, PLAN_PRODUCT_LIMIT).await?;

    let today = Local::now().date_naive();
    let plan = build_weekly_plan(&company, &products, &input.platforms, today);
    let plan_id = insert_plan(&state.db, company.id, input.week_start, &plan).await?;

    Ok(Json(PlanResponse {
        plan_id,
        count: plan.count(),
    }))
}

/// GET /api/plans?company_id=
pub async fn handle_list_plans(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompanyQuery>,
) -> Result<Json<PlanListResponse>, AppError> {
    let plans = list_plans(&state.db, query.company_id()?).await?;
    Ok(Json(PlanListResponse { plans }))
}

/// GET /api/plans/:id
///
/// Returns the plan row including its generated snapshot.
pub async fn handle_get_plan(
    State(state): State<AppState>,
    AppPath(plan_id): AppPath<Uuid>,
) -> Result<Json<ContentPlanRow>, AppError> {
    find_plan(&state.db, plan_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Plan {plan_id} not found")))
}

/// GET /api/posts?plan_id=
pub async fn handle_list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PlanQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let plan_id = query.plan_id()?;
    if find_plan(&state.db, plan_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Plan {plan_id} not found")));
    }
    let posts = list_posts(&state.db, plan_id).await?;
    Ok(Json(PostListResponse { posts }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_default_to_all_four() {
        let input = PlanRequest {
            company_id: Some(Uuid::new_v4()),
            week_start: NaiveDate::from_ymd_opt(2026, 10, 19),
            platforms: None,
        }
        .validate()
        .unwrap();
        assert_eq!(input.platforms, Platform::ALL.to_vec());
    }

    #[test]
    fn test_missing_week_start_is_rejected() {
        let req = PlanRequest {
            company_id: Some(Uuid::new_v4()),
            week_start: None,
            platforms: None,
        };
        assert!(matches!(
            req.validate(),
            Err(AppError::Validation(msg)) if msg == "company_id and week_start required"
        ));
    }

    #[test]
    fn test_request_body_parses_platform_names() {
        let req: PlanRequest = serde_json::from_str(
            r#"{"company_id":"6f1c2a9e-3b8d-4c1e-9f7a-2d5b8e0c4a11","week_start":"2026-10-19","platforms":["x","facebook"]}"#,
        )
        .unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.platforms, vec![Platform::X, Platform::Facebook]);
    }

    #[test]
    fn test_unknown_platform_fails_to_parse() {
        let parsed = serde_json::from_str::<PlanRequest>(
            r#"{"company_id":"6f1c2a9e-3b8d-4c1e-9f7a-2d5b8e0c4a11","week_start":"2026-10-19","platforms":["myspace"]}"#,
        );
        assert!(parsed.is_err());
    }
}
