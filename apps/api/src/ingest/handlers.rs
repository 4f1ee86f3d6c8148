use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::company::handlers::CompanyQuery;
use crate::company::store::require_company;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::ingest::products::{extract_products, ProductRecord};
use crate::ingest::store::{insert_products, list_products};
use crate::state::AppState;

pub const DEFAULT_CRAWL_LIMIT: usize = 20;
const PRODUCT_LISTING_LIMIT: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub company_id: Option<Uuid>,
    pub limit: Option<usize>,
    /// Forget the cached sitemap before crawling.
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestInput {
    pub company_id: Uuid,
    pub limit: usize,
    pub refresh: bool,
}

impl IngestRequest {
    pub fn validate(self, max_limit: usize) -> Result<IngestInput, AppError> {
        let company_id = self
            .company_id
            .ok_or_else(|| AppError::Validation("company_id required".to_string()))?;
        let limit = self.limit.unwrap_or(DEFAULT_CRAWL_LIMIT);
        if limit == 0 {
            return Err(AppError::Validation("limit must be at least 1".to_string()));
        }
        Ok(IngestInput {
            company_id,
            limit: limit.min(max_limit),
            refresh: self.refresh,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub pages: usize,
    pub products: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRecord>,
}

/// POST /api/ingest
///
/// Crawls the company's site, extracts product-like records and stores them.
pub async fn handle_ingest(
    State(state): State<AppState>,
    AppJson(req): AppJson<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
    let input = req.validate(state.config.max_crawl_limit)?;
    let company = require_company(&state.db, input.company_id).await?;

    if input.refresh {
        state.crawler.invalidate(&company.site_url).await;
    }

    let pages = state.crawler.crawl(&company.site_url, input.limit).await;
    let products = extract_products(&pages);
    insert_products(&state.db, company.id, &products).await?;

    info!(
        "Ingested {} for company {}: {} pages, {} products",
        company.site_url,
        company.id,
        pages.len(),
        products.len()
    );
    Ok(Json(IngestResponse {
        pages: pages.len(),
        products: products.len(),
    }))
}

/// GET /api/products?company_id=
pub async fn handle_list_products(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompanyQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let company_id = query.company_id()?;
    let products = list_products(&state.db, company_id, PRODUCT_LISTING_LIMIT).await?;
    Ok(Json(ProductListResponse { products }))
}
