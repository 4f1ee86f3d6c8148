use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::ingest::crawler::SiteCrawler;
use crate::seo::audit::PageAuditor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// Outbound client for competitor snapshots.
    pub fetcher: PageFetcher,
    /// Sitemap-driven crawler; holds the injected URL-list cache.
    pub crawler: SiteCrawler,
    pub auditor: PageAuditor,
}
