mod cache;
mod company;
mod competitors;
mod config;
mod db;
mod errors;
mod export;
mod extract;
mod fetch;
mod html;
mod ingest;
mod models;
mod planning;
mod routes;
mod seo;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{MemoryUrlCache, RedisUrlCache, UrlListCache};
use crate::config::Config;
use crate::db::create_pool;
use crate::fetch::PageFetcher;
use crate::ingest::crawler::SiteCrawler;
use crate::routes::build_router;
use crate::seo::audit::PageAuditor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SMM API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize sitemap cache (Redis when configured)
    let sitemap_cache: Arc<dyn UrlListCache> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Sitemap cache on Redis");
            Arc::new(RedisUrlCache::new(redis))
        }
        None => {
            warn!("REDIS_URL not set; sitemap cache is in-process only");
            Arc::new(MemoryUrlCache::new())
        }
    };

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Outbound fetching shared by crawler, auditor and competitor snapshots
    let fetcher = PageFetcher::new(config.fetch_timeout)?;
    let crawler = SiteCrawler::new(fetcher.clone(), sitemap_cache, config.sitemap_cache_ttl);
    let auditor = PageAuditor::new(fetcher.clone());

    // Build app state
    let state = AppState {
        db,
        s3,
        config: config.clone(),
        fetcher,
        crawler,
        auditor,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "smm-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
