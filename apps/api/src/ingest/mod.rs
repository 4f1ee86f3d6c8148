// Site ingestion: sitemap-driven crawl → product extraction → product batch insert.

pub mod crawler;
pub mod handlers;
pub mod products;
pub mod store;
