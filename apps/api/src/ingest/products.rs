//! Product extraction: turns crawled pages into product-like records.
//!
//! A page is product-bearing when it has at least one `<h2>`/`<h3>`. The first
//! heading becomes the title. No I/O happens here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::html::{extract_heading_texts, extract_image_sources, extract_price_tokens, visible_text};
use crate::ingest::crawler::RawPage;

const SUMMARY_WORDS: usize = 40;
const MAX_IMAGES: usize = 3;

/// Keyword probes: any hit (case-insensitive, anywhere in the page) adds the tag.
const TAG_VOCABULARY: &[(&str, &[&str])] = &[
    ("fibre", &["fibre", "fiber"]),
    ("wireless", &["wireless", "wifi"]),
    ("voip", &["voip"]),
    ("hosting", &["hosting", "domain"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub price: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

/// Extracts one record per product-bearing page, deduplicated on `(title, url)`.
/// The first occurrence wins and input order is otherwise preserved.
pub fn extract_products(pages: &[RawPage]) -> Vec<ProductRecord> {
    let mut seen = HashSet::new();
    pages
        .iter()
        .filter_map(extract_product)
        .filter(|record| seen.insert((record.title.clone(), record.url.clone())))
        .collect()
}

fn extract_product(page: &RawPage) -> Option<ProductRecord> {
    let title = extract_heading_texts(&page.html).into_iter().next()?;
    Some(ProductRecord {
        title,
        url: page.url.clone(),
        summary: summarize(&page.html),
        price: extract_price_tokens(&page.html).into_iter().next(),
        images: extract_image_sources(&page.html)
            .into_iter()
            .take(MAX_IMAGES)
            .collect(),
        tags: guess_tags(&page.html),
    })
}

/// First few dozen words of visible text.
pub fn summarize(html: &str) -> String {
    visible_text(html)
        .split_whitespace()
        .take(SUMMARY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn guess_tags(html: &str) -> Vec<String> {
    let haystack = html.to_lowercase();
    TAG_VOCABULARY
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}
