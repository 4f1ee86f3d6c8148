//! On-page SEO audit: a fixed rule set scored from 100 down.
//!
//! Rules run in a fixed order and each failing rule costs `ISSUE_PENALTY`
//! points, floored at zero. A page that cannot be fetched scores 0 with a
//! single `fetch` issue instead of raising.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fetch::{FetchError, PageFetcher};
use crate::html::{
    count_images_missing_alt, extract_h1, extract_link_count, extract_meta_description,
    extract_title, strip_tags,
};

pub const ISSUE_PENALTY: u32 = 12;
const MIN_LINKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Fetch,
    Title,
    H1,
    Meta,
    ImgAlt,
    Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub id: IssueKind,
    pub msg: String,
}

impl SeoIssue {
    fn new(id: IssueKind, msg: impl Into<String>) -> Self {
        Self {
            id,
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoAudit {
    pub url: String,
    pub title: String,
    pub h1: String,
    pub meta_desc: String,
    pub score: u32,
    pub issues: Vec<SeoIssue>,
}

/// `100 - 12 × issues`, never below zero.
pub fn score_for(issue_count: usize) -> u32 {
    let penalty = u32::try_from(issue_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(ISSUE_PENALTY);
    100u32.saturating_sub(penalty)
}

/// Runs the rule set against already-fetched HTML.
pub fn audit_html(url: &str, html: &str) -> SeoAudit {
    let title = extract_title(html);
    let h1 = extract_h1(html);
    let meta_desc = extract_meta_description(html);
    let missing_alt = count_images_missing_alt(html);
    let links = extract_link_count(html);

    let mut issues = Vec::new();
    if title.is_empty() {
        issues.push(SeoIssue::new(IssueKind::Title, "Missing <title>"));
    }
    if h1.is_empty() {
        issues.push(SeoIssue::new(IssueKind::H1, "Missing <h1>"));
    }
    if meta_desc.is_empty() {
        issues.push(SeoIssue::new(IssueKind::Meta, "Missing meta description"));
    }
    if missing_alt > 0 {
        issues.push(SeoIssue::new(
            IssueKind::ImgAlt,
            format!("{missing_alt} images missing alt"),
        ));
    }
    if links < MIN_LINKS {
        issues.push(SeoIssue::new(IssueKind::Links, "Low internal link count"));
    }

    SeoAudit {
        url: url.to_string(),
        title: strip_tags(&title),
        h1: strip_tags(&h1),
        meta_desc: strip_tags(&meta_desc),
        score: score_for(issues.len()),
        issues,
    }
}

fn failed_audit(url: &str, msg: String) -> SeoAudit {
    SeoAudit {
        url: url.to_string(),
        title: String::new(),
        h1: String::new(),
        meta_desc: String::new(),
        score: 0,
        issues: vec![SeoIssue::new(IssueKind::Fetch, msg)],
    }
}

#[derive(Clone)]
pub struct PageAuditor {
    fetcher: PageFetcher,
}

impl PageAuditor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetches and audits `url`. Never fails: fetch problems become a zero score.
    pub async fn audit(&self, url: &str) -> SeoAudit {
        match self.fetcher.fetch_text(url).await {
            Ok(html) => audit_html(url, &html),
            Err(FetchError::Status(status)) => {
                warn!("Audit of {url} got HTTP {status}");
                failed_audit(url, format!("HTTP {status}"))
            }
            Err(FetchError::Http(e)) => {
                warn!("Audit of {url} failed: {e}");
                failed_audit(url, "fetch failed".to_string())
            }
        }
    }
}
