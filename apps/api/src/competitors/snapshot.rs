//! Competitor snapshot: fetch each competitor's page and pull out its title.
//!
//! Cadence and topic are fixed placeholder guesses. One competitor failing to load
//! produces an `error` entry for that item only.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::fetch::PageFetcher;
use crate::html::extract_title;

pub const CADENCE_GUESS: &str = "weekly";
pub const TOPIC_GUESS: [&str; 3] = ["pricing", "coverage", "support"];
pub const FETCH_FAILED: &str = "fetch_failed";

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorTarget {
    pub id: Uuid,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SnapshotOutcome {
    Analyzed {
        title: String,
        cadence_guess: String,
        topic_guess: Vec<String>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorSnapshot {
    pub id: Uuid,
    pub url: String,
    #[serde(flatten)]
    pub outcome: SnapshotOutcome,
}

/// Snapshots every target in order; each item succeeds or fails on its own.
pub async fn analyze(fetcher: &PageFetcher, targets: &[CompetitorTarget]) -> Vec<CompetitorSnapshot> {
    let mut snapshots = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match fetcher.fetch_text(&target.url).await {
            Ok(html) => SnapshotOutcome::Analyzed {
                title: extract_title(&html),
                cadence_guess: CADENCE_GUESS.to_string(),
                topic_guess: TOPIC_GUESS.iter().map(|t| t.to_string()).collect(),
            },
            Err(e) => {
                warn!("Competitor {} ({}) failed: {e}", target.id, target.url);
                SnapshotOutcome::Failed {
                    error: FETCH_FAILED.to_string(),
                }
            }
        };
        snapshots.push(CompetitorSnapshot {
            id: target.id,
            url: target.url.clone(),
            outcome,
        });
    }
    snapshots
}
