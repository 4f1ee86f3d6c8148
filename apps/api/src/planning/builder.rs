//! Weekly Plan Builder: deterministic schedule generation.
//!
//! For each of 7 consecutive days starting at `start`, one source record is picked
//! round-robin from the product list (or synthesised from the profile when the list
//! is empty) and one post is emitted per requested platform at 09:00 UTC.
//!
//! Platforms are not deduplicated: passing a platform twice yields two posts per day
//! for it.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::products::ProductRecord;
use crate::models::company::BusinessProfile;
use crate::planning::templates::{image_prompt, BASE_HASHTAGS, CONTACT_LINE, FALLBACK_TITLE};

pub const PLAN_DAYS: u64 = 7;
const POST_HOUR: u32 = 9;
const CAPTION_SUMMARY_CHARS: usize = 140;
const MAX_TAG_HASHTAGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    Linkedin,
    X,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::X,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::X => "x",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedPost {
    pub platform: Platform,
    pub scheduled_at: DateTime<Utc>,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub image_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub posts: Vec<PlannedPost>,
}

impl WeeklyPlan {
    pub fn count(&self) -> usize {
        self.posts.len()
    }
}

/// Title and summary a day's posts are written about.
struct PostSubject<'a> {
    title: &'a str,
    summary: &'a str,
    tags: &'a [String],
}

pub fn build_weekly_plan(
    profile: &BusinessProfile,
    products: &[ProductRecord],
    platforms: &[Platform],
    start: NaiveDate,
) -> WeeklyPlan {
    let mut posts = Vec::with_capacity(PLAN_DAYS as usize * platforms.len());

    for day in 0..PLAN_DAYS {
        let date = start + Days::new(day);
        let scheduled_at = Utc.from_utc_datetime(
            &date
                .and_hms_opt(POST_HOUR, 0, 0)
                .expect("09:00:00 is a valid time of day"),
        );
        let subject = pick_subject(profile, products, day as usize);

        for &platform in platforms {
            posts.push(PlannedPost {
                platform,
                scheduled_at,
                caption: caption(&subject),
                hashtags: hashtags(subject.tags),
                image_prompt: image_prompt(&profile.name, subject.title),
            });
        }
    }

    WeeklyPlan { posts }
}

fn pick_subject<'a>(
    profile: &'a BusinessProfile,
    products: &'a [ProductRecord],
    day: usize,
) -> PostSubject<'a> {
    match products.get(day % products.len().max(1)) {
        Some(product) => PostSubject {
            title: &product.title,
            summary: &product.summary,
            tags: &product.tags,
        },
        None => PostSubject {
            title: &profile.name,
            summary: profile.description.as_deref().unwrap_or_default(),
            tags: &[],
        },
    }
}

fn caption(subject: &PostSubject<'_>) -> String {
    let title = if subject.title.is_empty() {
        FALLBACK_TITLE
    } else {
        subject.title
    };
    let summary = truncate(subject.summary, CAPTION_SUMMARY_CHARS);
    format!("{title} — {summary}\n{CONTACT_LINE}")
        .trim()
        .to_string()
}

/// Base brand hashtags followed by up to three tag hashtags, first occurrence kept.
fn hashtags(tags: &[String]) -> Vec<String> {
    let tag_hashtags = tags
        .iter()
        .take(MAX_TAG_HASHTAGS)
        .map(|tag| format!("#{}", tag.split_whitespace().collect::<String>()));

    let mut seen = HashSet::new();
    BASE_HASHTAGS
        .iter()
        .map(|h| h.to_string())
        .chain(tag_hashtags)
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

/// Cuts `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        text.to_string()
    }
}
