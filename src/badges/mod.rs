//! Badge engine.
//!
//! Awards at most two distinctions across the whole catalog: one Top Rated
//! and one Most Discussed post. Both are recomputed from scratch on every
//! call; nothing is persisted and a post never holds more than one badge.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::BadgeConfig;
use crate::model::Post;

/// The two feed distinctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeKind {
    TopRated,
    MostDiscussed,
}

/// Post ID to badge, ephemeral and recomputed per dataset version.
pub type BadgeMap = HashMap<String, BadgeKind>;

/// Compute the badge assignment for the given snapshot.
///
/// A post is a candidate only when it carries at least
/// `config.min_reviews` reviews, its rating is not locked, and at least one
/// review landed within the activity window ending at `now`. The window is
/// evaluated against review timestamps, not the post's creation time.
pub fn compute_badges(posts: &[Post], now: DateTime<Utc>, config: &BadgeConfig) -> BadgeMap {
    let cutoff = now - Duration::days(config.activity_window_days);

    let eligible: Vec<&Post> = posts
        .iter()
        .filter(|p| {
            p.rating.review_count >= config.min_reviews
                && !p.rating.is_locked
                && p.reviews_since(cutoff) > 0
        })
        .collect();

    let mut badges = BadgeMap::new();

    if let Some(top_rated) = pick_top_rated(&eligible) {
        badges.insert(top_rated.id.clone(), BadgeKind::TopRated);

        let remaining: Vec<&Post> = eligible
            .iter()
            .copied()
            .filter(|p| p.id != top_rated.id)
            .collect();
        if let Some(most_discussed) = pick_most_discussed(&remaining, cutoff) {
            badges.insert(most_discussed.id.clone(), BadgeKind::MostDiscussed);
        }
    }

    debug!(
        eligible = eligible.len(),
        awarded = badges.len(),
        "badge computation finished"
    );
    badges
}

/// Latest review timestamp, with the epoch standing in for review-less posts
/// so the comparison chain stays total.
fn latest_review_or_epoch(post: &Post) -> DateTime<Utc> {
    post.latest_review_at().unwrap_or(DateTime::UNIX_EPOCH)
}

/// Top Rated: higher average, then more reviews, then fresher latest review,
/// then longevity (older post wins).
fn pick_top_rated<'a>(eligible: &[&'a Post]) -> Option<&'a Post> {
    let mut candidates = eligible.to_vec();
    candidates.sort_by(|a, b| {
        b.rating
            .average
            .partial_cmp(&a.rating.average)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.rating.review_count.cmp(&a.rating.review_count))
            .then_with(|| latest_review_or_epoch(b).cmp(&latest_review_or_epoch(a)))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    candidates.first().copied()
}

/// Most Discussed: more in-window reviews, then fresher latest review, then
/// longevity. Applied after the Top Rated winner is removed, which is what
/// enforces no-stacking.
fn pick_most_discussed<'a>(pool: &[&'a Post], cutoff: DateTime<Utc>) -> Option<&'a Post> {
    let mut candidates = pool.to_vec();
    candidates.sort_by(|a, b| {
        b.reviews_since(cutoff)
            .cmp(&a.reviews_since(cutoff))
            .then_with(|| latest_review_or_epoch(b).cmp(&latest_review_or_epoch(a)))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    candidates.first().copied()
}
