//! Curated Freshness scheduler.
//!
//! The default feed ordering: badge posts surface at a controlled rate,
//! recent posts lead, the archive trails, and each calendar day's posts are
//! shuffled with a daily seed so the feed feels varied without losing
//! recency at the day granularity. Everything is re-derived per call; no
//! rank state survives between renders.

pub mod shuffle;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::VecDeque;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::badges::{compute_badges, BadgeKind, BadgeMap};
use crate::config::{BadgeConfig, SchedulerConfig};
use crate::model::Post;
use shuffle::{fisher_yates, Lcg, UnitRng};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Produce the curated-freshness ordering of `posts`.
///
/// The output is a permutation of the input. Never fails: an empty snapshot
/// yields an empty feed, and a badge-less snapshot degrades to pure
/// recency-with-shuffle ordering.
pub fn curated_freshness_sort(
    posts: &[Post],
    now: DateTime<Utc>,
    badges: &BadgeConfig,
    scheduler: &SchedulerConfig,
) -> Vec<Post> {
    curated_freshness_sort_seeded(posts, now, badges, scheduler, Lcg::new)
}

/// Like [`curated_freshness_sort`], with the day-seeded generator injected.
pub fn curated_freshness_sort_seeded<R, F>(
    posts: &[Post],
    now: DateTime<Utc>,
    badges: &BadgeConfig,
    scheduler: &SchedulerConfig,
    make_rng: F,
) -> Vec<Post>
where
    R: UnitRng,
    F: Fn(u64) -> R,
{
    let badge_map = compute_badges(posts, now, badges);
    let emerging_cutoff = now - Duration::days(scheduler.emerging_window_days);

    // Bucket A: standouts. B: active & emerging. C: archive.
    let mut standouts: Vec<Post> = Vec::new();
    let mut emerging: Vec<Post> = Vec::new();
    let mut archive: Vec<Post> = Vec::new();
    for post in posts {
        if badge_map.contains_key(&post.id) {
            standouts.push(post.clone());
        } else if post.created_at >= emerging_cutoff {
            emerging.push(post.clone());
        } else {
            archive.push(post.clone());
        }
    }
    debug!(
        standouts = standouts.len(),
        emerging = emerging.len(),
        archive = archive.len(),
        "bucketed feed"
    );

    sort_standouts(&mut standouts, &badge_map);
    sort_emerging(&mut emerging);
    archive.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    // The shuffle seed flips once per calendar day; each bucket gets a
    // fresh generator from the same seed.
    let day_seed = (now.timestamp().div_euclid(SECONDS_PER_DAY)).unsigned_abs();
    let emerging = shuffle_within_days(emerging, &mut make_rng(day_seed));
    let archive = shuffle_within_days(archive, &mut make_rng(day_seed));

    interleave(standouts, emerging, archive, scheduler.standout_spacing)
}

/// Bucket A order: Top Rated ahead of Most Discussed, newer first within a
/// badge kind.
fn sort_standouts(standouts: &mut [Post], badge_map: &BadgeMap) {
    fn badge_rank(kind: Option<&BadgeKind>) -> u8 {
        match kind {
            Some(BadgeKind::TopRated) => 0,
            Some(BadgeKind::MostDiscussed) => 1,
            None => 2,
        }
    }
    standouts.sort_by(|a, b| {
        badge_rank(badge_map.get(&a.id))
            .cmp(&badge_rank(badge_map.get(&b.id)))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Bucket B order: recency, with same-calendar-day ties broken by review
/// count as an engagement signal.
fn sort_emerging(emerging: &mut [Post]) {
    emerging.sort_by(|a, b| {
        if a.created_at.date_naive() == b.created_at.date_naive() {
            b.rating
                .review_count
                .cmp(&a.rating.review_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        } else {
            b.created_at.cmp(&a.created_at)
        }
    });
}

/// Group by calendar day, shuffle each group in place, reassemble newest
/// day first.
fn shuffle_within_days(posts: Vec<Post>, rng: &mut impl UnitRng) -> Vec<Post> {
    let mut day_groups: BTreeMap<NaiveDate, Vec<Post>> = BTreeMap::new();
    for post in posts {
        day_groups
            .entry(post.created_at.date_naive())
            .or_default()
            .push(post);
    }

    let mut result = Vec::new();
    for (_, mut group) in day_groups.into_iter().rev() {
        fisher_yates(&mut group, rng);
        result.append(&mut group);
    }
    result
}

/// Merge standouts into the regular stream with at most one standout per
/// `spacing` consecutive positions. The counter starts saturated so a
/// standout may open the feed.
fn interleave(
    standouts: Vec<Post>,
    emerging: Vec<Post>,
    archive: Vec<Post>,
    spacing: usize,
) -> Vec<Post> {
    let mut standouts: VecDeque<Post> = standouts.into();
    let mut regulars: VecDeque<Post> = emerging.into_iter().chain(archive).collect();

    let mut result = Vec::with_capacity(standouts.len() + regulars.len());
    let mut since_last_standout = spacing;

    while !standouts.is_empty() || !regulars.is_empty() {
        if since_last_standout >= spacing {
            if let Some(post) = standouts.pop_front() {
                result.push(post);
                since_last_standout = 0;
                continue;
            }
        }
        if let Some(post) = regulars.pop_front() {
            result.push(post);
            since_last_standout += 1;
        } else {
            // Regulars exhausted: drain the remaining standouts as-is.
            result.extend(standouts.drain(..));
        }
    }
    result
}

/// Stable sorts used by the non-curated feed modes.
pub mod simple {
    use super::*;

    pub fn by_newest(posts: &mut [Post]) {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    pub fn by_oldest(posts: &mut [Post]) {
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }

    pub fn by_highest_rated(posts: &mut [Post]) {
        posts.sort_by(|a, b| {
            b.rating
                .average
                .partial_cmp(&a.rating.average)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }

    pub fn by_lowest_rated(posts: &mut [Post]) {
        posts.sort_by(|a, b| {
            a.rating
                .average
                .partial_cmp(&b.rating.average)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }

    pub fn by_most_reviewed(posts: &mut [Post]) {
        posts.sort_by(|a, b| {
            b.rating
                .review_count
                .cmp(&a.rating.review_count)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
    }
}
