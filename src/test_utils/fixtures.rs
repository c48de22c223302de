//! Fixture builders for posts, avatars, and reviews.
//!
//! Everything is anchored to an explicit `now` so tests stay deterministic
//! regardless of wall-clock time.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::model::{Avatar, Category, Post, RatingSummary, Review, ReviewScores};

/// A fixed reference instant used across the test suites.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

/// Avatar with sensible defaults; not blocked.
pub fn make_avatar(id: &str, name: &str) -> Avatar {
    Avatar {
        id: id.to_string(),
        name: name.to_string(),
        bg_color: "#FEC312".to_string(),
        is_blocked: false,
        avatar_url: None,
    }
}

/// Review created `age_days` before `now`, with mid-range scores.
pub fn make_review(id: &str, post_id: &str, age_days: i64, now: DateTime<Utc>) -> Review {
    Review {
        id: id.to_string(),
        post_id: post_id.to_string(),
        scores: ReviewScores {
            clarity: 4,
            purpose: 4,
            aesthetics: 4,
        },
        comment: None,
        reviewer_name: None,
        created_at: now - Duration::days(age_days),
    }
}

/// Post created `age_days` before `now`, with no reviews and an unlocked
/// zero rating. Adjust through [`PostFixture`] when more control is needed.
pub fn make_post(id: &str, category: Category, age_days: i64, now: DateTime<Utc>) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        description: String::new(),
        category,
        image_url: format!("https://example.com/{id}.jpg"),
        designer_id: "user_1".to_string(),
        created_at: now - Duration::days(age_days),
        rating: RatingSummary {
            average: 0.0,
            review_count: 0,
            is_locked: false,
        },
        reviews: Vec::new(),
    }
}

/// Builder over [`make_post`] for the fields individual tests care about.
#[derive(Debug, Clone)]
pub struct PostFixture {
    post: Post,
    now: DateTime<Utc>,
}

impl PostFixture {
    pub fn new(id: &str, category: Category, age_days: i64, now: DateTime<Utc>) -> Self {
        Self {
            post: make_post(id, category, age_days, now),
            now,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.post.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.post.description = description.to_string();
        self
    }

    pub fn designer(mut self, designer_id: &str) -> Self {
        self.post.designer_id = designer_id.to_string();
        self
    }

    pub fn rating(mut self, average: f64, review_count: u32, is_locked: bool) -> Self {
        self.post.rating = RatingSummary {
            average,
            review_count,
            is_locked,
        };
        self
    }

    /// Attach a review `age_days` old. Does not touch the rating summary;
    /// eligibility windows and aggregates are deliberately independent.
    pub fn review_aged(mut self, age_days: i64) -> Self {
        let id = format!("{}_r{}", self.post.id, self.post.reviews.len() + 1);
        let review = make_review(&id, &self.post.id, age_days, self.now);
        self.post.reviews.push(review);
        self
    }

    pub fn build(self) -> Post {
        self.post
    }
}
