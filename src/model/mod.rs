//! Canonical entities consumed by the engine.
//!
//! All entities are owned by the data-access layer; the engine takes
//! immutable snapshots and returns new derived structures. The only shape
//! resolution happening in this crate is at the catalog boundary (see
//! [`catalog`]), so the ranking and search core only ever sees these
//! canonical types.

pub mod catalog;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use catalog::Catalog;

/// The closed set of design categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Web Design")]
    WebDesign,
    #[serde(rename = "Mobile App Design")]
    MobileAppDesign,
    #[serde(rename = "Logo Design")]
    LogoDesign,
    #[serde(rename = "Brand Identity Design")]
    BrandIdentityDesign,
    #[serde(rename = "Poster Design")]
    PosterDesign,
    #[serde(rename = "Flyer Design")]
    FlyerDesign,
    #[serde(rename = "Social Media Design")]
    SocialMediaDesign,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 7] = [
        Self::WebDesign,
        Self::MobileAppDesign,
        Self::BrandIdentityDesign,
        Self::LogoDesign,
        Self::PosterDesign,
        Self::FlyerDesign,
        Self::SocialMediaDesign,
    ];

    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WebDesign => "Web Design",
            Self::MobileAppDesign => "Mobile App Design",
            Self::LogoDesign => "Logo Design",
            Self::BrandIdentityDesign => "Brand Identity Design",
            Self::PosterDesign => "Poster Design",
            Self::FlyerDesign => "Flyer Design",
            Self::SocialMediaDesign => "Social Media Design",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A designer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    /// Unique avatar ID.
    pub id: String,
    /// Display name, searchable.
    pub name: String,
    /// Fallback background color for initials rendering.
    #[serde(rename = "bgColor")]
    pub bg_color: String,
    /// Blocked avatars are excluded from search and attribution.
    #[serde(rename = "isBlocked", default)]
    pub is_blocked: bool,
    /// Optional profile image.
    #[serde(rename = "avatarUrl", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// The three 1-5 scores attached to a review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewScores {
    pub clarity: u8,
    pub purpose: u8,
    pub aesthetics: u8,
}

impl ReviewScores {
    /// Mean of the three scores.
    pub fn mean(&self) -> f64 {
        f64::from(u16::from(self.clarity) + u16::from(self.purpose) + u16::from(self.aesthetics))
            / 3.0
    }
}

/// A single critique attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique review ID.
    pub id: String,
    /// Post this review belongs to.
    #[serde(rename = "postId")]
    pub post_id: String,
    /// The three scored dimensions.
    #[serde(rename = "ratings")]
    pub scores: ReviewScores,
    /// Optional free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Optional display name of the reviewer.
    #[serde(rename = "reviewerName", skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    /// When the review was submitted.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating state shown on a post card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean of per-review means, 0-5.
    pub average: f64,
    /// Number of attached reviews.
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    /// Locked until enough reviews accumulate; a locked rating is hidden
    /// in the UI and disqualifies the post from badges.
    #[serde(rename = "isLocked")]
    pub is_locked: bool,
}

impl RatingSummary {
    /// Reviews required before the aggregate rating unlocks. Independent of
    /// the badge eligibility minimum (5); both thresholds are intentional.
    pub const LOCK_THRESHOLD: u32 = 3;

    /// Recompute the aggregate from the attached reviews.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let review_count = reviews.len() as u32;
        let average = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|r| r.scores.mean()).sum::<f64>() / reviews.len() as f64
        };
        Self {
            average,
            review_count,
            is_locked: review_count < Self::LOCK_THRESHOLD,
        }
    }
}

/// A submitted design post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique post ID.
    pub id: String,
    /// Title, the highest-weighted search key.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Category from the closed set.
    pub category: Category,
    /// Image shown on the card.
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Designer (avatar) that submitted the post.
    #[serde(rename = "designerId")]
    pub designer_id: String,
    /// Submission time.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Aggregate rating state.
    pub rating: RatingSummary,
    /// Attached reviews, newest anywhere in the list.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Post {
    /// Timestamp of the most recent review, if any.
    pub fn latest_review_at(&self) -> Option<DateTime<Utc>> {
        self.reviews.iter().map(|r| r.created_at).max()
    }

    /// Number of reviews submitted within the window ending at `now`.
    pub fn reviews_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.reviews
            .iter()
            .filter(|r| r.created_at >= cutoff)
            .count()
    }
}
