//! Catalog snapshot boundary.
//!
//! The engine operates on an in-memory snapshot supplied by the data-access
//! layer. This module decodes such snapshots and resolves the one piece of
//! shape polymorphism the upstream sources exhibit: review records carry
//! either a `createdAt` timestamp or a legacy epoch-millisecond `timestamp`
//! field. Both normalize into the canonical [`Review`] before anything else
//! sees them.

use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::model::{Avatar, Category, Post, RatingSummary, Review, ReviewScores};

/// Immutable dataset snapshot: every post plus the avatar directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub posts: Vec<Post>,
    pub avatars: HashMap<String, Avatar>,
}

impl Catalog {
    pub fn new(posts: Vec<Post>, avatars: HashMap<String, Avatar>) -> Self {
        Self { posts, avatars }
    }

    /// Decode a JSON snapshot, normalizing legacy review shapes.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(raw)?;
        raw.into_catalog()
    }

    /// Decode a JSON snapshot from a reader.
    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_reader(reader)?;
        raw.into_catalog()
    }

    /// Strict referential checks: every post's designer must exist and every
    /// review must point back at its post. Decoding does not run this; the
    /// data-access layer opts in.
    pub fn validate(&self) -> Result<()> {
        for post in &self.posts {
            if !self.avatars.contains_key(&post.designer_id) {
                return Err(EngineError::Catalog(format!(
                    "post {} references unknown designer {}",
                    post.id, post.designer_id
                )));
            }
            for review in &post.reviews {
                if review.post_id != post.id {
                    return Err(EngineError::Catalog(format!(
                        "review {} attached to post {} but references {}",
                        review.id, post.id, review.post_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Categories present in this snapshot, in fixed display order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.posts.iter().any(|p| p.category == *c))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    posts: Vec<RawPost>,
    #[serde(default)]
    avatars: HashMap<String, Avatar>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: String,
    title: String,
    description: String,
    category: Category,
    #[serde(rename = "imageUrl", default)]
    image_url: String,
    #[serde(rename = "designerId")]
    designer_id: String,
    #[serde(rename = "createdAt")]
    created_at: DateTime<Utc>,
    rating: Option<RatingSummary>,
    #[serde(default)]
    reviews: Vec<RawReview>,
}

/// The two review shapes seen in upstream data. `Stamped` is canonical;
/// `Legacy` carries an epoch-millisecond `timestamp` instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawReview {
    Stamped {
        id: String,
        #[serde(rename = "postId")]
        post_id: String,
        ratings: ReviewScores,
        #[serde(default)]
        comment: Option<String>,
        #[serde(rename = "reviewerName", default)]
        reviewer_name: Option<String>,
        #[serde(rename = "createdAt")]
        created_at: DateTime<Utc>,
    },
    Legacy {
        id: String,
        #[serde(rename = "postId")]
        post_id: String,
        ratings: ReviewScores,
        #[serde(default)]
        comment: Option<String>,
        #[serde(rename = "reviewerName", default)]
        reviewer_name: Option<String>,
        timestamp: i64,
    },
}

impl RawReview {
    fn into_review(self) -> Result<Review> {
        match self {
            Self::Stamped {
                id,
                post_id,
                ratings,
                comment,
                reviewer_name,
                created_at,
            } => Ok(Review {
                id,
                post_id,
                scores: ratings,
                comment,
                reviewer_name,
                created_at,
            }),
            Self::Legacy {
                id,
                post_id,
                ratings,
                comment,
                reviewer_name,
                timestamp,
            } => {
                let created_at = Utc
                    .timestamp_millis_opt(timestamp)
                    .single()
                    .ok_or_else(|| {
                        EngineError::Catalog(format!(
                            "review {id} carries out-of-range timestamp {timestamp}"
                        ))
                    })?;
                Ok(Review {
                    id,
                    post_id,
                    scores: ratings,
                    comment,
                    reviewer_name,
                    created_at,
                })
            }
        }
    }
}

impl RawCatalog {
    fn into_catalog(self) -> Result<Catalog> {
        let mut posts = Vec::with_capacity(self.posts.len());
        for raw in self.posts {
            let reviews = raw
                .reviews
                .into_iter()
                .map(RawReview::into_review)
                .collect::<Result<Vec<_>>>()?;
            // Snapshots may omit the aggregate; recompute when absent.
            let rating = raw
                .rating
                .unwrap_or_else(|| RatingSummary::from_reviews(&reviews));
            posts.push(Post {
                id: raw.id,
                title: raw.title,
                description: raw.description,
                category: raw.category,
                image_url: raw.image_url,
                designer_id: raw.designer_id,
                created_at: raw.created_at,
                rating,
                reviews,
            });
        }
        Ok(Catalog::new(posts, self.avatars))
    }
}
