//! Discovery & ranking engine for a social design-critique feed.
//!
//! Three pure, synchronous components over an in-memory catalog snapshot:
//!
//! - [`badges`]: the Top Rated / Most Discussed distinctions, at most one
//!   post per kind across the whole catalog.
//! - [`schedule`]: the Curated Freshness default ordering, blending badge
//!   standouts, recent posts, and the archive with a daily-seeded shuffle.
//! - [`search`]: fuzzy, typo-tolerant indexes over posts, designers, and
//!   categories, with relevance scoring and highlight reconstruction.
//!
//! [`feed`] composes them per render request; [`model`] holds the canonical
//! entities and the catalog snapshot boundary. All ranking decisions are
//! re-derived on every call from the supplied snapshot and timestamp —
//! nothing is persisted between invocations.

pub mod badges;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod schedule;
pub mod search;
pub mod test_utils;

pub use badges::{compute_badges, BadgeKind, BadgeMap};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use feed::{ComposedFeed, FeedEngine, FeedOrigin, FeedRequest, SortMode};
pub use model::{Avatar, Catalog, Category, Post, RatingSummary, Review, ReviewScores};
pub use schedule::curated_freshness_sort;
pub use search::{
    highlight_matches, search_all, search_posts, SearchIndexes, SectionLimits, SectionedResults,
    Segment,
};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
