//! Fuzzy, typo-tolerant search over posts, designers, and categories.
//!
//! Pipeline: [`normalize`] turns indexed content and queries into stemmed
//! lowercase token streams; [`index`] builds the three build-once indexes;
//! [`query`] executes sectioned or post-only searches with relevance
//! scoring; [`highlight`] reconstructs match segments on the original
//! display text. Everything is pure and synchronous; debouncing rapid
//! keystrokes is the caller's job.

pub mod fuzzy;
pub mod highlight;
pub mod index;
pub mod normalize;
pub mod query;

pub use fuzzy::{FieldKey, FieldMatch};
pub use highlight::{highlight_matches, Segment};
pub use index::SearchIndexes;
pub use normalize::normalize_text;
pub use query::{
    filter_by_categories, is_active_query, search_all, search_posts, CategoryHit, DesignerHit,
    PostHit, SectionLimits, SectionedResults,
};
