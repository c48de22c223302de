//! Build-once fuzzy indexes over the catalog.
//!
//! Three indexes are built from normalized projections: designers (display
//! name, non-blocked only), posts (four weighted keys, with the designer
//! name denormalized onto the post so author search needs no join at query
//! time), and categories (the fixed enum). An index set is immutable after
//! construction and safe to share; when the catalog changes, callers build a
//! replacement through [`SearchIndexes::rebuild`] and compare
//! [`SearchIndexes::version`] to invalidate cached results.

use std::collections::HashMap;

use tracing::debug;

use crate::config::SearchConfig;
use crate::model::{Avatar, Category, Post};
use crate::search::normalize::normalize_text;

/// The three fuzzy indexes plus the matching parameters they were built
/// with.
#[derive(Debug, Clone)]
pub struct SearchIndexes {
    version: u64,
    pub(crate) config: SearchConfig,
    pub(crate) designers: Vec<DesignerEntry>,
    pub(crate) posts: Vec<PostEntry>,
    pub(crate) categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone)]
pub(crate) struct DesignerEntry {
    pub avatar: Avatar,
    pub name_norm: String,
}

#[derive(Debug, Clone)]
pub(crate) struct PostEntry {
    pub post: Post,
    pub title_norm: String,
    pub category_norm: String,
    pub description_norm: String,
    /// Normalized designer name captured at build time; empty when the
    /// designer is blocked or unknown, which excludes author matches.
    pub designer_norm: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryEntry {
    pub category: Category,
    pub label_norm: String,
}

impl SearchIndexes {
    /// Build the index set for a dataset snapshot.
    pub fn build(
        posts: &[Post],
        avatars: &HashMap<String, Avatar>,
        config: SearchConfig,
    ) -> Self {
        Self::build_versioned(posts, avatars, config, 1)
    }

    /// Build a replacement index set with a bumped version.
    pub fn rebuild(&self, posts: &[Post], avatars: &HashMap<String, Avatar>) -> Self {
        Self::build_versioned(posts, avatars, self.config.clone(), self.version + 1)
    }

    fn build_versioned(
        posts: &[Post],
        avatars: &HashMap<String, Avatar>,
        config: SearchConfig,
        version: u64,
    ) -> Self {
        let mut designers: Vec<DesignerEntry> = avatars
            .values()
            .filter(|a| !a.is_blocked)
            .map(|a| DesignerEntry {
                avatar: a.clone(),
                name_norm: normalize_text(&a.name),
            })
            .collect();
        // Map iteration order is arbitrary; pin it so equal-score results
        // stay stable across builds.
        designers.sort_by(|a, b| a.avatar.id.cmp(&b.avatar.id));

        let post_entries: Vec<PostEntry> = posts
            .iter()
            .map(|p| {
                let designer_norm = avatars
                    .get(&p.designer_id)
                    .filter(|a| !a.is_blocked)
                    .map(|a| normalize_text(&a.name))
                    .unwrap_or_default();
                PostEntry {
                    post: p.clone(),
                    title_norm: normalize_text(&p.title),
                    category_norm: normalize_text(p.category.label()),
                    description_norm: normalize_text(&p.description),
                    designer_norm,
                }
            })
            .collect();

        let categories: Vec<CategoryEntry> = Category::ALL
            .into_iter()
            .map(|c| CategoryEntry {
                category: c,
                label_norm: normalize_text(c.label()),
            })
            .collect();

        debug!(
            version,
            designers = designers.len(),
            posts = post_entries.len(),
            "search indexes built"
        );
        Self {
            version,
            config,
            designers,
            posts: post_entries,
            categories,
        }
    }

    /// Version of this index set, bumped on every rebuild.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Matching parameters the indexes were built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
