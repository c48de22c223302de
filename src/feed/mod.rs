//! Feed composition.
//!
//! The glue between the search box, the sort dropdown, and the grid: an
//! active query routes through the search indexes and keeps relevance
//! order; otherwise the selected sort mode orders the catalog, with Curated
//! Freshness as the default. Category filters apply on both paths.

use std::collections::HashSet;

use tracing::debug;

use crate::badges::{compute_badges, BadgeKind, BadgeMap};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::model::{Catalog, Category, Post};
use crate::schedule::{curated_freshness_sort, simple};
use crate::search::{
    is_active_query, search_all, search_posts, PostHit, SearchIndexes, SectionLimits,
    SectionedResults,
};

/// The sort dropdown options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    CuratedFreshness,
    HighestRated,
    LowestRated,
    Newest,
    Oldest,
    MostReviewed,
}

/// One grid render request.
#[derive(Debug, Clone, Default)]
pub struct FeedRequest {
    /// Active search query, if the search box is non-empty.
    pub query: Option<String>,
    /// Selected sort mode; ignored while a query is active.
    pub sort: SortMode,
    /// Allowed categories; empty means all.
    pub categories: HashSet<Category>,
}

/// How the returned ordering was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    /// Relevance-ordered search results.
    Search,
    /// Sort-mode-ordered browse feed.
    Browse,
}

/// A composed feed plus the badge lookup the cards render from.
#[derive(Debug, Clone)]
pub struct ComposedFeed {
    pub posts: Vec<Post>,
    pub badges: BadgeMap,
    pub origin: FeedOrigin,
}

/// Facade owning the catalog snapshot, the search indexes, and the clock.
pub struct FeedEngine {
    catalog: Catalog,
    indexes: SearchIndexes,
    config: EngineConfig,
    clock: Box<dyn Clock>,
}

impl FeedEngine {
    /// Build an engine over a catalog snapshot with the system clock.
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        Self::with_clock(catalog, config, Box::new(SystemClock))
    }

    /// Build an engine with an injected clock.
    pub fn with_clock(catalog: Catalog, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let indexes = SearchIndexes::build(
            &catalog.posts,
            &catalog.avatars,
            config.search.clone(),
        );
        Self {
            catalog,
            indexes,
            config,
            clock,
        }
    }

    /// Swap in a new catalog snapshot and rebuild the indexes, bumping
    /// their version.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.indexes = self.indexes.rebuild(&catalog.posts, &catalog.avatars);
        self.catalog = catalog;
        debug!(version = self.indexes.version(), "catalog replaced");
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn indexes(&self) -> &SearchIndexes {
        &self.indexes
    }

    /// Current badge assignment for the snapshot.
    pub fn badges(&self) -> BadgeMap {
        compute_badges(&self.catalog.posts, self.clock.now(), &self.config.badges)
    }

    /// Badge for one post, if any.
    pub fn badge_for(&self, post_id: &str) -> Option<BadgeKind> {
        self.badges().get(post_id).copied()
    }

    /// Sectioned dropdown search.
    pub fn search_all(&self, query: &str, limits: &SectionLimits) -> SectionedResults {
        search_all(&self.indexes, query, limits)
    }

    /// Compose the grid for one request.
    pub fn compose(&self, request: &FeedRequest) -> ComposedFeed {
        let now = self.clock.now();
        let badges = compute_badges(&self.catalog.posts, now, &self.config.badges);

        if let Some(query) = request.query.as_deref() {
            if is_active_query(&self.indexes, query) {
                let hits = search_posts(&self.indexes, query, usize::MAX);
                let posts = Self::filter_hits(hits, &request.categories);
                debug!(results = posts.len(), "composed search feed");
                return ComposedFeed {
                    posts,
                    badges,
                    origin: FeedOrigin::Search,
                };
            }
        }

        let mut posts: Vec<Post> = self
            .catalog
            .posts
            .iter()
            .filter(|p| request.categories.is_empty() || request.categories.contains(&p.category))
            .cloned()
            .collect();

        match request.sort {
            SortMode::CuratedFreshness => {
                posts = curated_freshness_sort(
                    &posts,
                    now,
                    &self.config.badges,
                    &self.config.scheduler,
                );
            }
            SortMode::HighestRated => simple::by_highest_rated(&mut posts),
            SortMode::LowestRated => simple::by_lowest_rated(&mut posts),
            SortMode::Newest => simple::by_newest(&mut posts),
            SortMode::Oldest => simple::by_oldest(&mut posts),
            SortMode::MostReviewed => simple::by_most_reviewed(&mut posts),
        }
        debug!(results = posts.len(), sort = ?request.sort, "composed browse feed");
        ComposedFeed {
            posts,
            badges,
            origin: FeedOrigin::Browse,
        }
    }

    fn filter_hits(hits: Vec<PostHit>, categories: &HashSet<Category>) -> Vec<Post> {
        crate::search::filter_by_categories(hits, categories)
            .into_iter()
            .map(|h| h.post)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::clock::FixedClock;
    use crate::test_utils::fixtures::{fixed_now, make_avatar, PostFixture};

    fn engine() -> FeedEngine {
        let now = fixed_now();
        let posts = vec![
            PostFixture::new("p_neon", Category::PosterDesign, 3, now)
                .title("Neon Poster Series")
                .rating(4.9, 20, false)
                .review_aged(1)
                .designer("user_1")
                .build(),
            PostFixture::new("p_web", Category::WebDesign, 2, now)
                .title("Modern E-commerce Web")
                .rating(4.2, 8, false)
                .review_aged(2)
                .designer("user_1")
                .build(),
            PostFixture::new("p_flyer", Category::FlyerDesign, 40, now)
                .title("Summer Fest Flyer")
                .rating(3.1, 2, true)
                .designer("user_1")
                .build(),
        ];
        let mut avatars = HashMap::new();
        avatars.insert("user_1".to_string(), make_avatar("user_1", "Sarah Chen"));
        FeedEngine::with_clock(
            Catalog::new(posts, avatars),
            EngineConfig::default(),
            Box::new(FixedClock(now)),
        )
    }

    #[test]
    fn test_default_request_uses_curated_browse() {
        let feed = engine().compose(&FeedRequest::default());
        assert_eq!(feed.origin, FeedOrigin::Browse);
        assert_eq!(feed.posts.len(), 3);
        // p_neon is the Top Rated standout, so it opens the feed.
        assert_eq!(feed.posts[0].id, "p_neon");
        assert_eq!(feed.badges.get("p_neon"), Some(&BadgeKind::TopRated));
    }

    #[test]
    fn test_active_query_keeps_relevance_order() {
        let request = FeedRequest {
            query: Some("poster".to_string()),
            ..FeedRequest::default()
        };
        let feed = engine().compose(&request);
        assert_eq!(feed.origin, FeedOrigin::Search);
        assert_eq!(feed.posts[0].id, "p_neon");
    }

    #[test]
    fn test_query_with_category_filter() {
        let request = FeedRequest {
            query: Some("design".to_string()),
            categories: [Category::WebDesign].into_iter().collect(),
            ..FeedRequest::default()
        };
        let feed = engine().compose(&request);
        assert!(feed.posts.iter().all(|p| p.category == Category::WebDesign));
    }

    #[test]
    fn test_short_query_falls_back_to_browse() {
        let request = FeedRequest {
            query: Some("a".to_string()),
            ..FeedRequest::default()
        };
        let feed = engine().compose(&request);
        assert_eq!(feed.origin, FeedOrigin::Browse);
        assert_eq!(feed.posts.len(), 3);
    }

    #[test]
    fn test_browse_category_filter() {
        let request = FeedRequest {
            categories: [Category::FlyerDesign].into_iter().collect(),
            ..FeedRequest::default()
        };
        let feed = engine().compose(&request);
        assert_eq!(feed.posts.len(), 1);
        assert_eq!(feed.posts[0].id, "p_flyer");
    }

    #[test]
    fn test_sort_modes_route_correctly() {
        let eng = engine();
        let newest = eng.compose(&FeedRequest {
            sort: SortMode::Newest,
            ..FeedRequest::default()
        });
        assert_eq!(newest.posts[0].id, "p_web");

        let highest = eng.compose(&FeedRequest {
            sort: SortMode::HighestRated,
            ..FeedRequest::default()
        });
        assert_eq!(highest.posts[0].id, "p_neon");

        let most_reviewed = eng.compose(&FeedRequest {
            sort: SortMode::MostReviewed,
            ..FeedRequest::default()
        });
        assert_eq!(most_reviewed.posts[0].id, "p_neon");
    }

    #[test]
    fn test_badge_lookup() {
        let eng = engine();
        assert_eq!(eng.badge_for("p_neon"), Some(BadgeKind::TopRated));
        assert_eq!(eng.badge_for("p_flyer"), None);
    }

    #[test]
    fn test_replace_catalog_bumps_index_version() {
        let mut eng = engine();
        let before = eng.indexes().version();
        eng.replace_catalog(Catalog::default());
        assert_eq!(eng.indexes().version(), before + 1);
        assert!(eng.compose(&FeedRequest::default()).posts.is_empty());
    }

    #[test]
    fn test_sectioned_search_passthrough() {
        let results = engine().search_all("sarah", &SectionLimits::default());
        assert_eq!(results.designers.len(), 1);
    }
}
