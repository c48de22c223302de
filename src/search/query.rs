//! Query execution over the built indexes.
//!
//! Results carry a relevance score where lower is better: 0 would be a
//! perfect match on every queried token. Post relevance combines the four
//! weighted keys as a weighted product with an epsilon floor, so a perfect
//! title hit still outranks everything a fuzzier key can produce.

use std::collections::HashSet;

use crate::model::{Avatar, Category, Post};
use crate::search::fuzzy::{match_field, FieldKey, FieldMatch, FieldOutcome};
use crate::search::index::SearchIndexes;
use crate::search::normalize::normalize_text;

/// Per-section result caps for [`search_all`].
#[derive(Debug, Clone, Copy)]
pub struct SectionLimits {
    pub designers: usize,
    pub posts: usize,
    pub categories: usize,
}

impl Default for SectionLimits {
    fn default() -> Self {
        Self {
            designers: 5,
            posts: 10,
            categories: 5,
        }
    }
}

/// A post result with the spans needed for highlighting.
#[derive(Debug, Clone)]
pub struct PostHit {
    pub post: Post,
    /// Relevance, lower = better.
    pub score: f64,
    /// Every span that cleared the threshold, across all four keys.
    pub matches: Vec<FieldMatch>,
}

/// A designer result.
#[derive(Debug, Clone)]
pub struct DesignerHit {
    pub avatar: Avatar,
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// A category result.
#[derive(Debug, Clone)]
pub struct CategoryHit {
    pub category: Category,
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// Sectioned results for the search box dropdown.
#[derive(Debug, Clone, Default)]
pub struct SectionedResults {
    pub designers: Vec<DesignerHit>,
    pub posts: Vec<PostHit>,
    pub categories: Vec<CategoryHit>,
}

impl SectionedResults {
    pub fn is_empty(&self) -> bool {
        self.designers.is_empty() && self.posts.is_empty() && self.categories.is_empty()
    }
}

/// Search every index, returning at most the per-section limits.
///
/// Queries shorter than the configured minimum after normalization return
/// all-empty sections.
pub fn search_all(indexes: &SearchIndexes, query: &str, limits: &SectionLimits) -> SectionedResults {
    let Some(normalized) = effective_query(indexes, query) else {
        return SectionedResults::default();
    };
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let mut designers: Vec<DesignerHit> = indexes
        .designers
        .iter()
        .filter_map(|entry| {
            match_field(&tokens, &entry.name_norm, FieldKey::Name, &indexes.config).map(|o| {
                DesignerHit {
                    avatar: entry.avatar.clone(),
                    score: o.score,
                    matches: o.matches,
                }
            })
        })
        .collect();
    sort_and_truncate(&mut designers, limits.designers, |h| h.score);

    let mut posts = rank_posts(indexes, &tokens);
    posts.truncate(limits.posts);

    let mut categories: Vec<CategoryHit> = indexes
        .categories
        .iter()
        .filter_map(|entry| {
            match_field(&tokens, &entry.label_norm, FieldKey::Label, &indexes.config).map(|o| {
                CategoryHit {
                    category: entry.category,
                    score: o.score,
                    matches: o.matches,
                }
            })
        })
        .collect();
    sort_and_truncate(&mut categories, limits.categories, |h| h.score);

    SectionedResults {
        designers,
        posts,
        categories,
    }
}

/// Flat relevance-ranked post search, used when an active query drives the
/// grid. Relevance order is preserved downstream; active-search mode never
/// re-sorts by date or rating.
pub fn search_posts(indexes: &SearchIndexes, query: &str, limit: usize) -> Vec<PostHit> {
    let Some(normalized) = effective_query(indexes, query) else {
        return Vec::new();
    };
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let mut hits = rank_posts(indexes, &tokens);
    hits.truncate(limit);
    hits
}

/// Keep only results whose post category is in `allowed`; an empty set
/// means no filtering.
pub fn filter_by_categories(results: Vec<PostHit>, allowed: &HashSet<Category>) -> Vec<PostHit> {
    if allowed.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|hit| allowed.contains(&hit.post.category))
        .collect()
}

/// Whether `query` is long enough, after normalization, to drive a search.
/// Anything below the minimum is treated as "no query".
pub fn is_active_query(indexes: &SearchIndexes, query: &str) -> bool {
    effective_query(indexes, query).is_some()
}

fn effective_query(indexes: &SearchIndexes, query: &str) -> Option<String> {
    let normalized = normalize_text(query);
    let significant = normalized.chars().filter(|c| !c.is_whitespace()).count();
    if significant < indexes.config.min_match_chars {
        None
    } else {
        Some(normalized)
    }
}

fn rank_posts(indexes: &SearchIndexes, tokens: &[&str]) -> Vec<PostHit> {
    let config = &indexes.config;
    let total_weight = config.title_weight
        + config.category_weight
        + config.description_weight
        + config.designer_weight;

    let mut hits: Vec<PostHit> = indexes
        .posts
        .iter()
        .filter_map(|entry| {
            let keyed: [(FieldKey, &str, f64); 4] = [
                (FieldKey::Title, &entry.title_norm, config.title_weight),
                (FieldKey::Category, &entry.category_norm, config.category_weight),
                (
                    FieldKey::Description,
                    &entry.description_norm,
                    config.description_weight,
                ),
                (
                    FieldKey::DesignerName,
                    &entry.designer_norm,
                    config.designer_weight,
                ),
            ];

            let mut outcomes: Vec<(f64, FieldOutcome)> = Vec::new();
            for (field, text, weight) in keyed {
                if let Some(outcome) = match_field(tokens, text, field, config) {
                    outcomes.push((weight, outcome));
                }
            }
            if outcomes.is_empty() {
                return None;
            }

            let mut score = 1.0;
            let mut matches = Vec::new();
            for (weight, outcome) in outcomes {
                score *= outcome.score.max(f64::EPSILON).powf(weight / total_weight);
                matches.extend(outcome.matches);
            }
            Some(PostHit {
                post: entry.post.clone(),
                score,
                matches,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
    hits
}

fn sort_and_truncate<T>(hits: &mut Vec<T>, limit: usize, score: impl Fn(&T) -> f64) {
    hits.sort_by(|a, b| {
        score(a)
            .partial_cmp(&score(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(limit);
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::SearchConfig;
    use crate::model::Category;
    use crate::test_utils::fixtures::{fixed_now, make_avatar, PostFixture};

    fn indexes() -> SearchIndexes {
        let now = fixed_now();
        let posts = vec![
            PostFixture::new("p_neon", Category::PosterDesign, 3, now)
                .title("Neon Poster Series")
                .description("Retro neon gradients for a gig poster run.")
                .designer("user_sarah")
                .build(),
            PostFixture::new("p_shop", Category::WebDesign, 5, now)
                .title("Modern E-commerce Web")
                .description("Minimalist checkout flows.")
                .designer("user_sarah")
                .build(),
            PostFixture::new("p_logo", Category::LogoDesign, 8, now)
                .title("Falcon Mark")
                .description("Geometric falcon logo exploration.")
                .designer("user_marcus")
                .build(),
        ];
        let mut avatars = HashMap::new();
        avatars.insert(
            "user_sarah".to_string(),
            make_avatar("user_sarah", "Sarah Chen"),
        );
        avatars.insert(
            "user_marcus".to_string(),
            make_avatar("user_marcus", "Marcus Johnson"),
        );
        SearchIndexes::build(&posts, &avatars, SearchConfig::default())
    }

    #[test]
    fn test_exact_title_ranks_first() {
        let hits = search_posts(&indexes(), "neon poster", 10);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].post.id, "p_neon");
    }

    #[test]
    fn test_typo_tolerated() {
        let hits = search_posts(&indexes(), "postr", 10);
        assert!(hits.iter().any(|h| h.post.id == "p_neon"));
        let neon = hits.iter().find(|h| h.post.id == "p_neon").unwrap();
        assert!(neon
            .matches
            .iter()
            .any(|m| m.field == FieldKey::Title && !m.token.is_empty()));
    }

    #[test]
    fn test_query_below_min_length_returns_empty() {
        let results = search_all(&indexes(), "a", &SectionLimits::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_punctuation_only_query_returns_empty() {
        let results = search_all(&indexes(), "?!...", &SectionLimits::default());
        assert!(results.is_empty());
    }

    #[test]
    fn test_sections_populated_independently() {
        let results = search_all(&indexes(), "poster", &SectionLimits::default());
        assert!(!results.posts.is_empty());
        assert!(results
            .categories
            .iter()
            .any(|c| c.category == Category::PosterDesign));
        assert!(results.designers.is_empty());
    }

    #[test]
    fn test_designer_search_hits_avatar_and_posts() {
        let results = search_all(&indexes(), "sarah", &SectionLimits::default());
        assert_eq!(results.designers.len(), 1);
        assert_eq!(results.designers[0].avatar.name, "Sarah Chen");
        // Both of Sarah's posts surface through the denormalized key.
        assert_eq!(results.posts.len(), 2);
        assert!(results.posts.iter().all(|h| h
            .matches
            .iter()
            .any(|m| m.field == FieldKey::DesignerName)));
    }

    #[test]
    fn test_section_limits_respected() {
        let limits = SectionLimits {
            designers: 1,
            posts: 1,
            categories: 1,
        };
        let results = search_all(&indexes(), "design", &limits);
        assert!(results.categories.len() <= 1);
        assert!(results.posts.len() <= 1);
    }

    #[test]
    fn test_scores_rank_lower_better() {
        let hits = search_posts(&indexes(), "neon poster", 10);
        for pair in hits.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_category_filter_identity_when_empty() {
        let hits = search_posts(&indexes(), "design", 10);
        let filtered = filter_by_categories(hits.clone(), &HashSet::new());
        assert_eq!(filtered.len(), hits.len());
    }

    #[test]
    fn test_category_filter_narrows() {
        let hits = search_posts(&indexes(), "poster", 10);
        let allowed: HashSet<Category> = [Category::WebDesign].into_iter().collect();
        let filtered = filter_by_categories(hits, &allowed);
        assert!(filtered.iter().all(|h| h.post.category == Category::WebDesign));
    }

    #[test]
    fn test_empty_indexes_return_empty() {
        let empty = SearchIndexes::build(&[], &HashMap::new(), SearchConfig::default());
        assert!(search_posts(&empty, "poster", 10).is_empty());
        let results = search_all(&empty, "poster", &SectionLimits::default());
        assert!(results.designers.is_empty() && results.posts.is_empty());
        // The category index always covers the fixed enum.
        assert!(!results.categories.is_empty());
    }
}
