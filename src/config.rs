//! Engine configuration.
//!
//! Every tunable of the badge engine, the curated-freshness scheduler, and
//! the search indexer lives here, with defaults matching the shipped feed
//! behavior. All sections deserialize with per-field defaults so a partial
//! TOML/JSON document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub badges: BadgeConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Parse a TOML document, falling back to defaults for absent fields.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check all sections for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.badges.validate()?;
        self.scheduler.validate()?;
        self.search.validate()
    }
}

/// Badge eligibility and window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Minimum review count for a post to be a badge candidate.
    /// Default: 5. Deliberately stricter than the attribution lock
    /// threshold of 3 (see `RatingSummary::LOCK_THRESHOLD`).
    #[serde(default = "default_min_reviews")]
    pub min_reviews: u32,

    /// Lookback window, in days, over review timestamps.
    /// Default: 7. Gates candidacy and ranks Most Discussed.
    #[serde(default = "default_activity_window_days")]
    pub activity_window_days: i64,
}

fn default_min_reviews() -> u32 {
    5
}

fn default_activity_window_days() -> i64 {
    7
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            min_reviews: default_min_reviews(),
            activity_window_days: default_activity_window_days(),
        }
    }
}

impl BadgeConfig {
    fn validate(&self) -> Result<()> {
        if self.activity_window_days < 1 {
            return Err(EngineError::Config(
                "badges.activity_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Curated-freshness scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Age cutoff, in days, for the Active & Emerging bucket.
    /// Default: 17 (middle of the 14-21 day range).
    #[serde(default = "default_emerging_window_days")]
    pub emerging_window_days: i64,

    /// Minimum gap between standout (badge) posts in the output.
    /// Default: 7 (middle of the 6-8 card range).
    #[serde(default = "default_standout_spacing")]
    pub standout_spacing: usize,
}

fn default_emerging_window_days() -> i64 {
    17
}

fn default_standout_spacing() -> usize {
    7
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            emerging_window_days: default_emerging_window_days(),
            standout_spacing: default_standout_spacing(),
        }
    }
}

impl SchedulerConfig {
    fn validate(&self) -> Result<()> {
        if self.emerging_window_days < 1 {
            return Err(EngineError::Config(
                "scheduler.emerging_window_days must be at least 1".to_string(),
            ));
        }
        if self.standout_spacing < 1 {
            return Err(EngineError::Config(
                "scheduler.standout_spacing must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fuzzy search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fuzzy tolerance on a 0 = exact .. 1 = match-anything scale.
    /// Default: 0.35, permissive enough for 2-3 character edits on
    /// longer words.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Minimum normalized query length to trigger a match.
    /// Default: 2.
    #[serde(default = "default_min_match_chars")]
    pub min_match_chars: usize,

    /// Weight of the post title key.
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,

    /// Weight of the post category key.
    #[serde(default = "default_category_weight")]
    pub category_weight: f64,

    /// Weight of the post description key.
    #[serde(default = "default_description_weight")]
    pub description_weight: f64,

    /// Weight of the denormalized designer-name key on posts.
    #[serde(default = "default_designer_weight")]
    pub designer_weight: f64,
}

fn default_threshold() -> f64 {
    0.35
}

fn default_min_match_chars() -> usize {
    2
}

fn default_title_weight() -> f64 {
    1.0
}

fn default_category_weight() -> f64 {
    0.7
}

fn default_description_weight() -> f64 {
    0.5
}

fn default_designer_weight() -> f64 {
    0.3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_match_chars: default_min_match_chars(),
            title_weight: default_title_weight(),
            category_weight: default_category_weight(),
            description_weight: default_description_weight(),
            designer_weight: default_designer_weight(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err(EngineError::Config(
                "search.threshold must be within (0, 1]".to_string(),
            ));
        }
        if self.min_match_chars < 1 {
            return Err(EngineError::Config(
                "search.min_match_chars must be at least 1".to_string(),
            ));
        }
        for (name, weight) in [
            ("title_weight", self.title_weight),
            ("category_weight", self.category_weight),
            ("description_weight", self.description_weight),
            ("designer_weight", self.designer_weight),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(EngineError::Config(format!(
                    "search.{name} must be a positive finite number"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_behavior() {
        let config = EngineConfig::default();
        assert_eq!(config.badges.min_reviews, 5);
        assert_eq!(config.badges.activity_window_days, 7);
        assert_eq!(config.scheduler.emerging_window_days, 17);
        assert_eq!(config.scheduler.standout_spacing, 7);
        assert!((config.search.threshold - 0.35).abs() < f64::EPSILON);
        assert_eq!(config.search.min_match_chars, 2);
        assert!((config.search.title_weight - 1.0).abs() < f64::EPSILON);
        assert!((config.search.designer_weight - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = EngineConfig::from_toml_str(
            r#"
            [scheduler]
            standout_spacing = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.standout_spacing, 5);
        assert_eq!(config.scheduler.emerging_window_days, 17);
        assert_eq!(config.badges.min_reviews, 5);
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [scheduler]
            standout_spacing = 0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("standout_spacing"));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [search]
            threshold = 1.5
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = EngineConfig::from_toml_str(
            r#"
            [search]
            description_weight = -0.5
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("description_weight"));
    }
}
