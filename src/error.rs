//! Error handling for the rater engine.
//!
//! The ranking and search core is total: it degrades to empty or trivially
//! ordered output instead of failing. The fallible surfaces are the edges —
//! configuration validation and catalog snapshot decoding — and those are
//! what [`EngineError`] covers.

use std::io;

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML decode error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = EngineError::Config("standout_spacing must be at least 1".into());
        assert!(err.to_string().contains("standout_spacing"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: EngineError = parse.unwrap_err().into();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
