//! Text normalization for fuzzy matching.
//!
//! Both indexed content and live queries pass through [`normalize_text`], so
//! a stemmed token matches regardless of inflection ("poster" finds
//! "posters"). Normalized text is for matching only; display always uses the
//! original string (see [`highlight`](crate::search::highlight)).

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

/// Everything except word characters, whitespace, apostrophes, and hyphens
/// becomes a space before tokenization.
static STRIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s'\-]+").expect("valid strip pattern"));

/// Lowercase, strip punctuation, split on whitespace, stem each token, and
/// re-join with single spaces. Idempotent.
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped = STRIP_PATTERN.replace_all(&lowered, " ");
    stripped.split_whitespace().map(stem_token).join(" ")
}

/// [`normalize_text`] without the stemming step. Highlight reconstruction
/// compares original words against matched tokens in both forms.
pub fn fold_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let stripped = STRIP_PATTERN.replace_all(&lowered, " ");
    stripped.split_whitespace().join(" ")
}

/// Lightweight suffix stemmer. Rules are tried in order and the first one
/// that applies wins; the pass repeats until the token is stable so that
/// normalization as a whole is idempotent.
pub fn stem_token(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = stem_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Suffixes are only stripped when a stem of at least this many characters
/// remains, which keeps short words intact ("sing", "red", "ties").
const MIN_STEM_CHARS: usize = 3;

fn stem_once(token: &str) -> String {
    // Plural "-ies" -> "-y".
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.chars().count() + 1 >= MIN_STEM_CHARS {
            return format!("{stem}y");
        }
    }
    // Sibilant plurals: "(ss|x|z|ch|sh)es" -> drop "es".
    if let Some(stem) = token.strip_suffix("es") {
        let sibilant = stem.ends_with("ss")
            || stem.ends_with('x')
            || stem.ends_with('z')
            || stem.ends_with("ch")
            || stem.ends_with("sh");
        if sibilant && stem.chars().count() >= MIN_STEM_CHARS {
            return stem.to_string();
        }
    }
    // Simple plural "s", but not "-ss".
    if token.ends_with('s') && !token.ends_with("ss") {
        let stem = &token[..token.len() - 1];
        if stem.chars().count() >= MIN_STEM_CHARS {
            return stem.to_string();
        }
    }
    // Gerund "-ing".
    if let Some(stem) = token.strip_suffix("ing") {
        if stem.chars().count() >= MIN_STEM_CHARS {
            return stem.to_string();
        }
    }
    // Past tense "-ed".
    if let Some(stem) = token.strip_suffix("ed") {
        if stem.chars().count() >= MIN_STEM_CHARS {
            return stem.to_string();
        }
    }
    token.to_string()
}
