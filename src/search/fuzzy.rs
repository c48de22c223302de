//! Word-granularity fuzzy matching over normalized text.
//!
//! A query token matches a field token either as an exact substring
//! (location-agnostic, scored by how much of the word it leaves uncovered)
//! or within a normalized Levenshtein distance gated by the configured
//! threshold. Matching is exhaustive: every acceptable (query token, field
//! token) pair is collected so multiple fields of one item can all
//! contribute spans for highlighting.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

/// Indexed fields a match can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKey {
    /// Post title.
    Title,
    /// Post category label.
    Category,
    /// Post description.
    Description,
    /// Designer name denormalized onto the post.
    DesignerName,
    /// Designer display name (designer index).
    Name,
    /// Category label (category index).
    Label,
}

/// One matched word within a normalized field text.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub field: FieldKey,
    /// The matched word, as it appears in the normalized text.
    pub token: String,
    /// Byte range of the word in the normalized field text.
    pub start: usize,
    pub end: usize,
    /// Distance score for this pair, 0 = exact.
    pub score: f64,
}

/// Outcome of matching a query against one field.
#[derive(Debug, Clone)]
pub struct FieldOutcome {
    /// Field-level score: mean over query tokens of their best word score,
    /// with unmatched tokens counting as 1. Lower = better.
    pub score: f64,
    pub matches: Vec<FieldMatch>,
}

/// Substring hits are scored by the uncovered share of the word, softened
/// so a contained token always clears the default threshold.
const SUBSTRING_OVERHANG_FACTOR: f64 = 0.3;

/// Match pre-tokenized query tokens against one normalized field text.
/// Returns `None` when no query token matched at all.
pub fn match_field(
    query_tokens: &[&str],
    field_text: &str,
    field: FieldKey,
    config: &SearchConfig,
) -> Option<FieldOutcome> {
    if query_tokens.is_empty() || field_text.is_empty() {
        return None;
    }

    let words = tokens_with_spans(field_text);
    let mut matches: Vec<FieldMatch> = Vec::new();
    let mut score_sum = 0.0;
    let mut any_matched = false;

    for qt in query_tokens {
        if qt.chars().count() < config.min_match_chars {
            score_sum += 1.0;
            continue;
        }
        let mut best: Option<f64> = None;
        for (start, word) in &words {
            let score = token_score(qt, word);
            if score <= config.threshold {
                matches.push(FieldMatch {
                    field,
                    token: (*word).to_string(),
                    start: *start,
                    end: start + word.len(),
                    score,
                });
                best = Some(best.map_or(score, |b: f64| b.min(score)));
            }
        }
        match best {
            Some(score) => {
                any_matched = true;
                score_sum += score;
            }
            None => score_sum += 1.0,
        }
    }

    if !any_matched {
        return None;
    }
    Some(FieldOutcome {
        score: score_sum / query_tokens.len() as f64,
        matches,
    })
}

/// Distance between a query token and a field word on the
/// 0 = exact .. 1 = unrelated scale.
pub fn token_score(query: &str, word: &str) -> f64 {
    let query_len = query.chars().count();
    let word_len = word.chars().count();
    if word_len == 0 || query_len == 0 {
        return 1.0;
    }
    if word.contains(query) {
        let overhang = (word_len - query_len) as f64 / word_len as f64;
        return overhang * SUBSTRING_OVERHANG_FACTOR;
    }
    levenshtein(query, word) as f64 / query_len.max(word_len) as f64
}

/// Classic two-row Levenshtein over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Words of `text` with their byte offsets.
pub fn tokens_with_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push((s, &text[s..]));
    }
    spans
}
