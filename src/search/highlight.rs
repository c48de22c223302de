//! Highlight reconstruction on original display text.
//!
//! Match spans address the *normalized* projection, whose offsets do not
//! survive stemming and punctuation stripping. Reconstruction therefore
//! works at word granularity: collect the matched normalized tokens, then
//! walk the original text word by word, marking a word when its folded or
//! stemmed form is among them. Concatenating the segments always reproduces
//! the input exactly.

use std::collections::HashSet;

use crate::search::fuzzy::{FieldKey, FieldMatch};
use crate::search::normalize::{fold_text, stem_token};

/// A fragment of original text, flagged when it should render highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub is_match: bool,
}

/// Split `original` into match/non-match segments for one field.
pub fn highlight_matches(original: &str, matches: &[FieldMatch], field: FieldKey) -> Vec<Segment> {
    if original.is_empty() {
        return Vec::new();
    }

    let matched_tokens: HashSet<&str> = matches
        .iter()
        .filter(|m| m.field == field)
        .map(|m| m.token.as_str())
        .collect();
    if matched_tokens.is_empty() {
        return vec![Segment {
            text: original.to_string(),
            is_match: false,
        }];
    }

    let mut segments: Vec<Segment> = Vec::new();
    for (piece, is_word) in split_words(original) {
        let is_match = is_word && word_matches(piece, &matched_tokens);
        match segments.last_mut() {
            Some(last) if last.is_match == is_match => last.text.push_str(piece),
            _ => segments.push(Segment {
                text: piece.to_string(),
                is_match,
            }),
        }
    }
    segments
}

/// A word matches when any of its folded tokens, or their stemmed forms,
/// appear among the matched normalized tokens.
fn word_matches(word: &str, matched: &HashSet<&str>) -> bool {
    let folded = fold_text(word);
    folded
        .split_whitespace()
        .any(|t| matched.contains(t) || matched.contains(stem_token(t).as_str()))
}

/// Alternating (piece, is_word) runs; whitespace runs are their own pieces.
fn split_words(text: &str) -> impl Iterator<Item = (&str, bool)> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_word: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let word = !ch.is_whitespace();
        match in_word {
            Some(current) if current == word => {}
            Some(current) => {
                pieces.push((&text[start..i], current));
                start = i;
                in_word = Some(word);
            }
            None => in_word = Some(word),
        }
    }
    if let Some(current) = in_word {
        pieces.push((&text[start..], current));
    }
    pieces.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_match(token: &str) -> FieldMatch {
        FieldMatch {
            field: FieldKey::Title,
            token: token.to_string(),
            start: 0,
            end: token.len(),
            score: 0.0,
        }
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_round_trip_exact() {
        let original = "Neon Poster Series";
        let segments = highlight_matches(original, &[title_match("poster")], FieldKey::Title);
        assert_eq!(joined(&segments), original);
    }

    #[test]
    fn test_marks_matching_word() {
        let segments =
            highlight_matches("Neon Poster Series", &[title_match("poster")], FieldKey::Title);
        let matched: Vec<&Segment> = segments.iter().filter(|s| s.is_match).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].text, "Poster");
    }

    #[test]
    fn test_stemmed_token_matches_inflected_original() {
        // The index stores "poster"; the display text says "Posters".
        let segments =
            highlight_matches("Gig Posters", &[title_match("poster")], FieldKey::Title);
        assert!(segments.iter().any(|s| s.is_match && s.text == "Posters"));
    }

    #[test]
    fn test_punctuated_word_still_matches() {
        let segments =
            highlight_matches("Neon Poster, remixed", &[title_match("poster")], FieldKey::Title);
        let matched: Vec<&Segment> = segments.iter().filter(|s| s.is_match).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].text, "Poster,");
        assert_eq!(joined(&segments), "Neon Poster, remixed");
    }

    #[test]
    fn test_adjacent_matches_merge() {
        let matches = vec![title_match("neon"), title_match("poster")];
        let segments = highlight_matches("Neon Poster Series", &matches, FieldKey::Title);
        // Whitespace stays non-match, so the two matched words alternate
        // with the gaps instead of fusing across them.
        assert_eq!(joined(&segments), "Neon Poster Series");
        assert_eq!(segments.len(), 4);
        assert!(segments[0].is_match);
        assert!(!segments[1].is_match);
        assert!(segments[2].is_match);
    }

    #[test]
    fn test_other_fields_ignored() {
        let description_match = FieldMatch {
            field: FieldKey::Description,
            token: "poster".to_string(),
            start: 0,
            end: 6,
            score: 0.0,
        };
        let segments =
            highlight_matches("Neon Poster Series", &[description_match], FieldKey::Title);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_match);
    }

    #[test]
    fn test_empty_text_yields_no_segments() {
        assert!(highlight_matches("", &[title_match("x")], FieldKey::Title).is_empty());
    }

    #[test]
    fn test_no_matches_single_plain_segment() {
        let segments = highlight_matches("Anything at all", &[], FieldKey::Title);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_match);
        assert_eq!(segments[0].text, "Anything at all");
    }

    #[test]
    fn test_preserves_leading_and_trailing_whitespace() {
        let original = "  Neon Poster  ";
        let segments = highlight_matches(original, &[title_match("neon")], FieldKey::Title);
        assert_eq!(joined(&segments), original);
    }
}
