//! Keyword extraction for category suggestions.
//!
//! Deterministic stop-word filtering plus frequency ranking. No inference
//! involved, so keywords are attached to suggestions regardless of whether
//! the provider was reachable.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use annota_core::defaults::MAX_KEYWORDS;

const STOP_WORDS: &[&str] = &[
    "the", "and", "a", "to", "of", "in", "is", "it", "you", "that", "he", "was", "for", "on",
    "are", "with", "as", "his", "they", "at", "be", "this", "have", "from", "or", "had", "by",
    "but", "not", "what", "all", "were", "we", "when", "your", "can", "said", "there", "use",
    "an", "each", "which", "she", "do", "how", "their", "if", "will", "up", "other", "about",
    "out", "many", "then", "them", "these", "so", "some", "her", "would", "make", "like", "him",
    "into", "time", "has", "look", "two", "more", "go", "see", "no", "way", "could", "people",
    "my", "than", "first", "been", "call", "who", "its", "now", "find", "long", "down", "day",
    "did", "get", "come", "made", "may", "part",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w+\b").expect("static pattern"))
}

/// Extract up to `max` keywords from `text`, most frequent first.
///
/// Words shorter than three characters and stop words are dropped. Ties
/// break by first occurrence so results are stable across runs.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for m in word_pattern().find_iter(&lowered) {
        let word = m.as_str();
        if word.len() <= 2 || STOP_WORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<&str> = order;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.into_iter().take(max).map(String::from).collect()
}

/// Extract keywords for a note, weighting the title double as the
/// categorizer does.
pub fn note_keywords(title: &str, content: &str) -> Vec<String> {
    extract_keywords(&format!("{} {} {}", title, title, content), MAX_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_keywords() {
        assert!(extract_keywords("", 5).is_empty());
    }

    #[test]
    fn stop_words_and_short_words_are_dropped() {
        let keywords = extract_keywords("the cat sat on a mat at it", 5);
        assert_eq!(keywords, vec!["cat", "sat", "mat"]);
    }

    #[test]
    fn frequency_ranks_keywords() {
        let keywords = extract_keywords("rust rust rust tokio tokio axum", 2);
        assert_eq!(keywords, vec!["rust", "tokio"]);
    }

    #[test]
    fn title_is_weighted_double() {
        // "meeting" appears once in the title, "groceries" once in content;
        // the doubled title pushes "meeting" ahead.
        let keywords = note_keywords("meeting", "groceries meeting");
        assert_eq!(keywords[0], "meeting");
    }

    #[test]
    fn respects_the_cap() {
        let keywords = extract_keywords("alpha beta gamma delta epsilon zeta eta", 5);
        assert_eq!(keywords.len(), 5);
    }
}
