//! Lexical similarity matching, the secondary categorizer.
//!
//! When zero-shot classification yields nothing above its floor, each
//! category is scored by how much of its vocabulary (name plus description)
//! appears in the note text. Deterministic and provider-free.

use std::collections::HashSet;

use annota_core::Category;

use crate::keywords;

fn token_set(text: &str) -> HashSet<String> {
    keywords::extract_keywords(text, usize::MAX).into_iter().collect()
}

/// Score one category against the note tokens.
///
/// Overlap coefficient: the fraction of the category's tokens found in the
/// note. A category whose entire vocabulary appears scores 1.0; one sharing
/// nothing scores 0.0.
fn score(note_tokens: &HashSet<String>, category: &Category) -> f32 {
    let mut text = category.name.clone();
    if let Some(desc) = &category.description {
        text.push(' ');
        text.push_str(desc);
    }

    let cat_tokens = token_set(&text);
    if cat_tokens.is_empty() {
        return 0.0;
    }

    let shared = cat_tokens.intersection(note_tokens).count();
    shared as f32 / cat_tokens.len() as f32
}

/// Best-scoring category for the given note text, if any scores above zero.
pub fn best_match(title: &str, content: &str, categories: &[Category]) -> Option<(String, f32)> {
    let note_tokens = token_set(&format!("{} {}", title, content));
    if note_tokens.is_empty() {
        return None;
    }

    categories
        .iter()
        .map(|c| (c.name.clone(), score(&note_tokens, c)))
        .filter(|(_, s)| *s > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn category(name: &str, description: Option<&str>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(String::from),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn exact_name_mention_scores_full() {
        let cats = vec![category("Cooking", None), category("Travel", None)];
        let (name, score) = best_match("Dinner", "A new cooking recipe to try.", &cats).unwrap();
        assert_eq!(name, "Cooking");
        assert!((score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn description_tokens_contribute() {
        let cats = vec![
            category("Work", Some("meetings projects deadlines")),
            category("Personal", Some("family hobbies")),
        ];
        let (name, score) =
            best_match("Sprint", "Planning projects and tracking deadlines.", &cats).unwrap();
        assert_eq!(name, "Work");
        assert!(score >= 0.5);
    }

    #[test]
    fn unrelated_text_matches_nothing() {
        let cats = vec![category("Finance", Some("budget invoices"))];
        assert!(best_match("Hike", "Mountain trail conditions.", &cats).is_none());
    }

    #[test]
    fn empty_note_matches_nothing() {
        let cats = vec![category("Work", None)];
        assert!(best_match("", "", &cats).is_none());
    }
}
