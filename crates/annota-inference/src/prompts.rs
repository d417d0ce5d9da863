//! Prompt construction shared by the inference providers.
//!
//! Both backends speak a chat-style API, so each task is expressed as a
//! system/user message pair. Keeping the wording here means the providers
//! differ only in transport.

/// System and user message pair for one chat request.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Prompt for concise note summarization bounded by a character budget.
pub fn summarize(title: &str, content: &str, max_chars: usize) -> Prompt {
    Prompt {
        system: "You are a helpful AI assistant that summarizes text concisely and accurately."
            .to_string(),
        user: format!(
            "Summarize the following note in a concise way. \
             Keep the summary under {max_chars} characters:\n\n\
             Note Title: \"{title}\"\n\
             Note Content: \"{content}\"\n\n\
             Summary:"
        ),
    }
}

/// Prompt for single-label sentiment classification.
pub fn sentiment(content: &str) -> Prompt {
    Prompt {
        system: "You are a sentiment analysis assistant. Classify text as Positive, \
                 Neutral, Mixed or Negative only."
            .to_string(),
        user: format!(
            "Analyze the sentiment of the following text and classify it as exactly \
             one of: Positive, Neutral, Mixed or Negative.\n\n\
             Text: \"{content}\"\n\n\
             Sentiment:"
        ),
    }
}

/// Prompt for zero-shot classification against the caller's category names.
pub fn categorize(content: &str, candidates: &[String]) -> Prompt {
    let names = candidates.join(", ");
    Prompt {
        system: format!(
            "You are a categorization assistant. Categorize the following note into \
             exactly one of these categories: {names}."
        ),
        user: format!(
            "Categorize the following note into one of these categories: {names}.\n\n\
             Note Content: \"{content}\"\n\n\
             Category:"
        ),
    }
}

/// Find which candidate the model answered with.
///
/// Models sometimes wrap the label in quotes or extra words, so we accept any
/// answer that contains a candidate name, first match in candidate order wins.
pub fn match_candidate(answer: &str, candidates: &[String]) -> Option<String> {
    let lowered = answer.to_lowercase();
    candidates
        .iter()
        .find(|c| lowered.contains(&c.to_lowercase()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_prompt_carries_budget_and_text() {
        let p = summarize("Trip", "We went hiking.", 150);
        assert!(p.user.contains("under 150 characters"));
        assert!(p.user.contains("\"Trip\""));
        assert!(p.user.contains("\"We went hiking.\""));
    }

    #[test]
    fn match_candidate_ignores_decoration() {
        let candidates = vec!["Work".to_string(), "Personal".to_string()];
        assert_eq!(
            match_candidate("The category is \"personal\".", &candidates),
            Some("Personal".to_string())
        );
        assert_eq!(match_candidate("Finance", &candidates), None);
    }

    #[test]
    fn match_candidate_prefers_candidate_order() {
        let candidates = vec!["Work".to_string(), "Workout".to_string()];
        assert_eq!(
            match_candidate("Workout", &candidates),
            Some("Work".to_string())
        );
    }
}
