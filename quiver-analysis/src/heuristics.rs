//! Deterministic fallback classification: cue-word tables, keyword and
//! entity extraction, and the complexity signal.

use std::sync::OnceLock;

use regex::Regex;

use quiver_core::query::TaskType;

/// Cue phrases mapped to task types. Matched against lowercased text.
const COMPARATIVE_CUES: &[&str] = &[
    "compare",
    " vs ",
    " vs.",
    "versus",
    "difference",
    "better",
    "worse",
    "contrast",
];

const TEMPORAL_CUES: &[&str] = &[
    "when ",
    "when?",
    "before",
    "after",
    "during",
    "since",
    "until",
    "first",
    "last",
    "history",
    "timeline",
];

/// Relation phrases that usually require chaining two lookups.
const MULTI_HOP_CUES: &[&str] = &[
    "director of",
    "author of",
    "founder of",
    "wife of",
    "husband of",
    "from the same",
    "of the person who",
];

const FACTUAL_CUES: &[&str] = &[
    "what is",
    "what was",
    "who is",
    "who was",
    "where",
    "which",
    "define",
];

const SEMANTIC_CUES: &[&str] = &[
    "how ",
    "why",
    "explain",
    "describe",
    "meaning",
    "summarize",
    "overview",
    "relate",
];

/// Question words the entity extractor must not mistake for names.
const QUESTION_WORDS: &[&str] = &["What", "Who", "When", "Where", "Why", "How", "Which", "Whose"];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "was", "are", "were", "what", "who", "when", "where", "why", "how", "which",
];

fn has_cue(lower: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| lower.contains(cue))
}

/// Classify a query without the external backend.
///
/// Priority: comparative > temporal > multi-hop > factual > semantic.
/// A query matching nothing is `Other`.
pub fn classify(text: &str, entities: &[String]) -> TaskType {
    let lower = text.to_lowercase();

    if has_cue(&lower, COMPARATIVE_CUES) {
        return TaskType::Comparative;
    }
    if has_cue(&lower, TEMPORAL_CUES) {
        return TaskType::Temporal;
    }
    if has_cue(&lower, MULTI_HOP_CUES) || entities.len() > 2 {
        return TaskType::MultiHop;
    }
    if has_cue(&lower, FACTUAL_CUES) {
        return TaskType::Factual;
    }
    if has_cue(&lower, SEMANTIC_CUES) {
        return TaskType::Semantic;
    }
    TaskType::Other
}

/// Stopword-filtered keywords, order-preserving, capped at 10.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .take(10)
        .collect()
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*").expect("entity pattern is valid")
    })
}

/// Capitalized spans, excluding sentence-leading question words.
pub fn extract_entities(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    entity_regex()
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|e| e.len() > 2 && !QUESTION_WORDS.contains(&e.as_str()))
        .filter(|e| seen.insert(e.clone()))
        .collect()
}

/// Complexity in [0, 1], monotonic in word count, entity count, and cue
/// presence.
pub fn complexity(text: &str, entities: &[String]) -> f64 {
    let lower = text.to_lowercase();
    let words = text.split_whitespace().count();

    let length_load = (words as f64 / 30.0).min(1.0);
    let entity_load = (entities.len() as f64 / 4.0).min(1.0);

    let mut cues = 0usize;
    for table in [COMPARATIVE_CUES, TEMPORAL_CUES, MULTI_HOP_CUES] {
        if has_cue(&lower, table) {
            cues += 1;
        }
    }
    let cue_load = (cues as f64 / 2.0).min(1.0);

    0.4 * length_load + 0.3 * entity_load + 0.3 * cue_load
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capital_of_france_is_factual() {
        let text = "What is the capital of France?";
        let entities = extract_entities(text);
        assert_eq!(entities, vec!["France".to_string()]);
        assert_eq!(classify(text, &entities), TaskType::Factual);
    }

    #[test]
    fn compare_query_is_comparative() {
        let text = "Compare Python and Java programming languages";
        let entities = extract_entities(text);
        assert_eq!(classify(text, &entities), TaskType::Comparative);
    }

    #[test]
    fn when_query_is_temporal() {
        let text = "When was the first computer invented?";
        assert_eq!(classify(text, &extract_entities(text)), TaskType::Temporal);
    }

    #[test]
    fn relation_chain_is_multi_hop() {
        let text = "What nationality was the wife of Henry Miller?";
        assert_eq!(classify(text, &extract_entities(text)), TaskType::MultiHop);
    }

    #[test]
    fn complexity_grows_with_length() {
        let short = "What is Rust?";
        let long = "Are the director of film Move and the director of film Mediterranee \
                    from the same country, and which film was released first?";
        let c_short = complexity(short, &extract_entities(short));
        let c_long = complexity(long, &extract_entities(long));
        assert!(c_long > c_short);
        assert!((0.0..=1.0).contains(&c_short));
        assert!((0.0..=1.0).contains(&c_long));
    }

    #[test]
    fn keywords_drop_stopwords() {
        let kws = extract_keywords("What is the capital of France?");
        assert!(kws.contains(&"capital".to_string()));
        assert!(kws.contains(&"france".to_string()));
        assert!(!kws.contains(&"the".to_string()));
    }
}
