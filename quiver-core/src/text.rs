//! Text normalization and similarity shared by deduplication, the
//! redundancy filter, and cache keys.
//!
//! Similarity is token-set Jaccard over normalized text: deterministic,
//! cheap, and requires no model call.

use std::collections::HashSet;

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

fn token_set(text: &str) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the two texts' normalized token sets, in [0, 1].
/// Two empty texts are treated as identical.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let sa = token_set(a);
    let sb = token_set(b);
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let intersection = sa.intersection(&sb).count();
    let union = sa.len() + sb.len() - intersection;
    if union == 0 {
        return 1.0;
    }
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_case_and_punctuation() {
        assert_eq!(normalize("What is  the Capital, of France?"), "what is the capital of france");
    }

    #[test]
    fn jaccard_identical_is_one() {
        assert!((jaccard("paris is the capital", "Paris is the capital!") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn jaccard_disjoint_is_zero() {
        assert_eq!(jaccard("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        let s = jaccard("the quick brown fox", "the slow brown dog");
        assert!(s > 0.0 && s < 1.0);
    }
}
