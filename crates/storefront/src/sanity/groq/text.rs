//! Text matching with GROQ `match` semantics.
//!
//! Both sides are split into lowercase terms on any non-alphanumeric
//! character. Every pattern term must match at least one text term. A `*`
//! inside a pattern term is a wildcard, so `sof*` prefix-matches `sofa`.

/// Split text into lowercase terms.
#[must_use]
pub fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Split a pattern into lowercase terms, keeping `*` wildcards.
///
/// Terms made only of wildcards carry no information and are dropped.
fn pattern_terms(pattern: &str) -> Vec<String> {
    pattern
        .split(|c: char| !(c.is_alphanumeric() || c == '*'))
        .filter(|term| term.chars().any(|c| c != '*'))
        .map(str::to_lowercase)
        .collect()
}

/// Evaluate `text match pattern`.
///
/// A pattern without any searchable term matches nothing.
#[must_use]
pub fn matches(text: &str, pattern: &str) -> bool {
    let patterns = pattern_terms(pattern);
    if patterns.is_empty() {
        return false;
    }

    let words = terms(text);
    patterns
        .iter()
        .all(|pattern| words.iter().any(|word| glob(word, pattern)))
}

/// Match a single term against a single pattern term with `*` wildcards.
fn glob(word: &str, pattern: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(head) = parts.next() else {
        return true;
    };
    let Some(mut rest) = word.strip_prefix(head) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        // No wildcard at all: exact term match
        return rest.is_empty();
    };

    for part in middle {
        match rest.split_once(part) {
            Some((_, after)) => rest = after,
            None => return false,
        }
    }

    rest.ends_with(last)
}
