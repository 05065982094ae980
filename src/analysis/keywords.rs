//! Case-insensitive substring matching over keyword lists.

/// Lowercased copy of `text` for repeated matching.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Keywords from `words` that occur in `folded`, which must already be
/// lowercased. Keywords are compared lowercased.
pub fn matching<'a>(folded: &str, words: &[&'a str]) -> Vec<&'a str> {
    words
        .iter()
        .copied()
        .filter(|w| folded.contains(&w.to_lowercase()))
        .collect()
}

pub fn contains_any(folded: &str, words: &[&str]) -> bool {
    words.iter().any(|w| folded.contains(&w.to_lowercase()))
}

pub fn count_matching(folded: &str, words: &[&str]) -> usize {
    words
        .iter()
        .filter(|w| folded.contains(&w.to_lowercase()))
        .count()
}

/// First `max_chars` characters of `text`, with "..." appended when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
