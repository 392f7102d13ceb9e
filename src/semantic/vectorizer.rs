//! Bag-of-words vectorization of free text.
//!
//! Every call builds its own vocabulary from the tokens of the input text, so
//! the resulting vector lives in a coordinate space local to that text:
//! 1. Lowercase and strip punctuation
//! 2. Split on whitespace, drop one-character tokens and stopwords
//! 3. Count raw term frequencies in order of first appearance
//! 4. L2-normalize (an empty vocabulary stays an empty vector)
//!
//! Two vectors produced here are only comparable through the zero padding
//! done by [`super::ranker::similarity`]. See [`super::Vocabulary`] for the
//! corpus-wide alternative.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::dashboards::Category;

/// Words that carry no signal for ranking.
pub const STOPWORDS: [&str; 19] = [
    "a", "an", "the", "and", "or", "but", "is", "are", "was", "were", "of", "in", "to", "for",
    "with", "by", "at", "on", "from",
];

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,/#!$%\^&\*;:{}=\-_`~()]").expect("punctuation class is valid"));

/// Split text into lowercase tokens, dropping punctuation, single characters
/// and stopwords. Token order is preserved.
///
/// Token length is counted in UTF-16 code units, so a lone character outside
/// the Basic Multilingual Plane (most emoji) counts as two and is kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowercase = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowercase, "");

    stripped
        .split_whitespace()
        .filter(|token| token.encode_utf16().count() > 1 && !STOPWORDS.contains(token))
        .map(String::from)
        .collect()
}

/// Convert text into an L2-normalized term-frequency vector over its own
/// vocabulary.
pub fn vectorize(text: &str) -> Vec<f64> {
    let tokens = tokenize(text);

    // first appearance defines the slot
    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    let mut vector: Vec<f64> = Vec::new();

    for token in &tokens {
        let next = vocabulary.len();
        let slot = *vocabulary.entry(token.as_str()).or_insert(next);
        if slot == vector.len() {
            vector.push(0.0);
        }
        vector[slot] += 1.0;
    }

    normalize(vector)
}

/// Text a dashboard is embedded from: title, description and category tag
/// joined by single spaces.
pub fn dashboard_text(title: &str, description: &str, category: Category) -> String {
    format!("{} {} {}", title, description, category)
}

/// Embedding for a dashboard's current title, description and category.
pub fn vectorize_dashboard(title: &str, description: &str, category: Category) -> Vec<f64> {
    vectorize(&dashboard_text(title, description, category))
}

pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub(crate) fn normalize(mut vector: Vec<f64>) -> Vec<f64> {
    let norm = l2_norm(&vector);
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
    vector
}
