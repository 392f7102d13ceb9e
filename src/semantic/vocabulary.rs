//! Corpus-wide vocabulary.
//!
//! Fits one term dictionary over a set of texts so every vector shares the
//! same coordinate space. Used by [`super::VocabularyMode::Global`]; the
//! default local mode never builds one.

use std::collections::HashMap;

use super::vectorizer::{normalize, tokenize};

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// term -> dimension
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from the tokens of every text, in order of first
    /// appearance across the corpus.
    pub fn fit<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocabulary = Self::default();
        for text in texts {
            for token in tokenize(text) {
                vocabulary.add(token);
            }
        }
        vocabulary
    }

    fn add(&mut self, term: String) {
        if !self.index.contains_key(&term) {
            self.index.insert(term.clone(), self.terms.len());
            self.terms.push(term);
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Term-frequency vector over this vocabulary, L2-normalized.
    ///
    /// Tokens outside the vocabulary are ignored; the result always has
    /// `self.len()` dimensions.
    pub fn vectorize(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];
        for token in tokenize(text) {
            if let Some(&slot) = self.index.get(&token) {
                vector[slot] += 1.0;
            }
        }
        normalize(vector)
    }
}
