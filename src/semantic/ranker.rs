//! Cosine similarity ranking.
//!
//! Vectors coming from [`super::vectorize`] have per-text dimensions, so
//! [`similarity`] pads the shorter operand with zeros before comparing. The
//! padding keeps the arithmetic well defined but the coordinates of two local
//! vocabularies do not line up; scores are a local comparison only.

use serde::Serialize;

use super::vectorizer::{l2_norm, vectorize};
use super::Vocabulary;

/// A ranked match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: u64,
    pub similarity: f64,
}

/// Something that can be ranked against a query.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: u64,
    /// Source text of the embedding; only read in global vocabulary mode.
    pub text: &'a str,
    pub embedding: Option<&'a [f64]>,
}

/// Cosine similarity of two vectors, zero-padding the shorter one.
///
/// Returns 0 when either vector has zero norm.
pub fn similarity(a: &[f64], b: &[f64]) -> f64 {
    // missing trailing components are zeros and add nothing to the dot product
    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Rank candidates against `query` using their stored embeddings.
///
/// Candidates without an embedding are skipped. The sort is stable, so equal
/// scores keep candidate order.
pub fn rank_top_k(query: &str, candidates: &[Candidate<'_>], k: usize) -> Vec<SearchHit> {
    let query_vector = vectorize(query);

    let hits = candidates
        .iter()
        .filter_map(|candidate| {
            candidate.embedding.map(|embedding| SearchHit {
                id: candidate.id,
                similarity: similarity(&query_vector, embedding),
            })
        })
        .collect();

    top_k(hits, k)
}

/// Rank candidates against `query` over one vocabulary fit on the candidate
/// texts.
///
/// Stored embeddings are only used as an eligibility marker: a candidate
/// without one is skipped exactly like in [`rank_top_k`].
pub fn rank_top_k_global(query: &str, candidates: &[Candidate<'_>], k: usize) -> Vec<SearchHit> {
    let eligible: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.embedding.is_some())
        .collect();

    let vocabulary = Vocabulary::fit(eligible.iter().map(|candidate| candidate.text));
    let query_vector = vocabulary.vectorize(query);

    let hits = eligible
        .iter()
        .map(|candidate| SearchHit {
            id: candidate.id,
            similarity: similarity(&query_vector, &vocabulary.vectorize(candidate.text)),
        })
        .collect();

    top_k(hits, k)
}

fn top_k(mut hits: Vec<SearchHit>, k: usize) -> Vec<SearchHit> {
    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(k);
    hits
}
