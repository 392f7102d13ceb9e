//! Lexical similarity search for dashboards.
//!
//! # Architecture
//!
//! - `vectorizer`: tokenization and bag-of-words vectors over a local vocabulary
//! - `vocabulary`: corpus-wide vocabulary for the global mode
//! - `ranker`: cosine similarity with zero padding and top-k ranking
//! - `service`: ranking with the configured mode and limits
//!
//! # Vocabulary mode
//!
//! Stored embeddings are computed per text, so two embeddings do not share a
//! coordinate space and the ranker pads them to a common length. That is the
//! default ([`VocabularyMode::Local`]). [`VocabularyMode::Global`] instead fits
//! one vocabulary over all eligible dashboards at query time, which makes
//! scores comparable across items and changes the ranking.

mod ranker;
mod service;
mod vectorizer;
mod vocabulary;

use serde::{Deserialize, Serialize};

pub use ranker::{Candidate, SearchHit};
pub use service::SemanticSearchService;
pub use vectorizer::{dashboard_text, vectorize, vectorize_dashboard};
pub use vocabulary::Vocabulary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyMode {
    /// Per-text vocabulary, zero-padded comparison.
    #[default]
    Local,
    /// One vocabulary fit over the ranked dashboards.
    Global,
}
