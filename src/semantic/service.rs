//! Search service for dashboard similarity ranking.
//!
//! Wraps the ranker with the configured vocabulary mode and limits.

use crate::config::SearchConfig;
use crate::semantic::ranker::{rank_top_k, rank_top_k_global, Candidate, SearchHit};
use crate::semantic::VocabularyMode;

/// Service for ranking dashboards against a free-text query.
#[derive(Debug, Clone)]
pub struct SemanticSearchService {
    config: SearchConfig,
}

impl SemanticSearchService {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Limit to apply when the caller did not pass one, or passed one above
    /// the configured maximum.
    pub fn effective_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.config.default_limit)
            .min(self.config.max_limit)
    }

    /// Rank candidates against the query.
    ///
    /// # Returns
    /// At most `limit` hits (config default when `None`), highest similarity
    /// first.
    pub fn search(
        &self,
        query: &str,
        candidates: &[Candidate<'_>],
        limit: Option<usize>,
    ) -> Vec<SearchHit> {
        let limit = self.effective_limit(limit);

        let hits = match self.config.vocabulary {
            VocabularyMode::Local => rank_top_k(query, candidates, limit),
            VocabularyMode::Global => rank_top_k_global(query, candidates, limit),
        };

        log::debug!(
            "ranked {} candidates for {query:?}, {} hits ({:?} vocabulary)",
            candidates.len(),
            hits.len(),
            self.config.vocabulary
        );

        hits
    }
}
