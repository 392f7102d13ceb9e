use crate::{
    config::Config,
    dashboards::{self, Category, DashboardManager, FavoriteChange},
    semantic::{dashboard_text, vectorize_dashboard, Candidate, SemanticSearchService},
};

use anyhow::anyhow;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{backend::*, errors::AppError};

pub struct AppLocal {
    pub dashboard_mgr: Arc<dyn DashboardManager>,
    search_service: SemanticSearchService,

    /// Serializes text changes with embedding writes so a sweep never stores
    /// a vector computed from text that was replaced in the meantime.
    embedding_lock: Mutex<()>,

    config: Config,
}

impl AppLocal {
    pub fn new(config: Config, dashboard_mgr: Arc<dyn DashboardManager>) -> Self {
        Self {
            dashboard_mgr,
            search_service: SemanticSearchService::new(config.search.clone()),
            embedding_lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn lock_embeddings(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.embedding_lock
            .lock()
            .map_err(|err| AppError::Other(anyhow!("embedding lock poisoned: {err}")))
    }

    /// Recompute and store the embedding of one dashboard from its current text.
    fn refresh_embedding(
        &self,
        dashboard: &dashboards::Dashboard,
    ) -> Result<dashboards::Dashboard, AppError> {
        let embedding =
            vectorize_dashboard(&dashboard.title, &dashboard.description, dashboard.category);

        self.dashboard_mgr
            .update_embedding(dashboard.id, embedding)?
            .ok_or(AppError::NotFound)
    }

}

impl AppBackend for AppLocal {
    fn list(&self, keyword: Option<&str>) -> Result<Vec<dashboards::Dashboard>, AppError> {
        match keyword.map(str::trim).filter(|keyword| !keyword.is_empty()) {
            Some(keyword) => Ok(self.dashboard_mgr.keyword_search(keyword)?),
            None => Ok(self.dashboard_mgr.list()?),
        }
    }

    fn by_category(&self, category: Category) -> Result<Vec<dashboards::Dashboard>, AppError> {
        Ok(self.dashboard_mgr.by_category(category)?)
    }

    fn featured(&self, limit: Option<usize>) -> Result<Vec<dashboards::Dashboard>, AppError> {
        let limit = limit.unwrap_or(self.config.featured_limit);
        Ok(self.dashboard_mgr.featured(limit)?)
    }

    fn recent(&self, limit: Option<usize>) -> Result<Vec<dashboards::Dashboard>, AppError> {
        let limit = limit.unwrap_or(self.config.recent_limit);
        Ok(self.dashboard_mgr.recent(limit)?)
    }

    fn favorites(&self) -> Result<Vec<dashboards::Dashboard>, AppError> {
        Ok(self.dashboard_mgr.favorites()?)
    }

    fn total(&self) -> Result<usize, AppError> {
        Ok(self.dashboard_mgr.total()?)
    }

    fn view(&self, id: u64) -> Result<DashboardDetail, AppError> {
        let dashboard = self
            .dashboard_mgr
            .increment_views(id)?
            .ok_or(AppError::NotFound)?;

        self.dashboard_mgr.add_recent(id)?;
        let is_favorite = self.dashboard_mgr.is_favorite(id)?;

        Ok(DashboardDetail {
            dashboard,
            is_favorite,
        })
    }

    fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }

        let mut rows = self.dashboard_mgr.embeddings()?;

        // dashboards created behind our back still get ranked
        if rows.iter().any(|row| row.embedding.is_none()) {
            let computed = self.initialize_embeddings()?;
            log::debug!("computed {computed} missing embeddings before search");
            rows = self.dashboard_mgr.embeddings()?;
        }
        let texts = rows
            .iter()
            .map(|row| dashboard_text(&row.title, &row.description, row.category))
            .collect::<Vec<_>>();
        let candidates = rows
            .iter()
            .zip(texts.iter())
            .map(|(row, text)| Candidate {
                id: row.id,
                text,
                embedding: row.embedding.as_deref(),
            })
            .collect::<Vec<_>>();

        let hits = self.search_service.search(query, &candidates, limit);

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            // deleted between ranking and lookup
            let Some(dashboard) = self.dashboard_mgr.get(hit.id)? else {
                continue;
            };
            results.push(SearchResult {
                dashboard,
                similarity: hit.similarity,
            });
        }

        Ok(results)
    }

    fn create(
        &self,
        dashboard_create: dashboards::DashboardCreate,
    ) -> Result<dashboards::Dashboard, AppError> {
        let _guard = self.lock_embeddings()?;

        let dashboard = self.dashboard_mgr.create(dashboard_create)?;
        let dashboard = self.refresh_embedding(&dashboard)?;

        log::info!("created dashboard {} {:?}", dashboard.id, dashboard.title);

        Ok(dashboard)
    }

    fn update(
        &self,
        id: u64,
        dashboard_update: dashboards::DashboardUpdate,
    ) -> Result<dashboards::Dashboard, AppError> {
        let _guard = self.lock_embeddings()?;

        let touches_text = dashboard_update.touches_text();
        let dashboard = self
            .dashboard_mgr
            .update(id, dashboard_update)?
            .ok_or(AppError::NotFound)?;

        if touches_text {
            log::debug!("text of dashboard {id} changed, recomputing embedding");
            return self.refresh_embedding(&dashboard);
        }

        Ok(dashboard)
    }

    fn delete(&self, id: u64) -> Result<(), AppError> {
        if !self.dashboard_mgr.delete(id)? {
            return Err(AppError::NotFound);
        }

        log::info!("deleted dashboard {id}");
        Ok(())
    }

    fn add_favorite(&self, dashboard_id: u64) -> Result<dashboards::Favorite, AppError> {
        match self.dashboard_mgr.add_favorite(dashboard_id)? {
            FavoriteChange::Changed(favorite) => Ok(favorite),
            FavoriteChange::Unchanged => Err(AppError::AlreadyFavorite(dashboard_id)),
            FavoriteChange::Missing => Err(AppError::NotFound),
        }
    }

    fn remove_favorite(&self, dashboard_id: u64) -> Result<(), AppError> {
        match self.dashboard_mgr.remove_favorite(dashboard_id)? {
            FavoriteChange::Changed(()) => Ok(()),
            FavoriteChange::Unchanged => Err(AppError::NotFavorite(dashboard_id)),
            FavoriteChange::Missing => Err(AppError::NotFound),
        }
    }

    fn initialize_embeddings(&self) -> Result<usize, AppError> {
        let _guard = self.lock_embeddings()?;

        let mut computed = 0;
        for row in self.dashboard_mgr.embeddings()? {
            if row.embedding.is_some() {
                continue;
            }

            let embedding = vectorize_dashboard(&row.title, &row.description, row.category);
            if self
                .dashboard_mgr
                .update_embedding(row.id, embedding)?
                .is_some()
            {
                computed += 1;
            }
        }

        Ok(computed)
    }
}
