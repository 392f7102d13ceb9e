use serde::{Deserialize, Serialize};

use crate::dashboards::{self, Category};

use super::errors::AppError;

pub trait AppBackend: Send + Sync {
    /// Every dashboard, or those whose title or description contains
    /// `keyword` (case-insensitive).
    fn list(&self, keyword: Option<&str>) -> Result<Vec<dashboards::Dashboard>, AppError>;
    fn by_category(&self, category: Category) -> Result<Vec<dashboards::Dashboard>, AppError>;
    fn featured(&self, limit: Option<usize>) -> Result<Vec<dashboards::Dashboard>, AppError>;
    fn recent(&self, limit: Option<usize>) -> Result<Vec<dashboards::Dashboard>, AppError>;
    fn favorites(&self) -> Result<Vec<dashboards::Dashboard>, AppError>;
    fn total(&self) -> Result<usize, AppError>;

    /// Open a dashboard: bumps its view counter and records it as recently
    /// viewed.
    fn view(&self, id: u64) -> Result<DashboardDetail, AppError>;

    fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchResult>, AppError>;

    fn create(
        &self,
        dashboard_create: dashboards::DashboardCreate,
    ) -> Result<dashboards::Dashboard, AppError>;
    fn update(
        &self,
        id: u64,
        dashboard_update: dashboards::DashboardUpdate,
    ) -> Result<dashboards::Dashboard, AppError>;
    fn delete(&self, id: u64) -> Result<(), AppError>;

    fn add_favorite(&self, dashboard_id: u64) -> Result<dashboards::Favorite, AppError>;
    fn remove_favorite(&self, dashboard_id: u64) -> Result<(), AppError>;

    /// Compute embeddings for every dashboard that lacks one. Returns how
    /// many were computed.
    fn initialize_embeddings(&self) -> Result<usize, AppError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDetail {
    #[serde(flatten)]
    pub dashboard: dashboards::Dashboard,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub dashboard: dashboards::Dashboard,
    pub similarity: f64,
}
