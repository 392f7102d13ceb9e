
use std::sync::Arc;

use crate::{
    app::AppLocal,
    config::Config,
    dashboards::{BackendMemory, Category, DashboardCreate},
    semantic::VocabularyMode,
};

/// An empty catalog with default limits.
pub fn create_app() -> AppLocal {
    create_app_with(VocabularyMode::Local)
}

pub fn create_app_with(vocabulary: VocabularyMode) -> AppLocal {
    let mut config = Config::default();
    config.seed_sample_data = false;
    config.search.vocabulary = vocabulary;

    AppLocal::new(config, Arc::new(BackendMemory::new()))
}

pub fn dashboard(title: &str, description: &str, category: Category) -> DashboardCreate {
    DashboardCreate {
        title: title.to_string(),
        description: description.to_string(),
        category,
        image_url: "https://example.com/cover.png".to_string(),
        created_by: "Analytics Team".to_string(),
        is_featured: false,
    }
}
