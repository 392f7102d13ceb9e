use crate::{
    app::{backend::AppBackend, local::AppLocal},
    config::Config,
    dashboards::BackendMemory,
    seed,
};
use anyhow::{anyhow, Context, Result};
use homedir::my_home;
use std::sync::Arc;

/// Application factory for creating and configuring application components
pub struct AppFactory;

impl AppFactory {
    /// Build the catalog from config: seed the sample dashboards when enabled
    /// and compute every missing embedding before returning.
    pub fn create_local_app(config: Config) -> Result<AppLocal> {
        log::debug!("base path: {}", config.base_path());

        let dashboard_mgr = BackendMemory::new();

        if config.seed_sample_data {
            seed::seed_sample_dashboards(&dashboard_mgr)?;
        }

        let app = AppLocal::new(config, Arc::new(dashboard_mgr));

        let computed = app.initialize_embeddings()?;
        log::info!("embeddings initialized for {computed} dashboards");

        Ok(app)
    }

    /// Create configuration with validation
    pub fn create_config(base_path: &str) -> Result<Config> {
        Config::load_with(base_path)
            .with_context(|| format!("failed to load config from {base_path}"))
    }

    /// Get the base path for the application
    pub fn get_base_path() -> Result<String> {
        if let Ok(base_path) = std::env::var("DASHCAT_BASE_PATH") {
            return Ok(base_path);
        }

        let home = my_home()
            .context("could not determine home directory")?
            .ok_or_else(|| anyhow!("home directory path is empty"))?;

        Ok(format!("{}/.local/share/dashcat", home.to_string_lossy()))
    }
}
