use crate::{
    semantic::VocabularyMode,
    storage::{self, StorageManager},
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default number of search results
const DEFAULT_SEARCH_LIMIT: usize = 5;
/// Upper bound for a caller-supplied search limit
const DEFAULT_SEARCH_MAX_LIMIT: usize = 100;
const DEFAULT_FEATURED_LIMIT: usize = 3;
const DEFAULT_RECENT_LIMIT: usize = 4;

const CONFIG_FILE: &str = "config.yaml";

/// Configuration for similarity search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Vocabulary used to compare a query with dashboards: "local" or "global"
    #[serde(default)]
    pub vocabulary: VocabularyMode,

    /// Results returned when the request does not carry a limit
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,

    /// Requested limits are clamped to this value
    #[serde(default = "default_search_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyMode::default(),
            default_limit: DEFAULT_SEARCH_LIMIT,
            max_limit: DEFAULT_SEARCH_MAX_LIMIT,
        }
    }
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_search_max_limit() -> usize {
    DEFAULT_SEARCH_MAX_LIMIT
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Fill the catalog with the sample dashboards on startup
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,

    #[serde(default = "default_featured_limit")]
    pub featured_limit: usize,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            seed_sample_data: default_seed_sample_data(),
            featured_limit: default_featured_limit(),
            recent_limit: default_recent_limit(),
            search: SearchConfig::default(),
            base_path: String::new(),
        }
    }
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_featured_limit() -> usize {
    DEFAULT_FEATURED_LIMIT
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("listen_addr is not a socket address: {}", self.listen_addr))?;

        if self.featured_limit == 0 {
            bail!("featured_limit must be greater than 0");
        }
        if self.recent_limit == 0 {
            bail!("recent_limit must be greater than 0");
        }

        let search = &self.search;
        if search.default_limit == 0 {
            bail!("search.default_limit must be greater than 0");
        }
        if search.default_limit > search.max_limit {
            bail!(
                "search.default_limit ({}) must not exceed search.max_limit ({})",
                search.default_limit,
                search.max_limit
            );
        }

        Ok(())
    }

    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path)
            .with_context(|| format!("failed to create {base_path}"))?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            log::info!("writing default config to {base_path}/{CONFIG_FILE}");
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.to_string();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}
