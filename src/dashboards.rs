use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    str::FromStr,
    sync::{Arc, RwLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Data,
    Business,
    Ecom,
    Strategy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Data,
        Category::Business,
        Category::Ecom,
        Category::Strategy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Business => "business",
            Category::Ecom => "ecom",
            Category::Strategy => "strategy",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| anyhow!("unknown category {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: u64,

    pub title: String,
    pub description: String,
    pub category: Category,
    pub image_url: String,
    pub created_by: String,

    pub views: u64,
    pub is_featured: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Bag-of-words vector of the current title, description and category.
    /// Stored as JSON text, `null` until computed.
    #[serde(rename = "embeddings", default, with = "embedding_text")]
    pub embedding: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCreate {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub image_url: String,
    pub created_by: String,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

impl DashboardUpdate {
    /// Whether applying this update changes the text an embedding is built from.
    pub fn touches_text(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.category.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentView {
    pub id: u64,
    pub dashboard_id: u64,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: u64,
    pub dashboard_id: u64,
}

/// Result of a favorite toggle, decided under one catalog lock.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteChange<T> {
    /// No dashboard with that id.
    Missing,
    /// Already in the requested state.
    Unchanged,
    Changed(T),
}

/// Row of the bulk embedding accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRow {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub embedding: Option<Vec<f64>>,
}

/// Owner of the catalog state.
///
/// Lookups of unknown ids return `None`; the caller decides whether that is
/// an error. Embeddings are never computed here: updates that change text
/// only clear them.
pub trait DashboardManager: Send + Sync {
    fn list(&self) -> anyhow::Result<Vec<Dashboard>>;
    fn get(&self, id: u64) -> anyhow::Result<Option<Dashboard>>;
    fn by_category(&self, category: Category) -> anyhow::Result<Vec<Dashboard>>;
    fn featured(&self, limit: usize) -> anyhow::Result<Vec<Dashboard>>;
    fn keyword_search(&self, keyword: &str) -> anyhow::Result<Vec<Dashboard>>;
    fn total(&self) -> anyhow::Result<usize>;

    fn create(&self, create: DashboardCreate) -> anyhow::Result<Dashboard>;
    fn update(&self, id: u64, update: DashboardUpdate) -> anyhow::Result<Option<Dashboard>>;
    fn delete(&self, id: u64) -> anyhow::Result<bool>;
    fn increment_views(&self, id: u64) -> anyhow::Result<Option<Dashboard>>;

    fn embeddings(&self) -> anyhow::Result<Vec<EmbeddingRow>>;
    fn update_embedding(&self, id: u64, embedding: Vec<f64>) -> anyhow::Result<Option<Dashboard>>;

    fn recent(&self, limit: usize) -> anyhow::Result<Vec<Dashboard>>;
    fn add_recent(&self, dashboard_id: u64) -> anyhow::Result<RecentView>;

    fn favorites(&self) -> anyhow::Result<Vec<Dashboard>>;
    fn add_favorite(&self, dashboard_id: u64) -> anyhow::Result<FavoriteChange<Favorite>>;
    fn remove_favorite(&self, dashboard_id: u64) -> anyhow::Result<FavoriteChange<()>>;
    fn is_favorite(&self, dashboard_id: u64) -> anyhow::Result<bool>;
}

#[derive(Debug)]
struct Catalog {
    /// Ordered by id, which is also creation order.
    dashboards: BTreeMap<u64, Dashboard>,
    recents: Vec<RecentView>,
    favorites: HashSet<u64>,

    next_dashboard_id: u64,
    next_recent_id: u64,
    next_favorite_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            dashboards: BTreeMap::new(),
            recents: Vec::new(),
            favorites: HashSet::new(),
            next_dashboard_id: 1,
            next_recent_id: 1,
            next_favorite_id: 1,
        }
    }
}

/// Process-lifetime in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct BackendMemory {
    catalog: Arc<RwLock<Catalog>>,
}

impl BackendMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> anyhow::Result<std::sync::RwLockReadGuard<'_, Catalog>> {
        self.catalog
            .read()
            .map_err(|err| anyhow!("catalog lock poisoned: {err}"))
    }

    fn write(&self) -> anyhow::Result<std::sync::RwLockWriteGuard<'_, Catalog>> {
        self.catalog
            .write()
            .map_err(|err| anyhow!("catalog lock poisoned: {err}"))
    }

    /// Overwrite the view counter. Used when seeding the sample catalog.
    pub fn set_views(&self, id: u64, views: u64) -> anyhow::Result<Option<Dashboard>> {
        let mut catalog = self.write()?;
        Ok(catalog.dashboards.get_mut(&id).map(|dashboard| {
            dashboard.views = views;
            dashboard.clone()
        }))
    }
}

impl DashboardManager for BackendMemory {
    fn list(&self) -> anyhow::Result<Vec<Dashboard>> {
        Ok(self.read()?.dashboards.values().cloned().collect())
    }

    fn get(&self, id: u64) -> anyhow::Result<Option<Dashboard>> {
        Ok(self.read()?.dashboards.get(&id).cloned())
    }

    fn by_category(&self, category: Category) -> anyhow::Result<Vec<Dashboard>> {
        Ok(self
            .read()?
            .dashboards
            .values()
            .filter(|dashboard| dashboard.category == category)
            .cloned()
            .collect())
    }

    fn featured(&self, limit: usize) -> anyhow::Result<Vec<Dashboard>> {
        let mut featured = self
            .read()?
            .dashboards
            .values()
            .filter(|dashboard| dashboard.is_featured)
            .cloned()
            .collect::<Vec<_>>();

        featured.sort_by(|a, b| b.views.cmp(&a.views));
        featured.truncate(limit);

        Ok(featured)
    }

    fn keyword_search(&self, keyword: &str) -> anyhow::Result<Vec<Dashboard>> {
        let keyword = keyword.to_lowercase();

        Ok(self
            .read()?
            .dashboards
            .values()
            .filter(|dashboard| {
                dashboard.title.to_lowercase().contains(&keyword)
                    || dashboard.description.to_lowercase().contains(&keyword)
            })
            .cloned()
            .collect())
    }

    fn total(&self) -> anyhow::Result<usize> {
        Ok(self.read()?.dashboards.len())
    }

    fn create(&self, create: DashboardCreate) -> anyhow::Result<Dashboard> {
        let mut catalog = self.write()?;

        let id = catalog.next_dashboard_id;
        catalog.next_dashboard_id += 1;

        let now = Utc::now();
        let dashboard = Dashboard {
            id,
            title: create.title,
            description: create.description,
            category: create.category,
            image_url: create.image_url,
            created_by: create.created_by,
            views: 0,
            is_featured: create.is_featured,
            created_at: now,
            updated_at: now,
            embedding: None,
        };

        catalog.dashboards.insert(id, dashboard.clone());

        Ok(dashboard)
    }

    fn update(&self, id: u64, update: DashboardUpdate) -> anyhow::Result<Option<Dashboard>> {
        let mut catalog = self.write()?;

        let Some(dashboard) = catalog.dashboards.get_mut(&id) else {
            return Ok(None);
        };

        // stale until the caller recomputes it
        if update.touches_text() {
            dashboard.embedding = None;
        }

        if let Some(title) = update.title {
            dashboard.title = title;
        }
        if let Some(description) = update.description {
            dashboard.description = description;
        }
        if let Some(category) = update.category {
            dashboard.category = category;
        }
        if let Some(image_url) = update.image_url {
            dashboard.image_url = image_url;
        }
        if let Some(created_by) = update.created_by {
            dashboard.created_by = created_by;
        }
        if let Some(is_featured) = update.is_featured {
            dashboard.is_featured = is_featured;
        }

        dashboard.updated_at = Utc::now();

        Ok(Some(dashboard.clone()))
    }

    fn delete(&self, id: u64) -> anyhow::Result<bool> {
        // recents and favorites keep the id; readers skip it
        Ok(self.write()?.dashboards.remove(&id).is_some())
    }

    fn increment_views(&self, id: u64) -> anyhow::Result<Option<Dashboard>> {
        let mut catalog = self.write()?;

        Ok(catalog.dashboards.get_mut(&id).map(|dashboard| {
            dashboard.views += 1;
            dashboard.updated_at = Utc::now();
            dashboard.clone()
        }))
    }

    fn embeddings(&self) -> anyhow::Result<Vec<EmbeddingRow>> {
        Ok(self
            .read()?
            .dashboards
            .values()
            .map(|dashboard| EmbeddingRow {
                id: dashboard.id,
                title: dashboard.title.clone(),
                description: dashboard.description.clone(),
                category: dashboard.category,
                embedding: dashboard.embedding.clone(),
            })
            .collect())
    }

    fn update_embedding(&self, id: u64, embedding: Vec<f64>) -> anyhow::Result<Option<Dashboard>> {
        let mut catalog = self.write()?;

        Ok(catalog.dashboards.get_mut(&id).map(|dashboard| {
            dashboard.embedding = Some(embedding);
            dashboard.updated_at = Utc::now();
            dashboard.clone()
        }))
    }

    fn recent(&self, limit: usize) -> anyhow::Result<Vec<Dashboard>> {
        let catalog = self.read()?;

        // later entries win ties on the timestamp
        let mut recents = catalog.recents.iter().rev().collect::<Vec<_>>();
        recents.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

        Ok(recents
            .into_iter()
            .filter_map(|recent| catalog.dashboards.get(&recent.dashboard_id))
            .take(limit)
            .cloned()
            .collect())
    }

    fn add_recent(&self, dashboard_id: u64) -> anyhow::Result<RecentView> {
        let mut catalog = self.write()?;

        let id = catalog.next_recent_id;
        catalog.next_recent_id += 1;

        catalog
            .recents
            .retain(|recent| recent.dashboard_id != dashboard_id);

        let recent = RecentView {
            id,
            dashboard_id,
            viewed_at: Utc::now(),
        };
        catalog.recents.push(recent.clone());

        Ok(recent)
    }

    fn favorites(&self) -> anyhow::Result<Vec<Dashboard>> {
        let catalog = self.read()?;

        Ok(catalog
            .dashboards
            .values()
            .filter(|dashboard| catalog.favorites.contains(&dashboard.id))
            .cloned()
            .collect())
    }

    fn add_favorite(&self, dashboard_id: u64) -> anyhow::Result<FavoriteChange<Favorite>> {
        let mut catalog = self.write()?;

        if !catalog.dashboards.contains_key(&dashboard_id) {
            return Ok(FavoriteChange::Missing);
        }
        if !catalog.favorites.insert(dashboard_id) {
            return Ok(FavoriteChange::Unchanged);
        }

        let id = catalog.next_favorite_id;
        catalog.next_favorite_id += 1;

        Ok(FavoriteChange::Changed(Favorite { id, dashboard_id }))
    }

    fn remove_favorite(&self, dashboard_id: u64) -> anyhow::Result<FavoriteChange<()>> {
        let mut catalog = self.write()?;

        if !catalog.dashboards.contains_key(&dashboard_id) {
            return Ok(FavoriteChange::Missing);
        }
        if !catalog.favorites.remove(&dashboard_id) {
            return Ok(FavoriteChange::Unchanged);
        }

        Ok(FavoriteChange::Changed(()))
    }

    fn is_favorite(&self, dashboard_id: u64) -> anyhow::Result<bool> {
        Ok(self.read()?.favorites.contains(&dashboard_id))
    }
}

/// Serde adapter storing an embedding as a JSON array string.
mod embedding_text {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        embedding: &Option<Vec<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match embedding {
            Some(embedding) => {
                let text = serde_json::to_string(embedding).map_err(S::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<f64>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|text| serde_json::from_str(&text).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, category: Category) -> DashboardCreate {
        DashboardCreate {
            title: title.to_string(),
            description: format!("{title} description"),
            category,
            image_url: "https://example.com/cover.png".to_string(),
            created_by: "Analytics Team".to_string(),
            is_featured: false,
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("ecom".parse::<Category>().unwrap(), Category::Ecom);
        assert_eq!(Category::Strategy.to_string(), "strategy");
        assert!("Ecom".parse::<Category>().is_err());
        assert!("finance".parse::<Category>().is_err());
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mgr = BackendMemory::new();
        let first = mgr.create(sample("First", Category::Data)).unwrap();
        let second = mgr.create(sample("Second", Category::Data)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.views, 0);
        assert!(first.embedding.is_none());
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mgr = BackendMemory::new();
        let first = mgr.create(sample("First", Category::Data)).unwrap();
        assert!(mgr.delete(first.id).unwrap());
        assert!(!mgr.delete(first.id).unwrap());

        let second = mgr.create(sample("Second", Category::Data)).unwrap();
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_update_text_clears_embedding() {
        let mgr = BackendMemory::new();
        let dashboard = mgr.create(sample("Revenue", Category::Business)).unwrap();
        mgr.update_embedding(dashboard.id, vec![1.0]).unwrap();

        let updated = mgr
            .update(
                dashboard.id,
                DashboardUpdate {
                    is_featured: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(updated.is_featured);
        assert_eq!(updated.embedding, Some(vec![1.0]));

        let updated = mgr
            .update(
                dashboard.id,
                DashboardUpdate {
                    title: Some("Revenue Forecast".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Revenue Forecast");
        assert!(updated.embedding.is_none());
    }

    #[test]
    fn test_update_missing() {
        let mgr = BackendMemory::new();
        assert!(mgr.update(42, DashboardUpdate::default()).unwrap().is_none());
        assert!(mgr.increment_views(42).unwrap().is_none());
        assert!(mgr.update_embedding(42, vec![]).unwrap().is_none());
    }

    #[test]
    fn test_featured_sorted_by_views() {
        let mgr = BackendMemory::new();
        for (idx, views) in [10, 300, 20, 5000].into_iter().enumerate() {
            let mut create = sample(&format!("Board {idx}"), Category::Data);
            create.is_featured = idx != 2;
            let dashboard = mgr.create(create).unwrap();
            mgr.set_views(dashboard.id, views).unwrap();
        }

        let featured = mgr.featured(2).unwrap();
        let views = featured.iter().map(|d| d.views).collect::<Vec<_>>();
        assert_eq!(views, vec![5000, 300]);

        assert_eq!(mgr.featured(10).unwrap().len(), 3);
    }

    #[test]
    fn test_keyword_search_is_case_insensitive() {
        let mgr = BackendMemory::new();
        mgr.create(sample("Sales Performance", Category::Ecom)).unwrap();
        mgr.create(sample("Data Quality", Category::Data)).unwrap();

        let results = mgr.keyword_search("SALES").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Sales Performance");

        // matches the description too
        assert_eq!(mgr.keyword_search("quality description").unwrap().len(), 1);
    }

    #[test]
    fn test_recent_deduplicates_and_orders() {
        let mgr = BackendMemory::new();
        for title in ["One", "Two", "Three"] {
            mgr.create(sample(title, Category::Strategy)).unwrap();
        }

        mgr.add_recent(1).unwrap();
        mgr.add_recent(2).unwrap();
        mgr.add_recent(3).unwrap();
        mgr.add_recent(1).unwrap();

        let ids = mgr
            .recent(10)
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3, 2]);

        assert_eq!(mgr.recent(2).unwrap().len(), 2);
    }

    #[test]
    fn test_dangling_references_are_skipped() {
        let mgr = BackendMemory::new();
        let a = mgr.create(sample("A", Category::Data)).unwrap();
        let b = mgr.create(sample("B", Category::Data)).unwrap();
        mgr.add_recent(a.id).unwrap();
        mgr.add_recent(b.id).unwrap();
        mgr.add_favorite(a.id).unwrap();
        mgr.add_favorite(b.id).unwrap();

        mgr.delete(a.id).unwrap();

        let ids = |dashboards: Vec<Dashboard>| dashboards.iter().map(|d| d.id).collect::<Vec<_>>();
        assert_eq!(ids(mgr.recent(10).unwrap()), vec![b.id]);
        assert_eq!(ids(mgr.favorites().unwrap()), vec![b.id]);
        assert!(mgr.is_favorite(a.id).unwrap());
    }

    #[test]
    fn test_favorites() {
        let mgr = BackendMemory::new();
        let dashboard = mgr.create(sample("A", Category::Data)).unwrap();

        assert_eq!(
            mgr.add_favorite(dashboard.id).unwrap(),
            FavoriteChange::Changed(Favorite {
                id: 1,
                dashboard_id: dashboard.id
            })
        );
        assert!(mgr.is_favorite(dashboard.id).unwrap());
        assert_eq!(
            mgr.add_favorite(dashboard.id).unwrap(),
            FavoriteChange::Unchanged
        );

        assert_eq!(
            mgr.remove_favorite(dashboard.id).unwrap(),
            FavoriteChange::Changed(())
        );
        assert_eq!(
            mgr.remove_favorite(dashboard.id).unwrap(),
            FavoriteChange::Unchanged
        );
        assert!(!mgr.is_favorite(dashboard.id).unwrap());

        assert_eq!(mgr.add_favorite(99).unwrap(), FavoriteChange::Missing);
        assert_eq!(mgr.remove_favorite(99).unwrap(), FavoriteChange::Missing);

        // ids are only spent on real inserts
        assert_eq!(
            mgr.add_favorite(dashboard.id).unwrap(),
            FavoriteChange::Changed(Favorite {
                id: 2,
                dashboard_id: dashboard.id
            })
        );
    }

    #[test]
    fn test_embedding_serialized_as_text() {
        let mgr = BackendMemory::new();
        let dashboard = mgr.create(sample("A", Category::Data)).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json["embeddings"].is_null());
        assert_eq!(json["imageUrl"], "https://example.com/cover.png");
        assert_eq!(json["category"], "data");

        let dashboard = mgr
            .update_embedding(dashboard.id, vec![0.6, 0.8])
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["embeddings"], "[0.6,0.8]");

        let back: Dashboard = serde_json::from_value(json).unwrap();
        assert_eq!(back.embedding, Some(vec![0.6, 0.8]));
    }
}
