//! Sample catalog loaded on startup when `seed_sample_data` is on.

use rand::Rng;

use crate::dashboards::{BackendMemory, Category, DashboardCreate, DashboardManager};

/// How many of the seeded dashboards start out as recently viewed.
const SEED_RECENTS: usize = 4;

const SAMPLE_DASHBOARDS: [(&str, &str, Category, &str, &str, bool); 15] = [
    (
        "Sales Performance Dashboard",
        "Complete overview of sales metrics with real-time data",
        Category::Ecom,
        "https://images.unsplash.com/photo-1551288049-bebda4e38f71?auto=format&fit=crop&w=800&h=400",
        "Analytics Team",
        true,
    ),
    (
        "Financial KPIs Dashboard",
        "Track financial performance with interactive charts",
        Category::Business,
        "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=800&h=400",
        "Finance Department",
        true,
    ),
    (
        "Market Analysis Dashboard",
        "Competitive analysis and market positioning insights",
        Category::Strategy,
        "https://images.unsplash.com/photo-1543286386-713bdd548da4?auto=format&fit=crop&w=800&h=400",
        "Strategy Team",
        true,
    ),
    (
        "Customer Journey Dashboard",
        "Customer acquisition and retention metrics",
        Category::Ecom,
        "https://images.unsplash.com/photo-1559526324-593bc073d938?auto=format&fit=crop&w=800&h=400",
        "Marketing Team",
        false,
    ),
    (
        "Data Pipeline Status",
        "Real-time monitoring of data pipelines",
        Category::Data,
        "https://images.unsplash.com/photo-1504868584819-f8e8b4b6d7e3?auto=format&fit=crop&w=800&h=400",
        "Data Engineering",
        false,
    ),
    (
        "HR Performance Metrics",
        "Employee performance and engagement",
        Category::Business,
        "https://images.unsplash.com/photo-1573496130407-57329f01f769?auto=format&fit=crop&w=800&h=400",
        "HR Department",
        false,
    ),
    (
        "Growth Strategy Analytics",
        "Future growth projections and scenarios",
        Category::Strategy,
        "https://images.unsplash.com/photo-1522071820081-009f0129c71c?auto=format&fit=crop&w=800&h=400",
        "Executive Team",
        false,
    ),
    (
        "Data Quality Monitoring",
        "Track data quality metrics across all sources",
        Category::Data,
        "https://images.unsplash.com/photo-1551288049-bebda4e38f71?auto=format&fit=crop&w=800&h=400",
        "Data Governance",
        true,
    ),
    (
        "Executive Summary",
        "High-level business metrics for executive review",
        Category::Business,
        "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?auto=format&fit=crop&w=800&h=400",
        "Business Intelligence",
        true,
    ),
    (
        "Conversion Funnel Analysis",
        "Detailed breakdown of customer conversion funnel",
        Category::Ecom,
        "https://images.unsplash.com/photo-1533750349088-cd871a92f312?auto=format&fit=crop&w=800&h=400",
        "Digital Marketing",
        false,
    ),
    (
        "Competitor Benchmark",
        "Market position relative to key competitors",
        Category::Strategy,
        "https://images.unsplash.com/photo-1572025442646-866d16c84a54?auto=format&fit=crop&w=800&h=400",
        "Competitive Intelligence",
        false,
    ),
    (
        "ETL Pipeline Monitoring",
        "Real-time status of data integration processes",
        Category::Data,
        "https://images.unsplash.com/photo-1520869562399-e772f042f422?auto=format&fit=crop&w=800&h=400",
        "Data Engineering",
        false,
    ),
    (
        "Revenue Forecast",
        "Projected revenue based on historical trends",
        Category::Business,
        "https://images.unsplash.com/photo-1543286386-2e659306cd6c?auto=format&fit=crop&w=800&h=400",
        "Finance Team",
        false,
    ),
    (
        "Product Performance",
        "Sales metrics by product category and SKU",
        Category::Ecom,
        "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?auto=format&fit=crop&w=800&h=400",
        "Product Management",
        false,
    ),
    (
        "Market Expansion",
        "Analysis of potential new market opportunities",
        Category::Strategy,
        "https://images.unsplash.com/photo-1507679799987-c73779587ccf?auto=format&fit=crop&w=800&h=400",
        "Growth Team",
        false,
    ),
];

/// Fill `mgr` with the sample dashboards.
///
/// View counts are random in `[1000, 6000)`, the first four become recents
/// and every third one a favorite. Embeddings are left for the startup sweep.
pub fn seed_sample_dashboards(mgr: &BackendMemory) -> anyhow::Result<usize> {
    let mut rng = rand::rng();

    for (idx, (title, description, category, image_url, created_by, is_featured)) in
        SAMPLE_DASHBOARDS.into_iter().enumerate()
    {
        let dashboard = mgr.create(DashboardCreate {
            title: title.to_string(),
            description: description.to_string(),
            category,
            image_url: image_url.to_string(),
            created_by: created_by.to_string(),
            is_featured,
        })?;

        mgr.set_views(dashboard.id, rng.random_range(1000..6000))?;

        if idx < SEED_RECENTS {
            mgr.add_recent(dashboard.id)?;
        }
        if idx % 3 == 0 {
            mgr.add_favorite(dashboard.id)?;
        }
    }

    log::info!("seeded {} sample dashboards", SAMPLE_DASHBOARDS.len());

    Ok(SAMPLE_DASHBOARDS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sample_dashboards() {
        let mgr = BackendMemory::new();
        assert_eq!(seed_sample_dashboards(&mgr).unwrap(), 15);

        let dashboards = mgr.list().unwrap();
        assert_eq!(dashboards.len(), 15);
        assert!(dashboards
            .iter()
            .all(|d| (1000..6000).contains(&d.views) && d.embedding.is_none()));

        assert_eq!(mgr.recent(10).unwrap().len(), SEED_RECENTS);
        // indexes 0, 3, 6, 9, 12
        assert_eq!(mgr.favorites().unwrap().len(), 5);
        assert!(mgr.is_favorite(1).unwrap());
        assert!(!mgr.is_favorite(2).unwrap());

        for category in Category::ALL {
            assert!(!mgr.by_category(category).unwrap().is_empty());
        }
    }
}
