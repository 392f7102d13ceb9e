use crate::{app::AppBackend, dashboards::Category};
use anyhow::{Context, Result};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

pub fn handle_search(query: &str, limit: Option<usize>, app: &dyn AppBackend) -> Result<()> {
    let results = app.search(query, limit)?;
    print_json(&results)
}

pub fn handle_list(
    category: Option<String>,
    featured: bool,
    keyword: Option<String>,
    app: &dyn AppBackend,
) -> Result<()> {
    let dashboards = match (category, featured) {
        (Some(category), _) => {
            let category = category.parse::<Category>()?;
            app.by_category(category)?
        }
        (None, true) => app.featured(None)?,
        (None, false) => app.list(keyword.as_deref())?,
    };

    print_json(&dashboards)
}

pub fn handle_show(id: u64, app: &dyn AppBackend) -> Result<()> {
    let detail = app.view(id)?;
    print_json(&detail)
}
