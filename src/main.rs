use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

mod app;
mod cli;
mod config;
mod dashboards;
mod seed;
mod semantic;
mod storage;
#[cfg(test)]
mod tests;
mod web;

use app::AppFactory;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = cli::Args::parse();

    let base_path = AppFactory::get_base_path()?;
    let config = AppFactory::create_config(&base_path)?;
    let app_mgr = AppFactory::create_local_app(config)?;

    match args.command {
        cli::Command::Daemon { addr } => {
            let addr = addr.unwrap_or_else(|| app_mgr.config().listen_addr.clone());
            web::start_daemon(Arc::new(app_mgr), &addr)
        }
        cli::Command::Search { query, limit } => cli::handle_search(&query, limit, &app_mgr),
        cli::Command::List {
            category,
            featured,
            keyword,
        } => cli::handle_list(category, featured, keyword, &app_mgr),
        cli::Command::Show { id } => cli::handle_show(id, &app_mgr),
    }
}
