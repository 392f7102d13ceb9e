use clap::{Parser, Subcommand};

mod handlers;

pub use handlers::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the dashboard catalog as a service.
    Daemon {
        /// Address to listen on. Overrides `listen_addr` from config.
        #[clap(short, long)]
        addr: Option<String>,
    },

    /// Rank dashboards by similarity to a free-text query
    Search {
        query: String,

        /// Max number of results
        #[clap(short, long)]
        limit: Option<usize>,
    },

    /// List dashboards
    List {
        /// One of: data, business, ecom, strategy
        #[clap(short, long)]
        category: Option<String>,

        /// Only featured dashboards
        #[clap(short, long, default_value = "false")]
        featured: bool,

        /// Case-insensitive title/description filter
        #[clap(short, long)]
        keyword: Option<String>,
    },

    /// Show one dashboard. Counts as a view.
    Show { id: u64 },
}
