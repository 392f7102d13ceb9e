pub mod backend;
pub mod errors;
pub mod factory;
pub mod local;

pub use backend::{AppBackend, DashboardDetail, SearchResult};
pub use errors::AppError;
pub use factory::AppFactory;
pub use local::AppLocal;
