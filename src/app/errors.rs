#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("dashboard not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dashboard {0} is already in favorites")]
    AlreadyFavorite(u64),

    #[error("dashboard {0} is not in favorites")]
    NotFavorite(u64),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}
