use crate::{
    app::{AppBackend, AppError, DashboardDetail, SearchResult},
    dashboards::{Category, Dashboard, DashboardCreate, DashboardUpdate, Favorite},
};
use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    app: Arc<dyn AppBackend>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("shutting down");
}

pub fn router(app: Arc<dyn AppBackend>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboards", get(list).post(create))
        .route("/api/dashboards/featured", get(featured))
        .route("/api/dashboards/recent", get(recent))
        .route("/api/dashboards/favorites", get(favorites))
        .route("/api/dashboards/favorite", post(add_favorite))
        .route("/api/dashboards/favorite/:id", delete(remove_favorite))
        .route("/api/dashboards/search", post(search))
        .route("/api/dashboards/category/:category", get(by_category))
        .route(
            "/api/dashboards/:id",
            get(view).put(update).delete(delete_dashboard),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: Arc<dyn AppBackend>, addr: &str) -> anyhow::Result<()> {
    let router = router(app);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

pub fn start_daemon(app: Arc<dyn AppBackend>, addr: &str) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(start_app(app, addr))
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) | AppError::AlreadyFavorite(_) | AppError::NotFavorite(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Other(_) => {
                log::error!("{self:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

// Lets handlers use `?` on anything that converts into `AppError`.
impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn parse_id(raw: &str) -> Result<u64, HttpError> {
    raw.parse::<u64>()
        .map_err(|_| HttpError(AppError::InvalidInput(format!("invalid dashboard id {raw:?}"))))
}

fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|err| HttpError(AppError::InvalidInput(err.body_text())))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter over title and description
    pub q: Option<String>,
}

async fn list(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Dashboard>>, HttpError> {
    Ok(Json(state.app.list(query.q.as_deref())?))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

fn limit_param(query: Result<Query<LimitQuery>, QueryRejection>) -> Result<Option<usize>, HttpError> {
    query
        .map(|Query(query)| query.limit)
        .map_err(|err| HttpError(AppError::InvalidInput(err.body_text())))
}

async fn featured(
    State(state): State<Arc<SharedState>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<Dashboard>>, HttpError> {
    Ok(Json(state.app.featured(limit_param(query)?)?))
}

async fn recent(
    State(state): State<Arc<SharedState>>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> Result<Json<Vec<Dashboard>>, HttpError> {
    Ok(Json(state.app.recent(limit_param(query)?)?))
}

async fn favorites(
    State(state): State<Arc<SharedState>>,
) -> Result<Json<Vec<Dashboard>>, HttpError> {
    Ok(Json(state.app.favorites()?))
}

async fn by_category(
    State(state): State<Arc<SharedState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Dashboard>>, HttpError> {
    let category = category
        .parse::<Category>()
        .map_err(|_| HttpError(AppError::InvalidInput(format!("invalid category {category:?}"))))?;

    Ok(Json(state.app.by_category(category)?))
}

async fn view(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
) -> Result<Json<DashboardDetail>, HttpError> {
    let id = parse_id(&id)?;
    Ok(Json(state.app.view(id)?))
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub dashboards: Vec<SearchResult>,
}

async fn search(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, HttpError> {
    let payload = json_payload(payload)?;
    log::debug!("payload: {payload:?}");

    let dashboards = state.app.search(&payload.query, payload.limit)?;
    Ok(Json(SearchResponse { dashboards }))
}

async fn create(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<DashboardCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Dashboard>), HttpError> {
    let payload = json_payload(payload)?;
    log::debug!("payload: {payload:?}");

    let dashboard = state.app.create(payload)?;
    Ok((StatusCode::CREATED, Json(dashboard)))
}

async fn update(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
    payload: Result<Json<DashboardUpdate>, JsonRejection>,
) -> Result<Json<Dashboard>, HttpError> {
    let id = parse_id(&id)?;
    let payload = json_payload(payload)?;
    log::debug!("payload: {payload:?}");

    Ok(Json(state.app.update(id, payload)?))
}

async fn delete_dashboard(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let id = parse_id(&id)?;
    state.app.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub dashboard_id: u64,
}

async fn add_favorite(
    State(state): State<Arc<SharedState>>,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Favorite>), HttpError> {
    let payload = json_payload(payload)?;

    let favorite = state.app.add_favorite(payload.dashboard_id)?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

async fn remove_favorite(
    State(state): State<Arc<SharedState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let id = parse_id(&id)?;
    state.app.remove_favorite(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub dashboards: usize,
}

async fn health(State(state): State<Arc<SharedState>>) -> Result<Json<HealthResponse>, HttpError> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        dashboards: state.app.total()?,
    }))
}
