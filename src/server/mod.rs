//! JSON REST API over the service layer.

mod error;
mod extract;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiPath, ApiQuery};

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// State shared by every handler. One connection, one caller at a time.
pub struct AppState {
    pub pool: Mutex<DbPool>,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Arc<Self> {
        Arc::new(Self {
            pool: Mutex::new(pool),
            config,
        })
    }

    /// Run one service call on the blocking pool while holding the connection.
    pub(crate) async fn call<T, F>(self: &Arc<Self>, f: F) -> ApiResult<T>
    where
        F: FnOnce(&DbPool, &Config) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        let result = tokio::task::spawn_blocking(move || {
            let pool = state
                .pool
                .lock()
                .map_err(|_| AppError::Other("database lock poisoned".to_string()))?;
            f(&pool, &state.config)
        })
        .await
        .map_err(|e| AppError::Other(format!("database task failed: {e}")))?;
        Ok(result?)
    }

    /// Request body limit for uploads: the decoded attachment limit in base64
    /// plus room for the other JSON fields.
    pub fn upload_body_limit(&self) -> usize {
        self.config.max_attachment_bytes.div_ceil(3) * 4 + 64 * 1024
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    use routes::*;

    let upload_limit = DefaultBodyLimit::max(state.upload_body_limit());

    Router::new()
        .route("/health", get(health_check))
        // Inspections
        .route(
            "/inspections",
            get(inspections::list_inspections).post(inspections::create_inspection),
        )
        .route(
            "/inspections/:so",
            get(inspections::get_inspection).put(inspections::update_inspection),
        )
        .route("/inspections/:so/submit", post(inspections::submit_inspection))
        // Checklist taxonomy
        .route("/inspections/areas", get(catalog::list_areas))
        .route("/inspections/areas/items", get(catalog::list_area_items_by_name))
        .route("/areas", get(catalog::list_areas))
        .route("/areas/:area/items", get(catalog::list_area_items))
        .route("/pmi/categories", get(catalog::list_pmi_categories))
        .route("/pmi/categories/:id/items", get(catalog::list_pmi_items))
        // Responses
        .route(
            "/inspections/:so/responses",
            get(responses::list_responses).post(responses::save_response),
        )
        .route(
            "/inspections/:so/responses/:item",
            get(responses::get_response).delete(responses::delete_response),
        )
        .route(
            "/pmi/inspections/:so/responses",
            get(responses::list_pmi_responses).post(responses::save_pmi_response),
        )
        .route(
            "/pmi/inspections/:so/responses/:item",
            get(responses::get_pmi_response).delete(responses::delete_pmi_response),
        )
        .route(
            "/inspections/:so/pmi",
            get(responses::list_pmi_responses).post(responses::save_pmi_response),
        )
        .route(
            "/inspections/:so/pmi/:item",
            get(responses::get_pmi_response).delete(responses::delete_pmi_response),
        )
        // Attachments
        .route(
            "/inspections/:so/images",
            get(attachments::list_images)
                .post(attachments::upload_image)
                .layer(upload_limit),
        )
        .route(
            "/inspections/:so/images/upload",
            post(attachments::upload_image).layer(upload_limit),
        )
        .route(
            "/inspections/:so/images/:id",
            get(attachments::get_image).delete(attachments::delete_image),
        )
        .route(
            "/inspections/:so/signatures",
            get(attachments::list_signatures)
                .post(attachments::upload_signature)
                .layer(upload_limit),
        )
        .route(
            "/inspections/:so/signatures/upload",
            post(attachments::upload_signature).layer(upload_limit),
        )
        .route(
            "/inspections/:so/signatures/:kind",
            get(attachments::get_signature).delete(attachments::delete_signature),
        )
        // Dashboard and registry
        .route("/dashboard/summary", get(dashboard::summary))
        .route("/inspectors", get(dashboard::list_inspectors))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    // A second call in the same process keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Open the database and serve the API on `addr` until the process stops.
pub async fn serve(cfg: Config, addr: &str) -> AppResult<()> {
    init_tracing(&cfg.log_filter);

    let pool = DbPool::open(&cfg.database)?;
    info!(database = %cfg.database, "database ready");

    let app = router(AppState::new(pool, cfg));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
