use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde_json::json;
use sqlx::postgres::PgPool;
use std::sync::Arc as StdArc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::IngestConfig;
use crate::db_postgres::{ingest_payload, open_pool};
use crate::error::IngestError;
use crate::payload::RootPayload;

// State for ingest handlers
pub struct AppState {
    pub pool: PgPool,
    pub statement_timeout_ms: u64,
}

/// Run the ingest API until the process is stopped
pub fn serve_ingest(config: IngestConfig, password: String) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.api_port;

    println!("Starting health metrics ingest server");
    println!("Database: {} ({})", config.database.database, config.database.postgres_url);
    println!("Listening on: http://[::]:{} (IPv4 + IPv6)", port);
    println!("Endpoints:");
    println!("  GET  /health  - Health check");
    println!("  POST /health_metric  - Ingest a batch of health metrics");

    // Create tokio runtime and run server
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let pool = open_pool(&config.database, &password).await?;

        let app_state = StdArc::new(AppState {
            pool,
            statement_timeout_ms: config.database.statement_timeout_ms,
        });

        let app = router(app_state);

        let listener = tokio::net::TcpListener::bind(format!("[::]:{}", port))
            .await
            .map_err(|e| format!("Failed to bind to port {}: {}", port, e))?;
        axum::serve(listener, app)
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

pub fn router(state: StdArc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/health_metric", post(health_metric_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Ingest one batch in a single transaction
async fn health_metric_handler(
    State(state): State<StdArc<AppState>>,
    payload: Result<Json<RootPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return IngestError::Validation(rejection.body_text()).into_response();
        }
    };

    let metric_count = payload.data.metrics.len();
    match ingest_payload(&state.pool, &payload, state.statement_timeout_ms).await {
        Ok(summary) => {
            info!(
                "Ingested {} metrics: {} rows inserted, {} already present, {} partition checks",
                metric_count,
                summary.rows_inserted(),
                summary.rows_skipped(),
                summary.partitions_ensured
            );
            if !summary.ignored_metrics.is_empty() {
                info!("Ignored metrics: {}", summary.ignored_metrics.join(", "));
            }
            (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
        }
        Err(e) => {
            error!("Failed to ingest batch of {} metrics: {}", metric_count, e);
            e.into_response()
        }
    }
}
