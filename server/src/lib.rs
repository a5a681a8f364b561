use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use engine::persist::StorePaths;
use engine::{QueryEngine, RankedDoc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RankedDoc>,
}

#[derive(Clone)]
pub struct AppState {
    pub store_root: PathBuf,
    pub stopwords: PathBuf,
    pub urls: PathBuf,
}

pub fn build_app(store_dir: String, stopwords: String, urls: String) -> Router {
    let state = AppState {
        store_root: PathBuf::from(store_dir),
        stopwords: PathBuf::from(stopwords),
        urls: PathBuf::from(urls),
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(state)
        .layer(cors)
}

/// Each request scores against its own read-only snapshot of the store, so
/// a rebuild that swaps the store directory is picked up by the next query.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let scorer = QueryEngine::new(
        StorePaths::new(&state.store_root),
        state.stopwords.clone(),
        state.urls.clone(),
    );
    let results = scorer.rank(&params.q).map_err(|err| {
        tracing::error!(%err, query = %params.q, "query failed");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}
