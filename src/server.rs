use axum::{routing::post, Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::SearchError;
use crate::load::{load, CatalogInput, LoadWeights};
use crate::search::{AndTreeSearch, SearchOptions};

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub catalog: CatalogInput,
    pub weights: LoadWeights,
    #[serde(default)]
    pub options: RequestOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestOptions {
    pub break_limit: Option<u32>,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub shuffle_seed: u64,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub assignment: Option<HashMap<String, (String, String)>>,
    pub eval: Option<i64>,
    pub leaves_explored: u64,
    pub improving_results: u32,
}

async fn solve_handler(
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, (axum::http::StatusCode, String)> {
    let catalog =
        load(request.catalog, &request.weights).map_err(|e| (axum::http::StatusCode::BAD_REQUEST, e.to_string()))?;

    let options = SearchOptions {
        break_limit: request.options.break_limit,
        shuffle: request.options.shuffle,
        shuffle_seed: request.options.shuffle_seed,
    };

    // The search is a long-running synchronous computation; keep it off
    // the async executor's cooperative scheduler.
    let outcome = tokio::task::spawn_blocking(move || {
        let mut search = AndTreeSearch::new(catalog, options)?;
        Ok::<_, SearchError>(search.search())
    })
    .await
    .map_err(|e| {
        error!("search task panicked: {e}");
        (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "search task panicked".to_string())
    })?
    .map_err(|e| (axum::http::StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(SolveResponse {
        assignment: outcome.assignment,
        eval: outcome.eval,
        leaves_explored: outcome.stats.leaf_counter,
        improving_results: outcome.stats.result_counter,
    }))
}

pub async fn run_server() {
    let app = Router::new().route("/v1/schedule/solve", post(solve_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();

    info!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
