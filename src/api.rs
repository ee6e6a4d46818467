use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::constants::server::RECENT_RUNS_LIMIT;
use crate::error::ResearchError;
use crate::page::{self, Panel};
use crate::services::ResearchService;

pub struct AppState {
    pub research: ResearchService,
}

#[derive(Deserialize)]
pub struct ResearchParams {
    #[serde(default)]
    pub ticker: String,
}

#[derive(Deserialize)]
struct RunsParams {
    limit: Option<usize>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/research", post(research_form))
        .route("/api/research", post(research_json))
        .route("/api/runs", get(recent_runs))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>, bind_addr: &str) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API Server listening on {}", bind_addr);
    axum::serve(listener, app).await
}

fn status_for(err: &ResearchError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}

async fn index() -> Html<String> {
    Html(page::render("", Panel::Empty))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn research_form(
    State(state): State<Arc<AppState>>,
    Form(params): Form<ResearchParams>,
) -> Response {
    match state.research.run(&params.ticker).await {
        Ok(report) => Html(page::render(
            &report.ticker,
            Panel::Report {
                ticker: &report.ticker,
                markdown: &report.markdown,
                output_file: &report.output_file,
            },
        ))
        .into_response(),
        Err(e) => {
            error!("Research request failed: {}", e);
            let message = e.to_string();
            (
                status_for(&e),
                Html(page::render(params.ticker.trim(), Panel::Error(&message))),
            )
                .into_response()
        }
    }
}

async fn research_json(
    State(state): State<Arc<AppState>>,
    Json(params): Json<ResearchParams>,
) -> Response {
    match state.research.run(&params.ticker).await {
        Ok(report) => Json(json!({
            "run_id": report.run_id,
            "ticker": report.ticker,
            "report": report.markdown,
            "output_file": report.output_file,
            "tasks": report.tasks,
        }))
        .into_response(),
        Err(e) => {
            error!("Research request failed: {}", e);
            (status_for(&e), Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

async fn recent_runs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RunsParams>,
) -> Response {
    let limit = params.limit.unwrap_or(RECENT_RUNS_LIMIT);
    match state.research.writer().recent_runs(limit).await {
        Ok(runs) => Json(runs).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}
