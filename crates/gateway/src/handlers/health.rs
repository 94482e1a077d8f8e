//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub knowledge_base: CheckResult,
    pub recognizer: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Readiness probe - the knowledge base must cover every timeline stage
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let timeline = state.advisor.timeline();
    let knowledge_ok = timeline.len() == 3 && state.advisor.knowledge().resources().primary_hospital().is_some();

    let knowledge_base = CheckResult {
        status: if knowledge_ok { "up" } else { "degraded" }.to_string(),
        detail: Some(format!("{} timeline stages", timeline.len())),
    };

    let recognizer = CheckResult {
        status: "up".to_string(),
        detail: Some(state.recognizer.name().to_string()),
    };

    Json(ReadyResponse {
        status: if knowledge_ok { "ready" } else { "not_ready" }.to_string(),
        checks: HealthChecks {
            knowledge_base,
            recognizer,
        },
    })
}
