//! Chat handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extract::ApiJson, AppState};
use oncoassist_common::{
    errors::{AppError, Result},
    UserContext,
};

/// Chat request
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub query: Option<String>,

    /// `ai` for the advisory engine, anything else for the baseline
    #[serde(default)]
    pub system_type: Option<String>,

    #[serde(default)]
    pub context: Option<UserContext>,
}

const DEFAULT_SYSTEM_TYPE: &str = "ai";

/// Chat response
#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub system_type: String,
}

/// Answer a patient query
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("query".to_string()),
    })?;

    let query = request.query.unwrap_or_default();
    let system_type = request
        .system_type
        .unwrap_or_else(|| DEFAULT_SYSTEM_TYPE.to_string());

    let response = if system_type == DEFAULT_SYSTEM_TYPE {
        state.advisor.compose(&query, request.context.as_ref())
    } else {
        state.advisor.baseline(&query)
    };

    tracing::info!(
        system_type = %system_type,
        query_len = query.len(),
        with_context = request.context.is_some(),
        "Chat response generated"
    );

    Ok(Json(ChatResponse {
        response,
        timestamp: Utc::now(),
        system_type,
    }))
}
