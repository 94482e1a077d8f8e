//! Voice and image handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extract::ApiJson, AppState};
use oncoassist_common::{
    errors::{AppError, Result},
    multimodal::LabReport,
};

#[derive(Debug, Deserialize, Validate)]
pub struct VoiceRequest {
    /// Base64 audio payload
    #[serde(default)]
    pub audio: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 16))]
    pub language: Option<String>,
}

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Serialize)]
pub struct VoiceResponse {
    pub recognized_text: String,
    pub response: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    /// Base64 image payload
    #[serde(default)]
    pub image: Option<String>,
}

/// Transcribe audio, then answer it like a context-free chat query
pub async fn voice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VoiceRequest>,
) -> Result<Json<VoiceResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: Some("language".to_string()),
    })?;

    let audio = request.audio.unwrap_or_default();
    let language = request
        .language
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let transcript = state.recognizer.transcribe(&audio, &language).await?;

    let response = state.advisor.compose(&transcript.text, None);

    tracing::info!(
        recognizer = state.recognizer.name(),
        language = %transcript.language,
        "Voice query answered"
    );

    Ok(Json(VoiceResponse {
        recognized_text: transcript.text,
        response,
        language,
    }))
}

/// Read a lab report image
pub async fn image(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImageRequest>,
) -> Result<Json<LabReport>> {
    let image = request.image.unwrap_or_default();
    let report = state.recognizer.read_report(&image).await?;

    tracing::info!(
        recognizer = state.recognizer.name(),
        values = report.values.len(),
        "Lab report read"
    );

    Ok(Json(report))
}
