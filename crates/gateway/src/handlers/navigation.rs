//! Process navigation and timeline handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{extract::ApiJson, AppState};
use oncoassist_common::advisory::{StageNavigation, TimelineView};

#[derive(Debug, Deserialize)]
pub struct NavigationRequest {
    #[serde(default)]
    pub stage: Option<String>,
}

const DEFAULT_STAGE: &str = "diagnosis";

/// Steps of one care stage plus the local resource directory
pub async fn process_navigation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NavigationRequest>,
) -> Json<StageNavigation> {
    let stage = request.stage.as_deref().unwrap_or(DEFAULT_STAGE);
    let navigation = state.advisor.navigator().navigate(stage);

    tracing::info!(
        stage = %navigation.stage,
        steps = navigation.steps.len(),
        "Process navigation served"
    );

    Json(navigation)
}

/// All care stages in chronological order
pub async fn timeline(State(state): State<AppState>) -> Json<TimelineView> {
    Json(state.advisor.navigator().timeline_view())
}
