//! Risk alert listing handler

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{extract::ApiJson, AppState};
use oncoassist_common::advisory::{deserialize_age, RiskAssessment};

#[derive(Debug, Default, Deserialize)]
pub struct RiskAlertRequest {
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub cancer_type: Option<String>,
}

/// Every rule that fires for the given patient, in rule order
pub async fn risk_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RiskAlertRequest>,
) -> Json<RiskAssessment> {
    let cancer_type = request.cancer_type.unwrap_or_default();
    let assessment = state.advisor.assess_risk(
        request.age.unwrap_or(0),
        request.gender.as_deref().unwrap_or(""),
        &cancer_type,
    );

    tracing::info!(
        cancer_type = %cancer_type,
        alerts = assessment.alerts.len(),
        risk_level = assessment.risk_level.as_str(),
        "Risk assessment completed"
    );

    Json(assessment)
}
