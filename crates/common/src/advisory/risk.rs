//! Risk Rule Engine - Ordered condition → alert rules
//!
//! Rules are evaluated in declaration order. Two entry points with different
//! contracts:
//! - `evaluate_first` stops at the first match (single banner in a chat reply)
//! - `evaluate_all` collects every match (dedicated alert listing)

use super::context::Gender;
use crate::knowledge::CancerType;
use serde::{Deserialize, Serialize};

/// Inputs the rule predicates look at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskSubject {
    pub age: i64,
    pub gender: Gender,
    pub cancer_type: Option<CancerType>,
}

impl RiskSubject {
    pub fn new(age: i64, gender: impl Into<Gender>, cancer_type: Option<CancerType>) -> Self {
        Self {
            age,
            gender: gender.into(),
            cancer_type,
        }
    }
}

/// A named predicate paired with the alert it raises
#[derive(Debug, Clone)]
pub struct RiskRule {
    pub name: &'static str,
    pub predicate: fn(&RiskSubject) -> bool,
    pub alert: String,
}

impl RiskRule {
    pub fn new(name: &'static str, predicate: fn(&RiskSubject) -> bool, alert: impl Into<String>) -> Self {
        Self {
            name,
            predicate,
            alert: alert.into(),
        }
    }

    pub fn matches(&self, subject: &RiskSubject) -> bool {
        (self.predicate)(subject)
    }
}

/// Overall level reported by the alert listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Normal,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Normal => "normal",
            RiskLevel::High => "high",
        }
    }
}

/// Exhaustive evaluation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub alerts: Vec<String>,
    pub risk_level: RiskLevel,
}

/// Immutable, ordered rule list
#[derive(Debug, Clone)]
pub struct RiskRuleEngine {
    rules: Vec<RiskRule>,
}

impl RiskRuleEngine {
    pub fn new(rules: Vec<RiskRule>) -> Self {
        Self { rules }
    }

    /// The clinical rule set, in policy order
    pub fn standard() -> Self {
        Self::new(vec![
            RiskRule::new(
                "elderly_male_lung_recurrence",
                |s| s.age >= 60 && s.gender == Gender::Male && s.cancer_type == Some(CancerType::LungCancer),
                "37% recurrence risk based on Macau registry data (2003-2023), recommend regular imaging follow-up",
            ),
            RiskRule::new(
                "high_mortality_type",
                |s| {
                    matches!(
                        s.cancer_type,
                        Some(CancerType::LungCancer | CancerType::LiverCancer | CancerType::ColorectalCancer)
                    )
                },
                "High-mortality cancer type, increased surveillance recommended",
            ),
            RiskRule::new(
                "elderly_patient",
                |s| s.age >= 70,
                "Elderly patient - simplified information provided, key action items emphasized",
            ),
        ])
    }

    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    /// Alert of the first matching rule
    pub fn evaluate_first(&self, subject: &RiskSubject) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.matches(subject))
            .map(|r| r.alert.as_str())
    }

    /// Alerts of every matching rule, in declaration order
    pub fn evaluate_all(&self, subject: &RiskSubject) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.matches(subject))
            .map(|r| r.alert.as_str())
            .collect()
    }

    pub fn assess(&self, subject: &RiskSubject) -> RiskAssessment {
        let alerts: Vec<String> = self
            .evaluate_all(subject)
            .into_iter()
            .map(str::to_string)
            .collect();

        let risk_level = if alerts.is_empty() {
            RiskLevel::Normal
        } else {
            RiskLevel::High
        };

        RiskAssessment { alerts, risk_level }
    }
}

impl Default for RiskRuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
