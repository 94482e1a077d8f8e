//! Response Composer - Assembles the multi-section advisory reply
//!
//! Section order is fixed:
//! 1. Guideline content (when a cancer type is recognized and covered)
//! 2. Risk alert (when a context is supplied and a rule fires)
//! 3. Local healthcare resources (always)
//! 4. Multimodal support notice (always)

use super::classifier::QueryClassifier;
use super::context::UserContext;
use super::risk::{RiskRuleEngine, RiskSubject};
use crate::knowledge::{CancerType, KnowledgeBase, ResourceDirectory};
use crate::metrics;
use serde::Serialize;
use std::sync::Arc;

/// Returned when no section applies
pub const FALLBACK_RESPONSE: &str =
    "I understand your question. For detailed information, please consult with your healthcare provider or oncologist.";

/// Control-condition reply of the baseline system
pub const BASELINE_RESPONSE: &str =
    "For information about this topic, please consult your healthcare provider or oncologist.";

pub const MULTIMODAL_NOTICE: &str = "\n【Multimodal Support】\n🗣️ Voice version | 📊 Visual timeline";

const SECTION_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Guideline,
    RiskAlert,
    Resources,
    Multimodal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// Ordered sections for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedResponse {
    pub cancer_type: Option<CancerType>,
    pub sections: Vec<Section>,
}

impl ComposedResponse {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn has(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// Join sections with a blank line, or the fallback when there are none
    pub fn render(&self) -> String {
        if self.sections.is_empty() {
            return FALLBACK_RESPONSE.to_string();
        }

        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }
}

/// Builds advisory replies from the knowledge base and rule engine
pub struct ResponseComposer {
    knowledge: Arc<KnowledgeBase>,
    rules: Arc<RiskRuleEngine>,
    classifier: Arc<dyn QueryClassifier>,
}

impl ResponseComposer {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        rules: Arc<RiskRuleEngine>,
        classifier: Arc<dyn QueryClassifier>,
    ) -> Self {
        Self {
            knowledge,
            rules,
            classifier,
        }
    }

    /// Compose the reply text for a query
    pub fn compose(&self, query: &str, context: Option<&UserContext>) -> String {
        let composed = self.compose_sections(query, context);

        metrics::record_compose(composed.cancer_type, composed.has(SectionKind::RiskAlert));

        composed.render()
    }

    /// Compose the ordered sections without rendering
    pub fn compose_sections(&self, query: &str, context: Option<&UserContext>) -> ComposedResponse {
        let cancer_type = self.classifier.extract(query);
        let mut sections = Vec::with_capacity(4);

        if let Some(entry) = cancer_type.and_then(|t| self.knowledge.guideline(t)) {
            let topic = self.classifier.topic(query);
            sections.push(Section {
                kind: SectionKind::Guideline,
                text: entry.text(topic).to_string(),
            });
        }

        if let Some(ctx) = context.filter(|c| !c.is_empty()) {
            let subject = RiskSubject {
                age: ctx.age(),
                gender: ctx.gender(),
                cancer_type,
            };

            if let Some(alert) = self.rules.evaluate_first(&subject) {
                sections.push(Section {
                    kind: SectionKind::RiskAlert,
                    text: format!("\n【Risk Alert】{}", alert),
                });
            }
        }

        if let Some(text) = resources_section(self.knowledge.resources()) {
            sections.push(Section {
                kind: SectionKind::Resources,
                text,
            });
        }

        sections.push(Section {
            kind: SectionKind::Multimodal,
            text: MULTIMODAL_NOTICE.to_string(),
        });

        tracing::debug!(
            cancer_type = ?cancer_type,
            sections = sections.len(),
            with_context = context.is_some(),
            "Composed advisory response"
        );

        ComposedResponse {
            cancer_type,
            sections,
        }
    }

    /// Generic referral, independent of the query
    pub fn baseline(&self, _query: &str) -> String {
        BASELINE_RESPONSE.to_string()
    }
}

/// Primary hospital oncology line and primary association hotline
fn resources_section(resources: &ResourceDirectory) -> Option<String> {
    let hospital = resources.primary_hospital()?;
    let association = resources.primary_association()?;

    Some(format!(
        "\n【Local Healthcare Resources】\n🏥 {} Oncology: {}\n☎️ {} Hotline: {}",
        hospital.name, hospital.oncology, association.name, association.hotline
    ))
}
