//! Advisory Engine Core Components
//!
//! The advisory engine is the decision layer behind the assistant:
//! - Keyword classification of queries
//! - Ordered risk rule evaluation
//! - Deterministic multi-section response composition
//! - Care process navigation

mod classifier;
mod composer;
mod context;
mod navigator;
mod risk;

pub use classifier::{KeywordClassifier, QueryClassifier};
pub use composer::{
    ComposedResponse, ResponseComposer, Section, SectionKind, BASELINE_RESPONSE,
    FALLBACK_RESPONSE, MULTIMODAL_NOTICE,
};
pub use context::{deserialize_age, Gender, UserContext};
pub use navigator::{ProcessNavigator, StageNavigation, StageView, TimelineView};
pub use risk::{RiskAssessment, RiskLevel, RiskRule, RiskRuleEngine, RiskSubject};

use crate::knowledge::{CancerType, KnowledgeBase};
use crate::metrics;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup
pub struct Advisor {
    knowledge: Arc<KnowledgeBase>,
    rules: Arc<RiskRuleEngine>,
    composer: ResponseComposer,
    navigator: ProcessNavigator,
}

impl Advisor {
    /// Standard rules and the keyword classifier over the given knowledge base
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::with_parts(
            knowledge,
            Arc::new(RiskRuleEngine::standard()),
            Arc::new(KeywordClassifier::new()),
        )
    }

    pub fn with_parts(
        knowledge: Arc<KnowledgeBase>,
        rules: Arc<RiskRuleEngine>,
        classifier: Arc<dyn QueryClassifier>,
    ) -> Self {
        let composer = ResponseComposer::new(knowledge.clone(), rules.clone(), classifier);
        let navigator = ProcessNavigator::new(knowledge.clone());

        Self {
            knowledge,
            rules,
            composer,
            navigator,
        }
    }

    pub fn compose(&self, query: &str, context: Option<&UserContext>) -> String {
        self.composer.compose(query, context)
    }

    pub fn baseline(&self, query: &str) -> String {
        self.composer.baseline(query)
    }

    pub fn stage_steps(&self, stage_key: &str) -> Vec<String> {
        self.navigator.steps(stage_key)
    }

    pub fn timeline(&self) -> Vec<StageView> {
        self.navigator.timeline()
    }

    /// Every matching alert, for the dedicated alert listing
    pub fn risk_alerts_all(&self, age: i64, gender: &str, cancer_type: &str) -> Vec<String> {
        self.assess_risk(age, gender, cancer_type).alerts
    }

    pub fn assess_risk(&self, age: i64, gender: &str, cancer_type: &str) -> RiskAssessment {
        let subject = RiskSubject::new(age, gender, CancerType::from_key(cancer_type));
        let assessment = self.rules.assess(&subject);

        metrics::record_risk_assessment(assessment.risk_level, assessment.alerts.len());
        assessment
    }

    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    pub fn navigator(&self) -> &ProcessNavigator {
        &self.navigator
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(Arc::new(KnowledgeBase::seeded()))
    }
}
