//! Process Navigator - Care-stage step lists and the timeline view

use crate::knowledge::{KnowledgeBase, ResourceDirectory};
use serde::Serialize;
use std::sync::Arc;

/// Stages shown on the timeline, in chronological order
pub const TIMELINE_STAGES: [&str; 3] = ["diagnosis", "treatment", "followup"];

/// Position marker shown on the timeline
pub const CURRENT_STAGE: &str = "Treatment";
pub const CURRENT_TIMELINE_STEP: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub name: String,
    pub steps: Vec<String>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineView {
    pub stages: Vec<StageView>,
    pub current_stage: String,
    pub current_step: usize,
}

/// Steps of one stage packaged with the resource directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageNavigation {
    pub stage: String,
    pub steps: Vec<String>,
    pub resources: ResourceDirectory,
    pub current_step: usize,
}

pub struct ProcessNavigator {
    knowledge: Arc<KnowledgeBase>,
}

impl ProcessNavigator {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    /// Ordered steps for a stage; empty when the key is unknown
    pub fn steps(&self, stage_key: &str) -> Vec<String> {
        self.knowledge.stage_steps(stage_key).to_vec()
    }

    pub fn timeline(&self) -> Vec<StageView> {
        TIMELINE_STAGES
            .iter()
            .filter_map(|key| self.knowledge.stage(key))
            .map(|stage| StageView {
                name: stage.name.clone(),
                steps: stage.steps.clone(),
                color: stage.color.clone(),
            })
            .collect()
    }

    pub fn timeline_view(&self) -> TimelineView {
        TimelineView {
            stages: self.timeline(),
            current_stage: CURRENT_STAGE.to_string(),
            current_step: CURRENT_TIMELINE_STEP,
        }
    }

    /// Navigation starts at the first step of the requested stage
    pub fn navigate(&self, stage_key: &str) -> StageNavigation {
        let steps = self.steps(stage_key);
        if steps.is_empty() {
            tracing::debug!(stage = %stage_key, "No steps for stage");
        }

        StageNavigation {
            stage: stage_key.to_string(),
            steps,
            resources: self.knowledge.resources().clone(),
            current_step: 1,
        }
    }
}
