//! Knowledge Base - Static clinical lookup store
//!
//! Holds three read-only tables, built once at startup:
//! - Guideline content per cancer type
//! - Local resource directory (hospitals, support associations)
//! - Care process stages with their ordered steps
//!
//! There is no write path. Share it behind an `Arc`.

mod seed;

use crate::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Cancer type identifiers known to the advisory engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancerType {
    BreastCancer,
    LungCancer,
    ColorectalCancer,
    /// Named by the risk rules; has no guideline entry
    LiverCancer,
}

impl CancerType {
    pub const ALL: [CancerType; 4] = [
        CancerType::BreastCancer,
        CancerType::LungCancer,
        CancerType::ColorectalCancer,
        CancerType::LiverCancer,
    ];

    /// Wire key, e.g. `breast_cancer`
    pub fn as_str(&self) -> &'static str {
        match self {
            CancerType::BreastCancer => "breast_cancer",
            CancerType::LungCancer => "lung_cancer",
            CancerType::ColorectalCancer => "colorectal_cancer",
            CancerType::LiverCancer => "liver_cancer",
        }
    }

    /// Parse a wire key. Unknown keys are not an error, they simply match nothing.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for CancerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which block of a guideline entry a query asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidelineTopic {
    SideEffects,
    Treatment,
}

/// Guideline content for one cancer type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineEntry {
    pub side_effects: String,
    pub treatment: String,
}

impl GuidelineEntry {
    pub fn text(&self, topic: GuidelineTopic) -> &str {
        match topic {
            GuidelineTopic::SideEffects => &self.side_effects,
            GuidelineTopic::Treatment => &self.treatment,
        }
    }
}

/// Healthcare facility record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    /// Directory key; carried as the map key on the wire
    #[serde(skip)]
    pub id: String,
    pub name: String,
    /// Oncology department phone
    pub oncology: String,
    pub emergency: String,
    pub address: String,
}

/// Patient support association record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportAssociation {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub hotline: String,
    pub services: String,
}

/// Local resource directory. The first entry of each list is the primary one.
///
/// On the wire each list is an object keyed by record id, in list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDirectory {
    #[serde(with = "keyed")]
    pub hospitals: Vec<Hospital>,
    #[serde(with = "keyed")]
    pub cancer_associations: Vec<SupportAssociation>,
}

/// Records that live in an id-keyed JSON object
pub trait Keyed {
    fn key(&self) -> &str;
    fn set_key(&mut self, key: String);
}

impl Keyed for Hospital {
    fn key(&self) -> &str {
        &self.id
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

impl Keyed for SupportAssociation {
    fn key(&self) -> &str {
        &self.id
    }

    fn set_key(&mut self, key: String) {
        self.id = key;
    }
}

/// Serde adapter between `Vec<T>` and an id-keyed object. Entry order is kept.
mod keyed {
    use super::Keyed;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Keyed + Serialize,
    {
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for item in items {
            map.serialize_entry(item.key(), item)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Keyed + Deserialize<'de>,
    {
        struct KeyedVisitor<T>(PhantomData<T>);

        impl<'de, T: Keyed + Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of records keyed by id")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Vec<T>, A::Error> {
                let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, mut item)) = access.next_entry::<String, T>()? {
                    item.set_key(key);
                    items.push(item);
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(KeyedVisitor(PhantomData))
    }
}

impl ResourceDirectory {
    pub fn primary_hospital(&self) -> Option<&Hospital> {
        self.hospitals.first()
    }

    pub fn primary_association(&self) -> Option<&SupportAssociation> {
        self.cancer_associations.first()
    }
}

/// One chronological phase of care
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStage {
    /// Lookup key: `diagnosis`, `treatment`, `followup`
    pub key: String,
    /// Display name
    pub name: String,
    /// Display color for timeline rendering
    pub color: String,
    /// Steps in the order they happen
    pub steps: Vec<String>,
}

/// Serialized form of a knowledge base, as read from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub guidelines: HashMap<String, GuidelineEntry>,
    pub resources: ResourceDirectory,
    pub stages: Vec<ProcessStage>,
}

/// Immutable lookup store for guidelines, resources and process stages
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    guidelines: HashMap<CancerType, GuidelineEntry>,
    resources: ResourceDirectory,
    stages: Vec<ProcessStage>,
    stage_index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Build from parts. Stage order is kept as chronological order.
    pub fn new(
        guidelines: HashMap<CancerType, GuidelineEntry>,
        resources: ResourceDirectory,
        stages: Vec<ProcessStage>,
    ) -> Self {
        let stage_index = stages
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key.clone(), i))
            .collect();

        Self {
            guidelines,
            resources,
            stages,
            stage_index,
        }
    }

    /// Built-in content
    pub fn seeded() -> Self {
        Self::new(seed::guidelines(), seed::resources(), seed::stages())
    }

    /// Build from a deserialized document, rejecting unknown cancer types
    /// and duplicate stage keys.
    pub fn from_document(doc: KnowledgeDocument) -> Result<Self> {
        let mut guidelines = HashMap::with_capacity(doc.guidelines.len());
        for (key, entry) in doc.guidelines {
            let cancer_type = CancerType::from_key(&key).ok_or_else(|| AppError::Configuration {
                message: format!("unknown cancer type in knowledge base: {}", key),
            })?;
            guidelines.insert(cancer_type, entry);
        }

        let mut seen = std::collections::HashSet::new();
        for stage in &doc.stages {
            if !seen.insert(stage.key.as_str()) {
                return Err(AppError::Configuration {
                    message: format!("duplicate process stage: {}", stage.key),
                });
            }
        }

        Ok(Self::new(guidelines, doc.resources, doc.stages))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: KnowledgeDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    /// Load a JSON knowledge base from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::Configuration {
            message: format!("cannot read knowledge base {}: {}", path.display(), e),
        })?;

        let kb = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            guidelines = kb.guidelines.len(),
            stages = kb.stages.len(),
            "Knowledge base loaded"
        );
        Ok(kb)
    }

    /// Snapshot back into the serializable form
    pub fn to_document(&self) -> KnowledgeDocument {
        KnowledgeDocument {
            guidelines: self
                .guidelines
                .iter()
                .map(|(t, e)| (t.as_str().to_string(), e.clone()))
                .collect(),
            resources: self.resources.clone(),
            stages: self.stages.clone(),
        }
    }

    /// Guideline content for a cancer type; absence is a normal outcome
    pub fn guideline(&self, cancer_type: CancerType) -> Option<&GuidelineEntry> {
        self.guidelines.get(&cancer_type)
    }

    pub fn resources(&self) -> &ResourceDirectory {
        &self.resources
    }

    /// Ordered steps for a stage key; empty for unknown keys
    pub fn stage_steps(&self, stage_key: &str) -> &[String] {
        self.stage(stage_key).map(|s| s.steps.as_slice()).unwrap_or(&[])
    }

    pub fn stage(&self, stage_key: &str) -> Option<&ProcessStage> {
        self.stage_index.get(stage_key).map(|&i| &self.stages[i])
    }

    /// All stages in chronological order
    pub fn stages(&self) -> &[ProcessStage] {
        &self.stages
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancer_type_keys() {
        for t in CancerType::ALL {
            assert_eq!(CancerType::from_key(t.as_str()), Some(t));
        }
        assert_eq!(CancerType::from_key("Lung_Cancer"), None);
        assert_eq!(CancerType::from_key(""), None);
        assert_eq!(
            serde_json::to_string(&CancerType::ColorectalCancer).unwrap(),
            "\"colorectal_cancer\""
        );
    }

    #[test]
    fn test_guideline_lookup() {
        let kb = KnowledgeBase::seeded();

        let breast = kb.guideline(CancerType::BreastCancer).unwrap();
        assert!(breast.side_effects.starts_with("Common chemotherapy side effects"));
        assert!(breast.text(GuidelineTopic::Treatment).starts_with("Standard treatment protocols"));

        // Liver cancer is known to the rules only
        assert!(kb.guideline(CancerType::LiverCancer).is_none());
    }

    #[test]
    fn test_stage_steps_order() {
        let kb = KnowledgeBase::seeded();

        let followup = kb.stage_steps("followup");
        assert_eq!(followup.len(), 5);
        assert_eq!(followup[0], "Regular follow-up examination scheduling");
        assert_eq!(followup[4], "Survivorship care planning");

        assert!(kb.stage_steps("unknown_stage").is_empty());
        assert!(kb.stage_steps("").is_empty());

        let keys: Vec<&str> = kb.stages().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["diagnosis", "treatment", "followup"]);
    }

    #[test]
    fn test_primary_resources() {
        let kb = KnowledgeBase::seeded();
        let resources = kb.resources();

        assert_eq!(resources.hospitals.len(), 2);
        assert_eq!(resources.primary_hospital().unwrap().name, "Conde S. Januário Hospital");
        assert_eq!(resources.primary_association().unwrap().hotline, "+853-2825-3381");

        let empty = ResourceDirectory::default();
        assert!(empty.primary_hospital().is_none());
        assert!(empty.primary_association().is_none());
    }

    #[test]
    fn test_json_document_roundtrip_keeps_lookups() {
        let kb = KnowledgeBase::seeded();
        let json = serde_json::to_string(&kb.to_document()).unwrap();
        let loaded = KnowledgeBase::from_json_str(&json).unwrap();

        assert_eq!(
            loaded.guideline(CancerType::LungCancer),
            kb.guideline(CancerType::LungCancer)
        );
        assert_eq!(loaded.stage_steps("treatment"), kb.stage_steps("treatment"));
        assert_eq!(loaded.resources(), kb.resources());
    }

    #[test]
    fn test_resources_serialize_keyed_by_id() {
        let kb = KnowledgeBase::seeded();
        let value = serde_json::to_value(kb.resources()).unwrap();

        assert_eq!(
            value["hospitals"]["conde_s_januario"]["name"],
            "Conde S. Januário Hospital"
        );
        assert_eq!(value["hospitals"]["kiang_wu"]["oncology"], "+853-2882-2371");
        assert_eq!(
            value["cancer_associations"]["macau_cancer_society"]["hotline"],
            "+853-2825-3381"
        );
        assert!(value["hospitals"]["kiang_wu"].get("id").is_none());
    }

    #[test]
    fn test_keyed_resources_keep_document_order() {
        let json = r#"{
            "hospitals": {
                "zeta": {"name": "Z", "oncology": "1", "emergency": "1", "address": "a"},
                "alpha": {"name": "A", "oncology": "2", "emergency": "2", "address": "b"}
            },
            "cancer_associations": {}
        }"#;

        let resources: ResourceDirectory = serde_json::from_str(json).unwrap();
        assert_eq!(resources.primary_hospital().unwrap().id, "zeta");
        assert_eq!(resources.hospitals[1].id, "alpha");
        assert!(resources.primary_association().is_none());
    }

    #[test]
    fn test_unknown_cancer_type_rejected() {
        let json = r#"{
            "guidelines": {"skin_cancer": {"side_effects": "a", "treatment": "b"}},
            "resources": {"hospitals": {}, "cancer_associations": {}},
            "stages": []
        }"#;

        let err = KnowledgeBase::from_json_str(json).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_duplicate_stage_rejected() {
        let json = r##"{
            "guidelines": {},
            "resources": {"hospitals": {}, "cancer_associations": {}},
            "stages": [
                {"key": "diagnosis", "name": "Diagnosis", "color": "#000", "steps": []},
                {"key": "diagnosis", "name": "Again", "color": "#111", "steps": []}
            ]
        }"##;

        assert!(KnowledgeBase::from_json_str(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = KnowledgeBase::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = KnowledgeBase::from_file("/nonexistent/knowledge.json").unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }
}
