//! Built-in knowledge base content (NCCN-derived guideline summaries, Macau resources)

use super::{CancerType, GuidelineEntry, Hospital, ProcessStage, ResourceDirectory, SupportAssociation};
use std::collections::HashMap;

pub(super) fn guidelines() -> HashMap<CancerType, GuidelineEntry> {
    let mut guidelines = HashMap::new();

    guidelines.insert(
        CancerType::BreastCancer,
        GuidelineEntry {
            side_effects: "Common chemotherapy side effects include: 1) Nausea & Vomiting - Management with anti-nausea medication, usually 1-2 days post-treatment. 2) Fatigue - Rest periods recommended, light exercise when possible. 3) Hair loss - Usually temporary, begins 2-3 weeks after treatment. 4) Neuropathy - Tingling in hands/feet, usually reversible.".to_string(),
            treatment: "Standard treatment protocols include: Surgery (lumpectomy or mastectomy), Chemotherapy (AC-T or TAC regimens), Radiation therapy, Hormone therapy (for hormone-receptor-positive cancers), Targeted therapy (HER2-positive cancers).".to_string(),
        },
    );

    guidelines.insert(
        CancerType::LungCancer,
        GuidelineEntry {
            side_effects: "Lung cancer treatment side effects: 1) Shortness of breath - May require oxygen support. 2) Fatigue - Common during treatment. 3) Nausea - Anti-nausea medications available. 4) Skin changes - Radiation may cause skin irritation.".to_string(),
            treatment: "Treatment options: Surgery (lobectomy, pneumonectomy), Chemotherapy (platinum-based), Radiation therapy, Immunotherapy (PD-1/PD-L1 inhibitors), Targeted therapy (EGFR, ALK inhibitors).".to_string(),
        },
    );

    guidelines.insert(
        CancerType::ColorectalCancer,
        GuidelineEntry {
            side_effects: "Colorectal cancer treatment side effects: 1) Diarrhea - Common, dietary modifications recommended. 2) Fatigue - Rest and light activity balance. 3) Nausea - Medication available. 4) Neuropathy - May affect hands and feet.".to_string(),
            treatment: "Treatment includes: Surgery (colectomy, proctectomy), Chemotherapy (FOLFOX, FOLFIRI), Radiation therapy (for rectal cancer), Targeted therapy (VEGF, EGFR inhibitors).".to_string(),
        },
    );

    guidelines
}

pub(super) fn resources() -> ResourceDirectory {
    ResourceDirectory {
        hospitals: vec![
            Hospital {
                id: "conde_s_januario".to_string(),
                name: "Conde S. Januário Hospital".to_string(),
                oncology: "+853-2831-3731".to_string(),
                emergency: "+853-2831-3731".to_string(),
                address: "Estrada do Visconde de S. Januário, Macau".to_string(),
            },
            Hospital {
                id: "kiang_wu".to_string(),
                name: "Kiang Wu Hospital".to_string(),
                oncology: "+853-2882-2371".to_string(),
                emergency: "+853-2882-2371".to_string(),
                address: "Estrada do Repouso, Macau".to_string(),
            },
        ],
        cancer_associations: vec![SupportAssociation {
            id: "macau_cancer_society".to_string(),
            name: "Macau Cancer Society".to_string(),
            hotline: "+853-2825-3381".to_string(),
            services: "Support groups, counseling, information resources".to_string(),
        }],
    }
}

pub(super) fn stages() -> Vec<ProcessStage> {
    vec![
        stage(
            "diagnosis",
            "Diagnosis",
            "#4A90E2",
            &[
                "Initial diagnosis confirmation and documentation",
                "Cancer staging assessment and interpretation",
                "Multidisciplinary team (MDT) consultation scheduling",
                "Second opinion coordination",
                "Emotional support and information resources access",
            ],
        ),
        stage(
            "treatment",
            "Treatment",
            "#4CAF50",
            &[
                "Treatment plan selection and explanation",
                "Pre-treatment preparation guidance",
                "Side effect management and monitoring",
                "Nutritional support and dietary planning",
                "Financial assistance and insurance navigation",
            ],
        ),
        stage(
            "followup",
            "Follow-up",
            "#FF9800",
            &[
                "Regular follow-up examination scheduling",
                "Recurrence monitoring and surveillance",
                "Long-term side effect management",
                "Quality of life support and rehabilitation",
                "Survivorship care planning",
            ],
        ),
    ]
}

fn stage(key: &str, name: &str, color: &str, steps: &[&str]) -> ProcessStage {
    ProcessStage {
        key: key.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
    }
}
