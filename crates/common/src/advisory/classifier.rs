//! Query Classifier - Maps free text to a cancer type and a guideline topic
//!
//! Matching is plain substring search on the lower-cased query. No stemming,
//! no tokenization. Cancer-type keywords are English only, while the topic
//! keywords also cover Chinese (`副作用`, `治疗`).

use crate::knowledge::{CancerType, GuidelineTopic};

/// Pluggable text classification used by the composer
pub trait QueryClassifier: Send + Sync {
    /// Cancer type mentioned in the query, if any
    fn extract(&self, query: &str) -> Option<CancerType>;

    /// Which guideline block the query asks about
    fn topic(&self, query: &str) -> GuidelineTopic;
}

/// Keyword table classifier. The first matching row wins.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    cancer_keywords: Vec<(Vec<String>, CancerType)>,
    side_effect_keywords: Vec<String>,
    treatment_keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self {
            cancer_keywords: Self::load_cancer_keywords(),
            side_effect_keywords: to_owned(&["side effect", "副作用"]),
            treatment_keywords: to_owned(&["treatment", "治疗"]),
        }
    }

    /// Replace the cancer keyword table. Row order is match priority.
    pub fn with_cancer_keywords(mut self, table: Vec<(Vec<String>, CancerType)>) -> Self {
        self.cancer_keywords = table
            .into_iter()
            .map(|(words, t)| (words.into_iter().map(|w| w.to_lowercase()).collect(), t))
            .collect();
        self
    }

    fn load_cancer_keywords() -> Vec<(Vec<String>, CancerType)> {
        vec![
            (to_owned(&["breast"]), CancerType::BreastCancer),
            (to_owned(&["lung"]), CancerType::LungCancer),
            (to_owned(&["colorectal", "colon"]), CancerType::ColorectalCancer),
        ]
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier for KeywordClassifier {
    fn extract(&self, query: &str) -> Option<CancerType> {
        let query = query.to_lowercase();

        self.cancer_keywords
            .iter()
            .find(|(words, _)| contains_any(&query, words))
            .map(|(_, cancer_type)| *cancer_type)
    }

    fn topic(&self, query: &str) -> GuidelineTopic {
        let query = query.to_lowercase();

        if contains_any(&query, &self.side_effect_keywords) {
            GuidelineTopic::SideEffects
        } else if contains_any(&query, &self.treatment_keywords) {
            GuidelineTopic::Treatment
        } else {
            GuidelineTopic::SideEffects
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_is_case_insensitive() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.extract("BREAST lump found"), Some(CancerType::BreastCancer));
        assert_eq!(classifier.extract("my Lung scan"), Some(CancerType::LungCancer));
        assert_eq!(classifier.extract("Colon polyps"), Some(CancerType::ColorectalCancer));
        assert_eq!(classifier.extract("colorectal screening"), Some(CancerType::ColorectalCancer));
    }

    #[test]
    fn test_extract_none() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.extract(""), None);
        assert_eq!(classifier.extract("How do I manage nausea?"), None);
        // Chinese cancer names are not recognized
        assert_eq!(classifier.extract("肺癌的治疗"), None);
        // Liver cancer has no keyword row
        assert_eq!(classifier.extract("liver cancer"), None);
    }

    #[test]
    fn test_extract_first_row_wins() {
        let classifier = KeywordClassifier::new();

        assert_eq!(
            classifier.extract("breast cancer spread to the lung"),
            Some(CancerType::BreastCancer)
        );
        assert_eq!(
            classifier.extract("colon cancer with lung metastasis"),
            Some(CancerType::LungCancer)
        );
    }

    #[test]
    fn test_topic_selection() {
        let classifier = KeywordClassifier::new();

        assert_eq!(classifier.topic("Lung cancer Side Effects?"), GuidelineTopic::SideEffects);
        assert_eq!(classifier.topic("lung cancer treatment options"), GuidelineTopic::Treatment);
        assert_eq!(classifier.topic("乳腺癌治疗"), GuidelineTopic::Treatment);
        assert_eq!(classifier.topic("化疗副作用"), GuidelineTopic::SideEffects);
        // Side effects outrank treatment when both appear
        assert_eq!(
            classifier.topic("side effects of treatment"),
            GuidelineTopic::SideEffects
        );
        assert_eq!(classifier.topic("tell me about lung cancer"), GuidelineTopic::SideEffects);
    }

    #[test]
    fn test_custom_keyword_table() {
        let classifier = KeywordClassifier::new().with_cancer_keywords(vec![(
            vec!["Hepatic".to_string(), "liver".to_string()],
            CancerType::LiverCancer,
        )]);

        assert_eq!(classifier.extract("hepatic lesion"), Some(CancerType::LiverCancer));
        assert_eq!(classifier.extract("breast"), None);
    }
}
