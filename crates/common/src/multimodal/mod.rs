//! Multimodal recognizer abstraction
//!
//! Voice and image inputs are turned into text or structured lab values
//! before they reach the advisory engine. Only a stub back-end ships; it
//! returns fixed recognition results.

use crate::errors::Result;
use async_trait::async_trait;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Recognized speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub language: String,
}

/// One `Name: value` pair read off a lab report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValue {
    pub name: String,
    pub value: f64,
}

/// Text and interpretation extracted from a lab report image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub extracted_text: String,
    pub interpretation: String,
    pub values: Vec<LabValue>,
}

impl LabReport {
    pub fn new(extracted_text: impl Into<String>, interpretation: impl Into<String>) -> Self {
        let extracted_text = extracted_text.into();
        let values = parse_lab_values(&extracted_text);

        Self {
            extracted_text,
            interpretation: interpretation.into(),
            values,
        }
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| v.value)
    }
}

/// Trait for voice and image recognition back-ends
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Turn encoded audio into text
    async fn transcribe(&self, audio: &str, language: &str) -> Result<Transcript>;

    /// Read a lab report from an encoded image
    async fn read_report(&self, image: &str) -> Result<LabReport>;

    /// Back-end name for logging
    fn name(&self) -> &str;
}

pub const STUB_TRANSCRIPT: &str = "How to manage chemotherapy side effects?";
pub const STUB_REPORT_TEXT: &str = "WBC: 4.2, Platelets: 180, Hemoglobin: 12.5";
pub const STUB_REPORT_INTERPRETATION: &str = "Blood counts within normal range. White blood cell count is normal, platelet count is adequate, and hemoglobin level is within acceptable range.";

/// Fixed-output recognizer; ignores its input
#[derive(Debug, Clone, Default)]
pub struct StubRecognizer;

#[async_trait]
impl Recognizer for StubRecognizer {
    async fn transcribe(&self, audio: &str, language: &str) -> Result<Transcript> {
        tracing::debug!(audio_len = audio.len(), language = %language, "Stub transcription");

        Ok(Transcript {
            text: STUB_TRANSCRIPT.to_string(),
            language: language.to_string(),
        })
    }

    async fn read_report(&self, image: &str) -> Result<LabReport> {
        tracing::debug!(image_len = image.len(), "Stub report reading");

        Ok(LabReport::new(STUB_REPORT_TEXT, STUB_REPORT_INTERPRETATION))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn lab_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([A-Za-z][A-Za-z ]*?)\s*:\s*(-?\d+(?:\.\d+)?)").expect("lab value pattern is valid")
    })
}

/// Parse `Name: number` pairs in order of appearance
pub fn parse_lab_values(text: &str) -> Vec<LabValue> {
    lab_value_pattern()
        .captures_iter(text)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str().trim();
            let value = cap.get(2)?.as_str().parse::<f64>().ok()?;
            Some(LabValue {
                name: name.to_string(),
                value,
            })
        })
        .collect()
}
