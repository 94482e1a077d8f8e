//! OncoAssist Common Library
//!
//! Shared code for the OncoAssist services including:
//! - Knowledge base (guidelines, local resources, care stages)
//! - Advisory engine (classification, risk rules, response composition)
//! - Multimodal recognizer abstraction
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod advisory;
pub mod config;
pub mod errors;
pub mod knowledge;
pub mod metrics;
pub mod multimodal;

// Re-export commonly used types
pub use advisory::{Advisor, UserContext};
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use knowledge::{CancerType, KnowledgeBase};
pub use multimodal::Recognizer;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
