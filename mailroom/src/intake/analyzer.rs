//! Envelope analysis seam
//!
//! The OCR/vision backend sits behind [`MailAnalyzer`]; the intake
//! service only sees the structured [`MailAnalysis`] it returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::models::MailCategory;

/// One uploaded envelope photo
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Original file name, kept as the item's image reference
    pub name: String,
    pub data: Vec<u8>,
}

impl ImageInput {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Structured extraction result for one envelope
///
/// Backends return partial data freely; every field defaults so a
/// sparse extraction still produces a usable item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailAnalysis {
    #[serde(default)]
    pub recipient_name: String,
    /// Company name on the envelope, when legible
    #[serde(default)]
    pub recipient_company: Option<String>,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub sender_address: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub category: MailCategory,
    /// Handling the customer already requested on the envelope
    #[serde(default)]
    pub requested_action: Option<String>,
    /// Pre-written reply from the backend, still holding placeholders
    #[serde(default)]
    pub suggested_reply: Option<String>,
}

#[async_trait]
pub trait MailAnalyzer: Send + Sync {
    /// Extract structured fields from one envelope photo
    async fn analyze(&self, image: &ImageInput) -> AppResult<MailAnalysis>;
}
