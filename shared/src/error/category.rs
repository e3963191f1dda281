//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authorization errors
/// - 2xxx: Customer errors
/// - 3xxx: Mail item errors
/// - 4xxx: Extraction errors
/// - 5xxx: Template errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authorization errors (1xxx)
    Auth,
    /// Customer errors (2xxx)
    Customer,
    /// Mail item errors (3xxx)
    Mail,
    /// Extraction errors (4xxx)
    Extraction,
    /// Template errors (5xxx)
    Template,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Customer,
            3000..4000 => Self::Mail,
            4000..5000 => Self::Extraction,
            5000..6000 => Self::Template,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Customer => "customer",
            Self::Mail => "mail",
            Self::Extraction => "extraction",
            Self::Template => "template",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
