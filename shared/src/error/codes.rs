//! Unified error codes for the mailroom suite
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authorization errors
//! - 2xxx: Customer errors
//! - 3xxx: Mail item / custody errors
//! - 4xxx: Extraction errors
//! - 5xxx: Template errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Authorization ====================
    /// Caller is not authorized for this operation
    NotAuthorized = 1001,
    /// Admin passcode is wrong
    InvalidPasscode = 1002,

    // ==================== 2xxx: Customer ====================
    /// Customer not found
    CustomerNotFound = 2001,
    /// Customer ID already exists
    CustomerIdExists = 2002,

    // ==================== 3xxx: Mail item ====================
    /// Mail item not found
    MailItemNotFound = 3001,
    /// Custody transition not allowed
    InvalidTransition = 3002,
    /// Mail item has already been archived
    AlreadyArchived = 3003,
    /// Mail item has not been confirmed as notified
    NotNotified = 3004,
    /// Hard deletion is disabled by configuration
    DeleteDisabled = 3005,

    // ==================== 4xxx: Extraction ====================
    /// Image analysis / extraction failed
    ExtractionFailed = 4001,
    /// Batch contained no images
    EmptyBatch = 4002,

    // ==================== 5xxx: Template ====================
    /// Template not found
    TemplateNotFound = 5001,
    /// Template variable could not be resolved
    UnresolvedVariable = 5002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Persisting state to storage failed
    PersistenceFailed = 9002,
    /// Serialization failed
    SerializationFailed = 9003,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 91xx: Backup ====================
    /// Backup payload is invalid
    BackupInvalid = 9101,
    /// Backup version tag is not supported
    BackupVersionMismatch = 9102,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Authorization
            ErrorCode::NotAuthorized => "Not authorized for this operation",
            ErrorCode::InvalidPasscode => "Invalid admin passcode",

            // Customer
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerIdExists => "Customer ID already exists",

            // Mail item
            ErrorCode::MailItemNotFound => "Mail item not found",
            ErrorCode::InvalidTransition => "Custody transition not allowed",
            ErrorCode::AlreadyArchived => "Mail item has already been archived",
            ErrorCode::NotNotified => "Mail item has not been marked as notified",
            ErrorCode::DeleteDisabled => "Hard deletion is disabled",

            // Extraction
            ErrorCode::ExtractionFailed => "Image analysis failed",
            ErrorCode::EmptyBatch => "Batch contained no images",

            // Template
            ErrorCode::TemplateNotFound => "Template not found",
            ErrorCode::UnresolvedVariable => "Template variable could not be resolved",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::PersistenceFailed => "Failed to persist state",
            ErrorCode::SerializationFailed => "Serialization failed",
            ErrorCode::ConfigError => "Configuration error",

            // Backup
            ErrorCode::BackupInvalid => "Backup payload is invalid",
            ErrorCode::BackupVersionMismatch => "Backup version is not supported",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Authorization
            1001 => Ok(ErrorCode::NotAuthorized),
            1002 => Ok(ErrorCode::InvalidPasscode),

            // Customer
            2001 => Ok(ErrorCode::CustomerNotFound),
            2002 => Ok(ErrorCode::CustomerIdExists),

            // Mail item
            3001 => Ok(ErrorCode::MailItemNotFound),
            3002 => Ok(ErrorCode::InvalidTransition),
            3003 => Ok(ErrorCode::AlreadyArchived),
            3004 => Ok(ErrorCode::NotNotified),
            3005 => Ok(ErrorCode::DeleteDisabled),

            // Extraction
            4001 => Ok(ErrorCode::ExtractionFailed),
            4002 => Ok(ErrorCode::EmptyBatch),

            // Template
            5001 => Ok(ErrorCode::TemplateNotFound),
            5002 => Ok(ErrorCode::UnresolvedVariable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::PersistenceFailed),
            9003 => Ok(ErrorCode::SerializationFailed),
            9005 => Ok(ErrorCode::ConfigError),

            // Backup
            9101 => Ok(ErrorCode::BackupInvalid),
            9102 => Ok(ErrorCode::BackupVersionMismatch),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Authorization
        assert_eq!(ErrorCode::NotAuthorized.code(), 1001);
        assert_eq!(ErrorCode::InvalidPasscode.code(), 1002);

        // Customer
        assert_eq!(ErrorCode::CustomerNotFound.code(), 2001);
        assert_eq!(ErrorCode::CustomerIdExists.code(), 2002);

        // Mail item
        assert_eq!(ErrorCode::MailItemNotFound.code(), 3001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 3002);
        assert_eq!(ErrorCode::AlreadyArchived.code(), 3003);
        assert_eq!(ErrorCode::NotNotified.code(), 3004);
        assert_eq!(ErrorCode::DeleteDisabled.code(), 3005);

        // Extraction
        assert_eq!(ErrorCode::ExtractionFailed.code(), 4001);
        assert_eq!(ErrorCode::EmptyBatch.code(), 4002);

        // Template
        assert_eq!(ErrorCode::TemplateNotFound.code(), 5001);
        assert_eq!(ErrorCode::UnresolvedVariable.code(), 5002);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::PersistenceFailed.code(), 9002);
        assert_eq!(ErrorCode::SerializationFailed.code(), 9003);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
        assert_eq!(ErrorCode::BackupInvalid.code(), 9101);
        assert_eq!(ErrorCode::BackupVersionMismatch.code(), 9102);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::MailItemNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthorized));
        assert_eq!(ErrorCode::try_from(3002), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::PersistenceFailed));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::CustomerNotFound).unwrap();
        assert_eq!(json, "2001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);

        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::ExtractionFailed);

        let result: Result<ErrorCode, _> = serde_json::from_str("777");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::InvalidTransition), "3002");
        assert_eq!(
            ErrorCode::InvalidTransition.message(),
            "Custody transition not allowed"
        );
        assert_eq!(ErrorCode::CustomerNotFound.message(), "Customer not found");
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthorized,
            ErrorCode::CustomerIdExists,
            ErrorCode::InvalidTransition,
            ErrorCode::PersistenceFailed,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }
}
