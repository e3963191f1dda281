//! Unified error system for the mailroom suite
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authorization errors
//! - 2xxx: Customer errors
//! - 3xxx: Mail item errors
//! - 4xxx: Extraction errors
//! - 5xxx: Template errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CustomerNotFound);
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Name cannot be empty");
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "customer_id");
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
