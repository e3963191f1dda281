//! Shared types for the DT Space mailroom suite
//!
//! Entity models, unified error codes and small utilities used by the
//! mailroom engine crate.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    BackupSnapshot, Customer, CustomerSnapshot, CustodyState, MailCategory, MailItem,
    ProductCategory, Template, Tier, TierKey, Venue,
};
