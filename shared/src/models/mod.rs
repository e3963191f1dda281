//! Data models
//!
//! Shared between the mailroom engine and its persistence/backup
//! boundaries. Timestamps are `i64` UTC milliseconds; money amounts are
//! integer NTD.

pub mod backup;
pub mod customer;
pub mod mail_item;
pub mod template;

// Re-exports
pub use backup::*;
pub use customer::*;
pub use mail_item::*;
pub use template::*;
