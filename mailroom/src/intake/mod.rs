//! Bulk mail intake
//!
//! Uploaded envelope photos are analyzed concurrently; each result is
//! matched against the customer registry, rendered into a notification
//! message and recorded in the mail log. One bad image never sinks the
//! batch.

mod analyzer;
mod service;

pub use analyzer::{ImageInput, MailAnalysis, MailAnalyzer};
pub use service::{BatchOutcome, IntakeService, ProgressFn};
