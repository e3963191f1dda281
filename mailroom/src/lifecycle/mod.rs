//! Mail item custody lifecycle
//!
//! Items move from intake (`Pending`) through notification to a
//! custody action, then into the archive via batch settlement. The
//! `notified` flag is orthogonal to custody state and gates archival.

mod manager;

pub use manager::{LifecycleError, LifecycleResult, MailLog, SettlementReport};
