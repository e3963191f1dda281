//! Backup snapshot model

use super::customer::Customer;
use super::mail_item::MailItem;
use super::template::Template;
use serde::{Deserialize, Serialize};

/// Version tag written into every exported snapshot
pub const BACKUP_VERSION: &str = "V5-COMPLETE-SYSTEM-RESTORE";

/// Per-collection record counts in the snapshot header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupCounts {
    pub customers: usize,
    pub mail_items: usize,
    pub templates: usize,
}

/// Full-state payload of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPayload {
    pub customers: Vec<Customer>,
    pub mail_items: Vec<MailItem>,
    pub templates: Vec<Template>,
}

/// Exported snapshot: metadata header plus full payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub version: String,
    pub created_at: i64,
    pub counts: BackupCounts,
    pub payload: BackupPayload,
}

impl BackupSnapshot {
    pub fn new(created_at: i64, payload: BackupPayload) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            created_at,
            counts: BackupCounts {
                customers: payload.customers.len(),
                mail_items: payload.mail_items.len(),
                templates: payload.templates.len(),
            },
            payload,
        }
    }

    /// V5-family snapshots are importable; older exports are not
    pub fn version_supported(&self) -> bool {
        self.version.starts_with("V5")
    }
}

/// Which collections to apply on import (partial restore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreSelection {
    pub customers: bool,
    pub mail_items: bool,
    pub templates: bool,
}

impl Default for RestoreSelection {
    fn default() -> Self {
        Self {
            customers: true,
            mail_items: true,
            templates: true,
        }
    }
}

impl RestoreSelection {
    pub fn is_empty(&self) -> bool {
        !(self.customers || self.mail_items || self.templates)
    }
}
