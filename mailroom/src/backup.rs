//! Full-state backup export and (partial) restore
//!
//! Exports carry a version tag; only V5-family snapshots import.
//! Restore replaces the selected collections wholesale and is gated by
//! the admin credential at the call site.

use crate::audit_log;
use crate::lifecycle::MailLog;
use crate::registry::CustomerRegistry;
use crate::templating::TemplateStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BackupPayload, BackupSnapshot, RestoreSelection};
use shared::util::now_millis;
use std::sync::Arc;

pub struct BackupService {
    customers: Arc<CustomerRegistry>,
    mail: Arc<MailLog>,
    templates: Arc<TemplateStore>,
}

impl BackupService {
    pub fn new(
        customers: Arc<CustomerRegistry>,
        mail: Arc<MailLog>,
        templates: Arc<TemplateStore>,
    ) -> Self {
        Self {
            customers,
            mail,
            templates,
        }
    }

    /// Snapshot every collection into one exportable document
    pub fn export(&self) -> BackupSnapshot {
        let snapshot = BackupSnapshot::new(
            now_millis(),
            BackupPayload {
                customers: self.customers.snapshot_all(),
                mail_items: self.mail.snapshot_all(),
                templates: self.templates.all(),
            },
        );
        tracing::info!(
            customers = snapshot.counts.customers,
            mail_items = snapshot.counts.mail_items,
            "Backup exported"
        );
        snapshot
    }

    pub fn export_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| AppError::with_message(ErrorCode::SerializationFailed, e.to_string()))
    }

    /// Replace the selected collections with the snapshot's payload
    ///
    /// Unselected collections are untouched; selecting nothing is an
    /// error rather than a silent no-op.
    pub fn import(&self, snapshot: BackupSnapshot, selection: RestoreSelection) -> AppResult<()> {
        if !snapshot.version_supported() {
            return Err(AppError::with_message(
                ErrorCode::BackupVersionMismatch,
                format!("Unsupported backup version: {}", snapshot.version),
            )
            .with_detail("version", snapshot.version));
        }
        if selection.is_empty() {
            return Err(AppError::invalid_request("No collections selected for restore"));
        }

        if selection.customers {
            self.customers
                .replace_all(snapshot.payload.customers)
                .map_err(AppError::from)?;
        }
        if selection.mail_items {
            self.mail
                .replace_all(snapshot.payload.mail_items)
                .map_err(AppError::from)?;
        }
        if selection.templates {
            self.templates.replace_all(snapshot.payload.templates)?;
        }

        audit_log!(
            "admin",
            "restore",
            "backup",
            format!(
                "customers={} mail_items={} templates={}",
                selection.customers, selection.mail_items, selection.templates
            )
        );
        Ok(())
    }

    pub fn import_json(&self, raw: &str, selection: RestoreSelection) -> AppResult<()> {
        let snapshot: BackupSnapshot = serde_json::from_str(raw).map_err(|e| {
            AppError::with_message(
                ErrorCode::BackupInvalid,
                format!("Malformed backup document: {}", e),
            )
        })?;
        self.import(snapshot, selection)
    }
}
