//! Application state assembly
//!
//! Wires the storage port, customer registry, mail log, template store
//! and admin credential together from one [`Config`].

use super::config::Config;
use crate::lifecycle::MailLog;
use crate::registry::CustomerRegistry;
use crate::services::AdminCredential;
use crate::storage::{JsonFileStore, StatePort};
use crate::templating::TemplateStore;
use shared::error::{AppError, AppResult};
use std::path::Path;
use std::sync::Arc;

/// Shared application state
///
/// Cloneable handle; all components are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub port: Arc<dyn StatePort>,
    pub customers: Arc<CustomerRegistry>,
    pub mail: Arc<MailLog>,
    pub templates: Arc<TemplateStore>,
    pub credential: Arc<AdminCredential>,
}

impl AppState {
    /// Load every collection from the work directory, creating it on
    /// first run
    pub fn init(config: Config) -> AppResult<Self> {
        let work_dir = Path::new(&config.work_dir);
        let data_dir = work_dir.join("data");
        let port: Arc<dyn StatePort> = Arc::new(
            JsonFileStore::open(&data_dir).map_err(|e| AppError::persistence(e.to_string()))?,
        );

        let customers = Arc::new(CustomerRegistry::load(port.clone()).map_err(AppError::from)?);
        let mail = Arc::new(
            MailLog::load(port.clone(), config.allow_hard_delete).map_err(AppError::from)?,
        );
        let templates = Arc::new(TemplateStore::load_or_seed(port.clone())?);
        let credential = Arc::new(AdminCredential::load_or_init(
            work_dir,
            &config.admin_passcode,
        )?);

        tracing::info!(
            work_dir = %config.work_dir,
            customers = customers.snapshot_all().len(),
            "Mailroom state loaded"
        );

        Ok(Self {
            config,
            port,
            customers,
            mail,
            templates,
            credential,
        })
    }
}
