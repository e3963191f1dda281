//! Template store
//!
//! Seeded with per-tier defaults on first run; admin edits are
//! persisted whole-collection through the storage port.

use crate::storage::{CollectionKey, StatePort};
use parking_lot::RwLock;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Template, TierKey};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TemplateStore {
    templates: RwLock<HashMap<TierKey, Template>>,
    port: Option<Arc<dyn StatePort>>,
}

impl TemplateStore {
    /// Build from an explicit template set, filling missing tier keys
    /// with defaults. No persistence; used for tests and pure rendering.
    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            templates: RwLock::new(Self::fill_defaults(templates)),
            port: None,
        }
    }

    /// Load persisted templates or seed the defaults
    pub fn load_or_seed(port: Arc<dyn StatePort>) -> AppResult<Self> {
        let templates = match port.load(CollectionKey::Templates)? {
            Some(raw) => serde_json::from_str::<Vec<Template>>(&raw).map_err(|e| {
                AppError::with_message(
                    ErrorCode::SerializationFailed,
                    format!("Failed to parse stored templates: {}", e),
                )
            })?,
            None => {
                tracing::info!("No stored templates, seeding defaults");
                Template::defaults()
            }
        };
        let store = Self {
            templates: RwLock::new(Self::fill_defaults(templates)),
            port: Some(port),
        };
        Ok(store)
    }

    fn fill_defaults(templates: Vec<Template>) -> HashMap<TierKey, Template> {
        let mut map: HashMap<TierKey, Template> = Template::defaults()
            .into_iter()
            .map(|t| (t.tier_key, t))
            .collect();
        for template in templates {
            map.insert(template.tier_key, template);
        }
        map
    }

    /// Get the template for a tier key
    ///
    /// Every key is guaranteed present (defaults fill gaps at load).
    pub fn get(&self, key: TierKey) -> Template {
        self.templates
            .read()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Template::defaults()
                    .into_iter()
                    .find(|t| t.tier_key == key)
                    .expect("defaults cover every tier key")
            })
    }

    /// All templates, for backup export
    pub fn all(&self) -> Vec<Template> {
        self.templates.read().values().cloned().collect()
    }

    /// Admin edit of one tier's template content
    pub fn update(&self, key: TierKey, content: impl Into<String>) -> AppResult<Template> {
        let template = Template::new(key, content, now_millis());
        self.templates.write().insert(key, template.clone());
        self.persist()?;
        tracing::info!(tier_key = ?key, "Template updated");
        Ok(template)
    }

    /// Replace the whole set (backup restore)
    pub fn replace_all(&self, templates: Vec<Template>) -> AppResult<()> {
        *self.templates.write() = Self::fill_defaults(templates);
        self.persist()
    }

    fn persist(&self) -> AppResult<()> {
        let Some(port) = &self.port else {
            return Ok(());
        };
        let raw = serde_json::to_string(&self.all()).map_err(|e| {
            AppError::with_message(ErrorCode::SerializationFailed, e.to_string())
        })?;
        port.save(CollectionKey::Templates, &raw)?;
        Ok(())
    }
}
