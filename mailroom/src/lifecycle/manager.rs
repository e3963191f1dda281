use crate::audit_log;
use crate::storage::{CollectionKey, StatePort, StoreError};
use crate::templating::{TemplateStore, render_for_item};
use parking_lot::RwLock;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerSnapshot, CustodyState, MailItem};
use shared::util::now_millis;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Mail item not found: {0}")]
    NotFound(String),

    #[error("Invalid custody action {action:?} for item {id}")]
    InvalidTransition { id: String, action: CustodyState },

    #[error("Settlement category must be a custody action: {0:?}")]
    InvalidCategory(CustodyState),

    #[error("Mail item already archived: {0}")]
    AlreadyArchived(String),

    #[error("Hard delete is disabled")]
    DeleteDisabled,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotFound(id) => {
                AppError::with_message(ErrorCode::MailItemNotFound, format!("Mail item not found: {}", id))
                    .with_detail("item_id", id)
            }
            LifecycleError::InvalidTransition { id, action } => {
                AppError::invalid_transition(format!("{:?} not valid for item {}", action, id))
            }
            LifecycleError::InvalidCategory(state) => {
                AppError::invalid_transition(format!("{:?} is not a settleable category", state))
            }
            LifecycleError::AlreadyArchived(id) => {
                AppError::with_message(ErrorCode::AlreadyArchived, format!("Mail item already archived: {}", id))
                    .with_detail("item_id", id)
            }
            LifecycleError::DeleteDisabled => AppError::new(ErrorCode::DeleteDisabled),
            LifecycleError::Store(e) => AppError::persistence(e.to_string()),
            LifecycleError::Serialization(e) => {
                AppError::with_message(ErrorCode::SerializationFailed, e.to_string())
            }
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Outcome of one batch settlement (月結歸檔)
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    /// IDs archived in this pass
    pub archived: Vec<String>,
    /// IDs skipped because the customer was never notified
    pub skipped: Vec<String>,
}

/// Mail item log and custody state machine
pub struct MailLog {
    items: RwLock<Vec<MailItem>>,
    port: Arc<dyn StatePort>,
    allow_hard_delete: bool,
}

impl MailLog {
    /// Load persisted items (empty log when nothing stored)
    pub fn load(port: Arc<dyn StatePort>, allow_hard_delete: bool) -> LifecycleResult<Self> {
        let items = match port.load(CollectionKey::MailItems)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            items: RwLock::new(items),
            port,
            allow_hard_delete,
        })
    }

    /// Insert a freshly built item (intake)
    pub fn insert(&self, item: MailItem) -> LifecycleResult<MailItem> {
        self.items.write().push(item.clone());
        self.persist()?;
        tracing::info!(item_id = %item.id, recipient = %item.recipient_name, "Mail item recorded");
        Ok(item)
    }

    pub fn find(&self, id: &str) -> LifecycleResult<MailItem> {
        self.items
            .read()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| LifecycleError::NotFound(id.to_string()))
    }

    /// All non-archived items, newest first
    pub fn active(&self) -> Vec<MailItem> {
        let mut items: Vec<MailItem> = self
            .items
            .read()
            .iter()
            .filter(|i| !i.archived)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        items
    }

    /// Archived items, newest first
    pub fn history(&self) -> Vec<MailItem> {
        let mut items: Vec<MailItem> = self
            .items
            .read()
            .iter()
            .filter(|i| i.archived)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        items
    }

    /// Items still waiting on a custody decision
    pub fn awaiting(&self) -> Vec<MailItem> {
        self.items
            .read()
            .iter()
            .filter(|i| !i.archived && i.custody_state.is_awaiting())
            .cloned()
            .collect()
    }

    pub fn by_state(&self, state: CustodyState) -> Vec<MailItem> {
        self.items
            .read()
            .iter()
            .filter(|i| !i.archived && i.custody_state == state)
            .cloned()
            .collect()
    }

    pub fn by_customer(&self, customer_id: &str) -> Vec<MailItem> {
        self.items
            .read()
            .iter()
            .filter(|i| i.matched_customer_id.as_deref() == Some(customer_id))
            .cloned()
            .collect()
    }

    /// Custody actions selectable for an item
    ///
    /// Venue-restricted for matched items; an unmatched item has no
    /// venue, so every action stays available.
    pub fn valid_actions(&self, id: &str) -> LifecycleResult<&'static [CustodyState]> {
        let item = self.find(id)?;
        Ok(match &item.customer_snapshot {
            Some(snap) => snap.venue.valid_custody_states(),
            None => &CustodyState::ALL_ACTIONS,
        })
    }

    /// Record that the notification message was delivered
    ///
    /// Moves a `Pending` item to `Notified`; an item already holding a
    /// custody action keeps it.
    pub fn mark_notified(&self, id: &str) -> LifecycleResult<MailItem> {
        let updated = self.mutate(id, |item| {
            if item.archived {
                return Err(LifecycleError::AlreadyArchived(item.id.clone()));
            }
            item.notified = true;
            if item.custody_state == CustodyState::Pending {
                item.custody_state = CustodyState::Notified;
            }
            Ok(())
        })?;
        tracing::info!(item_id = %id, "Mail item notified");
        Ok(updated)
    }

    /// Assign a custody action (掃描/移置一樓/櫃檯/排程寄送/銷毀)
    ///
    /// The action must be valid for the matched customer's venue and
    /// implies the customer has been informed of the handling.
    pub fn assign_custody(&self, id: &str, action: CustodyState) -> LifecycleResult<MailItem> {
        let updated = self.mutate(id, |item| {
            if item.archived {
                return Err(LifecycleError::AlreadyArchived(item.id.clone()));
            }
            let allowed = match &item.customer_snapshot {
                Some(snap) => snap.venue.valid_custody_states().contains(&action),
                None => action.is_custody_action(),
            };
            if !allowed || !action.is_custody_action() {
                return Err(LifecycleError::InvalidTransition {
                    id: item.id.clone(),
                    action,
                });
            }
            item.custody_state = action;
            item.notified = true;
            Ok(())
        })?;
        tracing::info!(item_id = %id, action = %action.label(), "Custody action assigned");
        Ok(updated)
    }

    /// 批次結案: archive the notified items of one custody category
    ///
    /// The operator settles one handling pool at a time; items sitting
    /// in other custody categories are never touched. Non-notified
    /// items of the category are skipped and reported, never archived.
    /// The whole batch is applied in one pass and persisted once.
    pub fn settle_batch(&self, category: CustodyState) -> LifecycleResult<SettlementReport> {
        if !category.is_custody_action() {
            return Err(LifecycleError::InvalidCategory(category));
        }

        let now = now_millis();
        let mut archived = Vec::new();
        let mut skipped = Vec::new();

        {
            let mut items = self.items.write();
            for item in items.iter_mut() {
                if item.archived || item.custody_state != category {
                    continue;
                }
                if !item.notified {
                    skipped.push(item.id.clone());
                    continue;
                }
                item.archived = true;
                item.archived_at = Some(now);
                // Archived items start the next cycle un-notified
                item.notified = false;
                archived.push(item.id.clone());
            }
        }

        self.persist()?;
        audit_log!(
            "admin",
            "settle_batch",
            format!("mail_items:{}", category.label()),
            format!("archived {}, skipped {}", archived.len(), skipped.len())
        );
        Ok(SettlementReport { archived, skipped })
    }

    /// Pull an archived item back into the active log
    pub fn reopen(&self, id: &str) -> LifecycleResult<MailItem> {
        let updated = self.mutate(id, |item| {
            if !item.archived {
                return Err(LifecycleError::InvalidTransition {
                    id: item.id.clone(),
                    action: item.custody_state,
                });
            }
            item.archived = false;
            item.archived_at = None;
            Ok(())
        })?;
        tracing::info!(item_id = %id, "Mail item reopened");
        Ok(updated)
    }

    /// Permanently remove an item; gated by configuration
    pub fn delete(&self, id: &str) -> LifecycleResult<()> {
        if !self.allow_hard_delete {
            return Err(LifecycleError::DeleteDisabled);
        }
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Err(LifecycleError::NotFound(id.to_string()));
        }
        drop(items);

        self.persist()?;
        audit_log!("admin", "delete_item", format!("mail_item:{}", id));
        Ok(())
    }

    /// Re-point an item at a different customer (or detach it) and
    /// re-render its notification message
    pub fn reassign_match(
        &self,
        id: &str,
        customer: Option<&Customer>,
        templates: &TemplateStore,
    ) -> LifecycleResult<MailItem> {
        self.mutate(id, |item| {
            if item.archived {
                return Err(LifecycleError::AlreadyArchived(item.id.clone()));
            }
            item.matched_customer_id = customer.map(|c| c.customer_id.clone());
            item.customer_snapshot = customer.map(CustomerSnapshot::from);
            item.rendered_message =
                render_for_item(templates, item.customer_snapshot.as_ref(), item);
            Ok(())
        })
    }

    /// Refresh a stale snapshot from the live customer record
    ///
    /// Snapshots freeze at intake; edits to the customer are only
    /// picked up through this explicit re-sync.
    pub fn resync_snapshot(
        &self,
        id: &str,
        customer: &Customer,
        templates: &TemplateStore,
    ) -> LifecycleResult<MailItem> {
        self.mutate(id, |item| {
            if item.matched_customer_id.as_deref() != Some(customer.customer_id.as_str()) {
                return Err(LifecycleError::NotFound(item.id.clone()));
            }
            item.customer_snapshot = Some(CustomerSnapshot::from(customer));
            item.rendered_message =
                render_for_item(templates, item.customer_snapshot.as_ref(), item);
            Ok(())
        })
    }

    /// Admin edit of the outgoing message text
    pub fn update_message(&self, id: &str, message: impl Into<String>) -> LifecycleResult<MailItem> {
        let message = message.into();
        self.mutate(id, |item| {
            item.rendered_message = message.clone();
            Ok(())
        })
    }

    /// Full list, for billing and backup export
    pub fn snapshot_all(&self) -> Vec<MailItem> {
        self.items.read().clone()
    }

    /// Replace the whole collection (backup restore)
    pub fn replace_all(&self, items: Vec<MailItem>) -> LifecycleResult<()> {
        *self.items.write() = items;
        self.persist()
    }

    fn mutate(
        &self,
        id: &str,
        f: impl FnOnce(&mut MailItem) -> LifecycleResult<()>,
    ) -> LifecycleResult<MailItem> {
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| LifecycleError::NotFound(id.to_string()))?;
        f(item)?;
        let updated = item.clone();
        drop(items);

        self.persist()?;
        Ok(updated)
    }

    fn persist(&self) -> LifecycleResult<()> {
        let raw = serde_json::to_string(&*self.items.read())?;
        self.port.save(CollectionKey::MailItems, &raw)?;
        Ok(())
    }
}
