//! Customer registry (取信編號資料庫)
//!
//! Holds customer records with tier, venue and billing attributes.
//! Mutations persist the whole collection through the storage port;
//! a failed save keeps the in-memory mutation and surfaces a distinct
//! persistence error.

use crate::storage::{CollectionKey, StatePort, StoreError};
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerCreate, CustomerUpdate, Tier};
use shared::util::now_millis;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Customer ID already exists: {0}")]
    DuplicateId(String),

    #[error("Customer not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateId(id) => {
                AppError::with_message(ErrorCode::CustomerIdExists, format!("取信編號已存在: {}", id))
                    .with_detail("customer_id", id)
            }
            RegistryError::NotFound(id) => {
                AppError::with_message(ErrorCode::CustomerNotFound, format!("Customer not found: {}", id))
                    .with_detail("customer_id", id)
            }
            RegistryError::Validation(msg) => AppError::validation(msg),
            RegistryError::Store(e) => AppError::persistence(e.to_string()),
            RegistryError::Serialization(e) => {
                AppError::with_message(ErrorCode::SerializationFailed, e.to_string())
            }
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// List filter: case-insensitive substring search AND-combined with an
/// OR over selected tiers.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search_text: Option<String>,
    pub tiers: Vec<Tier>,
}

pub struct CustomerRegistry {
    customers: RwLock<Vec<Customer>>,
    port: Arc<dyn StatePort>,
}

impl CustomerRegistry {
    /// Load persisted customers (empty registry when nothing stored)
    pub fn load(port: Arc<dyn StatePort>) -> RegistryResult<Self> {
        let customers = match port.load(CollectionKey::Customers)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            customers: RwLock::new(customers),
            port,
        })
    }

    pub fn create(&self, payload: CustomerCreate) -> RegistryResult<Customer> {
        payload
            .validate()
            .map_err(|e| RegistryError::Validation(e.to_string()))?;

        let mut customers = self.customers.write();
        if customers
            .iter()
            .any(|c| c.customer_id == payload.customer_id)
        {
            return Err(RegistryError::DuplicateId(payload.customer_id));
        }

        let quota = payload.quota.unwrap_or_else(|| payload.tier.quota_defaults());
        let now = now_millis();
        let customer = Customer {
            customer_id: payload.customer_id,
            name: payload.name,
            company: payload.company,
            tier: payload.tier,
            product_category: payload.product_category,
            venue: payload.venue,
            preferred_floor: payload.preferred_floor,
            free_scans_per_month: quota.free_scans_per_month,
            scan_overage_fee: quota.scan_overage_fee,
            free_deliveries_per_month: quota.free_deliveries_per_month,
            delivery_overage_fee: quota.delivery_overage_fee,
            unpaid_balance: 0,
            phone: payload.phone,
            address: payload.address,
            email: payload.email,
            scan_email: payload.scan_email,
            note: payload.note,
            created_at: now,
            updated_at: now,
        };
        customers.push(customer.clone());
        drop(customers);

        self.persist()?;
        tracing::info!(customer_id = %customer.customer_id, "Customer created");
        Ok(customer)
    }

    pub fn update(&self, customer_id: &str, patch: CustomerUpdate) -> RegistryResult<Customer> {
        let mut customers = self.customers.write();

        // Renaming the short code re-checks uniqueness
        if let Some(new_id) = &patch.customer_id
            && new_id != customer_id
            && customers.iter().any(|c| &c.customer_id == new_id)
        {
            return Err(RegistryError::DuplicateId(new_id.clone()));
        }

        let customer = customers
            .iter_mut()
            .find(|c| c.customer_id == customer_id)
            .ok_or_else(|| RegistryError::NotFound(customer_id.to_string()))?;

        if let Some(v) = patch.customer_id {
            customer.customer_id = v;
        }
        if let Some(v) = patch.name {
            customer.name = v;
        }
        if let Some(v) = patch.company {
            customer.company = v;
        }
        if let Some(v) = patch.tier {
            customer.tier = v;
        }
        if let Some(v) = patch.product_category {
            customer.product_category = v;
        }
        if let Some(v) = patch.venue {
            customer.venue = v;
        }
        if let Some(v) = patch.preferred_floor {
            customer.preferred_floor = v;
        }
        if let Some(v) = patch.free_scans_per_month {
            customer.free_scans_per_month = v;
        }
        if let Some(v) = patch.scan_overage_fee {
            customer.scan_overage_fee = v;
        }
        if let Some(v) = patch.free_deliveries_per_month {
            customer.free_deliveries_per_month = v;
        }
        if let Some(v) = patch.delivery_overage_fee {
            customer.delivery_overage_fee = v;
        }
        if let Some(v) = patch.phone {
            customer.phone = v;
        }
        if let Some(v) = patch.address {
            customer.address = v;
        }
        if let Some(v) = patch.email {
            customer.email = v;
        }
        if let Some(v) = patch.scan_email {
            customer.scan_email = v;
        }
        if let Some(v) = patch.note {
            customer.note = v;
        }
        customer.updated_at = now_millis();

        let updated = customer.clone();
        drop(customers);

        self.persist()?;
        Ok(updated)
    }

    /// Remove a customer; historical mail items keep their snapshots
    pub fn delete(&self, customer_id: &str) -> RegistryResult<()> {
        let mut customers = self.customers.write();
        let before = customers.len();
        customers.retain(|c| c.customer_id != customer_id);
        if customers.len() == before {
            return Err(RegistryError::NotFound(customer_id.to_string()));
        }
        drop(customers);

        self.persist()?;
        tracing::info!(customer_id = %customer_id, "Customer deleted");
        Ok(())
    }

    pub fn find(&self, customer_id: &str) -> RegistryResult<Customer> {
        self.customers
            .read()
            .iter()
            .find(|c| c.customer_id == customer_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(customer_id.to_string()))
    }

    pub fn list(&self, filter: &ListFilter) -> Vec<Customer> {
        let search = filter
            .search_text
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        self.customers
            .read()
            .iter()
            .filter(|c| {
                let search_ok = match &search {
                    Some(text) => {
                        c.name.to_lowercase().contains(text)
                            || c.company.to_lowercase().contains(text)
                            || c.customer_id.to_lowercase().contains(text)
                    }
                    None => true,
                };
                let tier_ok = filter.tiers.is_empty() || filter.tiers.contains(&c.tier);
                search_ok && tier_ok
            })
            .cloned()
            .collect()
    }

    /// Adjust the carried unpaid balance (admin action)
    pub fn adjust_balance(&self, customer_id: &str, delta: i64) -> RegistryResult<Customer> {
        self.set_balance(customer_id, |balance| balance + delta)
    }

    /// 結清帳單: zero the carried unpaid balance
    pub fn settle_balance(&self, customer_id: &str) -> RegistryResult<Customer> {
        let customer = self.set_balance(customer_id, |_| 0)?;
        tracing::info!(customer_id = %customer_id, "Unpaid balance settled");
        Ok(customer)
    }

    fn set_balance(
        &self,
        customer_id: &str,
        f: impl FnOnce(i64) -> i64,
    ) -> RegistryResult<Customer> {
        let mut customers = self.customers.write();
        let customer = customers
            .iter_mut()
            .find(|c| c.customer_id == customer_id)
            .ok_or_else(|| RegistryError::NotFound(customer_id.to_string()))?;
        customer.unpaid_balance = f(customer.unpaid_balance);
        customer.updated_at = now_millis();
        let updated = customer.clone();
        drop(customers);

        self.persist()?;
        Ok(updated)
    }

    /// Full list, for matching and backup export
    pub fn snapshot_all(&self) -> Vec<Customer> {
        self.customers.read().clone()
    }

    /// Replace the whole collection (backup restore)
    pub fn replace_all(&self, customers: Vec<Customer>) -> RegistryResult<()> {
        *self.customers.write() = customers;
        self.persist()
    }

    fn persist(&self) -> RegistryResult<()> {
        let raw = serde_json::to_string(&*self.customers.read())?;
        self.port.save(CollectionKey::Customers, &raw)?;
        Ok(())
    }
}
