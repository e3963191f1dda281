//! Customer Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Service tier (服務等級)
///
/// Drives template selection and monthly free-usage quotas.
/// Priority order: VIP > MVP > Basic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Basic,
    #[serde(rename = "MVP")]
    Mvp,
    #[serde(rename = "VIP")]
    Vip,
}

impl Tier {
    /// Total-order priority for tier selection (higher wins)
    pub const fn priority(&self) -> u8 {
        match self {
            Tier::Vip => 3,
            Tier::Mvp => 2,
            Tier::Basic => 1,
        }
    }

    /// Default monthly quota for newly created customers of this tier
    pub const fn quota_defaults(&self) -> ServiceQuota {
        match self {
            Tier::Vip => ServiceQuota {
                free_scans_per_month: 10,
                scan_overage_fee: 30,
                free_deliveries_per_month: 3,
                delivery_overage_fee: 30,
            },
            Tier::Mvp => ServiceQuota {
                free_scans_per_month: 3,
                scan_overage_fee: 30,
                free_deliveries_per_month: 1,
                delivery_overage_fee: 30,
            },
            Tier::Basic => ServiceQuota {
                free_scans_per_month: 0,
                scan_overage_fee: 30,
                free_deliveries_per_month: 0,
                delivery_overage_fee: 30,
            },
        }
    }

    /// Display label (中文敬稱前綴用)
    pub const fn label(&self) -> &'static str {
        match self {
            Tier::Vip => "VIP",
            Tier::Mvp => "MVP",
            Tier::Basic => "Basic",
        }
    }
}

/// Monthly free allowances and per-unit overage fees (NTD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceQuota {
    pub free_scans_per_month: u32,
    pub scan_overage_fee: i64,
    pub free_deliveries_per_month: u32,
    pub delivery_overage_fee: i64,
}

/// Product category (產品類別) - drives placement wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// 工商登記
    #[serde(rename = "工商登記")]
    BusinessRegistration,
    /// 辦公室
    #[serde(rename = "辦公室")]
    OfficeTenant,
}

/// Venue (館別) - a physical site with its own counter-floor options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// 民權館 (21F / 27F counters)
    #[serde(rename = "民權館")]
    Minquan,
    /// 四維館 (12F counter)
    #[serde(rename = "四維館")]
    Siwei,
}

impl Venue {
    /// Default placement floor when the customer has no preferred floor
    pub const fn default_floor(&self) -> &'static str {
        match self {
            Venue::Minquan => "21樓櫃檯",
            Venue::Siwei => "12樓櫃檯",
        }
    }

    /// Display name (serde tag)
    pub const fn name(&self) -> &'static str {
        match self {
            Venue::Minquan => "民權館",
            Venue::Siwei => "四維館",
        }
    }
}

/// Customer entity (客戶)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Human-assigned short code, unique across the registry
    pub customer_id: String,
    pub name: String,
    pub company: String,
    pub tier: Tier,
    pub product_category: ProductCategory,
    pub venue: Venue,
    /// Overrides the venue default floor in notification text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_floor: Option<String>,

    // Billing
    pub free_scans_per_month: u32,
    pub scan_overage_fee: i64,
    pub free_deliveries_per_month: u32,
    pub delivery_overage_fee: i64,
    /// Carried balance from prior settlements, cleared only by explicit admin action
    #[serde(default)]
    pub unpaid_balance: i64,

    // Contact (display only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Destination for the scan-and-email service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Customer {
    /// Resolved placement floor for notification text
    pub fn placement_floor(&self) -> &str {
        self.preferred_floor
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| self.venue.default_floor())
    }
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerCreate {
    #[validate(length(min = 1, message = "customer_id cannot be empty"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    pub company: String,
    pub tier: Tier,
    pub product_category: ProductCategory,
    pub venue: Venue,
    pub preferred_floor: Option<String>,
    /// When absent, the tier's quota defaults are applied
    pub quota: Option<ServiceQuota>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub scan_email: Option<String>,
    pub note: Option<String>,
}

/// Update customer payload (patch semantics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    /// Admin rename of the short code; uniqueness is re-checked
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub tier: Option<Tier>,
    pub product_category: Option<ProductCategory>,
    pub venue: Option<Venue>,
    pub preferred_floor: Option<Option<String>>,
    pub free_scans_per_month: Option<u32>,
    pub scan_overage_fee: Option<i64>,
    pub free_deliveries_per_month: Option<u32>,
    pub delivery_overage_fee: Option<i64>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub scan_email: Option<Option<String>>,
    pub note: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_priority_order() {
        assert!(Tier::Vip.priority() > Tier::Mvp.priority());
        assert!(Tier::Mvp.priority() > Tier::Basic.priority());
    }

    #[test]
    fn test_tier_serde_tags() {
        assert_eq!(serde_json::to_string(&Tier::Vip).unwrap(), "\"VIP\"");
        assert_eq!(serde_json::to_string(&Tier::Mvp).unwrap(), "\"MVP\"");
        assert_eq!(serde_json::to_string(&Tier::Basic).unwrap(), "\"Basic\"");

        let tier: Tier = serde_json::from_str("\"MVP\"").unwrap();
        assert_eq!(tier, Tier::Mvp);
    }

    #[test]
    fn test_quota_defaults() {
        let vip = Tier::Vip.quota_defaults();
        assert_eq!(vip.free_scans_per_month, 10);
        assert_eq!(vip.free_deliveries_per_month, 3);
        assert_eq!(vip.scan_overage_fee, 30);

        let mvp = Tier::Mvp.quota_defaults();
        assert_eq!(mvp.free_scans_per_month, 3);
        assert_eq!(mvp.free_deliveries_per_month, 1);

        let basic = Tier::Basic.quota_defaults();
        assert_eq!(basic.free_scans_per_month, 0);
    }

    #[test]
    fn test_venue_serde_tags() {
        assert_eq!(
            serde_json::to_string(&Venue::Minquan).unwrap(),
            "\"民權館\""
        );
        let venue: Venue = serde_json::from_str("\"四維館\"").unwrap();
        assert_eq!(venue, Venue::Siwei);
    }

    #[test]
    fn test_venue_default_floor() {
        assert_eq!(Venue::Minquan.default_floor(), "21樓櫃檯");
        assert_eq!(Venue::Siwei.default_floor(), "12樓櫃檯");
    }

    #[test]
    fn test_product_category_tags() {
        assert_eq!(
            serde_json::to_string(&ProductCategory::BusinessRegistration).unwrap(),
            "\"工商登記\""
        );
        assert_eq!(
            serde_json::to_string(&ProductCategory::OfficeTenant).unwrap(),
            "\"辦公室\""
        );
    }

    #[test]
    fn test_placement_floor_override() {
        let mut customer = test_customer();
        assert_eq!(customer.placement_floor(), "21樓櫃檯");

        customer.preferred_floor = Some("27樓櫃檯".to_string());
        assert_eq!(customer.placement_floor(), "27樓櫃檯");

        // Blank override falls back to the venue default
        customer.preferred_floor = Some("  ".to_string());
        assert_eq!(customer.placement_floor(), "21樓櫃檯");
    }

    #[test]
    fn test_create_payload_validation() {
        use validator::Validate;

        let payload = CustomerCreate {
            customer_id: "".to_string(),
            name: "鄭月娥".to_string(),
            company: "雲諾青騏耀斯映".to_string(),
            tier: Tier::Vip,
            product_category: ProductCategory::BusinessRegistration,
            venue: Venue::Minquan,
            preferred_floor: None,
            quota: None,
            phone: None,
            address: None,
            email: None,
            scan_email: None,
            note: None,
        };
        assert!(payload.validate().is_err());
    }

    fn test_customer() -> Customer {
        Customer {
            customer_id: "A001".to_string(),
            name: "鄭月娥".to_string(),
            company: "雲諾青騏耀斯映".to_string(),
            tier: Tier::Vip,
            product_category: ProductCategory::BusinessRegistration,
            venue: Venue::Minquan,
            preferred_floor: None,
            free_scans_per_month: 10,
            scan_overage_fee: 30,
            free_deliveries_per_month: 3,
            delivery_overage_fee: 30,
            unpaid_balance: 0,
            phone: None,
            address: None,
            email: None,
            scan_email: None,
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}
