//! Mail item model and custody states

use super::customer::{Customer, ProductCategory, Tier, Venue};
use serde::{Deserialize, Serialize};

/// Custody state (信件處理狀態)
///
/// The physical/handling disposition of a mail item. `Pending` and
/// `Notified` form the "awaiting custody decision" bucket; the rest are
/// custody actions an operator picks explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyState {
    Pending,
    Notified,
    Scanned,
    /// 移至 1 樓自助區
    #[serde(rename = "move_to_1f")]
    RelocatedToGroundFloor,
    /// 民權館 21 樓櫃檯
    #[serde(rename = "at_counter")]
    AtCounter21F,
    /// 民權館 27 樓櫃檯
    #[serde(rename = "at_counter_27")]
    AtCounter27F,
    /// 四維館 12 樓櫃檯
    #[serde(rename = "at_counter_12")]
    AtCounter12F,
    #[serde(rename = "scheduled")]
    ScheduledForDelivery,
    Discarded,
}

impl CustodyState {
    /// True for states an operator assigns explicitly (not Pending/Notified)
    pub const fn is_custody_action(&self) -> bool {
        !matches!(self, CustodyState::Pending | CustodyState::Notified)
    }

    /// Pending or Notified: no custody decision has been made yet
    pub const fn is_awaiting(&self) -> bool {
        matches!(self, CustodyState::Pending | CustodyState::Notified)
    }

    /// Display label (操作選單用)
    pub const fn label(&self) -> &'static str {
        match self {
            CustodyState::Pending => "待處理",
            CustodyState::Notified => "已通知",
            CustodyState::Scanned => "掃描回傳",
            CustodyState::RelocatedToGroundFloor => "移至1樓自助區",
            CustodyState::AtCounter21F => "21樓櫃檯",
            CustodyState::AtCounter27F => "27樓櫃檯",
            CustodyState::AtCounter12F => "12樓櫃檯",
            CustodyState::ScheduledForDelivery => "安排寄送",
            CustodyState::Discarded => "代為銷毀",
        }
    }

    /// All custody-action states, in operator menu order
    pub const ALL_ACTIONS: [CustodyState; 7] = [
        CustodyState::Scanned,
        CustodyState::RelocatedToGroundFloor,
        CustodyState::AtCounter21F,
        CustodyState::AtCounter27F,
        CustodyState::AtCounter12F,
        CustodyState::ScheduledForDelivery,
        CustodyState::Discarded,
    ];
}

impl Venue {
    /// Custody-action states valid for items held at this venue
    ///
    /// 民權館 offers the 21F/27F counters, 四維館 only the 12F counter.
    pub const fn valid_custody_states(&self) -> &'static [CustodyState] {
        match self {
            Venue::Minquan => &[
                CustodyState::Scanned,
                CustodyState::RelocatedToGroundFloor,
                CustodyState::AtCounter21F,
                CustodyState::AtCounter27F,
                CustodyState::ScheduledForDelivery,
                CustodyState::Discarded,
            ],
            Venue::Siwei => &[
                CustodyState::Scanned,
                CustodyState::RelocatedToGroundFloor,
                CustodyState::AtCounter12F,
                CustodyState::ScheduledForDelivery,
                CustodyState::Discarded,
            ],
        }
    }
}

/// Mail category from extraction (normal vs spam)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MailCategory {
    #[default]
    Normal,
    Spam,
}

/// Customer display attributes frozen onto a mail item at match time
///
/// Registry edits after the match do not touch this snapshot; an
/// explicit re-sync replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub customer_id: String,
    pub name: String,
    pub company: String,
    pub tier: Tier,
    pub product_category: ProductCategory,
    pub venue: Venue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_floor: Option<String>,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(c: &Customer) -> Self {
        Self {
            customer_id: c.customer_id.clone(),
            name: c.name.clone(),
            company: c.company.clone(),
            tier: c.tier,
            product_category: c.product_category,
            venue: c.venue,
            preferred_floor: c.preferred_floor.clone(),
        }
    }
}

/// Mail item entity (信件) - one physically scanned piece of mail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailItem {
    pub id: String,
    pub received_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<i64>,

    // Extraction content
    pub recipient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub category: MailCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_action: Option<String>,
    /// Opaque reference to the captured photo
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,

    // Match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_snapshot: Option<CustomerSnapshot>,

    pub rendered_message: String,

    // State
    pub custody_state: CustodyState,
    #[serde(default)]
    pub notified: bool,
    #[serde(default)]
    pub archived: bool,
}

impl MailItem {
    /// Item type label for notification text: 包裹 when the summary
    /// mentions a parcel, otherwise 郵件.
    pub fn item_kind_label(&self) -> &'static str {
        if self.summary.contains("包裹") {
            "包裹"
        } else {
            "郵件"
        }
    }

    /// Invariant check: archived flag and archived_at must agree
    pub fn archival_consistent(&self) -> bool {
        self.archived == self.archived_at.is_some()
    }
}
