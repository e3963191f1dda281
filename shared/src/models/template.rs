//! Notification template model

use super::customer::Tier;
use serde::{Deserialize, Serialize};

/// Template selection key: one template per tier, plus the `Unknown`
/// fallback used when no customer match exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierKey {
    Basic,
    #[serde(rename = "MVP")]
    Mvp,
    #[serde(rename = "VIP")]
    Vip,
    Unknown,
}

impl From<Tier> for TierKey {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Basic => TierKey::Basic,
            Tier::Mvp => TierKey::Mvp,
            Tier::Vip => TierKey::Vip,
        }
    }
}

/// Message blueprint for one tier, containing `{{variable}}` placeholders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub tier_key: TierKey,
    pub content: String,
    pub updated_at: i64,
}

impl Template {
    pub fn new(tier_key: TierKey, content: impl Into<String>, updated_at: i64) -> Self {
        Self {
            tier_key,
            content: content.into(),
            updated_at,
        }
    }

    /// Seeded default templates, one per tier key
    pub fn defaults() -> Vec<Template> {
        vec![
            Template::new(TierKey::Vip, DEFAULT_VIP_TEMPLATE, 0),
            Template::new(TierKey::Mvp, DEFAULT_MVP_TEMPLATE, 0),
            Template::new(TierKey::Basic, DEFAULT_BASIC_TEMPLATE, 0),
            Template::new(TierKey::Unknown, DEFAULT_UNKNOWN_TEMPLATE, 0),
        ]
    }
}

pub const DEFAULT_VIP_TEMPLATE: &str = "\
親愛的道騰尊榮 VIP {{customer_name}} 您好 👑，

這裡有一件您的「{{item_kind}}」已送達 {{item_emoji}}。
{{placement}}{{id_line}}
道騰致力提供最專業的服務給您，如有任何需求，歡迎隨時聯繫我們。
{{services_section}}

祝您有個美好的一天！✨
✨ 道騰 DT Space 智能郵務管家 敬上";

pub const DEFAULT_MVP_TEMPLATE: &str = "\
道騰傑出 MVP {{customer_name}} 您好 ✨，

這裡有一件您的「{{item_kind}}」已送達 {{item_emoji}}。
{{placement}}{{id_line}}
道騰致力提供最專業的服務給您，如有任何需求，歡迎隨時聯繫我們。
{{services_section}}

祝您有個美好的一天！✨
✨ 道騰 DT Space 智能郵務管家 敬上";

pub const DEFAULT_BASIC_TEMPLATE: &str = "\
{{customer_name}} 您好 👋，

這裡有一件您的「{{item_kind}}」已送達 {{item_emoji}}。
{{placement}}{{id_line}}
道騰致力提供最專業的服務給您，如有任何需求，歡迎隨時聯繫我們。
{{services_section}}

祝您有個美好的一天！✨
✨ 道騰 DT Space 智能郵務管家 敬上";

pub const DEFAULT_UNKNOWN_TEMPLATE: &str = "\
您好 👋，

我們收到一件收件人為「{{recipient_name}}」的{{item_kind}} {{item_emoji}}，
目前尚未對應到任何取信編號，已暫置於櫃檯保管。
請與櫃檯人員聯繫確認身分後領取，謝謝您。

✨ 道騰 DT Space 智能郵務管家 敬上";
