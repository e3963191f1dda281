//! Typed template variables and section builders

use shared::models::{CustomerSnapshot, MailItem, ProductCategory, Tier};
use std::collections::HashMap;

/// Variable keys usable inside template `{{...}}` placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVar {
    CustomerName,
    CustomerId,
    Company,
    /// Resolved placement sentence (preferred floor / venue default / office mailbox)
    Placement,
    /// 包裹 or 郵件
    ItemKind,
    ItemEmoji,
    /// Pickup-code line, empty unless 工商登記
    IdLine,
    /// Assisted-services block, a function of (tier, product category)
    ServicesSection,
    SenderName,
    RecipientName,
}

impl TemplateVar {
    /// Placeholder name as written in template text
    pub const fn name(&self) -> &'static str {
        match self {
            TemplateVar::CustomerName => "customer_name",
            TemplateVar::CustomerId => "customer_id",
            TemplateVar::Company => "company",
            TemplateVar::Placement => "placement",
            TemplateVar::ItemKind => "item_kind",
            TemplateVar::ItemEmoji => "item_emoji",
            TemplateVar::IdLine => "id_line",
            TemplateVar::ServicesSection => "services_section",
            TemplateVar::SenderName => "sender_name",
            TemplateVar::RecipientName => "recipient_name",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "customer_name" => TemplateVar::CustomerName,
            "customer_id" => TemplateVar::CustomerId,
            "company" => TemplateVar::Company,
            "placement" => TemplateVar::Placement,
            "item_kind" => TemplateVar::ItemKind,
            "item_emoji" => TemplateVar::ItemEmoji,
            "id_line" => TemplateVar::IdLine,
            "services_section" => TemplateVar::ServicesSection,
            "sender_name" => TemplateVar::SenderName,
            "recipient_name" => TemplateVar::RecipientName,
            _ => return None,
        })
    }
}

/// Resolved variable values for one rendering
pub type VarMap = HashMap<TemplateVar, String>;

fn resolved_floor(snapshot: &CustomerSnapshot) -> String {
    snapshot
        .preferred_floor
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| snapshot.venue.default_floor())
        .to_string()
}

fn placement_sentence(snapshot: &CustomerSnapshot, item_kind: &str) -> String {
    // 辦公室客戶的一般郵件直接投遞信箱，其餘放置於取件樓層
    if snapshot.product_category == ProductCategory::OfficeTenant && item_kind == "郵件" {
        "今日信件，幫您投遞到您的辦公室信箱內。".to_string()
    } else {
        format!(
            "我們已將您的{}放置於「{}」，方便您隨時親自前來領取。",
            item_kind,
            resolved_floor(snapshot)
        )
    }
}

fn services_section(snapshot: &CustomerSnapshot, item_kind: &str) -> String {
    let is_business_reg = snapshot.product_category == ProductCategory::BusinessRegistration;
    let is_mvp_or_vip = matches!(snapshot.tier, Tier::Vip | Tier::Mvp);

    if is_business_reg && is_mvp_or_vip {
        let tier_label = match snapshot.tier {
            Tier::Vip => "尊榮 VIP",
            _ => "傑出 MVP",
        };
        format!(
            "\n💡 如您暫時不便親自前來，我們為{tier_label} 會員特別提供以下專屬{item_kind}處理服務（請選擇適合您的選項，直接回覆本訊息告知，我們將優先為您處理）：
① 待您方便時親自前來櫃檯領取（目前{item_kind}置放於此）
② 協助移置至一樓信件自取區，方便您更彈性取件
③ 統一於月底為您轉寄至指定地址（運費另計，請提供完整收件資訊）
④ 先開封掃描內容並以電子檔方式傳送給您（確保隱私安全）
⑤ 若您判斷為非重要{item_kind}，可授權我們直接銷毀處理
我們將根據您的指示，盡快為您安排，確保服務高效且安心。"
        )
    } else if is_business_reg {
        format!(
            "\n💡 如您暫時不便親自前來，我們也可提供以下協助服務（僅限緊急情況）：
協助轉寄{item_kind}（運費另計，請提供完整收件地址及寄送方式，例如是否急件）"
        )
    } else {
        "\n請直接回覆此訊息告知您的需求，我們將盡快為您處理。".to_string()
    }
}

/// Build the complete variable map for an item and its (optional) match
///
/// Every [`TemplateVar`] gets a value so admin-edited templates can use
/// any of them; missing extraction fields resolve to neutral defaults.
pub fn build_vars(snapshot: Option<&CustomerSnapshot>, item: &MailItem) -> VarMap {
    let item_kind = item.item_kind_label().to_string();
    let item_emoji = if item_kind == "包裹" { "📦" } else { "📩" };

    let mut vars = VarMap::new();
    vars.insert(TemplateVar::ItemKind, item_kind.clone());
    vars.insert(TemplateVar::ItemEmoji, item_emoji.to_string());
    vars.insert(
        TemplateVar::SenderName,
        item.sender_name.clone().unwrap_or_default(),
    );
    vars.insert(TemplateVar::RecipientName, item.recipient_name.clone());

    match snapshot {
        Some(snap) => {
            vars.insert(TemplateVar::CustomerName, snap.name.clone());
            vars.insert(TemplateVar::CustomerId, snap.customer_id.clone());
            vars.insert(TemplateVar::Company, snap.company.clone());
            vars.insert(TemplateVar::Placement, placement_sentence(snap, &item_kind));
            let id_line = if snap.product_category == ProductCategory::BusinessRegistration {
                format!("\n您的取信編號【#{}】", snap.customer_id)
            } else {
                String::new()
            };
            vars.insert(TemplateVar::IdLine, id_line);
            vars.insert(
                TemplateVar::ServicesSection,
                services_section(snap, &item_kind),
            );
        }
        None => {
            // 未比對成功：以中性內容填滿所有變數，模板不會留下空洞
            vars.insert(TemplateVar::CustomerName, item.recipient_name.clone());
            vars.insert(TemplateVar::CustomerId, String::new());
            vars.insert(TemplateVar::Company, String::new());
            vars.insert(
                TemplateVar::Placement,
                format!("我們已將您的{}暫置於櫃檯保管。", item_kind),
            );
            vars.insert(TemplateVar::IdLine, String::new());
            vars.insert(
                TemplateVar::ServicesSection,
                "\n請與櫃檯人員聯繫確認身分後領取。".to_string(),
            );
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CustodyState, MailCategory, Venue};

    fn snapshot(tier: Tier, category: ProductCategory) -> CustomerSnapshot {
        CustomerSnapshot {
            customer_id: "85".to_string(),
            name: "鄭月娥".to_string(),
            company: "雲諾青騏耀斯映".to_string(),
            tier,
            product_category: category,
            venue: Venue::Minquan,
            preferred_floor: Some("27樓櫃檯".to_string()),
        }
    }

    fn item(summary: &str) -> MailItem {
        MailItem {
            id: "m-1".to_string(),
            received_at: 0,
            archived_at: None,
            recipient_name: "鄭月娥".to_string(),
            sender_name: Some("國稅局".to_string()),
            sender_address: None,
            summary: summary.to_string(),
            urgent: false,
            category: MailCategory::Normal,
            requested_action: None,
            image_ref: None,
            matched_customer_id: None,
            customer_snapshot: None,
            rendered_message: String::new(),
            custody_state: CustodyState::Pending,
            notified: false,
            archived: false,
        }
    }

    #[test]
    fn test_var_name_roundtrip() {
        for var in [
            TemplateVar::CustomerName,
            TemplateVar::CustomerId,
            TemplateVar::Company,
            TemplateVar::Placement,
            TemplateVar::ItemKind,
            TemplateVar::ItemEmoji,
            TemplateVar::IdLine,
            TemplateVar::ServicesSection,
            TemplateVar::SenderName,
            TemplateVar::RecipientName,
        ] {
            assert_eq!(TemplateVar::from_name(var.name()), Some(var));
        }
        assert_eq!(TemplateVar::from_name("nope"), None);
    }

    #[test]
    fn test_vip_business_reg_gets_full_services_block() {
        let snap = snapshot(Tier::Vip, ProductCategory::BusinessRegistration);
        let vars = build_vars(Some(&snap), &item("掛號信"));
        let services = &vars[&TemplateVar::ServicesSection];
        assert!(services.contains("尊榮 VIP"));
        assert!(services.contains("①"));
        assert!(services.contains("⑤"));
    }

    #[test]
    fn test_mvp_label_in_services_block() {
        let snap = snapshot(Tier::Mvp, ProductCategory::BusinessRegistration);
        let vars = build_vars(Some(&snap), &item("掛號信"));
        assert!(vars[&TemplateVar::ServicesSection].contains("傑出 MVP"));
    }

    #[test]
    fn test_basic_business_reg_gets_short_forwarding_offer() {
        let snap = snapshot(Tier::Basic, ProductCategory::BusinessRegistration);
        let vars = build_vars(Some(&snap), &item("掛號信"));
        let services = &vars[&TemplateVar::ServicesSection];
        assert!(services.contains("協助轉寄"));
        assert!(!services.contains("①"));
    }

    #[test]
    fn test_office_tenant_gets_plain_closing() {
        let snap = snapshot(Tier::Vip, ProductCategory::OfficeTenant);
        let vars = build_vars(Some(&snap), &item("大型包裹"));
        let services = &vars[&TemplateVar::ServicesSection];
        assert!(services.contains("請直接回覆此訊息"));
        assert!(!services.contains("①"));
    }

    #[test]
    fn test_id_line_only_for_business_registration() {
        let snap = snapshot(Tier::Vip, ProductCategory::BusinessRegistration);
        let vars = build_vars(Some(&snap), &item("信"));
        assert!(vars[&TemplateVar::IdLine].contains("【#85】"));

        let snap = snapshot(Tier::Vip, ProductCategory::OfficeTenant);
        let vars = build_vars(Some(&snap), &item("信"));
        assert!(vars[&TemplateVar::IdLine].is_empty());
    }

    #[test]
    fn test_office_mail_goes_to_mailbox() {
        let snap = snapshot(Tier::Basic, ProductCategory::OfficeTenant);
        let vars = build_vars(Some(&snap), &item("普通信件"));
        assert!(vars[&TemplateVar::Placement].contains("辦公室信箱"));

        // Parcels still go to the floor counter
        let vars = build_vars(Some(&snap), &item("大型包裹"));
        assert!(vars[&TemplateVar::Placement].contains("27樓櫃檯"));
    }

    #[test]
    fn test_preferred_floor_overrides_venue_default() {
        let mut snap = snapshot(Tier::Vip, ProductCategory::BusinessRegistration);
        let vars = build_vars(Some(&snap), &item("掛號信"));
        assert!(vars[&TemplateVar::Placement].contains("27樓櫃檯"));

        snap.preferred_floor = None;
        let vars = build_vars(Some(&snap), &item("掛號信"));
        assert!(vars[&TemplateVar::Placement].contains("21樓櫃檯"));
    }

    #[test]
    fn test_unmatched_vars_are_complete() {
        let vars = build_vars(None, &item("包裹一件"));
        assert_eq!(vars[&TemplateVar::ItemKind], "包裹");
        assert_eq!(vars[&TemplateVar::ItemEmoji], "📦");
        assert_eq!(vars[&TemplateVar::RecipientName], "鄭月娥");
        // Every variable resolvable, even if empty
        assert!(vars.contains_key(&TemplateVar::CustomerId));
        assert!(vars.contains_key(&TemplateVar::Placement));
    }
}
