//! Single-pass `{{variable}}` substitution

use super::store::TemplateStore;
use super::vars::{TemplateVar, VarMap, build_vars};
use shared::models::{CustomerSnapshot, MailItem, TierKey};

/// Substituted in place of a placeholder with no resolvable value.
/// Template syntax must never leak into the final message.
const UNRESOLVED_FALLBACK: &str = "（資料未填）";

/// Replace every `{{name}}` placeholder in one pass
///
/// Unknown or unresolved names are replaced with
/// [`UNRESOLVED_FALLBACK`] and logged; no `{{` token survives.
pub fn substitute(content: &str, vars: &VarMap) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let raw_name = after_open[..end].trim();
                match TemplateVar::from_name(raw_name).and_then(|v| vars.get(&v)) {
                    Some(value) => out.push_str(value),
                    None => {
                        tracing::warn!(variable = raw_name, "Unresolved template variable");
                        out.push_str(UNRESOLVED_FALLBACK);
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                // Dangling open token: emit the fallback instead of raw syntax
                tracing::warn!("Unterminated template placeholder");
                out.push_str(UNRESOLVED_FALLBACK);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the notification message for a mail item
///
/// Template selection: the snapshot tier when matched, the `Unknown`
/// template otherwise.
pub fn render_for_item(
    store: &TemplateStore,
    snapshot: Option<&CustomerSnapshot>,
    item: &MailItem,
) -> String {
    let key = snapshot.map_or(TierKey::Unknown, |s| TierKey::from(s.tier));
    let template = store.get(key);
    let vars = build_vars(snapshot, item);
    substitute(&template.content, &vars)
}

/// Run the substitution pass over an externally suggested reply
///
/// Later OCR variants return a pre-written message that still contains
/// placeholders for item-specific fields.
pub fn render_suggested(
    suggested: &str,
    snapshot: Option<&CustomerSnapshot>,
    item: &MailItem,
) -> String {
    substitute(suggested, &build_vars(snapshot, item))
}
