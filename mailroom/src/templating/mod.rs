//! Notification message templating
//!
//! Template texts are selected by tier key (`Unknown` for unmatched
//! items) and rendered with a single substitution pass over a typed
//! variable map. Conditional sections (placement wording, pickup-code
//! line, assisted-services block) are computed into variables before
//! the pass, so the pass itself never branches.

mod engine;
mod store;
mod vars;

pub use engine::{render_for_item, render_suggested, substitute};
pub use store::TemplateStore;
pub use vars::{TemplateVar, VarMap, build_vars};
