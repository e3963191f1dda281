//! Notification delivery
//!
//! The outbound channel (LINE, SMS, operator copy-paste) sits behind
//! [`NotificationSink`]; the notifier marks the item notified only
//! after the sink accepts the message.

use crate::lifecycle::MailLog;
use async_trait::async_trait;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::MailItem;
use std::sync::Arc;

/// One outbound notification
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryIntent {
    pub item_id: String,
    /// Display name of the addressee (matched customer or raw recipient)
    pub recipient: String,
    pub message: String,
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, intent: &DeliveryIntent) -> AppResult<()>;
}

/// Sink that only logs the intent; the operator sends the text by hand
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn deliver(&self, intent: &DeliveryIntent) -> AppResult<()> {
        tracing::info!(
            item_id = %intent.item_id,
            recipient = %intent.recipient,
            chars = intent.message.chars().count(),
            "Notification ready for manual send"
        );
        Ok(())
    }
}

pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    mail: Arc<MailLog>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, mail: Arc<MailLog>) -> Self {
        Self { sink, mail }
    }

    /// Send the item's rendered message and record the notification
    ///
    /// The notified flag flips only after the sink accepts; a sink
    /// failure leaves the item untouched.
    pub async fn notify(&self, item_id: &str) -> AppResult<MailItem> {
        let item = self.mail.find(item_id).map_err(AppError::from)?;
        let recipient = item
            .customer_snapshot
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| item.recipient_name.clone());

        let intent = DeliveryIntent {
            item_id: item.id.clone(),
            recipient,
            message: item.rendered_message.clone(),
        };
        self.sink.deliver(&intent).await?;

        self.mail.mark_notified(item_id).map_err(AppError::from)
    }
}
