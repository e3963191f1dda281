//! Batch intake orchestration

use super::analyzer::{ImageInput, MailAnalyzer};
use crate::lifecycle::MailLog;
use crate::matching::find_best_match;
use crate::registry::CustomerRegistry;
use crate::templating::{TemplateStore, render_for_item, render_suggested};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CustodyState, CustomerSnapshot, MailItem};
use shared::util::now_millis;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress callback: (completed, total), called once per finished image
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Result of one intake batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub total: usize,
    /// Images processed, successful or not
    pub completed: usize,
    pub failures: usize,
    /// IDs of the items created, in completion order
    pub created: Vec<String>,
}

pub struct IntakeService {
    analyzer: Arc<dyn MailAnalyzer>,
    customers: Arc<CustomerRegistry>,
    mail: Arc<MailLog>,
    templates: Arc<TemplateStore>,
    concurrency: usize,
}

impl IntakeService {
    pub fn new(
        analyzer: Arc<dyn MailAnalyzer>,
        customers: Arc<CustomerRegistry>,
        mail: Arc<MailLog>,
        templates: Arc<TemplateStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            analyzer,
            customers,
            mail,
            templates,
            concurrency: concurrency.max(1),
        }
    }

    /// Analyze a batch of envelope photos concurrently
    ///
    /// Each image runs the full pipeline (analyze, match, render,
    /// record) in isolation; a failed image counts as a failure and
    /// the rest of the batch proceeds. Progress fires after every
    /// image, success or not.
    pub async fn process_batch(
        &self,
        images: Vec<ImageInput>,
        progress: Option<ProgressFn>,
    ) -> AppResult<BatchOutcome> {
        if images.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyBatch));
        }

        let total = images.len();
        let completed = Arc::new(AtomicUsize::new(0));
        // Registry state is fixed for the whole batch
        let roster = Arc::new(self.customers.snapshot_all());

        let results: Vec<Result<String, ()>> = stream::iter(images)
            .map(|image| {
                let completed = completed.clone();
                let roster = roster.clone();
                let progress = progress.clone();
                async move {
                    let result = self.process_one(&image, &roster).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(progress) = &progress {
                        progress(done, total);
                    }
                    match result {
                        Ok(id) => Ok(id),
                        Err(e) => {
                            tracing::warn!(
                                image = %image.name,
                                error = %e,
                                "Intake failed for image"
                            );
                            Err(())
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let created: Vec<String> = results.iter().filter_map(|r| r.clone().ok()).collect();
        let failures = total - created.len();

        tracing::info!(total, failures, "Intake batch finished");
        Ok(BatchOutcome {
            total,
            completed: completed.load(Ordering::SeqCst),
            failures,
            created,
        })
    }

    async fn process_one(
        &self,
        image: &ImageInput,
        roster: &[shared::models::Customer],
    ) -> AppResult<String> {
        let analysis = self.analyzer.analyze(image).await?;

        let matched = find_best_match(
            &analysis.recipient_name,
            analysis.recipient_company.as_deref().unwrap_or(""),
            roster,
        );
        let customer = matched.customer();
        let snapshot = customer.map(CustomerSnapshot::from);

        let mut item = MailItem {
            id: uuid::Uuid::new_v4().to_string(),
            received_at: now_millis(),
            archived_at: None,
            recipient_name: analysis.recipient_name,
            sender_name: analysis.sender_name,
            sender_address: analysis.sender_address,
            summary: analysis.summary,
            urgent: analysis.urgent,
            category: analysis.category,
            requested_action: analysis.requested_action,
            image_ref: Some(image.name.clone()),
            matched_customer_id: customer.map(|c| c.customer_id.clone()),
            customer_snapshot: snapshot,
            rendered_message: String::new(),
            custody_state: CustodyState::Pending,
            notified: false,
            archived: false,
        };
        item.rendered_message = match &analysis.suggested_reply {
            Some(suggested) if !suggested.trim().is_empty() => {
                render_suggested(suggested, item.customer_snapshot.as_ref(), &item)
            }
            _ => render_for_item(&self.templates, item.customer_snapshot.as_ref(), &item),
        };

        let item = self.mail.insert(item).map_err(AppError::from)?;
        Ok(item.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::MailAnalysis;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use shared::models::{CustomerCreate, ProductCategory, Tier, TierKey, Venue};

    struct ScriptedAnalyzer;

    #[async_trait]
    impl MailAnalyzer for ScriptedAnalyzer {
        async fn analyze(&self, image: &ImageInput) -> AppResult<MailAnalysis> {
            if image.name.contains("bad") {
                return Err(AppError::extraction("unreadable envelope"));
            }
            Ok(MailAnalysis {
                recipient_name: "鄭月娥".to_string(),
                summary: "掛號信".to_string(),
                ..Default::default()
            })
        }
    }

    fn service(analyzer: Arc<dyn MailAnalyzer>) -> IntakeService {
        let port = Arc::new(MemoryStore::new());
        let customers = Arc::new(CustomerRegistry::load(port.clone()).unwrap());
        customers
            .create(CustomerCreate {
                customer_id: "85".to_string(),
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
            })
            .unwrap();
        let mail = Arc::new(MailLog::load(port.clone(), true).unwrap());
        let templates = Arc::new(TemplateStore::load_or_seed(port).unwrap());
        IntakeService::new(analyzer, customers, mail, templates, 4)
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let svc = service(Arc::new(ScriptedAnalyzer));
        let err = svc.process_batch(vec![], None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyBatch);
    }

    #[tokio::test]
    async fn test_matched_item_gets_snapshot_and_message() {
        let svc = service(Arc::new(ScriptedAnalyzer));
        let outcome = svc
            .process_batch(vec![ImageInput::new("a.jpg", vec![1])], None)
            .await
            .unwrap();
        assert_eq!(outcome.failures, 0);

        let item = svc.mail.find(&outcome.created[0]).unwrap();
        assert_eq!(item.matched_customer_id.as_deref(), Some("85"));
        assert_eq!(item.custody_state, CustodyState::Pending);
        assert!(!item.notified);
        assert!(item.rendered_message.contains("鄭月娥"));
        assert!(!item.rendered_message.contains("{{"));
        assert_eq!(item.image_ref.as_deref(), Some("a.jpg"));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_sink_batch() {
        let svc = service(Arc::new(ScriptedAnalyzer));
        let progress_hits = Arc::new(AtomicUsize::new(0));
        let hits = progress_hits.clone();

        let outcome = svc
            .process_batch(
                vec![
                    ImageInput::new("a.jpg", vec![1]),
                    ImageInput::new("bad.jpg", vec![2]),
                    ImageInput::new("c.jpg", vec![3]),
                ],
                Some(Arc::new(move |_, _| {
                    hits.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .await
            .unwrap();

        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.completed, 3);
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.created.len(), 2);
        assert_eq!(progress_hits.load(Ordering::SeqCst), 3);
        assert_eq!(svc.mail.active().len(), 2);
    }

    #[tokio::test]
    async fn test_suggested_reply_is_substituted() {
        struct Suggesting;

        #[async_trait]
        impl MailAnalyzer for Suggesting {
            async fn analyze(&self, _image: &ImageInput) -> AppResult<MailAnalysis> {
                Ok(MailAnalysis {
                    recipient_name: "鄭月娥".to_string(),
                    summary: "大型包裹".to_string(),
                    suggested_reply: Some("{{customer_name}}，{{item_kind}}已送達。".to_string()),
                    ..Default::default()
                })
            }
        }

        let svc = service(Arc::new(Suggesting));
        let outcome = svc
            .process_batch(vec![ImageInput::new("a.jpg", vec![1])], None)
            .await
            .unwrap();
        let item = svc.mail.find(&outcome.created[0]).unwrap();
        assert_eq!(item.rendered_message, "鄭月娥，包裹已送達。");
    }

    #[tokio::test]
    async fn test_unmatched_recipient_uses_fallback_template() {
        struct Stranger;

        #[async_trait]
        impl MailAnalyzer for Stranger {
            async fn analyze(&self, _image: &ImageInput) -> AppResult<MailAnalysis> {
                Ok(MailAnalysis {
                    recipient_name: "王小明".to_string(),
                    summary: "廣告信".to_string(),
                    ..Default::default()
                })
            }
        }

        let svc = service(Arc::new(Stranger));
        let outcome = svc
            .process_batch(vec![ImageInput::new("a.jpg", vec![1])], None)
            .await
            .unwrap();
        let item = svc.mail.find(&outcome.created[0]).unwrap();
        assert!(item.matched_customer_id.is_none());
        assert!(item.customer_snapshot.is_none());
        // Rendered from the Unknown-tier template
        let unknown = svc.templates.get(TierKey::Unknown);
        assert!(!unknown.content.is_empty());
        assert!(item.rendered_message.contains("王小明"));
    }
}
