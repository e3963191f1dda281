//! End-to-end intake flow: batch analysis, notification, custody and
//! monthly settlement against a real work directory.

use async_trait::async_trait;
use mailroom::delivery::{Notifier, TracingSink};
use mailroom::{
    AppResult, AppState, BackupService, Config, ErrorCode, ImageInput, IntakeService,
    MailAnalysis, MailAnalyzer, compute_monthly_usage,
};
use shared::models::{CustodyState, CustomerCreate, ProductCategory, Tier, Venue};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FixtureAnalyzer;

#[async_trait]
impl MailAnalyzer for FixtureAnalyzer {
    async fn analyze(&self, image: &ImageInput) -> AppResult<MailAnalysis> {
        match image.name.as_str() {
            "registered-letter.jpg" => Ok(MailAnalysis {
                recipient_name: "鄭月娥".to_string(),
                sender_name: Some("國稅局".to_string()),
                summary: "掛號信函".to_string(),
                urgent: true,
                ..Default::default()
            }),
            "blurry.jpg" => Err(mailroom::AppError::extraction("envelope unreadable")),
            _ => Ok(MailAnalysis {
                recipient_name: "王小明".to_string(),
                summary: "廣告信".to_string(),
                ..Default::default()
            }),
        }
    }
}

fn state() -> (AppState, tempfile::TempDir) {
    // The TempDir handle must outlive the state or the work directory
    // vanishes mid-test
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_work_dir(dir.path().to_string_lossy());
    let state = AppState::init(config).unwrap();
    (state, dir)
}

fn seed_customer(state: &AppState) {
    state
        .customers
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
}

fn intake(state: &AppState) -> IntakeService {
    IntakeService::new(
        Arc::new(FixtureAnalyzer),
        state.customers.clone(),
        state.mail.clone(),
        state.templates.clone(),
        state.config.intake_concurrency,
    )
}

#[tokio::test]
async fn batch_with_one_bad_image_creates_the_other_items() {
    let (state, _dir) = state();
    seed_customer(&state);

    let progress = Arc::new(AtomicUsize::new(0));
    let hits = progress.clone();
    let outcome = intake(&state)
        .process_batch(
            vec![
                ImageInput::new("registered-letter.jpg", vec![1]),
                ImageInput::new("blurry.jpg", vec![2]),
                ImageInput::new("flyer.jpg", vec![3]),
            ],
            Some(Arc::new(move |done, _| {
                hits.store(done, Ordering::SeqCst);
            })),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.completed, 3);
    assert_eq!(outcome.failures, 1);
    assert_eq!(outcome.created.len(), 2);
    assert_eq!(progress.load(Ordering::SeqCst), 3);
    assert_eq!(state.mail.active().len(), 2);

    // The registered letter matched; the flyer did not
    let matched: Vec<_> = state
        .mail
        .active()
        .into_iter()
        .filter(|i| i.matched_customer_id.is_some())
        .collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].matched_customer_id.as_deref(), Some("85"));
    assert!(matched[0].rendered_message.contains("親愛的道騰尊榮 VIP 鄭月娥"));
    assert!(!matched[0].rendered_message.contains("{{"));
}

#[tokio::test]
async fn notify_assign_settle_and_bill() {
    let (state, _dir) = state();
    seed_customer(&state);

    let outcome = intake(&state)
        .process_batch(vec![ImageInput::new("registered-letter.jpg", vec![1])], None)
        .await
        .unwrap();
    let id = outcome.created[0].clone();

    // Notify, then the customer asks for a scan
    let notifier = Notifier::new(Arc::new(TracingSink), state.mail.clone());
    notifier.notify(&id).await.unwrap();
    state
        .mail
        .assign_custody(&id, CustodyState::Scanned)
        .unwrap();

    // Settlement is credential-gated
    assert_eq!(
        state.credential.verify("wrong").unwrap_err().code,
        ErrorCode::InvalidPasscode
    );
    state.credential.verify("mail5286").unwrap();

    let report = state.mail.settle_batch(CustodyState::Scanned).unwrap();
    assert_eq!(report.archived, vec![id.clone()]);
    assert!(report.skipped.is_empty());

    let archived = state.mail.find(&id).unwrap();
    assert!(archived.archived);
    assert!(!archived.notified);

    // Archived scans still bill into the month they arrived
    let customer = state.customers.find("85").unwrap();
    let now = chrono::Utc::now();
    use chrono::Datelike;
    let usage = compute_monthly_usage(
        &customer,
        now.year(),
        now.month(),
        &state.mail.snapshot_all(),
    );
    assert_eq!(usage.scan_count, 1);
    // One scan sits well inside the VIP allowance
    assert_eq!(usage.total_due, 0);
}

#[tokio::test]
async fn state_survives_restart_and_backup_restore() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_work_dir(dir.path().to_string_lossy());

    let exported = {
        let state = AppState::init(config.clone()).unwrap();
        seed_customer(&state);
        intake(&state)
            .process_batch(vec![ImageInput::new("registered-letter.jpg", vec![1])], None)
            .await
            .unwrap();
        BackupService::new(
            state.customers.clone(),
            state.mail.clone(),
            state.templates.clone(),
        )
        .export_json()
        .unwrap()
    };

    // Restart from disk
    let state = AppState::init(config).unwrap();
    assert_eq!(state.customers.find("85").unwrap().tier, Tier::Vip);
    assert_eq!(state.mail.active().len(), 1);

    // Wipe and restore from the export
    state.customers.delete("85").unwrap();
    let backup = BackupService::new(
        state.customers.clone(),
        state.mail.clone(),
        state.templates.clone(),
    );
    backup
        .import_json(&exported, Default::default())
        .unwrap();
    assert!(state.customers.find("85").is_ok());
    assert_eq!(state.mail.snapshot_all().len(), 1);
}
