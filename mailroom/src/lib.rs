//! DT Space 郵務管家 - mail intake and custody engine
//!
//! # 架構概述
//!
//! 本模組是郵務引擎的主入口，提供以下核心功能：
//!
//! - **客戶名冊** (`registry`): 取信編號資料庫與月度額度設定
//! - **比對器** (`matching`): OCR 擷取結果與客戶名冊的模糊比對
//! - **訊息模板** (`templating`): 分級通知訊息的變數代入引擎
//! - **信件生命週期** (`lifecycle`): 保管狀態機、批次結案與封存
//! - **帳務** (`billing`): 月度掃描/寄送額度與超額費用計算
//! - **批次收件** (`intake`): 多張照片的並行分析與建檔
//!
//! # 模块结构
//!
//! ```text
//! mailroom/src/
//! ├── core/          # 配置、状态
//! ├── common/        # 日志
//! ├── registry.rs    # 客戶名冊
//! ├── matching.rs    # 比對器
//! ├── templating/    # 訊息模板引擎
//! ├── lifecycle/     # 保管狀態機
//! ├── billing.rs     # 帳務
//! ├── intake/        # 批次收件
//! ├── delivery.rs    # 通知遞送邊界
//! ├── storage.rs     # 持久化端口
//! ├── backup.rs      # 備份/還原
//! └── services/      # 管理員憑證
//! ```

pub mod backup;
pub mod billing;
pub mod common;
pub mod core;
pub mod delivery;
pub mod intake;
pub mod lifecycle;
pub mod matching;
pub mod registry;
pub mod services;
pub mod storage;
pub mod templating;

// Re-export 公共类型
pub use backup::BackupService;
pub use billing::{MonthlyUsage, compute_monthly_usage};
pub use core::{AppState, Config};
pub use delivery::{DeliveryIntent, NotificationSink, Notifier, TracingSink};
pub use intake::{BatchOutcome, ImageInput, IntakeService, MailAnalysis, MailAnalyzer};
pub use lifecycle::{MailLog, SettlementReport};
pub use services::AdminCredential;
pub use matching::{MatchResult, find_best_match};
pub use registry::CustomerRegistry;
pub use storage::{CollectionKey, JsonFileStore, MemoryStore, StatePort};
pub use templating::TemplateStore;

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use common::logger::{init_logger, init_logger_with_file};

/// 初始化运行环境 (dotenv + 日志)
///
/// 在读取 [`Config`] 之前调用，保证 .env 中的变量生效。
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = format!("{}/logs", config.work_dir);
    init_logger_with_file(
        &config.log_level,
        config.is_production(),
        Some(&log_dir),
    )?;
    Ok(())
}
