/// 郵務系統配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/dtspace/mailroom | 工作目录 |
/// | LOG_LEVEL | info | 日志级别 |
/// | ENVIRONMENT | development | 运行环境 |
/// | ADMIN_PASSCODE | mail5286 | 管理员操作口令（首次启动时写入凭证文件） |
/// | ALLOW_HARD_DELETE | true | 是否允许彻底删除邮件记录 |
/// | INTAKE_CONCURRENCY | 4 | 批量辨识并发上限 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mailroom LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据、凭证、日志等文件
    pub work_dir: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 管理员口令（仅在凭证文件不存在时用于初始化）
    pub admin_passcode: String,
    /// 是否允许彻底删除邮件记录（关闭后仅能归档）
    pub allow_hard_delete: bool,
    /// 批量辨识的并发上限
    pub intake_concurrency: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/dtspace/mailroom".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_passcode: std::env::var("ADMIN_PASSCODE").unwrap_or_else(|_| "mail5286".into()),
            allow_hard_delete: std::env::var("ALLOW_HARD_DELETE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            intake_concurrency: std::env::var("INTAKE_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
