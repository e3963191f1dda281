use mailroom::{AppState, Config, setup_environment};
use shared::models::Tier;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    setup_environment()?;

    tracing::info!("📮 DT Space Mailroom starting...");

    // 2. 加载配置并恢复全部状态
    let config = Config::from_env();
    let state = AppState::init(config)?;

    // 3. 开机状态汇报
    let customers = state.customers.snapshot_all();
    let vip = customers.iter().filter(|c| c.tier == Tier::Vip).count();
    let awaiting = state.mail.awaiting().len();
    tracing::info!(
        customers = customers.len(),
        vip,
        active_items = state.mail.active().len(),
        awaiting,
        "Mailroom ready"
    );

    Ok(())
}
