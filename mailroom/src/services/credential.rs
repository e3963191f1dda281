//! 管理员口令凭证
//!
//! 将管理员口令的 SHA-256 摘要存储到 workspace/Credential.json，
//! 结清、还原、彻底删除等敏感操作执行前须先验证口令。

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};
use std::path::{Path, PathBuf};

/// 凭证存储位置
pub const CREDENTIAL_FILE: &str = "Credential.json";

fn digest(passcode: &str) -> String {
    hex::encode(Sha256::digest(passcode.as_bytes()))
}

/// 存储的凭证内容
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct StoredCredential {
    /// 口令的 SHA-256 摘要（hex）
    passcode_digest: String,
    /// 设置时间戳 (RFC3339)
    updated_at: String,
}

impl StoredCredential {
    fn new(passcode: &str) -> Self {
        Self {
            passcode_digest: digest(passcode),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn load(work_dir: &Path) -> Result<Option<Self>, std::io::Error> {
        let path = work_dir.join(CREDENTIAL_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .map(Some)
    }

    fn save(&self, work_dir: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(work_dir.join(CREDENTIAL_FILE), content)?;
        Ok(())
    }
}

/// Admin credential gate for sensitive operations
pub struct AdminCredential {
    work_dir: PathBuf,
    stored: RwLock<StoredCredential>,
}

impl AdminCredential {
    /// Load the credential file, writing one with the default passcode
    /// on first run
    pub fn load_or_init(work_dir: &Path, default_passcode: &str) -> AppResult<Self> {
        std::fs::create_dir_all(work_dir)
            .map_err(|e| AppError::persistence(format!("Failed to create work dir: {}", e)))?;

        let stored = match StoredCredential::load(work_dir)
            .map_err(|e| AppError::persistence(format!("Failed to load credential: {}", e)))?
        {
            Some(stored) => stored,
            None => {
                let stored = StoredCredential::new(default_passcode);
                stored
                    .save(work_dir)
                    .map_err(|e| AppError::persistence(format!("Failed to save credential: {}", e)))?;
                tracing::info!("Admin credential initialized");
                stored
            }
        };

        Ok(Self {
            work_dir: work_dir.to_path_buf(),
            stored: RwLock::new(stored),
        })
    }

    /// Verify a passcode attempt
    pub fn verify(&self, passcode: &str) -> AppResult<()> {
        if self.stored.read().passcode_digest == digest(passcode) {
            Ok(())
        } else {
            tracing::warn!("Admin passcode verification failed");
            Err(AppError::new(ErrorCode::InvalidPasscode))
        }
    }

    /// Change the passcode (requires the current one)
    pub fn change(&self, current: &str, new_passcode: &str) -> AppResult<()> {
        self.verify(current)?;
        if new_passcode.trim().is_empty() {
            return Err(AppError::validation("Passcode cannot be empty"));
        }
        let stored = StoredCredential::new(new_passcode);
        stored
            .save(&self.work_dir)
            .map_err(|e| AppError::persistence(format!("Failed to save credential: {}", e)))?;
        *self.stored.write() = stored;
        crate::audit_log!("admin", "change_passcode", "credential");
        Ok(())
    }
}
