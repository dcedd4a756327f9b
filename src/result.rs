use thiserror::Error;
use tokio::task::JoinError;

/// 核心错误类型
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    Join(#[from] JoinError),

    #[error("Config error: {0}")]
    Config(String),

    /// 前端传入了未知的扫描范围
    #[error("Invalid scan type: {0}")]
    UnknownScope(String),

    #[error("{0}")]
    Other(String),
}
