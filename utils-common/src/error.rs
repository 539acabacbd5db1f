use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// 目录层统一错误类型
#[derive(Error, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CatalogError {
    /// 输入校验失败，不会发送到远程接口
    #[error("输入无效: {0}")]
    Validation(String),

    /// 远程接口返回 success:false，携带服务端原因
    #[error("{0}")]
    Remote(String),

    /// 网络不可达或响应格式错误
    #[error("网络错误: {0}")]
    Transport(String),

    /// 快照编解码失败
    #[error("快照错误: {0}")]
    Bundle(String),
}

impl CatalogError {
    /// 只有传输错误适合由用户重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Transport(format!("响应格式错误: {}", err))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Bundle(err.to_string())
    }
}
