use std::sync::Arc;
use thiserror::Error;

/// 宿主侧（配置、文件、导出）可能发生的错误。
///
/// 解析、定位、打轴这些核心操作从不返回错误，格式不对时只会退化为“无时间戳”或“无歌词”。
#[derive(Debug, Error, Clone)]
pub enum SyncError {
    #[error("IO 错误: {0}")]
    Io(Arc<std::io::Error>),

    #[error("配置文件错误: {0}")]
    Ini(Arc<ini::Error>),

    #[error("JSON 序列化/反序列化错误: {0}")]
    Json(Arc<serde_json::Error>),

    #[error("剪贴板错误: {0}")]
    Clipboard(Arc<arboard::Error>),

    #[error("导出失败 (主通道 {primary}: {primary_error}; 备用通道 {fallback}: {fallback_error})")]
    ExportFailed {
        primary: String,
        primary_error: Box<SyncError>,
        fallback: String,
        fallback_error: Box<SyncError>,
    },

    #[error("错误: {0}")]
    Custom(String),
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<ini::Error> for SyncError {
    fn from(err: ini::Error) -> Self {
        Self::Ini(Arc::new(err))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

impl From<arboard::Error> for SyncError {
    fn from(err: arboard::Error) -> Self {
        Self::Clipboard(Arc::new(err))
    }
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
