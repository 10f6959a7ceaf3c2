//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 输入验证错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    NetworkError(String),

    /// 后端返回非成功状态码
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// 后端响应格式错误
    #[error("响应格式错误: {0}")]
    MalformedResponse(String),

    /// 译文数量与原文数量不一致
    #[error("翻译结果数量不匹配: 期望 {expected}，得到 {actual}")]
    CountMismatch { expected: usize, actual: usize },

    /// 翻译服务错误
    #[error("翻译服务错误: {0}")]
    TranslationServiceError(String),

    /// 消息接收端不可达或未初始化
    #[error("目标端不可用: {0}")]
    HostUnavailable(String),

    /// 命令被接收端拒绝
    #[error("命令被拒绝: {0}")]
    CommandRejected(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::NetworkError(_) => ErrorSeverity::Warning,
            TranslationError::HttpStatus(_) => ErrorSeverity::Warning,
            TranslationError::MalformedResponse(_) => ErrorSeverity::Error,
            TranslationError::CountMismatch { .. } => ErrorSeverity::Error,
            TranslationError::TranslationServiceError(_) => ErrorSeverity::Error,
            TranslationError::HostUnavailable(_) => ErrorSeverity::Error,
            TranslationError::CommandRejected(_) => ErrorSeverity::Warning,
            TranslationError::IoError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::InvalidInput(_) => ErrorCategory::Input,
            TranslationError::NetworkError(_) => ErrorCategory::Network,
            TranslationError::HttpStatus(_) => ErrorCategory::Service,
            TranslationError::MalformedResponse(_) => ErrorCategory::Parsing,
            TranslationError::CountMismatch { .. } => ErrorCategory::Service,
            TranslationError::TranslationServiceError(_) => ErrorCategory::Service,
            TranslationError::HostUnavailable(_) => ErrorCategory::Orchestration,
            TranslationError::CommandRejected(_) => ErrorCategory::Orchestration,
            TranslationError::IoError(_) => ErrorCategory::Input,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 是否属于单个批次的传输失败（跳过该批次，继续运行）
    pub fn is_batch_failure(&self) -> bool {
        matches!(
            self,
            TranslationError::NetworkError(_)
                | TranslationError::HttpStatus(_)
                | TranslationError::MalformedResponse(_)
                | TranslationError::CountMismatch { .. }
                | TranslationError::TranslationServiceError(_)
                | TranslationError::HostUnavailable(_)
        )
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            TranslationError::ConfigError(msg)
            | TranslationError::InvalidInput(msg)
            | TranslationError::NetworkError(msg)
            | TranslationError::MalformedResponse(msg)
            | TranslationError::TranslationServiceError(msg)
            | TranslationError::HostUnavailable(msg)
            | TranslationError::CommandRejected(msg)
            | TranslationError::IoError(msg)
            | TranslationError::InternalError(msg) => {
                *msg = format!("{} (上下文: {})", msg, context);
            }
            TranslationError::HttpStatus(_) | TranslationError::CountMismatch { .. } => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Service,
    Parsing,
    Orchestration,
    Internal,
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::MalformedResponse(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<url::ParseError> for TranslationError {
    fn from(error: url::ParseError) -> Self {
        TranslationError::InvalidInput(format!("URL无效: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            TranslationError::HttpStatus(status.as_u16())
        } else if error.is_decode() {
            TranslationError::MalformedResponse(error.to_string())
        } else {
            TranslationError::NetworkError(error.to_string())
        }
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }
}
