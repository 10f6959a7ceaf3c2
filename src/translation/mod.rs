//! 翻译模块
//!
//! 页面内翻译的全部流程：
//! - **pipeline**: 文本选择、批次调度、译文替换
//! - **core**: 翻译客户端和翻译服务
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use page_translator::parsers::html_to_dom;
//! use page_translator::translation::TranslationService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dom = html_to_dom(b"<p>Hello world</p>", "utf-8")?;
//! let service = TranslationService::create_default("hi", None)?;
//! let (dom, report) = service.translate_dom(dom).await?;
//! println!("{} 个批次失败", report.batches_failed());
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// 配置管理模块
pub mod config;

/// 翻译客户端与翻译服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 文本处理管道模块
///
/// 负责从DOM中选出可翻译文本、分批翻译，并把译文写回原节点
pub mod pipeline;

// ============================================================================
// 核心API导出
// ============================================================================

pub use self::core::{BatchTranslator, HttpTranslator, ServiceStats, TranslationService};

pub use config::{constants, ConfigManager, TranslationConfig};

pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

pub use pipeline::{
    apply_substitution, partition, Batch, BatchOutcome, BatchScheduler, RunReport, Substitution,
    TextCollector, TextFilter, TextFragment,
};

// ============================================================================
// 便利函数
// ============================================================================

/// 检查文本是否应该翻译
///
/// ```rust
/// use page_translator::translation::should_translate;
///
/// assert!(should_translate("Hello World"));
/// assert!(!should_translate("123"));
/// assert!(!should_translate("   "));
/// ```
pub fn should_translate(text: &str) -> bool {
    pipeline::TextFilter::new().should_translate(text)
}

/// 浏览器内部页面不能翻译
pub fn is_restricted_url(url: &str) -> bool {
    constants::RESTRICTED_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}
