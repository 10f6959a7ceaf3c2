//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    /// 每个批次的默认片段数
    pub const DEFAULT_BATCH_SIZE: usize = 10;

    // 文本过滤相关
    pub const MIN_TEXT_LENGTH: usize = 2;

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5001/api/translate/batch";
    pub const DEFAULT_SOURCE_LANG: &str = "en";
    pub const DEFAULT_TARGET_LANG: &str = "hi";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    /// 文本永远不是待翻译正文的元素
    pub const SKIP_ELEMENTS: &[&str] = &["style", "script", "noscript", "code", "pre"];

    /// 浏览器内部页面，不允许翻译
    pub const RESTRICTED_URL_PREFIXES: &[&str] = &["chrome://", "edge://", "about:"];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "translation-config.toml",
        ".translation-config.toml",
        "~/.config/page-translator/config.toml",
    ];
}
