//! # Page Translator Library
//!
//! 把网页中用户可见的文本就地翻译成目标语言，不改变页面结构。
//!
//! ## 模块组织
//!
//! - `core` - 页面读取和输出路径处理
//! - `parsers` - HTML 解析与序列化
//! - `translation` - 文本选择、批次调度、译文替换和翻译客户端
//! - `relay` - 命令端、文档端、网络端之间的消息中继
//! - `env` - 类型安全的环境变量

pub mod core;
pub mod env;
pub mod parsers;
pub mod relay;
pub mod translation;

// Re-export commonly used items for convenience
pub use self::core::*;
pub use parsers::*;
