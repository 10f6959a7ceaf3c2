//! # 解析器模块
//!
//! 文档解析、DOM访问与序列化。
//!
//! - `html` - HTML文档解析、DOM操作、元数据处理

pub mod html;

pub use html::{
    document_body, get_charset, get_title, html_to_dom, load_document, serialize_document,
};
