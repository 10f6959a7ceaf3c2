//! HTML解析和处理模块
//!
//! - `dom`: 解析和基础DOM操作
//! - `metadata`: 文档元数据（字符集、标题）
//! - `serializer`: 序列化功能

use markup5ever_rcdom::RcDom;

pub mod dom;
pub mod metadata;
pub mod serializer;

pub use dom::{
    document_body, find_nodes, get_child_node_by_name, get_node_attr, get_node_name,
    get_parent_node, html_to_dom, text_content,
};
pub use metadata::{get_charset, get_title};
pub use serializer::serialize_document;

/// 解析文档字节，若文档声明的字符集与猜测不同则重新解码
pub fn load_document(data: &[u8], encoding: Option<&str>) -> std::io::Result<(RcDom, String)> {
    let first_guess = encoding.unwrap_or("utf-8");
    let dom = html_to_dom(data, first_guess)?;

    if encoding.is_none() {
        if let Some(charset) = get_charset(&dom.document) {
            let declared = encoding_rs::Encoding::for_label(charset.as_bytes());
            if declared.is_some_and(|enc| enc != encoding_rs::UTF_8) {
                return Ok((html_to_dom(data, &charset)?, charset));
            }
        }
    }

    Ok((dom, first_guess.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_document_honours_declared_charset() {
        let source = "<html><head><meta charset=\"windows-1252\"></head><body><p>na\u{ef}ve</p></body></html>";
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(source);
        let (dom, charset) = load_document(&bytes, None).unwrap();
        assert_eq!(charset, "windows-1252");
        let p = find_nodes(&dom.document, &["p"]);
        let text = p[0].children.borrow()[0].clone();
        assert_eq!(text_content(&text).as_deref(), Some("na\u{ef}ve"));
    }

    #[test]
    fn explicit_encoding_wins() {
        let (_, charset) = load_document(b"<p>x</p>", Some("utf-8")).unwrap();
        assert_eq!(charset, "utf-8");
    }
}
