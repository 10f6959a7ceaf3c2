//! 译文替换模块
//!
//! 在文本节点的当前内容中替换首次出现的原文，保留选择时被去掉的首尾空白。

use markup5ever_rcdom::NodeData;

use super::collector::TextFragment;

/// 替换结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// 原文被替换
    Replaced,
    /// 节点当前内容中已找不到原文，未做修改
    Missing,
}

impl Substitution {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Substitution::Replaced)
    }
}

/// 将译文写回片段引用的文本节点
///
/// 只替换第一次出现的原文。节点内容在选择后被修改过时静默跳过。
pub fn apply_substitution(fragment: &TextFragment, translated: &str) -> Substitution {
    let NodeData::Text { ref contents } = fragment.node.data else {
        return Substitution::Missing;
    };

    let mut contents = contents.borrow_mut();
    let Some(updated) = replace_first(&contents, &fragment.original_text, translated) else {
        tracing::trace!("原文已不在节点中，跳过: {:?}", fragment.original_text);
        return Substitution::Missing;
    };

    contents.clear();
    contents.push_slice(&updated);

    Substitution::Replaced
}

/// 字面替换第一次出现的 `needle`，找不到时返回 None
fn replace_first(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let start = haystack.find(needle)?;

    let mut out = String::with_capacity(haystack.len() - needle.len() + replacement.len());
    out.push_str(&haystack[..start]);
    out.push_str(replacement);
    out.push_str(&haystack[start + needle.len()..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{document_body, html_to_dom, serialize_document};
    use crate::translation::pipeline::collector::collect_translatable_texts;

    fn single_fragment(html: &str) -> (markup5ever_rcdom::RcDom, TextFragment) {
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        let mut fragments = collect_translatable_texts(&document_body(&dom));
        assert_eq!(fragments.len(), 1);
        let fragment = fragments.remove(0);
        (dom, fragment)
    }

    #[test]
    fn preserves_surrounding_whitespace() {
        let (_dom, fragment) = single_fragment("<p>  Hello world  </p>");
        assert_eq!(apply_substitution(&fragment, "नमस्ते दुनिया"), Substitution::Replaced);
        assert_eq!(fragment.current_text().as_deref(), Some("  नमस्ते दुनिया  "));
    }

    #[test]
    fn replaces_only_first_occurrence() {
        let (_dom, fragment) = single_fragment("<p>go</p>");
        // 模拟节点被页面改写为包含两次原文
        if let NodeData::Text { ref contents } = fragment.node.data {
            let mut contents = contents.borrow_mut();
            contents.clear();
            contents.push_slice("go go");
        }
        assert!(apply_substitution(&fragment, "jao").is_replaced());
        assert_eq!(fragment.current_text().as_deref(), Some("jao go"));
    }

    #[test]
    fn stale_node_is_a_silent_no_op() {
        let (_dom, fragment) = single_fragment("<p>Original text</p>");
        if let NodeData::Text { ref contents } = fragment.node.data {
            let mut contents = contents.borrow_mut();
            contents.clear();
            contents.push_slice("Changed by page script");
        }
        assert_eq!(apply_substitution(&fragment, "अनुवाद"), Substitution::Missing);
        assert_eq!(fragment.current_text().as_deref(), Some("Changed by page script"));
    }

    #[test]
    fn replacement_is_literal() {
        let (_dom, fragment) = single_fragment("<p>Price list</p>");
        assert!(apply_substitution(&fragment, "$& and $1").is_replaced());
        assert_eq!(fragment.current_text().as_deref(), Some("$& and $1"));
    }

    #[test]
    fn substitution_is_visible_in_serialized_document() {
        let (dom, fragment) = single_fragment("<div><p>\n  Read more\n</p></div>");
        apply_substitution(&fragment, "और पढ़ें");
        let html = String::from_utf8(serialize_document(&dom, "utf-8").unwrap()).unwrap();
        assert!(html.contains("<p>\n  और पढ़ें\n</p>"));
    }

    #[test]
    fn replace_first_edge_cases() {
        assert_eq!(replace_first("abc", "", "x"), None);
        assert_eq!(replace_first("abc", "d", "x"), None);
        assert_eq!(replace_first("abcabc", "bc", "X").as_deref(), Some("aXabc"));
    }
}
