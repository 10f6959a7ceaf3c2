use markup5ever_rcdom::{Handle, NodeData};

use super::dom::{find_nodes, get_node_attr};

/// 获取文档声明的字符集
pub fn get_charset(node: &Handle) -> Option<String> {
    for meta_node in find_nodes(node, &["html", "head", "meta"]).iter() {
        if let Some(charset) = get_node_attr(meta_node, "charset") {
            // <meta charset="..." />
            return Some(charset.trim().to_string());
        }

        if get_node_attr(meta_node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            // <meta http-equiv="content-type" content="text/html; charset=..." />
            if let Some(content) = get_node_attr(meta_node, "content") {
                if let Some(charset) = parse_charset_param(&content) {
                    return Some(charset);
                }
            }
        }
    }

    None
}

/// 获取文档标题
pub fn get_title(node: &Handle) -> Option<String> {
    for title_node in find_nodes(node, &["html", "head", "title"]).iter() {
        for child_node in title_node.children.borrow().iter() {
            if let NodeData::Text { ref contents } = child_node.data {
                return Some(contents.borrow().to_string());
            }
        }
    }

    None
}

fn parse_charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::html_to_dom;

    #[test]
    fn reads_meta_charset() {
        let dom = html_to_dom(br#"<head><meta charset="Shift_JIS"></head>"#, "utf-8").unwrap();
        assert_eq!(get_charset(&dom.document).as_deref(), Some("Shift_JIS"));
    }

    #[test]
    fn reads_http_equiv_charset() {
        let dom = html_to_dom(
            br#"<head><meta http-equiv="Content-Type" content="text/html; charset=windows-1251"></head>"#,
            "utf-8",
        )
        .unwrap();
        assert_eq!(get_charset(&dom.document).as_deref(), Some("windows-1251"));
    }

    #[test]
    fn reads_title() {
        let dom = html_to_dom(b"<title>Docs</title><p>x</p>", "utf-8").unwrap();
        assert_eq!(get_title(&dom.document).as_deref(), Some("Docs"));
        let empty = html_to_dom(b"<p>x</p>", "utf-8").unwrap();
        assert_eq!(get_charset(&empty.document), None);
    }
}
