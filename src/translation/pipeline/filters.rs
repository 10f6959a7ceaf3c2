//! 文本过滤器模块
//!
//! 判断文本节点是否需要翻译。规则刻意保持粗粒度：误判可以容忍，
//! 替换阶段的正确性比选择阶段的召回率更重要。

use crate::translation::config::constants;

/// 文本过滤结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision<'a> {
    /// 接受，携带去除首尾空白后的文本
    Accept(&'a str),
    /// 去除空白后为空
    Blank,
    /// 太短
    TooShort,
    /// 不含字母
    NoAlphabetic,
}

impl FilterDecision<'_> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FilterDecision::Accept(_))
    }
}

/// 文本过滤器
#[derive(Debug, Clone)]
pub struct TextFilter {
    min_text_length: usize,
    skip_elements: Vec<String>,
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFilter {
    /// 创建新的文本过滤器
    pub fn new() -> Self {
        Self {
            min_text_length: constants::MIN_TEXT_LENGTH,
            skip_elements: constants::SKIP_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// 元素的文本是否永远不是待翻译正文（样式、脚本、代码等）
    pub fn is_excluded_element(&self, tag_name: &str) -> bool {
        self.skip_elements
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(tag_name))
    }

    /// 对文本节点的原始内容做出判断
    pub fn evaluate<'a>(&self, raw: &'a str) -> FilterDecision<'a> {
        let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

        if trimmed.is_empty() {
            return FilterDecision::Blank;
        }

        if trimmed.chars().count() < self.min_text_length {
            return FilterDecision::TooShort;
        }

        if !has_alphabetic(trimmed) {
            return FilterDecision::NoAlphabetic;
        }

        FilterDecision::Accept(trimmed)
    }

    /// 判断文本是否需要翻译
    pub fn should_translate(&self, text: &str) -> bool {
        self.evaluate(text).is_accepted()
    }
}

/// 源语言为英文，只认 ASCII 字母
fn has_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prose_and_trims_it() {
        let filter = TextFilter::new();
        assert_eq!(filter.evaluate("  Hello world  "), FilterDecision::Accept("Hello world"));
        assert_eq!(filter.evaluate("\n\tOK\n"), FilterDecision::Accept("OK"));
        assert!(filter.should_translate("Page 3 of 10"));
    }

    #[test]
    fn skips_blank_short_and_non_alphabetic() {
        let filter = TextFilter::new();
        assert_eq!(filter.evaluate(""), FilterDecision::Blank);
        assert_eq!(filter.evaluate(" \n\t "), FilterDecision::Blank);
        assert_eq!(filter.evaluate(" a "), FilterDecision::TooShort);
        assert_eq!(filter.evaluate("42"), FilterDecision::NoAlphabetic);
        assert_eq!(filter.evaluate("— | —"), FilterDecision::NoAlphabetic);
        assert_eq!(filter.evaluate("3.14159"), FilterDecision::NoAlphabetic);
    }

    #[test]
    fn byte_order_mark_is_trimmed() {
        let filter = TextFilter::new();
        assert_eq!(
            filter.evaluate("\u{feff}Hello world\u{feff} "),
            FilterDecision::Accept("Hello world")
        );
        assert_eq!(filter.evaluate("\u{feff}"), FilterDecision::Blank);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let filter = TextFilter::new();
        // 单个多字节字符仍然太短
        assert_eq!(filter.evaluate("é"), FilterDecision::TooShort);
        assert!(filter.should_translate("éa"));
    }

    #[test]
    fn non_latin_letters_do_not_count_as_alphabetic() {
        let filter = TextFilter::new();
        assert_eq!(filter.evaluate("你好"), FilterDecision::NoAlphabetic);
    }

    #[test]
    fn exclusion_set_is_case_insensitive() {
        let filter = TextFilter::new();
        for tag in ["style", "SCRIPT", "noscript", "code", "Pre"] {
            assert!(filter.is_excluded_element(tag), "{tag} should be excluded");
        }
        assert!(!filter.is_excluded_element("p"));
        assert!(!filter.is_excluded_element("span"));
    }

    #[test]
    fn accepted_text_satisfies_invariants() {
        let filter = TextFilter::new();
        let samples = ["", " ", "a", "ab", "12", "a1", " x y ", "--", "Hello", "\u{a0}hi\u{a0}"];
        for sample in samples {
            if let FilterDecision::Accept(text) = filter.evaluate(sample) {
                assert!(!text.trim().is_empty());
                assert!(text.chars().count() >= 2);
                assert!(text.chars().any(|c| c.is_ascii_alphabetic()));
            }
        }
    }
}
