//! 文本收集器模块
//!
//! 按文档先序遍历DOM，产出可翻译的文本片段。片段保存对原文本节点的
//! 活引用，替换阶段直接修改该节点。

use std::iter::FusedIterator;

use markup5ever_rcdom::{Handle, NodeData};

use crate::parsers::html::text_content;
use crate::translation::pipeline::filters::{FilterDecision, TextFilter};

/// 一个可翻译的文本片段
#[derive(Debug, Clone)]
pub struct TextFragment {
    /// 选择时去除首尾空白后的文本
    pub original_text: String,
    /// 文本节点引用，节点归文档所有
    pub node: Handle,
}

impl TextFragment {
    /// 创建新的文本片段
    pub fn new(original_text: String, node: Handle) -> Self {
        Self {
            original_text,
            node,
        }
    }

    /// 节点当前的完整内容（包括首尾空白）
    pub fn current_text(&self) -> Option<String> {
        text_content(&self.node)
    }

    /// 获取文本字符数
    pub fn char_count(&self) -> usize {
        self.original_text.chars().count()
    }
}

/// 收集统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub nodes_visited: usize,
    /// 因元素被排除而整体跳过的子树
    pub subtrees_rejected: usize,
    pub text_nodes_found: usize,
    pub blank_texts: usize,
    pub filtered_texts: usize,
    pub fragments_accepted: usize,
}


/// 惰性的先序遍历器，只能消费一次
pub struct FragmentWalker<'f> {
    filter: &'f TextFilter,
    stack: Vec<Handle>,
    stats: CollectionStats,
}

impl<'f> FragmentWalker<'f> {
    pub fn new(root: &Handle, filter: &'f TextFilter) -> Self {
        Self {
            filter,
            stack: vec![root.clone()],
            stats: CollectionStats::default(),
        }
    }

    /// 到目前为止的遍历统计
    pub fn stats(&self) -> &CollectionStats {
        &self.stats
    }

    pub fn into_stats(self) -> CollectionStats {
        self.stats
    }

    fn push_children(&mut self, node: &Handle) {
        // 逆序压栈，保证按文档顺序弹出
        self.stack
            .extend(node.children.borrow().iter().rev().cloned());
    }

    fn visit_text(&mut self, node: &Handle) -> Option<TextFragment> {
        let NodeData::Text { ref contents } = node.data else {
            return None;
        };

        self.stats.text_nodes_found += 1;

        let raw = contents.borrow();
        match self.filter.evaluate(&raw) {
            FilterDecision::Accept(trimmed) => {
                self.stats.fragments_accepted += 1;
                Some(TextFragment::new(trimmed.to_string(), node.clone()))
            }
            FilterDecision::Blank => {
                self.stats.blank_texts += 1;
                None
            }
            FilterDecision::TooShort | FilterDecision::NoAlphabetic => {
                self.stats.filtered_texts += 1;
                None
            }
        }
    }
}

impl Iterator for FragmentWalker<'_> {
    type Item = TextFragment;

    fn next(&mut self) -> Option<TextFragment> {
        while let Some(node) = self.stack.pop() {
            self.stats.nodes_visited += 1;

            match node.data {
                NodeData::Text { .. } => {
                    if let Some(fragment) = self.visit_text(&node) {
                        return Some(fragment);
                    }
                }
                NodeData::Element { ref name, .. } => {
                    if self.filter.is_excluded_element(name.local.as_ref()) {
                        self.stats.subtrees_rejected += 1;
                        continue;
                    }
                    self.push_children(&node);
                }
                NodeData::Document => self.push_children(&node),
                _ => {}
            }
        }

        None
    }
}

impl FusedIterator for FragmentWalker<'_> {}

/// DOM文本收集器
#[derive(Debug, Clone, Default)]
pub struct TextCollector {
    filter: TextFilter,
    stats: CollectionStats,
}

impl TextCollector {
    /// 创建新的文本收集器
    pub fn new(filter: TextFilter) -> Self {
        Self {
            filter,
            stats: CollectionStats::default(),
        }
    }

    /// 返回惰性遍历器
    pub fn walk<'f>(&'f self, root: &Handle) -> FragmentWalker<'f> {
        FragmentWalker::new(root, &self.filter)
    }

    /// 收集可翻译文本
    pub fn collect_translatable_texts(&mut self, root: &Handle) -> Vec<TextFragment> {
        let mut walker = FragmentWalker::new(root, &self.filter);
        let fragments: Vec<TextFragment> = walker.by_ref().collect();
        self.stats = walker.into_stats();

        tracing::info!("找到 {} 个待翻译的文本节点", fragments.len());
        tracing::debug!("文本收集统计: {:?}", self.stats);

        fragments
    }

    /// 获取收集统计信息
    pub fn get_stats(&self) -> &CollectionStats {
        &self.stats
    }

    /// 获取过滤器
    pub fn filter(&self) -> &TextFilter {
        &self.filter
    }
}

/// 便利函数：用默认过滤器收集可翻译文本
pub fn collect_translatable_texts(root: &Handle) -> Vec<TextFragment> {
    TextCollector::default().collect_translatable_texts(root)
}
