//! 翻译服务核心实现
//!
//! 把文本收集、批次调度和译文替换串成一次完整的页面翻译。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use page_translator::translation::{TranslationConfig, TranslationService};
//!
//! let service = TranslationService::new(TranslationConfig::default_with_lang("hi", None))?;
//! let (dom, report) = service.translate_dom(dom).await?;
//! println!("替换了 {} 个片段", report.fragments_substituted());
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use markup5ever_rcdom::{Handle, RcDom};

use super::client::{BatchTranslator, HttpTranslator};
use crate::parsers::html::document_body;
use crate::translation::{
    config::TranslationConfig,
    error::{TranslationError, TranslationResult},
    pipeline::{BatchScheduler, RunReport, TextCollector, TextFilter},
};

/// 统一的翻译服务
///
/// 服务本身不持有文档；每次调用处理调用方传入的文档树。
/// 同一文档上不应并发运行两次翻译，由调用方保证。
#[derive(Debug)]
pub struct TranslationService {
    config: TranslationConfig,
    translator: Arc<dyn BatchTranslator>,
    filter: TextFilter,
    scheduler: BatchScheduler,
    stats: ServiceStats,
}

impl TranslationService {
    /// 使用 HTTP 后端创建翻译服务
    pub fn new(config: TranslationConfig) -> TranslationResult<Self> {
        let translator = Arc::new(HttpTranslator::from_config(&config)?);
        Self::with_translator(config, translator)
    }

    /// 使用自定义翻译客户端创建服务
    pub fn with_translator(
        config: TranslationConfig,
        translator: Arc<dyn BatchTranslator>,
    ) -> TranslationResult<Self> {
        config.validate()?;

        Ok(Self {
            scheduler: BatchScheduler::new(config.batch_size),
            filter: TextFilter::new(),
            config,
            translator,
            stats: ServiceStats::default(),
        })
    }

    /// 创建使用默认配置的翻译服务
    pub fn create_default(target_lang: &str, api_url: Option<&str>) -> TranslationResult<Self> {
        Self::new(TranslationConfig::default_with_lang(target_lang, api_url))
    }

    /// 翻译以 `root` 为根的子树
    ///
    /// 先完整收集片段，再逐批翻译和替换。单个批次的失败记录在报告中，不会返回错误。
    pub async fn translate_root(&self, root: &Handle, target_lang: &str) -> RunReport {
        let mut collector = TextCollector::new(self.filter.clone());
        let fragments = collector.collect_translatable_texts(root);
        self.stats
            .texts_collected
            .fetch_add(fragments.len(), Ordering::Relaxed);

        if fragments.is_empty() {
            tracing::info!("没有找到需要翻译的文本");
            return RunReport::default();
        }

        let report = self
            .scheduler
            .run(self.translator.as_ref(), fragments, target_lang)
            .await;
        self.stats.record(&report);

        report
    }

    /// 翻译整个文档的 `<body>`，目标语言取自配置
    pub async fn translate_dom(&self, dom: RcDom) -> TranslationResult<(RcDom, RunReport)> {
        let target_lang = self.config.target_lang.trim();
        if target_lang.is_empty() {
            return Err(TranslationError::InvalidInput("目标语言不能为空".to_string()));
        }

        tracing::info!("开始翻译页面 -> {}", target_lang);

        let body = document_body(&dom);
        let report = self.translate_root(&body, target_lang).await;

        Ok((dom, report))
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 获取服务统计信息
    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }
}

/// 翻译服务统计信息
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub runs_completed: AtomicUsize,
    pub texts_collected: AtomicUsize,
    pub batches_created: AtomicUsize,
    pub batches_failed: AtomicUsize,
    pub fragments_substituted: AtomicUsize,
    /// 累计处理时间（毫秒）
    pub processing_time: AtomicU64,
}

impl ServiceStats {
    fn record(&self, report: &RunReport) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        self.batches_created
            .fetch_add(report.outcomes.len(), Ordering::Relaxed);
        self.batches_failed
            .fetch_add(report.batches_failed(), Ordering::Relaxed);
        self.fragments_substituted
            .fetch_add(report.fragments_substituted(), Ordering::Relaxed);
        self.processing_time
            .fetch_add(report.elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            texts_collected: self.texts_collected.load(Ordering::Relaxed),
            batches_created: self.batches_created.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            fragments_substituted: self.fragments_substituted.load(Ordering::Relaxed),
            processing_time_ms: self.processing_time.load(Ordering::Relaxed),
        }
    }
}

/// 统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatsSnapshot {
    pub runs_completed: usize,
    pub texts_collected: usize,
    pub batches_created: usize,
    pub batches_failed: usize,
    pub fragments_substituted: usize,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::html::{html_to_dom, serialize_document};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Upper;

    #[async_trait]
    impl BatchTranslator for Upper {
        async fn translate_batch(
            &self,
            texts: &[String],
            _target_lang: &str,
        ) -> TranslationResult<Vec<String>> {
            Ok(texts.iter().map(|t| t.to_uppercase()).collect())
        }
    }

    fn service(target: &str) -> TranslationService {
        let config = TranslationConfig::default_with_lang(target, None);
        TranslationService::with_translator(config, Arc::new(Upper)).unwrap()
    }

    #[tokio::test]
    async fn translates_body_text_only() {
        let html = "<html><head><title>Keep title</title></head>\
                    <body><p> Hello there </p><code>keep code</code></body></html>";
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();

        let svc = service("hi");
        let (dom, report) = svc.translate_dom(dom).await.unwrap();
        let out = String::from_utf8(serialize_document(&dom, "utf-8").unwrap()).unwrap();

        assert!(out.contains("<p> HELLO THERE </p>"));
        assert!(out.contains("<code>keep code</code>"));
        assert!(out.contains("<title>Keep title</title>"));
        assert_eq!(report.fragments_substituted(), 1);

        let stats = svc.get_stats().snapshot();
        assert_eq!(stats.runs_completed, 1);
        assert_eq!(stats.texts_collected, 1);
        assert_eq!(stats.batches_created, 1);
    }

    #[tokio::test]
    async fn nothing_to_translate_is_not_an_error() {
        let dom = html_to_dom(b"<p>42</p><script>var x;</script>", "utf-8").unwrap();
        let (_, report) = service("hi").translate_dom(dom).await.unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(report.fragments_selected, 0);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = TranslationConfig::default_with_lang("hi", None);
        config.batch_size = 0;
        let err = TranslationService::with_translator(config, Arc::new(Upper)).unwrap_err();
        assert!(matches!(err, TranslationError::ConfigError(_)));
    }
}
