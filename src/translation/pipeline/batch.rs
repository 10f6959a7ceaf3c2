//! 翻译批次调度模块
//!
//! 把片段序列切成固定大小的连续批次，逐个（不并发）交给翻译客户端，
//! 成功的批次立即写回文档。单个批次失败只跳过该批次，不会中止整个运行。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use page_translator::translation::pipeline::BatchScheduler;
//!
//! let scheduler = BatchScheduler::new(10);
//! let report = scheduler.run(&translator, fragments, "hi").await;
//! println!("成功 {} 个批次，失败 {} 个", report.batches_succeeded(), report.batches_failed());
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use super::collector::TextFragment;
use super::substitution::apply_substitution;
use crate::translation::config::constants;
use crate::translation::core::BatchTranslator;
use crate::translation::error::{helpers, TranslationError};

/// 翻译批次
#[derive(Debug, Clone)]
pub struct Batch {
    /// 批次序号，从 1 开始
    pub id: usize,
    pub fragments: Vec<TextFragment>,
}

impl Batch {
    pub fn new(id: usize, fragments: Vec<TextFragment>) -> Self {
        Self { id, fragments }
    }

    /// 批次中的原文，顺序与片段一致
    pub fn texts(&self) -> Vec<String> {
        self.fragments
            .iter()
            .map(|f| f.original_text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// 批次字符总数
    pub fn total_chars(&self) -> usize {
        self.fragments.iter().map(TextFragment::char_count).sum()
    }

    /// 获取批次摘要信息
    pub fn summary(&self) -> String {
        format!(
            "批次 {}: {} 项, {} 字符",
            self.id,
            self.len(),
            self.total_chars()
        )
    }
}

/// 把片段切成连续批次，除最后一个外每个批次恰好 `batch_size` 项
///
/// `batch_size` 为 0 时按 1 处理。
pub fn partition(fragments: Vec<TextFragment>, batch_size: usize) -> Vec<Batch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(fragments.len().div_ceil(batch_size));
    let mut fragments = fragments.into_iter().peekable();

    while fragments.peek().is_some() {
        let chunk: Vec<TextFragment> = fragments.by_ref().take(batch_size).collect();
        batches.push(Batch::new(batches.len() + 1, chunk));
    }

    batches
}

/// 单个批次的处理结果
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// 译文已写回
    Applied {
        batch_id: usize,
        size: usize,
        substituted: usize,
        /// 节点内容已变化、未能替换的片段数
        missed: usize,
    },
    /// 批次被丢弃，没有任何替换
    Failed {
        batch_id: usize,
        size: usize,
        error: TranslationError,
    },
}

impl BatchOutcome {
    pub fn batch_id(&self) -> usize {
        match self {
            BatchOutcome::Applied { batch_id, .. } | BatchOutcome::Failed { batch_id, .. } => {
                *batch_id
            }
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, BatchOutcome::Applied { .. })
    }

    pub fn error(&self) -> Option<&TranslationError> {
        match self {
            BatchOutcome::Failed { error, .. } => Some(error),
            BatchOutcome::Applied { .. } => None,
        }
    }
}

/// 一次完整运行的报告
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub fragments_selected: usize,
    pub outcomes: Vec<BatchOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn batches_succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn batches_failed(&self) -> usize {
        self.outcomes.len() - self.batches_succeeded()
    }

    /// 实际被替换的片段数
    pub fn fragments_substituted(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                BatchOutcome::Applied { substituted, .. } => *substituted,
                BatchOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// 未被翻译的片段数（失败批次加上替换未命中）
    pub fn fragments_untranslated(&self) -> usize {
        self.fragments_selected - self.fragments_substituted()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_applied())
    }
}

/// 调度器累计统计
#[derive(Debug, Default)]
pub struct SchedulerStats {
    pub runs: AtomicUsize,
    pub batches_processed: AtomicUsize,
    pub batches_failed: AtomicUsize,
    pub fragments_substituted: AtomicUsize,
    pub fragments_missed: AtomicUsize,
    pub processing_time_ms: AtomicU64,
}

impl SchedulerStats {
    fn record(&self, outcome: &BatchOutcome) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
        match outcome {
            BatchOutcome::Applied {
                substituted,
                missed,
                ..
            } => {
                self.fragments_substituted
                    .fetch_add(*substituted, Ordering::Relaxed);
                self.fragments_missed.fetch_add(*missed, Ordering::Relaxed);
            }
            BatchOutcome::Failed { .. } => {
                self.batches_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn get_batches_processed(&self) -> usize {
        self.batches_processed.load(Ordering::Relaxed)
    }

    pub fn get_batches_failed(&self) -> usize {
        self.batches_failed.load(Ordering::Relaxed)
    }

    pub fn get_fragments_substituted(&self) -> usize {
        self.fragments_substituted.load(Ordering::Relaxed)
    }
}

/// 顺序批次调度器
#[derive(Debug)]
pub struct BatchScheduler {
    batch_size: usize,
    stats: SchedulerStats,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(constants::DEFAULT_BATCH_SIZE)
    }
}

impl BatchScheduler {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            stats: SchedulerStats::default(),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 处理全部片段直到结束
    ///
    /// 每个批次只尝试一次；前一个批次完成（成功或失败）后才开始下一个。
    pub async fn run(
        &self,
        translator: &dyn BatchTranslator,
        fragments: Vec<TextFragment>,
        target_lang: &str,
    ) -> RunReport {
        let start = Instant::now();
        let fragments_selected = fragments.len();
        let batches = partition(fragments, self.batch_size);

        tracing::debug!(
            "开始翻译: {} 个片段, {} 个批次, 目标语言 {}",
            fragments_selected,
            batches.len(),
            target_lang
        );

        let mut outcomes = Vec::with_capacity(batches.len());
        for batch in &batches {
            let outcome = self.process_batch(translator, batch, target_lang).await;
            self.stats.record(&outcome);
            outcomes.push(outcome);
        }

        let elapsed = start.elapsed();
        self.stats.runs.fetch_add(1, Ordering::Relaxed);
        self.stats
            .processing_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);

        let report = RunReport {
            fragments_selected,
            outcomes,
            elapsed,
        };

        tracing::info!(
            "可用节点翻译完成: {}/{} 个批次成功, 替换 {} 个片段, 耗时 {:?}",
            report.batches_succeeded(),
            report.outcomes.len(),
            report.fragments_substituted(),
            elapsed
        );

        report
    }

    async fn process_batch(
        &self,
        translator: &dyn BatchTranslator,
        batch: &Batch,
        target_lang: &str,
    ) -> BatchOutcome {
        tracing::debug!("处理翻译批次: {}", batch.summary());

        let texts = batch.texts();
        let result = translator
            .translate_batch(&texts, target_lang)
            .await
            .and_then(|translated| {
                if translated.len() == batch.len() {
                    Ok(translated)
                } else {
                    Err(TranslationError::CountMismatch {
                        expected: batch.len(),
                        actual: translated.len(),
                    })
                }
            });

        match result {
            Ok(translated) => {
                let mut substituted = 0;
                for (fragment, text) in batch.fragments.iter().zip(&translated) {
                    if apply_substitution(fragment, text).is_replaced() {
                        substituted += 1;
                    }
                }
                BatchOutcome::Applied {
                    batch_id: batch.id,
                    size: batch.len(),
                    substituted,
                    missed: batch.len() - substituted,
                }
            }
            Err(error) => {
                let error = error.with_context(format!("批次 {}", batch.id));
                helpers::log_error(&error);
                BatchOutcome::Failed {
                    batch_id: batch.id,
                    size: batch.len(),
                    error,
                }
            }
        }
    }

    pub fn get_stats(&self) -> &SchedulerStats {
        &self.stats
    }
}
