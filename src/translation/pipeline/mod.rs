//! 翻译管道模块
//!
//! 文本片段的选择、批次调度和译文替换

pub mod batch;
pub mod collector;
pub mod filters;
pub mod substitution;

// 重新导出主要类型
pub use batch::{partition, Batch, BatchOutcome, BatchScheduler, RunReport, SchedulerStats};
pub use collector::{
    collect_translatable_texts, CollectionStats, FragmentWalker, TextCollector, TextFragment,
};
pub use filters::{FilterDecision, TextFilter};
pub use substitution::{apply_substitution, Substitution};
