//! 翻译系统核心模块
//!
//! - **客户端** (`client.rs`): `BatchTranslator` 接口及其 HTTP 实现
//! - **服务层** (`service.rs`): 收集、调度、替换的完整流程
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── TextCollector (pipeline/collector.rs)
//!     ├── BatchScheduler (pipeline/batch.rs)
//!     │       └── apply_substitution (pipeline/substitution.rs)
//!     └── BatchTranslator (client.rs)
//! ```

pub mod client;
pub mod service;

pub use client::{BatchTranslateRequest, BatchTranslator, HttpTranslator};
pub use service::{ServiceStats, ServiceStatsSnapshot, TranslationService};
