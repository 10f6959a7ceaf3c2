//! 消息中继
//!
//! 三个端点通过请求/回复通道相连：
//!
//! ```text
//! CommandSurface --translatePage--> DocumentHost --translateBatch--> NetworkHost --HTTP--> 后端
//! ```
//!
//! 文档端持有 `!Send` 的 DOM，运行在 `LocalSet` 上；网络端是普通的 tokio 任务。

pub mod channel;
pub mod command;
pub mod document_host;
pub mod messages;
pub mod network_host;
pub mod translator;

pub use channel::{channel, Envelope, MessageReceiver, MessageSender, Responder, DEFAULT_CAPACITY};
pub use command::CommandSurface;
pub use document_host::{DocumentHost, HostOutcome, ALREADY_RUNNING};
pub use messages::{Message, Reply, ReplyData};
pub use network_host::NetworkHost;
pub use translator::RelayTranslator;

use std::sync::Arc;

use markup5ever_rcdom::RcDom;

use crate::translation::core::BatchTranslator;
use crate::translation::error::{TranslationError, TranslationResult};

/// 连接三个端点，触发一次页面翻译并等待它结束
///
/// 必须在 `LocalSet` 中调用。触发失败时不会开始翻译，返回触发错误。
pub async fn run_page_translation(
    dom: RcDom,
    page_url: &str,
    target_lang: &str,
    batch_size: usize,
    translator: Arc<dyn BatchTranslator>,
) -> TranslationResult<HostOutcome> {
    let (network_tx, network_rx) = channel("network host", DEFAULT_CAPACITY);
    let (document_tx, document_rx) = channel("document host", DEFAULT_CAPACITY);

    let network = NetworkHost::new(translator).spawn(network_rx);
    let document = tokio::task::spawn_local(
        DocumentHost::new(dom, network_tx, batch_size).serve(document_rx),
    );

    let surface = CommandSurface::new(document_tx);
    let started = surface.translate_page(page_url, target_lang).await;
    // 关闭文档端收件箱，翻译结束后文档端随之退出
    drop(surface);

    let outcome = document
        .await
        .map_err(|e| TranslationError::InternalError(format!("文档端异常退出: {}", e)))?;
    if let Err(e) = network.await {
        tracing::error!("网络端异常退出: {}", e);
    }

    started?;
    Ok(outcome)
}
