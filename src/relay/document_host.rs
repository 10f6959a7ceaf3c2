//! 文档端
//!
//! 持有文档，收到 `translatePage` 后立即确认，然后在本地任务中运行翻译。
//! `RcDom` 不能跨线程，所以 [`DocumentHost::serve`] 必须在
//! [`tokio::task::LocalSet`] 中运行。

use std::fmt;
use std::rc::Rc;

use markup5ever_rcdom::RcDom;
use tokio::task::JoinHandle;

use super::channel::{MessageReceiver, MessageSender};
use super::messages::{Message, Reply};
use super::translator::RelayTranslator;
use crate::parsers::html::document_body;
use crate::translation::pipeline::{BatchScheduler, RunReport, TextCollector, TextFilter};

pub const ALREADY_RUNNING: &str = "translation already in progress";

/// 文档端结束后交还的结果
pub struct HostOutcome {
    pub dom: RcDom,
    /// 按触发顺序排列的运行报告
    pub reports: Vec<RunReport>,
}

// RcDom 没有实现 Debug
impl fmt::Debug for HostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostOutcome")
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

/// 文档端
pub struct DocumentHost {
    dom: RcDom,
    network: MessageSender,
    batch_size: usize,
    filter: TextFilter,
}

impl DocumentHost {
    pub fn new(dom: RcDom, network: MessageSender, batch_size: usize) -> Self {
        Self {
            dom,
            network,
            batch_size,
            filter: TextFilter::new(),
        }
    }

    /// 处理收件箱，直到所有发送端关闭并且正在进行的翻译结束
    pub async fn serve(self, mut inbox: MessageReceiver) -> HostOutcome {
        let translator = Rc::new(RelayTranslator::new(self.network.clone()));
        let scheduler = Rc::new(BatchScheduler::new(self.batch_size));
        let mut running: Option<JoinHandle<RunReport>> = None;
        let mut reports = Vec::new();

        while let Some(envelope) = inbox.recv().await {
            let (message, responder) = envelope.into_parts();

            let target_lang = match message {
                Message::TranslatePage { target_lang } => target_lang.trim().to_string(),
                other => {
                    responder.respond(Reply::failure(format!(
                        "document host does not handle {}",
                        other.action()
                    )));
                    continue;
                }
            };

            if running.as_ref().is_some_and(JoinHandle::is_finished) {
                if let Some(handle) = running.take() {
                    collect_report(handle, &mut reports).await;
                }
            }

            if running.is_some() {
                tracing::warn!("已有翻译在进行，忽略新的请求");
                responder.respond(Reply::failure(ALREADY_RUNNING));
                continue;
            }

            if target_lang.is_empty() {
                responder.respond(Reply::failure("targetLang is required"));
                continue;
            }

            // 先确认，翻译在本地任务中进行
            responder.respond(Reply::ack());

            let body = document_body(&self.dom);
            let filter = self.filter.clone();
            let translator = Rc::clone(&translator);
            let scheduler = Rc::clone(&scheduler);

            running = Some(tokio::task::spawn_local(async move {
                tracing::info!("开始翻译页面 -> {}", target_lang);
                let fragments = TextCollector::new(filter).collect_translatable_texts(&body);
                scheduler
                    .run(translator.as_ref(), fragments, &target_lang)
                    .await
            }));
        }

        if let Some(handle) = running {
            collect_report(handle, &mut reports).await;
        }

        tracing::debug!("文档端收件箱已关闭，共 {} 次运行", reports.len());

        HostOutcome {
            dom: self.dom,
            reports,
        }
    }
}

async fn collect_report(handle: JoinHandle<RunReport>, reports: &mut Vec<RunReport>) {
    match handle.await {
        Ok(report) => reports.push(report),
        Err(e) => tracing::error!("翻译任务异常结束: {}", e),
    }
}
