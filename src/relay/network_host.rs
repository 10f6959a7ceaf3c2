//! 网络端
//!
//! 持有真正的翻译客户端，逐条处理 `translateBatch` 请求。

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::channel::MessageReceiver;
use super::messages::{Message, Reply};
use crate::translation::core::BatchTranslator;

/// 网络端
#[derive(Debug, Clone)]
pub struct NetworkHost {
    translator: Arc<dyn BatchTranslator>,
}

impl NetworkHost {
    pub fn new(translator: Arc<dyn BatchTranslator>) -> Self {
        Self { translator }
    }

    /// 处理收件箱直到所有发送端关闭
    pub async fn serve(self, mut inbox: MessageReceiver) {
        while let Some(envelope) = inbox.recv().await {
            let (message, responder) = envelope.into_parts();
            let reply = self.handle(message).await;
            responder.respond(reply);
        }

        tracing::debug!("网络端收件箱已关闭");
    }

    /// 在 tokio 运行时上启动
    pub fn spawn(self, inbox: MessageReceiver) -> JoinHandle<()> {
        tokio::spawn(self.serve(inbox))
    }

    async fn handle(&self, message: Message) -> Reply {
        match message {
            Message::TranslateBatch { texts, target_lang } => {
                match self.translator.translate_batch(&texts, &target_lang).await {
                    Ok(translated) => Reply::translated(translated),
                    Err(e) => {
                        tracing::warn!("翻译请求失败: {}", e);
                        Reply::failure(e.to_string())
                    }
                }
            }
            other => Reply::failure(format!("network host does not handle {}", other.action())),
        }
    }
}
