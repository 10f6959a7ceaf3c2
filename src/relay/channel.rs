//! 请求/回复通道
//!
//! 每条消息附带一个 oneshot 回复槽。接收端关闭或者丢弃回复槽时，
//! 发送方得到 `HostUnavailable`。

use tokio::sync::{mpsc, oneshot};

use super::messages::{Message, Reply};
use crate::translation::error::{TranslationError, TranslationResult};

/// 收件箱默认容量
pub const DEFAULT_CAPACITY: usize = 16;

/// 在通道中传递的消息和它的回复槽
#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    reply: Responder,
}

impl Envelope {
    pub fn into_parts(self) -> (Message, Responder) {
        (self.message, self.reply)
    }
}

/// 回复槽，只能使用一次
#[derive(Debug)]
pub struct Responder(oneshot::Sender<Reply>);

impl Responder {
    pub fn respond(self, reply: Reply) {
        if self.0.send(reply).is_err() {
            tracing::debug!("请求方已离开，丢弃回复");
        }
    }
}

/// 发送端，可以克隆
#[derive(Debug, Clone)]
pub struct MessageSender {
    endpoint: &'static str,
    tx: mpsc::Sender<Envelope>,
}

pub type MessageReceiver = mpsc::Receiver<Envelope>;

/// 创建指向 `endpoint` 的通道
pub fn channel(endpoint: &'static str, capacity: usize) -> (MessageSender, MessageReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MessageSender { endpoint, tx }, rx)
}

impl MessageSender {
    /// 发送消息并等待回复
    pub async fn send(&self, message: Message) -> TranslationResult<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            message,
            reply: Responder(reply_tx),
        };

        self.tx.send(envelope).await.map_err(|_| {
            TranslationError::HostUnavailable(format!("{} 未在运行", self.endpoint))
        })?;

        reply_rx.await.map_err(|_| {
            TranslationError::HostUnavailable(format!("{} 没有回复", self.endpoint))
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
