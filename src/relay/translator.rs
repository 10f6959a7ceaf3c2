use async_trait::async_trait;

use super::channel::MessageSender;
use super::messages::Message;
use crate::translation::core::BatchTranslator;
use crate::translation::error::TranslationResult;

/// 通过网络端转发批次的翻译客户端
///
/// 文档端使用它代替直接的 HTTP 客户端。
#[derive(Debug, Clone)]
pub struct RelayTranslator {
    network: MessageSender,
}

impl RelayTranslator {
    pub fn new(network: MessageSender) -> Self {
        Self { network }
    }
}

#[async_trait]
impl BatchTranslator for RelayTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        let reply = self
            .network
            .send(Message::TranslateBatch {
                texts: texts.to_vec(),
                target_lang: target_lang.to_string(),
            })
            .await?;

        reply.into_translated_texts()
    }
}
