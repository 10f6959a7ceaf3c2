//! 命令端
//!
//! 用户触发翻译的入口。只负责把 `translatePage` 送到文档端并解释回复，
//! 不等待翻译完成。

use super::channel::MessageSender;
use super::messages::Message;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::is_restricted_url;

/// 命令端
#[derive(Debug, Clone)]
pub struct CommandSurface {
    document: MessageSender,
}

impl CommandSurface {
    pub fn new(document: MessageSender) -> Self {
        Self { document }
    }

    /// 浏览器内部页面不允许翻译
    pub fn check_page(page_url: &str) -> TranslationResult<()> {
        if is_restricted_url(page_url) {
            return Err(TranslationError::InvalidInput(
                "Cannot translate browser internal pages.".to_string(),
            ));
        }
        Ok(())
    }

    /// 请求翻译页面
    ///
    /// 返回 `Ok` 只表示翻译已开始。
    pub async fn translate_page(&self, page_url: &str, target_lang: &str) -> TranslationResult<()> {
        Self::check_page(page_url)?;

        let message = Message::TranslatePage {
            target_lang: target_lang.to_string(),
        };

        let reply = self.document.send(message).await.map_err(|e| match e {
            TranslationError::HostUnavailable(detail) => TranslationError::HostUnavailable(
                format!("Refresh the page and try again. ({})", detail),
            ),
            other => other,
        })?;

        if reply.success {
            tracing::info!("翻译已开始: {} -> {}", page_url, target_lang);
            Ok(())
        } else {
            Err(TranslationError::CommandRejected(
                reply.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
