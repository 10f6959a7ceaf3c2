//! 端点之间传递的消息
//!
//! 字段名与浏览器扩展的消息保持一致（`action`、`targetLang`、`translated_texts`），
//! 序列化后的 JSON 可以直接和扩展互通。

use serde::{Deserialize, Serialize};

use crate::translation::error::{TranslationError, TranslationResult};

/// 请求消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    /// 命令端 -> 文档端：翻译整个页面
    #[serde(rename = "translatePage")]
    TranslatePage {
        #[serde(rename = "targetLang")]
        target_lang: String,
    },

    /// 文档端 -> 网络端：翻译一个批次
    #[serde(rename = "translateBatch")]
    TranslateBatch {
        texts: Vec<String>,
        #[serde(rename = "targetLang")]
        target_lang: String,
    },
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::TranslatePage { .. } => "translatePage",
            Message::TranslateBatch { .. } => "translateBatch",
        }
    }
}

/// 批次译文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyData {
    pub translated_texts: Vec<String>,
}

/// 回复消息
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ReplyData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    /// `{success: true}`
    pub fn ack() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn translated(translated_texts: Vec<String>) -> Self {
        Self {
            success: true,
            data: Some(ReplyData { translated_texts }),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// 取出批次译文
    pub fn into_translated_texts(self) -> TranslationResult<Vec<String>> {
        if !self.success {
            return Err(TranslationError::TranslationServiceError(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        self.data
            .map(|data| data.translated_texts)
            .ok_or_else(|| TranslationError::MalformedResponse("回复中缺少 translated_texts".to_string()))
    }
}
