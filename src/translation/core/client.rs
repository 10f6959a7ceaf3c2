//! 翻译客户端
//!
//! `BatchTranslator` 是调度器与翻译后端之间的接缝：输入一批原文和目标语言，
//! 输出同样顺序、同样数量的译文，或者一个明确的失败。

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 批量翻译接口
#[async_trait]
pub trait BatchTranslator: Send + Sync + Debug {
    /// 翻译一个批次
    ///
    /// 成功时返回的译文与 `texts` 一一对应。
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> TranslationResult<Vec<String>>;
}

/// 后端请求体
#[derive(Debug, Serialize)]
pub struct BatchTranslateRequest<'a> {
    pub texts: &'a [String],
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

/// 后端响应体
///
/// 译文可以直接位于顶层，也可以包在 `data` 里。
#[derive(Debug, Default, Deserialize)]
struct BatchTranslateResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    translated_texts: Option<Vec<String>>,
    #[serde(default)]
    data: Option<TranslatedTexts>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslatedTexts {
    translated_texts: Vec<String>,
}

impl BatchTranslateResponse {
    fn into_texts(self) -> TranslationResult<Vec<String>> {
        if self.success == Some(false) {
            return Err(TranslationError::TranslationServiceError(
                self.error.unwrap_or_else(|| "后端返回失败".to_string()),
            ));
        }

        self.translated_texts
            .or(self.data.map(|d| d.translated_texts))
            .ok_or_else(|| {
                TranslationError::MalformedResponse("响应中缺少 translated_texts".to_string())
            })
    }
}

/// 基于 HTTP 的翻译客户端
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: Client,
    api_url: String,
    source_lang: String,
}

impl HttpTranslator {
    pub fn new(
        api_url: impl Into<String>,
        source_lang: impl Into<String>,
        timeout: Option<Duration>,
    ) -> TranslationResult<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("无法创建HTTP客户端: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            source_lang: source_lang.into(),
        })
    }

    /// 根据翻译配置创建客户端
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        Self::new(
            config.api_url.clone(),
            config.source_lang.clone(),
            config.request_timeout(),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }
}

#[async_trait]
impl BatchTranslator for HttpTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = BatchTranslateRequest {
            texts,
            source_lang: &self.source_lang,
            target_lang,
        };

        tracing::debug!("发送翻译请求: {} 条文本 -> {}", texts.len(), self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::NetworkError(e.to_string()))?;
        let parsed: BatchTranslateResponse = serde_json::from_str(&body)?;
        let translated = parsed.into_texts()?;

        if translated.len() != texts.len() {
            return Err(TranslationError::CountMismatch {
                expected: texts.len(),
                actual: translated.len(),
            });
        }

        Ok(translated)
    }
}
