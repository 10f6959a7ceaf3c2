//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub target_lang: String,
    pub source_lang: String,
    pub api_url: String,

    /// 每个批次的最大片段数
    pub batch_size: usize,
    /// 单次HTTP请求超时（秒），0 表示不限制
    pub request_timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),
            batch_size: constants::DEFAULT_BATCH_SIZE,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TranslationConfig {
    /// 创建带指定语言的默认配置
    pub fn default_with_lang(target_lang: &str, api_url: Option<&str>) -> Self {
        let mut config = Self {
            target_lang: target_lang.to_string(),
            ..Self::default()
        };
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        config
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.batch_size == 0 {
            return Err(TranslationError::ConfigError("批次大小不能为0".to_string()));
        }

        if self.target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("目标语言不能为空".to_string()));
        }

        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("源语言不能为空".to_string()));
        }

        let url = url::Url::parse(&self.api_url)
            .map_err(|e| TranslationError::ConfigError(format!("API URL无效: {}", e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TranslationError::ConfigError(format!(
                "API URL必须使用 http 或 https: {}",
                self.api_url
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{translation, EnvVar};

        if let Some(target_lang) = translation::TargetLang::get_if_set()? {
            self.target_lang = target_lang;
        }

        if let Some(source_lang) = translation::SourceLang::get_if_set()? {
            self.source_lang = source_lang;
        }

        if let Some(api_url) = translation::ApiUrl::get_if_set()? {
            tracing::info!("环境变量覆盖 API URL: {}", api_url);
            self.api_url = api_url;
        }

        if let Some(batch_size) = translation::BatchSize::get_if_set()? {
            self.batch_size = batch_size;
        }

        if let Some(timeout) = translation::RequestTimeout::get_if_set()? {
            self.request_timeout_secs = timeout.as_secs();
        }

        Ok(())
    }

    /// 请求超时，未设置时返回 None
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

/// 简化的配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 从默认搜索路径、.env 和环境变量创建配置管理器
    pub fn new() -> TranslationResult<Self> {
        Self::load(None)
    }

    /// 从指定配置文件创建配置管理器
    pub fn from_file(path: &str) -> TranslationResult<Self> {
        Self::load(Some(path))
    }

    fn load(path: Option<&str>) -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_config()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 取出配置
    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    /// 在当前配置上覆盖目标语言和API地址
    pub fn create_simple_config(
        &self,
        target_lang: &str,
        api_url: Option<&str>,
    ) -> TranslationResult<TranslationConfig> {
        let mut config = self.config.clone();
        config.target_lang = target_lang.to_string();
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// 从默认搜索路径加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let expanded_path = shellexpand::tilde(path);
        let content = std::fs::read_to_string(expanded_path.as_ref()).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败 {}: {}", path, e))
        })?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::debug!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
