use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::env::{core::NoColor, EnvVar};
use crate::translation::error::{TranslationError, TranslationResult};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

// All known non-"text/..." plaintext media types
const PLAINTEXT_MEDIA_TYPES: &[&str] = &[
    "application/xhtml+xml", // .xhtml
    "application/xml",       // .xml
    "image/svg+xml",         // .svg
];

/// 待翻译页面的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    Stdin,
    File(PathBuf),
    Url(Url),
}

impl InputTarget {
    /// 解析命令行中的目标：`-`、http(s) URL、file URL 或本地路径
    pub fn parse(target: &str) -> TranslationResult<Self> {
        if target == "-" {
            return Ok(InputTarget::Stdin);
        }

        if target.starts_with("http://") || target.starts_with("https://") {
            return Ok(InputTarget::Url(Url::parse(target)?));
        }

        if target.starts_with("file://") {
            let url = Url::parse(target)?;
            let path = url
                .to_file_path()
                .map_err(|_| TranslationError::InvalidInput(format!("无效的文件URL: {}", target)))?;
            return Ok(InputTarget::File(path));
        }

        Ok(InputTarget::File(PathBuf::from(target)))
    }

    /// 页面地址，用于日志和受限页面检查
    pub fn location(&self) -> String {
        match self {
            InputTarget::Stdin => "-".to_string(),
            InputTarget::File(path) => fs::canonicalize(path)
                .ok()
                .and_then(|p| Url::from_file_path(p).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| path.display().to_string()),
            InputTarget::Url(url) => url.to_string(),
        }
    }
}

/// 读取到的原始页面
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub data: Vec<u8>,
    /// HTTP 响应头里声明的字符集
    pub charset: Option<String>,
    pub location: String,
}

/// 读取页面内容
pub async fn read_input(target: &InputTarget) -> TranslationResult<SourceDocument> {
    let location = target.location();

    match target {
        InputTarget::Stdin => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data)?;
            Ok(SourceDocument {
                data,
                charset: None,
                location,
            })
        }
        InputTarget::File(path) => Ok(SourceDocument {
            data: read_file(path)?,
            charset: None,
            location,
        }),
        InputTarget::Url(url) => {
            let (data, charset) = fetch_url(url).await?;
            Ok(SourceDocument {
                data,
                charset,
                location,
            })
        }
    }
}

fn read_file(path: &Path) -> TranslationResult<Vec<u8>> {
    if !path.exists() {
        return Err(TranslationError::InvalidInput(format!(
            "File not found: {}",
            path.display()
        )));
    }

    fs::read(path).map_err(|e| TranslationError::IoError(format!("Failed to read file: {}", e)))
}

async fn fetch_url(url: &Url) -> TranslationResult<(Vec<u8>, Option<String>)> {
    tracing::debug!("下载页面: {}", url);

    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| TranslationError::NetworkError(format!("Failed to fetch URL: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TranslationError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut charset = None;
    if let Some(content_type) = content_type {
        let (media_type, declared_charset) = parse_content_type(&content_type);
        if !media_type.is_empty() && !is_plaintext_media_type(&media_type) {
            return Err(TranslationError::InvalidInput(format!(
                "Unsupported media type: {}",
                media_type
            )));
        }
        if !declared_charset.is_empty() {
            charset = Some(declared_charset);
        }
    }

    let data = response
        .bytes()
        .await
        .map_err(|e| TranslationError::NetworkError(e.to_string()))?;

    Ok((data.to_vec(), charset))
}

/// Parses Content-Type header value into media type and charset
pub fn parse_content_type(content_type: &str) -> (String, String) {
    let mut parts = content_type.split(';');
    let media_type = parts.next().unwrap_or_default().trim().to_lowercase();

    let charset = parts
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .unwrap_or_default();

    (media_type, charset)
}

/// Checks if the given media type represents plaintext content
pub fn is_plaintext_media_type(media_type: &str) -> bool {
    media_type.starts_with("text/") || PLAINTEXT_MEDIA_TYPES.contains(&media_type)
}

/// Formats output path with title substitution and sanitization
pub fn format_output_path(path: &str, document_title: Option<&str>, target_lang: &str) -> String {
    let datetime: &str = &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = document_title.unwrap_or("");

    path.replace("%timestamp%", &datetime.replace(':', "_"))
        .replace(
            "%title%",
            title
                .replace(['/', '\\'], "_")
                .replace('<', "[")
                .replace('>', "]")
                .replace(':', " - ")
                .replace('\"', "")
                .replace('|', "-")
                .replace('?', "")
                .trim_start_matches('.'),
        )
        .replace("%lang%", target_lang)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if NoColor::get_or_default(false) {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stderr
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}
