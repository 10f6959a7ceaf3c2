// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use markup5ever_rcdom::RcDom;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use page_translator::parsers::html::{html_to_dom, serialize_document};
use page_translator::translation::core::BatchTranslator;
use page_translator::translation::error::{TranslationError, TranslationResult};

/// HTML测试辅助工具
pub struct HtmlTestHelper;

impl HtmlTestHelper {
    pub fn create_test_dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").expect("HTML should parse")
    }

    /// 创建简单的英文测试页面
    pub fn create_simple_english_page() -> String {
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Test Page</title>
    <style>body { font-family: sans-serif; }</style>
</head>
<body>
    <h1>Welcome to Test</h1>
    <p>This is a test paragraph.</p>
    <ul>
        <li>First item</li>
        <li>Second item</li>
    </ul>
    <script>console.log("not prose");</script>
    <pre>cargo build --release</pre>
    <p>Page 1 of 3</p>
    <footer>42</footer>
</body>
</html>"#
            .to_string()
    }

    /// 生成包含 `count` 个段落的页面，段落文本为 `Paragraph N`
    pub fn create_numbered_page(count: usize) -> String {
        let paragraphs: String = (1..=count)
            .map(|i| format!("<p>Paragraph {i}</p>"))
            .collect();
        format!("<html><body>{paragraphs}</body></html>")
    }

    pub fn serialize(dom: &RcDom) -> String {
        let bytes = serialize_document(dom, "utf-8").expect("serialization should succeed");
        String::from_utf8(bytes).expect("output should be UTF-8")
    }
}

/// 模拟翻译客户端的单次响应
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 在每条原文前加前缀
    Prefix(String),
    /// 固定返回的译文
    Fixed(Vec<String>),
    Fail(TranslationError),
}

/// 按调用顺序使用预设响应的翻译客户端
///
/// 预设用完后按 `[T]` 前缀回显。设置闸门后，每次调用都要等待一个许可。
#[derive(Debug, Default)]
pub struct MockTranslator {
    script: Mutex<Vec<MockResponse>>,
    calls: Mutex<Vec<(Vec<String>, String)>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockTranslator {
    pub fn new(script: Vec<MockResponse>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
            ..Default::default()
        }
    }

    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    /// 返回闸门，调用 `add_permits` 放行请求
    pub fn gated(script: Vec<MockResponse>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut translator = Self::new(script);
        translator.gate = Some(Arc::clone(&gate));
        (translator, gate)
    }

    pub fn calls(&self) -> Vec<(Vec<String>, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// 所有请求中出现过的原文
    pub fn all_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .flat_map(|(texts, _)| texts)
            .collect()
    }
}

#[async_trait]
impl BatchTranslator for MockTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((texts.to_vec(), target_lang.to_string()));

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let next = self.script.lock().unwrap().pop();
        match next {
            Some(MockResponse::Prefix(prefix)) => {
                Ok(texts.iter().map(|t| format!("{prefix}{t}")).collect())
            }
            Some(MockResponse::Fixed(out)) => Ok(out),
            Some(MockResponse::Fail(e)) => Err(e),
            None => Ok(texts.iter().map(|t| format!("[T]{t}")).collect()),
        }
    }
}

/// 假后端的行为
#[derive(Debug, Clone)]
pub enum BackendMode {
    /// 返回 `{"translated_texts": [prefix + text, ...]}`
    Echo(String),
    /// 与 Echo 相同，但包在 `{"success": true, "data": ...}` 里
    EchoWrapped(String),
    Status(u16),
    /// 原样返回响应体，状态 200
    Raw(String),
    /// 少返回一条译文
    DropLast,
    /// 第 N 个请求（从 1 开始）返回该状态码，其余按 Echo 处理
    FailNth(usize, u16),
}

#[derive(Clone)]
struct BackendState {
    mode: BackendMode,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    counter: Arc<AtomicUsize>,
}

/// 后端收到的请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub body: Value,
    pub accept: Option<String>,
}

/// 运行在随机端口上的假翻译后端
pub struct FakeBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub const BACKEND_PATH: &str = "/api/translate/batch";

impl FakeBackend {
    pub async fn start(mode: BackendMode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = BackendState {
            mode,
            requests: Arc::clone(&requests),
            counter: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route(BACKEND_PATH, post(handle_batch))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, BACKEND_PATH)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn texts_of(body: &Value) -> Vec<String> {
    body["texts"]
        .as_array()
        .map(|texts| {
            texts
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn echo(prefix: &str, texts: &[String]) -> Vec<String> {
    texts.iter().map(|t| format!("{prefix}{t}")).collect()
}

async fn handle_batch(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let texts = texts_of(&body);
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .unwrap()
        .push(RecordedRequest { body, accept });
    let nth = state.counter.fetch_add(1, Ordering::SeqCst) + 1;

    match &state.mode {
        BackendMode::Echo(prefix) => {
            Json(json!({ "translated_texts": echo(prefix, &texts) })).into_response()
        }
        BackendMode::EchoWrapped(prefix) => Json(json!({
            "success": true,
            "data": { "translated_texts": echo(prefix, &texts) }
        }))
        .into_response(),
        BackendMode::Status(code) => status(*code).into_response(),
        BackendMode::Raw(raw) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            raw.clone(),
        )
            .into_response(),
        BackendMode::DropLast => {
            let mut out = echo("", &texts);
            out.pop();
            Json(json!({ "translated_texts": out })).into_response()
        }
        BackendMode::FailNth(n, code) if *n == nth => status(*code).into_response(),
        BackendMode::FailNth(..) => {
            Json(json!({ "translated_texts": echo("[T]", &texts) })).into_response()
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
