//! Shared test fixtures for api, config, and chat test modules.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "finetalk-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Build one SSE block carrying a single `data:` line.
pub fn sse_data_block(data: &str) -> String {
    format!("data: {data}\n\n")
}

/// SSE block for one chat chunk whose delta carries `text`.
pub fn sse_content_chunk(text: &str) -> String {
    let chunk = json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "choices": [{"index": 0, "delta": {"content": text}, "finish_reason": null}]
    });
    sse_data_block(&chunk.to_string())
}

/// SSE stream terminator block used by OpenAI-compatible streams.
pub fn sse_done_block() -> &'static str {
    "data: [DONE]\n\n"
}

/// Full HTTP/1.1 response text with a closing connection.
pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Request as seen by [`spawn_one_shot_server`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serve exactly one request with a canned response.
///
/// Returns the base URL and a handle resolving to the captured request.
pub async fn spawn_one_shot_server(response: String) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut buf).await.expect("read request");
            assert!(n > 0, "connection closed before request headers");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = find_header_end(&raw) {
                break pos;
            }
        };

        let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        let content_length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        while raw.len() < body_start + content_length {
            let n = socket.read(&mut buf).await.expect("read body");
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }
        let body_end = raw.len().min(body_start + content_length);
        let body = String::from_utf8_lossy(&raw[body_start..body_end]).to_string();

        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;

        CapturedRequest {
            method,
            path,
            headers,
            body,
        }
    });
    (format!("http://{addr}"), handle)
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

/// `RenderSink` that records `(kind, message)` events for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    entries: std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>,
}

impl RecordingRenderer {
    fn record(&self, kind: &str, message: &str) {
        self.entries
            .lock()
            .expect("recording renderer lock")
            .push((kind.to_string(), message.to_string()));
    }

    /// Return true when a recorded event of `kind` contains `needle`.
    pub fn saw(&self, kind: &str, needle: &str) -> bool {
        self.entries
            .lock()
            .expect("recording renderer lock")
            .iter()
            .any(|(k, msg)| k == kind && msg.contains(needle))
    }

    /// Number of recorded events of `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.entries
            .lock()
            .expect("recording renderer lock")
            .iter()
            .filter(|(k, _)| k == kind)
            .count()
    }
}

impl crate::ui::RenderSink for RecordingRenderer {
    fn header(&self, model: &str) {
        self.record("header", model);
    }

    fn prompt(&self, exit_token: &str, export_token: &str) {
        self.record("prompt", &format!("{exit_token}/{export_token}"));
    }

    fn reply_header(&self, model: &str) {
        self.record("reply_header", model);
    }

    fn success(&self, msg: &str) {
        self.record("success", msg);
    }

    fn warn(&self, msg: &str) {
        self.record("warn", msg);
    }

    fn error(&self, msg: &str) {
        self.record("error", msg);
    }

    fn section(&self, title: &str) {
        self.record("section", title);
    }

    fn field(&self, key: &str, value: &str) {
        self.record("field", &format!("{key}:{value}"));
    }

    fn detail(&self, text: &str) {
        self.record("detail", text);
    }
}
