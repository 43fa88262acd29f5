//! API client facade bound to one configured endpoint.

use std::time::Duration;

use async_trait::async_trait;

use super::{completions, files, fine_tuning, moderations, ChatClient, FragmentStream};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    ChatRequest, FileObject, FineTuningJob, FineTuningJobRequest, ModerationRequest,
    ModerationResponse,
};

/// Client for OpenAI-compatible model APIs.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Build a client from resolved API configuration.
    pub fn new(config: &ApiConfig, timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        }
    }

    fn bearer(&self) -> Option<&str> {
        (!self.api_key.is_empty()).then_some(self.api_key.as_str())
    }

    /// Open a streaming chat completion.
    pub async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream, ApiError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending streaming chat request"
        );
        completions::request(&self.http, &self.base_url, request, self.bearer()).await
    }

    /// Upload a fine-tuning training file.
    pub async fn upload_training_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<FileObject, ApiError> {
        tracing::debug!(file_name, bytes = contents.len(), "uploading training file");
        files::upload(
            &self.http,
            &self.base_url,
            file_name,
            contents,
            files::FINE_TUNE_PURPOSE,
            self.bearer(),
        )
        .await
    }

    /// Submit a fine-tuning job.
    pub async fn create_fine_tuning_job(
        &self,
        request: &FineTuningJobRequest,
    ) -> Result<FineTuningJob, ApiError> {
        fine_tuning::create(&self.http, &self.base_url, request, self.bearer()).await
    }

    /// Fetch the current state of a fine-tuning job.
    pub async fn retrieve_fine_tuning_job(&self, job_id: &str) -> Result<FineTuningJob, ApiError> {
        fine_tuning::retrieve(&self.http, &self.base_url, job_id, self.bearer()).await
    }

    /// Classify text with the moderation endpoint.
    pub async fn moderate(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationResponse, ApiError> {
        moderations::request(&self.http, &self.base_url, request, self.bearer()).await
    }
}

#[async_trait]
impl ChatClient for ApiClient {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream, ApiError> {
        ApiClient::stream_chat(self, request).await
    }
}

/// Build an HTTP client with connect and per-read timeouts applied.
///
/// There is no total request deadline: a streamed reply may run as long as
/// fragments keep arriving within `timeout` of each other.
fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{
        http_response, sse_content_chunk, sse_done_block, spawn_one_shot_server,
    };
    use crate::types::Message;
    use futures_util::StreamExt;
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn api_config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: format!("{base_url}/"),
            api_key: "test-key".to_string(),
            model: "dummy-model".to_string(),
            ..ApiConfig::default()
        }
    }

    #[tokio::test]
    async fn stream_chat_posts_request_and_yields_fragments() {
        let body = format!(
            "{}{}{}",
            sse_content_chunk("Hi"),
            sse_content_chunk(" there"),
            sse_done_block()
        );
        let (base_url, captured) =
            spawn_one_shot_server(http_response("200 OK", "text/event-stream", &body)).await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let request = ChatRequest {
            model: "dummy-model".to_string(),
            messages: vec![Message::user("hello")],
            stream: true,
        };

        let stream = client.stream_chat(&request).await.expect("stream opens");
        let fragments: Vec<String> = stream.map(|item| item.expect("fragment")).collect().await;
        assert_eq!(fragments, vec!["Hi".to_string(), " there".to_string()]);

        let seen = captured.await.expect("server task");
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.path, "/chat/completions");
        assert_eq!(seen.header("authorization"), Some("Bearer test-key"));
        let json: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(json["stream"], Value::Bool(true));
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[tokio::test]
    async fn stream_chat_maps_error_status_before_streaming() {
        let (base_url, _captured) = spawn_one_shot_server(http_response(
            "401 Unauthorized",
            "application/json",
            r#"{"error":{"message":"bad key"}}"#,
        ))
        .await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![Message::user("hi")],
            stream: true,
        };
        let err = match client.stream_chat(&request).await {
            Ok(_) => panic!("expected status error"),
            Err(err) => err,
        };
        assert_eq!(err.status_code(), Some(401));
        assert!(err.to_string().contains("bad key"));
    }

    #[tokio::test]
    async fn empty_api_key_sends_no_authorization_header() {
        let (base_url, captured) = spawn_one_shot_server(http_response(
            "200 OK",
            "application/json",
            r#"{"id":"ftjob-1","status":"running"}"#,
        ))
        .await;
        let config = ApiConfig {
            api_key: "  ".to_string(),
            ..api_config(&base_url)
        };
        let client = ApiClient::new(&config, Duration::from_secs(5));
        let job = client.retrieve_fine_tuning_job("ftjob-1").await.unwrap();
        assert_eq!(job.status.as_deref(), Some("running"));

        let seen = captured.await.unwrap();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.path, "/fine_tuning/jobs/ftjob-1");
        assert_eq!(seen.header("authorization"), None);
    }

    #[tokio::test]
    async fn upload_sends_multipart_with_fine_tune_purpose() {
        let (base_url, captured) = spawn_one_shot_server(http_response(
            "200 OK",
            "application/json",
            r#"{"id":"file-abc","bytes":12,"filename":"train.jsonl","purpose":"fine-tune","status":"processed","object":"file"}"#,
        ))
        .await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let file = client
            .upload_training_file("train.jsonl", b"{\"messages\":[]}\n".to_vec())
            .await
            .unwrap();
        assert_eq!(file.id, "file-abc");
        assert_eq!(file.extra["object"], "file");

        let seen = captured.await.unwrap();
        assert_eq!(seen.path, "/files");
        assert!(seen
            .header("content-type")
            .is_some_and(|value| value.starts_with("multipart/form-data")));
        assert!(seen.body.contains("name=\"purpose\""));
        assert!(seen.body.contains("fine-tune"));
        assert!(seen.body.contains("filename=\"train.jsonl\""));
        assert!(seen.body.contains("{\"messages\":[]}"));
    }

    #[tokio::test]
    async fn create_fine_tuning_job_posts_training_file_and_model() {
        let (base_url, captured) = spawn_one_shot_server(http_response(
            "200 OK",
            "application/json",
            r#"{"id":"ftjob-2","status":"validating_files","model":"base"}"#,
        ))
        .await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let job = client
            .create_fine_tuning_job(&FineTuningJobRequest {
                training_file: "file-abc".to_string(),
                model: "base".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(job.id, "ftjob-2");

        let seen = captured.await.unwrap();
        assert_eq!(seen.path, "/fine_tuning/jobs");
        let json: Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(json["training_file"], "file-abc");
        assert_eq!(json["model"], "base");
    }

    #[tokio::test]
    async fn moderate_rejects_empty_results() {
        let (base_url, _captured) = spawn_one_shot_server(http_response(
            "200 OK",
            "application/json",
            r#"{"id":"modr-1","model":"omni","results":[]}"#,
        ))
        .await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let err = client
            .moderate(&ModerationRequest {
                input: "hello".to_string(),
                model: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "got: {err}");
    }

    #[tokio::test]
    async fn non_json_success_body_is_invalid_response() {
        let (base_url, _captured) =
            spawn_one_shot_server(http_response("200 OK", "text/plain", "nope")).await;
        let client = ApiClient::new(&api_config(&base_url), Duration::from_secs(5));
        let err = client.retrieve_fine_tuning_job("ftjob-x").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)), "got: {err}");
    }

    #[tokio::test]
    async fn api_client_respects_timeout_policy() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept one connection and keep it open so the client must time out.
        let _accept = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.expect("accept");
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = ApiClient::new(
            &api_config(&format!("http://{addr}")),
            Duration::from_millis(50),
        );
        let err = client.retrieve_fine_tuning_job("ftjob-1").await.unwrap_err();
        match err {
            ApiError::Http(inner) => assert!(inner.is_timeout(), "unexpected error: {inner}"),
            other => panic!("expected timeout Http error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn slow_stream_outlives_timeout_while_chunks_keep_arriving() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Four chunks 300ms apart: 1.2s in total against a 500ms timeout.
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\nconnection: close\r\n\r\n",
                )
                .await
                .expect("write head");
            for text in ["a", "b", "c", "d"] {
                tokio::time::sleep(Duration::from_millis(300)).await;
                socket
                    .write_all(sse_content_chunk(text).as_bytes())
                    .await
                    .expect("write chunk");
            }
            socket
                .write_all(sse_done_block().as_bytes())
                .await
                .expect("write done");
            let _ = socket.shutdown().await;
        });

        let client = ApiClient::new(
            &api_config(&format!("http://{addr}")),
            Duration::from_millis(500),
        );
        let request = ChatRequest {
            model: "dummy-model".to_string(),
            messages: vec![Message::user("hello")],
            stream: true,
        };
        let stream = client.stream_chat(&request).await.expect("stream opens");
        let items: Vec<Result<String, ApiError>> = stream.collect().await;
        let fragments: Vec<String> = items
            .into_iter()
            .map(|item| item.expect("fragment"))
            .collect();
        assert_eq!(fragments, vec!["a", "b", "c", "d"]);
    }
}
