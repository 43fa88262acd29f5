//! Streaming `/chat/completions` protocol support.

use std::collections::VecDeque;
use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use serde_json::Value;

use super::sse::SseDecoder;
use super::{ensure_success, with_bearer, FragmentStream};
use crate::error::ApiError;
use crate::types::{ChatChunk, ChatRequest};

/// End-of-stream sentinel sent by OpenAI-compatible providers.
const DONE_SENTINEL: &str = "[DONE]";

/// Send one streaming `/chat/completions` request.
///
/// Status errors surface here, before any fragment is produced. Body errors
/// surface as `Err` items on the returned stream.
pub(crate) async fn request(
    http: &reqwest::Client,
    base_url: &str,
    request: &ChatRequest,
    bearer: Option<&str>,
) -> Result<FragmentStream, ApiError> {
    let url = format!("{base_url}/chat/completions");
    let response = with_bearer(http.post(&url).json(request), bearer)
        .send()
        .await?;
    let response = ensure_success(response).await?;
    tracing::debug!(status = response.status().as_u16(), "chat stream opened");
    Ok(fragment_stream(response.bytes_stream()))
}

/// One interpreted SSE payload.
#[derive(Debug, PartialEq, Eq)]
enum ChunkEvent {
    Delta {
        text: Option<String>,
        finished: bool,
    },
    Done,
}

fn parse_chunk_payload(payload: &str) -> Result<ChunkEvent, ApiError> {
    if payload.trim() == DONE_SENTINEL {
        return Ok(ChunkEvent::Done);
    }
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| ApiError::Stream(format!("invalid chunk payload: {err}")))?;
    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ApiError::Stream(format!("provider error: {message}")));
    }
    let chunk: ChatChunk = serde_json::from_value(value)
        .map_err(|err| ApiError::Stream(format!("invalid chunk payload: {err}")))?;
    let text = chunk
        .choices
        .first()
        .and_then(|choice| choice.delta.content.clone())
        .filter(|text| !text.is_empty());
    let finished = chunk
        .choices
        .iter()
        .any(|choice| choice.finish_reason.is_some());
    Ok(ChunkEvent::Delta { text, finished })
}

struct FragmentState<S> {
    body: std::pin::Pin<Box<S>>,
    decoder: SseDecoder,
    payloads: VecDeque<String>,
    saw_finish_reason: bool,
    body_ended: bool,
    done: bool,
}

/// Turn a raw SSE body into a stream of content fragments.
///
/// The stream ends cleanly on `[DONE]`, or at end of body when a chunk
/// carried a `finish_reason`. Any other ending yields one final `Err`.
pub(crate) fn fragment_stream<S, B, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = FragmentState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        payloads: VecDeque::new(),
        saw_finish_reason: false,
        body_ended: false,
        done: false,
    };

    Box::pin(futures_util::stream::unfold(state, |mut st| async move {
        loop {
            if st.done {
                return None;
            }

            while let Some(payload) = st.payloads.pop_front() {
                match parse_chunk_payload(&payload) {
                    Ok(ChunkEvent::Done) => return None,
                    Ok(ChunkEvent::Delta { text, finished }) => {
                        st.saw_finish_reason |= finished;
                        if let Some(text) = text {
                            return Some((Ok(text), st));
                        }
                    }
                    Err(err) => {
                        st.done = true;
                        return Some((Err(err), st));
                    }
                }
            }

            if st.body_ended {
                st.done = true;
                if st.saw_finish_reason {
                    return None;
                }
                let err = ApiError::Stream("stream closed before [DONE]".to_string());
                return Some((Err(err), st));
            }

            match st.body.next().await {
                Some(Ok(bytes)) => {
                    let decoded = st.decoder.push(bytes.as_ref());
                    st.payloads.extend(decoded);
                }
                Some(Err(err)) => {
                    st.done = true;
                    let err = ApiError::Stream(format!("response body read: {err}"));
                    return Some((Err(err), st));
                }
                None => {
                    st.body_ended = true;
                    let decoded = st.decoder.finish();
                    st.payloads.extend(decoded);
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{sse_content_chunk, sse_data_block, sse_done_block};
    use futures_util::stream;

    async fn collect(chunks: Vec<Result<String, String>>) -> Vec<Result<String, String>> {
        let body = stream::iter(
            chunks
                .into_iter()
                .map(|chunk| chunk.map(String::into_bytes)),
        );
        fragment_stream(body)
            .map(|item| item.map_err(|err| err.to_string()))
            .collect()
            .await
    }

    #[tokio::test]
    async fn yields_fragments_in_order_until_done() {
        let body = format!(
            "{}{}{}{}",
            sse_content_chunk("Hi"),
            sse_content_chunk(" there"),
            sse_content_chunk("!"),
            sse_done_block()
        );
        let items = collect(vec![Ok(body)]).await;
        assert_eq!(
            items,
            vec![Ok("Hi".to_string()), Ok(" there".to_string()), Ok("!".to_string())]
        );
    }

    #[tokio::test]
    async fn skips_role_only_and_empty_deltas() {
        let body = format!(
            "{}{}{}{}",
            sse_data_block(r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#),
            sse_data_block(r#"{"choices":[{"index":0,"delta":{"content":null}}]}"#),
            sse_content_chunk("ok"),
            sse_done_block()
        );
        let items = collect(vec![Ok(body)]).await;
        assert_eq!(items, vec![Ok("ok".to_string())]);
    }

    #[tokio::test]
    async fn missing_done_without_finish_reason_is_an_error() {
        let items = collect(vec![Ok(sse_content_chunk("partial"))]).await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Ok("partial".to_string()));
        let err = items[1].as_ref().unwrap_err();
        assert!(err.contains("before [DONE]"), "got: {err}");
    }

    #[tokio::test]
    async fn finish_reason_then_eof_counts_as_complete() {
        let body = format!(
            "{}{}",
            sse_content_chunk("done"),
            sse_data_block(r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#)
        );
        let items = collect(vec![Ok(body)]).await;
        assert_eq!(items, vec![Ok("done".to_string())]);
    }

    #[tokio::test]
    async fn transport_error_mid_body_ends_stream_with_error() {
        let items = collect(vec![
            Ok(sse_content_chunk("Hi")),
            Err("connection reset".to_string()),
            Ok(sse_content_chunk("never")),
        ])
        .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Ok("Hi".to_string()));
        assert!(items[1].as_ref().unwrap_err().contains("connection reset"));
    }

    #[tokio::test]
    async fn in_band_provider_error_is_surfaced() {
        let body = sse_data_block(r#"{"error":{"message":"overloaded","type":"server_error"}}"#);
        let items = collect(vec![Ok(body)]).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].as_ref().unwrap_err().contains("overloaded"));
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let items = collect(vec![Ok(sse_data_block("{not json"))]).await;
        assert_eq!(items.len(), 1);
        assert!(items[0].as_ref().unwrap_err().contains("invalid chunk payload"));
    }

    #[test]
    fn parse_chunk_payload_recognizes_done_sentinel() {
        assert_eq!(parse_chunk_payload("[DONE]").unwrap(), ChunkEvent::Done);
    }
}
