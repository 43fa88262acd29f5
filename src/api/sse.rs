//! Incremental server-sent-events decoding.
//!
//! Network chunks arrive at arbitrary byte boundaries, so the decoder buffers
//! raw bytes and only decodes complete lines. A UTF-8 sequence split across
//! two chunks is therefore never decoded half-way.

/// Stateful SSE decoder producing one `data` payload per event.
///
/// Events may carry multiple `data:` lines; they are joined with `\n` and
/// emitted when a blank line ends the event.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    pending: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes and return payloads of events completed by them.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            self.feed_line(&line, &mut payloads);
        }
        payloads
    }

    /// Flush a trailing unterminated line and any open event at end of body.
    pub(crate) fn finish(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        if !self.pending.is_empty() {
            let raw = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.feed_line(&line, &mut payloads);
        }
        self.flush_event(&mut payloads);
        payloads
    }

    fn feed_line(&mut self, raw_line: &str, payloads: &mut Vec<String>) {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            self.flush_event(payloads);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if field == "data" {
            self.data_lines.push(value.to_string());
        }
    }

    fn flush_event(&mut self, payloads: &mut Vec<String>) {
        if self.data_lines.is_empty() {
            return;
        }
        payloads.push(self.data_lines.join("\n"));
        self.data_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{sse_data_block, sse_done_block};

    fn decode_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = SseDecoder::new();
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(decoder.push(chunk));
        }
        out.extend(decoder.finish());
        out
    }

    fn decode_text(chunks: &[&str]) -> Vec<String> {
        let bytes: Vec<&[u8]> = chunks.iter().map(|chunk| chunk.as_bytes()).collect();
        decode_all(&bytes)
    }

    #[test]
    fn joins_data_lines_and_skips_comments() {
        let payloads = decode_text(&[": ping\n\
             event: demo\n\
             data: one\n\
             data: two\n\
             id: 1\n\
             \n\
             data: [DONE]\n\
             \n"]);
        assert_eq!(payloads, vec!["one\ntwo".to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let payloads = decode_text(&["data: {\"a\":1}\r\n\r\ndata: [DONE]\r\n\r\n"]);
        assert_eq!(payloads, vec!["{\"a\":1}".to_string(), "[DONE]".to_string()]);
    }

    #[test]
    fn payload_split_across_chunks_is_reassembled() {
        let payloads = decode_text(&["da", "ta: hel", "lo\n", "\n", "data: x\n\n"]);
        assert_eq!(payloads, vec!["hello".to_string(), "x".to_string()]);
    }

    #[test]
    fn utf8_sequence_split_across_chunks_survives() {
        let body = "data: caf\u{e9} \u{1f980}\n\n".as_bytes();
        // Split inside the two-byte `é` and inside the four-byte crab.
        let e_start = body.iter().position(|b| *b == 0xC3).unwrap();
        let crab_start = body.iter().position(|b| *b == 0xF0).unwrap();
        let payloads = decode_all(&[
            &body[..e_start + 1],
            &body[e_start + 1..crab_start + 2],
            &body[crab_start + 2..],
        ]);
        assert_eq!(payloads, vec!["caf\u{e9} \u{1f980}".to_string()]);
    }

    #[test]
    fn finish_flushes_unterminated_event() {
        let payloads = decode_text(&["data: tail"]);
        assert_eq!(payloads, vec!["tail".to_string()]);
    }

    #[test]
    fn value_without_space_after_colon_is_kept_whole() {
        let payloads = decode_text(&["data:{\"k\":\"a: b\"}\n\n"]);
        assert_eq!(payloads, vec!["{\"k\":\"a: b\"}".to_string()]);
    }

    #[test]
    fn fixture_blocks_decode_to_their_payloads() {
        let body = format!("{}{}", sse_data_block(r#"{"x":1}"#), sse_done_block());
        assert_eq!(
            decode_all(&[body.as_bytes()]),
            vec![r#"{"x":1}"#.to_string(), "[DONE]".to_string()]
        );
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn chunking_does_not_change_payloads(
                payloads in proptest::collection::vec(
                    proptest::string::string_regex("[ -~é🦀]{0,24}").expect("regex"),
                    0..8
                ),
                cut in 1usize..16,
            ) {
                let mut stream = String::new();
                for payload in &payloads {
                    stream.push_str(": keepalive\n");
                    stream.push_str("data: ");
                    stream.push_str(payload);
                    stream.push_str("\n\n");
                }
                let chunks: Vec<&[u8]> = stream.as_bytes().chunks(cut).collect();
                let expected: Vec<String> = payloads.clone();
                prop_assert_eq!(decode_all(&chunks), expected);
            }
        }
    }
}
