//! Test utilities for simulating Server-Sent Events (SSE) response bodies
//!
//! The fake body yields raw bytes the way `reqwest::Response::bytes_stream`
//! does, optionally split into small chunks, optionally hanging forever after
//! its data, and counts how many times it has been dropped.

use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

/// Configuration for fake SSE response generation
#[derive(Debug, Clone, Default)]
pub struct FakeSseConfig {
    /// Whether to append a final "[DONE]" event
    pub include_done: bool,
    /// Split the body into chunks of this many bytes
    pub chunk_size: Option<usize>,
    /// Never end after the data has been yielded
    pub hang_after_data: bool,
}

/// Creates a fake SSE body with one `data:` record per event
pub fn fake_sse_response(events: &[&str], config: Option<FakeSseConfig>) -> FakeSseStream {
    let config = config.unwrap_or_default();

    let mut response = String::new();
    for event in events {
        response.push_str(&format!("data: {event}\n\n"));
    }

    if config.include_done {
        response.push_str("data: [DONE]\n\n");
    }

    FakeSseStream::new(response, config)
}

/// Creates a fake SSE body with events split across chunk boundaries
pub fn fake_sse_response_chunked(events: &[&str], chunk_size: usize) -> FakeSseStream {
    fake_sse_response(
        events,
        Some(FakeSseConfig {
            chunk_size: Some(chunk_size),
            ..Default::default()
        }),
    )
}

/// Creates a fake SSE body that ends with a `[DONE]` record
pub fn fake_sse_response_with_done(events: &[&str]) -> FakeSseStream {
    fake_sse_response(
        events,
        Some(FakeSseConfig {
            include_done: true,
            ..Default::default()
        }),
    )
}

/// Creates a fake body from literal text
pub fn raw_sse(body: &str, chunk_size: Option<usize>) -> FakeSseStream {
    FakeSseStream::new(
        body.to_string(),
        FakeSseConfig {
            chunk_size,
            ..Default::default()
        },
    )
}

/// Fake response body stream
pub struct FakeSseStream {
    data: Vec<u8>,
    position: usize,
    chunk_size: Option<usize>,
    hang_after_data: bool,
    drops: Arc<AtomicUsize>,
}

impl FakeSseStream {
    fn new(response: String, config: FakeSseConfig) -> Self {
        Self {
            data: response.into_bytes(),
            position: 0,
            chunk_size: config.chunk_size,
            hang_after_data: config.hang_after_data,
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Keep yielding nothing once the data is exhausted
    pub fn hanging(mut self) -> Self {
        self.hang_after_data = true;
        self
    }

    /// Counter incremented when this body is dropped
    pub fn drop_counter(&self) -> Arc<AtomicUsize> {
        self.drops.clone()
    }
}

impl Drop for FakeSseStream {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl Stream for FakeSseStream {
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.position >= self.data.len() {
            // Never woken.
            if self.hang_after_data {
                return Poll::Pending;
            }
            return Poll::Ready(None);
        }

        let chunk_size = self.chunk_size.unwrap_or(self.data.len() - self.position);
        let end_pos = std::cmp::min(self.position + chunk_size, self.data.len());

        let chunk = self.data[self.position..end_pos].to_vec();
        self.position = end_pos;

        Poll::Ready(Some(Ok(Bytes::from(chunk))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_basic_fake_sse_response() {
        let stream = fake_sse_response(&["hello", "world"], None);
        let chunks: Vec<_> = stream.collect().await;

        assert_eq!(chunks.len(), 1);
        let chunk = chunks[0].as_ref().unwrap();
        assert_eq!(chunk.as_ref(), b"data: hello\n\ndata: world\n\n");
    }

    #[tokio::test]
    async fn test_fake_sse_response_with_done() {
        let stream = fake_sse_response_with_done(&["test"]);
        let chunks: Vec<_> = stream.collect().await;

        let chunk = chunks[0].as_ref().unwrap();
        assert_eq!(chunk.as_ref(), b"data: test\n\ndata: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_fake_sse_response_chunked() {
        let stream = fake_sse_response_chunked(&["hello", "world"], 5);
        let chunks: Vec<_> = stream.collect().await;
        assert!(chunks.len() > 1);

        let full: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(full, b"data: hello\n\ndata: world\n\n");
    }

    #[tokio::test]
    async fn test_drop_is_counted() {
        let stream = raw_sse("data: x\n", None);
        let drops = stream.drop_counter();
        drop(stream);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hanging_body_never_ends() {
        let mut stream = raw_sse("data: x\n", None).hanging();
        assert!(stream.next().await.is_some());

        let next = tokio::time::timeout(std::time::Duration::from_millis(20), stream.next()).await;
        assert!(next.is_err());
    }
}
