use crate::error::PgError;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Record that marks the end of an event stream.
pub const DONE: &str = "[DONE]";

/// Splits a Server-Sent Events byte stream into the payloads of its `data:`
/// lines.
///
/// Empty lines, the `data: [DONE]` marker, comments and other SSE fields are
/// skipped. Reading continues after `[DONE]` until the body itself ends.
pub fn sse_lines<S, E>(stream: S) -> SseLines<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    SseLines::new(stream)
}

pub struct SseLines<S> {
    stream: S,
    buffer: BytesMut,
    /// Bytes of `buffer` already known to contain no newline
    scanned: usize,
    finished: bool,
}

impl<S> SseLines<S> {
    fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::new(),
            scanned: 0,
            finished: false,
        }
    }

    /// Next complete line from the buffer, terminator included
    fn next_line(&mut self) -> Option<BytesMut> {
        let offset = self.buffer[self.scanned..]
            .iter()
            .position(|b| *b == b'\n');

        match offset {
            Some(offset) => {
                let end = self.scanned + offset;
                self.scanned = 0;
                Some(self.buffer.split_to(end + 1))
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Whatever is left once the body has ended
    fn take_remainder(&mut self) -> Option<BytesMut> {
        if self.buffer.is_empty() {
            return None;
        }
        self.scanned = 0;
        Some(self.buffer.split())
    }
}

/// Payload of one line, or `None` when the line carries no event
fn payload(line: &[u8]) -> Option<Result<String, PgError>> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let text = match std::str::from_utf8(line) {
        Ok(text) => text,
        Err(e) => {
            let raw = String::from_utf8_lossy(line).into_owned();
            return Some(Err(PgError::serialization(
                "Invalid UTF-8 in SSE stream",
                raw,
                e,
            )));
        }
    };

    let data = text.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data.is_empty() || data.trim() == DONE {
        return None;
    }

    Some(Ok(data.to_string()))
}

impl<S, E> Stream for SseLines<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = Result<String, PgError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            while let Some(line) = self.next_line() {
                if let Some(item) = payload(&line) {
                    return Poll::Ready(Some(item));
                }
            }

            if self.finished {
                return Poll::Ready(self.take_remainder().and_then(|line| payload(&line)));
            }

            match Pin::new(&mut self.stream).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    self.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(e))) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(PgError::network_with_source(
                        "SSE stream read failed",
                        e,
                    ))));
                }
                Poll::Ready(None) => {
                    self.finished = true;
                    if let Some(item) = self.take_remainder().and_then(|line| payload(&line)) {
                        return Poll::Ready(Some(item));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
