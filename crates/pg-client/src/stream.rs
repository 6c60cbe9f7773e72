//! Streaming decoder for `text/event-stream` responses.
//!
//! [`EventStream::spawn`] hands a response body to a single spawned task, the
//! pump, and returns the consumer side of a bounded channel at once. The pump
//! reads the body line by line, decodes each `data:` record into `T` and
//! publishes it in wire order. It owns both the body and the only sender, so
//! the channel is closed exactly once, when the pump returns:
//!
//! * end of body: the channel closes with no error item;
//! * decode or read failure: one final `Err` item, then close;
//! * cancellation: a best-effort final `Err(PgError::Cancelled)`, then close.
//!
//! The body is always dropped before the sender. Dropping the [`EventStream`]
//! cancels the pump.

use crate::error::PgError;
use crate::logging::Logger;
use crate::utils::sse::sse_lines;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

/// What the pump does with an event when the channel is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Wait for room, giving up only on cancellation or when the consumer is
    /// gone. No event is lost.
    #[default]
    Block,
    /// Discard the event that does not fit. Each drop is logged and counted.
    DropNewest,
}

/// Configuration for a streaming call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Channel capacity, at least 1
    pub buffer_size: usize,
    pub overflow: OverflowPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            buffer_size: 100,
            overflow: OverflowPolicy::Block,
        }
    }
}

impl StreamConfig {
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

/// Consumer side of a streaming call.
///
/// Yields decoded events in the order they arrived, then `None` once the pump
/// has closed the channel. An `Err` item is always the last item.
pub struct EventStream<T> {
    receiver: mpsc::Receiver<Result<T, PgError>>,
    pump: JoinHandle<()>,
    _cancel_on_drop: DropGuard,
}

impl<T> EventStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Spawn a pump over `body` and return its channel.
    ///
    /// The pump stops when `ctx` is cancelled. Must be called from within a
    /// Tokio runtime.
    pub fn spawn<S, E>(
        ctx: &CancellationToken,
        body: S,
        config: StreamConfig,
        logger: Logger,
    ) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel(config.buffer_size.max(1));
        let token = ctx.child_token();
        let pump = tokio::spawn(pump(
            token.clone(),
            body,
            sender,
            config.overflow,
            logger,
        ));

        Self {
            receiver,
            pump,
            _cancel_on_drop: token.drop_guard(),
        }
    }
}

impl<T> EventStream<T> {
    /// Receive the next event, or `None` once the stream has ended
    pub async fn recv(&mut self) -> Option<Result<T, PgError>> {
        self.receiver.recv().await
    }

    /// True once the pump task has returned
    pub fn is_finished(&self) -> bool {
        self.pump.is_finished()
    }
}

impl<T> Stream for EventStream<T> {
    type Item = Result<T, PgError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("finished", &self.pump.is_finished())
            .finish_non_exhaustive()
    }
}

/// Why the pump loop stopped
enum Exit {
    EndOfStream,
    Failed(PgError),
    Cancelled,
    ConsumerGone,
}

/// Per-stream counters, reported once when the pump exits
struct StreamingMetrics {
    start_time: Instant,
    first_event_latency: Option<Duration>,
    delivered: u64,
    dropped: u64,
}

impl StreamingMetrics {
    fn new() -> Self {
        Self {
            start_time: Instant::now(),
            first_event_latency: None,
            delivered: 0,
            dropped: 0,
        }
    }

    fn record_delivered(&mut self) {
        if self.first_event_latency.is_none() {
            let latency = self.start_time.elapsed();
            self.first_event_latency = Some(latency);
            histogram!("pg_client_stream_first_event_latency_ms").record(latency.as_millis() as f64);
        }
        self.delivered += 1;
        counter!("pg_client_stream_events_total").increment(1);
    }

    fn record_dropped(&mut self) {
        self.dropped += 1;
        counter!("pg_client_stream_dropped_total").increment(1);
    }

    fn fields(&self) -> [(&'static str, String); 3] {
        [
            ("delivered", self.delivered.to_string()),
            ("dropped", self.dropped.to_string()),
            ("elapsed", format!("{:?}", self.start_time.elapsed())),
        ]
    }
}

async fn pump<T, S, E>(
    token: CancellationToken,
    body: S,
    sender: mpsc::Sender<Result<T, PgError>>,
    overflow: OverflowPolicy,
    logger: Logger,
) where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut lines = sse_lines(body);
    let mut stats = StreamingMetrics::new();

    let exit = loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => break Exit::Cancelled,
            next = lines.next() => next,
        };

        let data = match next {
            None => break Exit::EndOfStream,
            Some(Err(err)) => break Exit::Failed(err),
            Some(Ok(data)) => data,
        };

        let event = match serde_json::from_str::<T>(&data) {
            Ok(event) => event,
            Err(err) => {
                break Exit::Failed(PgError::serialization(
                    "SSE event decoding failed",
                    data,
                    err,
                ));
            }
        };

        match overflow {
            OverflowPolicy::Block => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break Exit::Cancelled,
                    sent = sender.send(Ok(event)) => {
                        if sent.is_err() {
                            break Exit::ConsumerGone;
                        }
                    }
                }
                stats.record_delivered();
            }
            OverflowPolicy::DropNewest => match sender.try_send(Ok(event)) {
                Ok(()) => stats.record_delivered(),
                Err(TrySendError::Full(_)) => {
                    stats.record_dropped();
                    logger.log(
                        "pg-client: sse: consumer not ready, event dropped",
                        &[("dropped", stats.dropped.to_string())],
                    );
                }
                Err(TrySendError::Closed(_)) => break Exit::ConsumerGone,
            },
        }
    };

    // Release the connection before the channel closes.
    drop(lines);

    match exit {
        Exit::EndOfStream => {
            logger.log("pg-client: sse: end of stream", &stats.fields());
        }
        Exit::Failed(err) => {
            counter!("pg_client_stream_errors_total").increment(1);
            logger.log(
                "pg-client: sse: stream failed",
                &[("error", err.to_string())],
            );
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = sender.send(Err(err)) => {}
            }
        }
        Exit::Cancelled => {
            logger.log("pg-client: sse: cancelled", &stats.fields());
            let _ = sender.try_send(Err(PgError::Cancelled));
        }
        Exit::ConsumerGone => {
            logger.log("pg-client: sse: consumer went away", &stats.fields());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::{fake_sse_response, fake_sse_response_with_done, raw_sse};
    use serde::Deserialize;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};
    use tokio::time::timeout;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Event {
        n: u32,
    }

    const BOUND: Duration = Duration::from_secs(2);

    fn events(count: u32) -> Vec<String> {
        (0..count).map(|n| format!(r#"{{"n":{n}}}"#)).collect()
    }

    fn refs(events: &[String]) -> Vec<&str> {
        events.iter().map(String::as_str).collect()
    }

    async fn drain(stream: &mut EventStream<Event>) -> Vec<Result<Event, PgError>> {
        let mut items = Vec::new();
        timeout(BOUND, async {
            while let Some(item) = stream.recv().await {
                items.push(item);
            }
        })
        .await
        .expect("stream did not close in time");
        items
    }

    async fn wait_finished(stream: &EventStream<Event>) {
        timeout(BOUND, async {
            while !stream.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("pump did not finish in time");
    }

    fn recording_logger() -> (Logger, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let logger = Logger::new(move |msg, _| captured.lock().unwrap().push(msg.to_string()));
        (logger, seen)
    }

    #[tokio::test]
    async fn delivers_exactly_n_events_in_order_then_closes() {
        let payloads = events(25);
        let body = fake_sse_response_with_done(&refs(&payloads));
        let drops = body.drop_counter();
        let ctx = CancellationToken::new();

        let mut stream =
            EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        let items = drain(&mut stream).await;

        let values: Vec<u32> = items.into_iter().map(|item| item.unwrap().n).collect();
        assert_eq!(values, (0..25).collect::<Vec<_>>());

        wait_finished(&stream).await;
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn small_buffer_preserves_every_event() {
        let payloads = events(50);
        let body = fake_sse_response(&refs(&payloads), None);
        let ctx = CancellationToken::new();
        let config = StreamConfig::default().with_buffer_size(1);

        let mut stream = EventStream::<Event>::spawn(&ctx, body, config, Logger::discard());
        let items = drain(&mut stream).await;

        assert_eq!(items.len(), 50);
        assert!(items.iter().all(Result::is_ok));
    }

    #[tokio::test]
    async fn works_as_a_futures_stream() {
        let body = fake_sse_response(&[r#"{"n":1}"#, r#"{"n":2}"#], None);
        let ctx = CancellationToken::new();

        let stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        let values: Vec<u32> = timeout(BOUND, stream.map(|item| item.unwrap().n).collect())
            .await
            .unwrap();

        assert_eq!(values, [1, 2]);
    }

    #[tokio::test]
    async fn decode_error_is_the_last_item() {
        let body = raw_sse(
            "data: {\"n\":1}\n\ndata: {not json\n\ndata: {\"n\":3}\n\n",
            None,
        );
        let drops = body.drop_counter();
        let ctx = CancellationToken::new();
        let (logger, seen) = recording_logger();

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), logger);
        let items = drain(&mut stream).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Event { n: 1 });
        match &items[1] {
            Err(PgError::Serialization { body, .. }) => assert_eq!(body, "{not json"),
            other => panic!("expected decode error, got {other:?}"),
        }

        wait_finished(&stream).await;
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(
            seen.lock()
                .unwrap()
                .iter()
                .any(|msg| msg == "pg-client: sse: stream failed")
        );
    }

    #[tokio::test]
    async fn empty_body_closes_without_items() {
        let body = raw_sse("", None);
        let ctx = CancellationToken::new();

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        assert!(drain(&mut stream).await.is_empty());
    }

    #[tokio::test]
    async fn cancellation_closes_a_hanging_stream() {
        let body = fake_sse_response(&[r#"{"n":1}"#], None).hanging();
        let drops = body.drop_counter();
        let ctx = CancellationToken::new();

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        let first = timeout(BOUND, stream.recv()).await.unwrap().unwrap();
        assert_eq!(first.unwrap(), Event { n: 1 });

        ctx.cancel();
        let rest = drain(&mut stream).await;

        assert_eq!(rest.len(), 1);
        assert!(matches!(rest[0], Err(PgError::Cancelled)));
        wait_finished(&stream).await;
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recv_stays_pending_on_a_silent_body() {
        let body = fake_sse_response(&[], None).hanging();
        let ctx = CancellationToken::new();

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        tokio::time::sleep(Duration::from_millis(20)).await;
        {
            let mut recv = tokio_test::task::spawn(stream.recv());
            tokio_test::assert_pending!(recv.poll());
        }

        ctx.cancel();
        let items = drain(&mut stream).await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(PgError::Cancelled)));
    }

    #[tokio::test]
    async fn cancellation_unblocks_a_full_channel() {
        let payloads = events(10);
        let body = fake_sse_response(&refs(&payloads), None).hanging();
        let drops = body.drop_counter();
        let ctx = CancellationToken::new();
        let config = StreamConfig::default().with_buffer_size(1);

        let mut stream = EventStream::<Event>::spawn(&ctx, body, config, Logger::discard());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!stream.is_finished());

        ctx.cancel();
        wait_finished(&stream).await;
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        // Whatever was buffered before cancellation is still readable.
        let items = drain(&mut stream).await;
        assert!(!items.is_empty());
        assert!(items.len() <= 2);
    }

    #[tokio::test]
    async fn cancelled_before_start_sends_nothing_but_the_error() {
        let body = fake_sse_response(&[r#"{"n":1}"#], None);
        let ctx = CancellationToken::new();
        ctx.cancel();

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        let items = drain(&mut stream).await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(PgError::Cancelled)));
    }

    #[tokio::test]
    async fn dropping_the_stream_stops_the_pump() {
        let body = fake_sse_response(&[r#"{"n":1}"#], None).hanging();
        let drops = body.drop_counter();
        let ctx = CancellationToken::new();

        let stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), Logger::discard());
        drop(stream);

        timeout(BOUND, async {
            while drops.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("body was not released");
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn drop_newest_discards_overflow_and_logs() {
        let payloads = events(10);
        let body = fake_sse_response(&refs(&payloads), None);
        let ctx = CancellationToken::new();
        let (logger, seen) = recording_logger();
        let config = StreamConfig::default()
            .with_buffer_size(2)
            .with_overflow(OverflowPolicy::DropNewest);

        let mut stream = EventStream::<Event>::spawn(&ctx, body, config, logger);
        wait_finished(&stream).await;

        let values: Vec<u32> = drain(&mut stream)
            .await
            .into_iter()
            .map(|item| item.unwrap().n)
            .collect();
        assert_eq!(values, [0, 1]);

        let dropped = seen
            .lock()
            .unwrap()
            .iter()
            .filter(|msg| *msg == "pg-client: sse: consumer not ready, event dropped")
            .count();
        assert_eq!(dropped, 8);
    }

    #[tokio::test]
    async fn panicking_logger_does_not_break_the_stream() {
        let body = raw_sse("data: {bad\n", None);
        let ctx = CancellationToken::new();
        let logger = Logger::new(|_, _| panic!("sink failure"));

        let mut stream = EventStream::<Event>::spawn(&ctx, body, StreamConfig::default(), logger);
        let items = drain(&mut stream).await;

        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }
}
