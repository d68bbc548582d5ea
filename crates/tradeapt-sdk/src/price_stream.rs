//! Live price feed over server-sent events.
//!
//! One [`PriceStream`] task owns exactly one HTTP connection to the
//! backend's `text/event-stream` endpoint. Decoded [`PriceEvent`]s are
//! handed to a caller-supplied sink; the caller folds them into a
//! [`PriceBook`](tradeapt_models::PriceBook).
//!
//! On any failure the task reports [`PriceFeedEvent::Disconnected`], waits
//! a fixed delay and reconnects. There is no backoff growth and no retry
//! limit; [`PriceStreamHandle::close`] (or dropping the handle) is the only
//! way to stop it.

use std::time::Duration;

use futures::StreamExt;
use reqwest::header::ACCEPT;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tradeapt_models::PriceEvent;

use crate::error::SdkError;

/// Delay between a dropped connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Bound on opening the connection. The stream itself never times out.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the stream task reports to its sink.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceFeedEvent {
    /// The connection is open and events will follow.
    Connected,
    /// A decoded price message.
    Event(PriceEvent),
    /// The connection failed or ended; a retry is scheduled.
    Disconnected(String),
}

// ---------------------------------------------------------------------------
// SSE decoding
// ---------------------------------------------------------------------------

/// Incremental `text/event-stream` decoder.
///
/// Feed raw body chunks to [`push`](Self::push); it returns the `data`
/// payload of every event completed by that chunk. Chunk boundaries may
/// fall anywhere, including inside a UTF-8 sequence.
///
/// ```
/// use tradeapt_sdk::SseDecoder;
///
/// let mut decoder = SseDecoder::new();
/// assert!(decoder.push(b": keep-alive\ndata: {\"a\"").is_empty());
/// assert_eq!(decoder.push(b":1}\n\n"), vec!["{\"a\":1}".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every message it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut messages = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(message) = self.feed_line(&String::from_utf8_lossy(&line)) {
                messages.push(message);
            }
        }
        messages
    }

    fn feed_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let message = self.data.join("\n");
            self.data.clear();
            return Some(message);
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        // event / id / retry carry nothing the dashboard uses
        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Reconnect state
// ---------------------------------------------------------------------------

/// Lifecycle of the single stream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    /// Never connected.
    #[default]
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// Events are flowing.
    Open,
    /// The connection dropped and a retry timer is running.
    RetryPending,
}

/// Fixed-delay reconnect bookkeeping with at most one pending retry.
#[derive(Debug, Clone)]
pub struct ReconnectState {
    phase: ConnectionPhase,
    delay: Duration,
    retries: u64,
}

impl ReconnectState {
    /// Fresh state using `delay` between attempts.
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: ConnectionPhase::Idle,
            delay,
            retries: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Configured retry delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// `true` while the connection is open.
    pub fn is_connected(&self) -> bool {
        self.phase == ConnectionPhase::Open
    }

    /// Number of retries scheduled so far.
    pub fn retries_scheduled(&self) -> u64 {
        self.retries
    }

    /// A connection attempt begins.
    pub fn on_connect_started(&mut self) {
        self.phase = ConnectionPhase::Connecting;
    }

    /// The connection opened.
    pub fn on_open(&mut self) {
        self.phase = ConnectionPhase::Open;
    }

    /// The connection failed or closed.
    ///
    /// Returns the delay to wait before reconnecting, or `None` when a
    /// retry is already pending.
    pub fn on_error(&mut self) -> Option<Duration> {
        if self.phase == ConnectionPhase::RetryPending {
            return None;
        }
        self.phase = ConnectionPhase::RetryPending;
        self.retries += 1;
        Some(self.delay)
    }

    /// The retry timer fired.
    pub fn on_retry_fired(&mut self) {
        self.phase = ConnectionPhase::Connecting;
    }
}

// ---------------------------------------------------------------------------
// Stream task
// ---------------------------------------------------------------------------

enum Flow {
    Ended,
    SinkClosed,
}

/// Spawner for the price stream task.
pub struct PriceStream;

impl PriceStream {
    /// Start streaming from `url`.
    ///
    /// `sink` receives every [`PriceFeedEvent`]; returning `false` from it
    /// stops the task (typically because the receiving channel is gone).
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(url: String, reconnect_delay: Duration, mut sink: F) -> PriceStreamHandle
    where
        F: FnMut(PriceFeedEvent) -> bool + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let http = match stream_client(CONNECT_TIMEOUT) {
                Ok(http) => http,
                Err(e) => {
                    warn!(error = %e, "failed to build price stream client");
                    sink(PriceFeedEvent::Disconnected(e.to_string()));
                    return;
                }
            };
            let mut state = ReconnectState::new(reconnect_delay);
            loop {
                state.on_connect_started();
                info!(url = %url, "connecting to price stream");

                let reason = match pump(&http, &url, &mut state, &mut sink).await {
                    Ok(Flow::SinkClosed) => {
                        debug!("price stream receiver gone, stopping");
                        return;
                    }
                    Ok(Flow::Ended) => "stream ended".to_string(),
                    Err(e) => e.to_string(),
                };
                warn!(reason = %reason, "price stream disconnected");
                if !sink(PriceFeedEvent::Disconnected(reason)) {
                    return;
                }

                if let Some(delay) = state.on_error() {
                    info!(delay_ms = delay.as_millis(), retry = state.retries_scheduled(), "reconnecting price stream");
                    tokio::time::sleep(delay).await;
                    state.on_retry_fired();
                }
            }
        });
        PriceStreamHandle { task }
    }
}

fn stream_client(connect_timeout: Duration) -> Result<reqwest::Client, SdkError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(SdkError::from)
}

async fn pump<F>(
    http: &reqwest::Client,
    url: &str,
    state: &mut ReconnectState,
    sink: &mut F,
) -> Result<Flow, SdkError>
where
    F: FnMut(PriceFeedEvent) -> bool,
{
    let res = http
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;
    let status = res.status();
    if !status.is_success() {
        return Err(SdkError::Stream(format!("unexpected status {status}")));
    }

    state.on_open();
    if !sink(PriceFeedEvent::Connected) {
        return Ok(Flow::SinkClosed);
    }

    let mut decoder = SseDecoder::new();
    let mut body = res.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for message in decoder.push(&chunk) {
            match serde_json::from_str::<PriceEvent>(&message) {
                Ok(event) => {
                    if !sink(PriceFeedEvent::Event(event)) {
                        return Ok(Flow::SinkClosed);
                    }
                }
                Err(e) => warn!(error = %e, "dropping unparseable price message"),
            }
        }
    }
    Ok(Flow::Ended)
}

/// Owner of a running [`PriceStream`] task.
///
/// Dropping the handle closes the connection and cancels any pending retry.
#[derive(Debug)]
pub struct PriceStreamHandle {
    task: JoinHandle<()>,
}

impl PriceStreamHandle {
    /// Stop the stream now.
    pub fn close(&self) {
        self.task.abort();
    }

    /// `true` once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PriceStreamHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const FAST_RETRY: Duration = Duration::from_millis(50);

    const INITIAL: &str = r#"{"type":"initial","prices":{"APT":{"symbol":"APT","price":8.42,"change_24h":1.0,"high_24h":9.0,"low_24h":8.0,"volume_24h":1000.0,"last_update":"2026-10-18T12:00:00Z","source":"test"}}}"#;

    /// Serves one event per connection, then closes; counts connections.
    async fn flaky_server(body: &'static str) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/prices/stream",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    ([(header::CONTENT_TYPE, "text/event-stream")], body)
                }
            }),
        );
        let base = serve(app).await;
        (format!("{base}/api/prices/stream"), hits)
    }

    fn channel_sink() -> (
        impl FnMut(PriceFeedEvent) -> bool + Send + 'static,
        mpsc::UnboundedReceiver<PriceFeedEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |event| tx.send(event).is_ok(), rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<PriceFeedEvent>) -> PriceFeedEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for feed event")
            .expect("feed closed")
    }

    #[test]
    fn decoder_handles_split_chunks_and_crlf() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert!(decoder.push(b"ta: {\"x\":1}\r").is_empty());
        assert_eq!(decoder.push(b"\n\r\n"), vec!["{\"x\":1}"]);
    }

    #[test]
    fn decoder_joins_multiline_data_and_skips_other_fields() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b"event: price\nid: 7\ndata: line one\ndata:line two\nretry: 10\n\n");
        assert_eq!(out, vec!["line one\nline two"]);
    }

    #[test]
    fn decoder_ignores_comments_and_empty_events() {
        let mut decoder = SseDecoder::new();
        let out = decoder.push(b": ping\n\n\ndata: a\n\ndata: b\n\n");
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn decoder_survives_split_utf8() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: →\n\n".as_bytes();
        assert!(decoder.push(&bytes[..7]).is_empty());
        assert_eq!(decoder.push(&bytes[7..]), vec!["→"]);
    }

    #[test]
    fn at_most_one_retry_pending() {
        let mut state = ReconnectState::new(DEFAULT_RECONNECT_DELAY);
        assert_eq!(state.phase(), ConnectionPhase::Idle);

        state.on_connect_started();
        state.on_open();
        assert!(state.is_connected());

        assert_eq!(state.on_error(), Some(Duration::from_secs(3)));
        assert_eq!(state.on_error(), None);
        assert_eq!(state.retries_scheduled(), 1);
        assert!(!state.is_connected());

        state.on_retry_fired();
        assert_eq!(state.phase(), ConnectionPhase::Connecting);
        assert_eq!(state.on_error(), Some(Duration::from_secs(3)));
        assert_eq!(state.retries_scheduled(), 2);
    }

    #[test]
    fn delay_never_grows() {
        let mut state = ReconnectState::new(FAST_RETRY);
        for _ in 0..10 {
            assert_eq!(state.on_error(), Some(FAST_RETRY));
            state.on_retry_fired();
        }
        assert_eq!(state.delay(), FAST_RETRY);
    }

    #[tokio::test]
    async fn reconnects_after_stream_ends() {
        let body: &'static str = Box::leak(format!("data: {INITIAL}\n\n").into_boxed_str());
        let (url, hits) = flaky_server(body).await;
        let (sink, mut rx) = channel_sink();
        let _handle = PriceStream::spawn(url, FAST_RETRY, sink);

        for _ in 0..2 {
            assert_eq!(next(&mut rx).await, PriceFeedEvent::Connected);
            match next(&mut rx).await {
                PriceFeedEvent::Event(PriceEvent::Initial { prices, .. }) => {
                    assert!(prices.unwrap().contains_key("APT"));
                }
                other => panic!("expected initial snapshot, got {other:?}"),
            }
            assert_eq!(
                next(&mut rx).await,
                PriceFeedEvent::Disconnected("stream ended".into())
            );
        }
        assert!(hits.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn bad_messages_are_dropped() {
        let (url, _) =
            flaky_server("data: not json\n\ndata: {\"type\":\"heartbeat\"}\n\n").await;
        let (sink, mut rx) = channel_sink();
        let _handle = PriceStream::spawn(url, FAST_RETRY, sink);

        assert_eq!(next(&mut rx).await, PriceFeedEvent::Connected);
        assert_eq!(
            next(&mut rx).await,
            PriceFeedEvent::Event(PriceEvent::Heartbeat { timestamp: None })
        );
    }

    #[tokio::test]
    async fn error_status_is_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/prices/stream",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::SERVICE_UNAVAILABLE.into_response()
                }
            }),
        );
        let url = format!("{}/api/prices/stream", serve(app).await);
        let (sink, mut rx) = channel_sink();
        let _handle = PriceStream::spawn(url, FAST_RETRY, sink);

        for _ in 0..3 {
            match next(&mut rx).await {
                PriceFeedEvent::Disconnected(reason) => assert!(reason.contains("503")),
                other => panic!("expected disconnect, got {other:?}"),
            }
        }
        assert!(hits.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn connect_timeout_does_not_cut_slow_stream() {
        let app = Router::new().route(
            "/api/prices/stream",
            get(|| async {
                let beats = futures::stream::unfold(0u8, |n| async move {
                    if n == 3 {
                        return None;
                    }
                    if n > 0 {
                        tokio::time::sleep(Duration::from_millis(150)).await;
                    }
                    Some((
                        Ok::<_, std::convert::Infallible>("data: {\"type\":\"heartbeat\"}\n\n"),
                        n + 1,
                    ))
                });
                (
                    [(header::CONTENT_TYPE, "text/event-stream")],
                    axum::body::Body::from_stream(beats),
                )
            }),
        );
        let url = format!("{}/api/prices/stream", serve(app).await);
        let http = stream_client(Duration::from_millis(50)).unwrap();
        let mut state = ReconnectState::new(FAST_RETRY);
        state.on_connect_started();

        let mut events = Vec::new();
        let flow = pump(&http, &url, &mut state, &mut |event| {
            events.push(event);
            true
        })
        .await
        .unwrap();

        assert!(matches!(flow, Flow::Ended));
        assert_eq!(events[0], PriceFeedEvent::Connected);
        assert_eq!(events.len(), 4);
    }

    #[tokio::test]
    async fn close_cancels_pending_retry() {
        let (url, hits) = flaky_server("data: {\"type\":\"heartbeat\"}\n\n").await;
        let (sink, mut rx) = channel_sink();
        let handle = PriceStream::spawn(url, Duration::from_millis(200), sink);

        assert_eq!(next(&mut rx).await, PriceFeedEvent::Connected);
        handle.close();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let seen = hits.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), seen);
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let (url, _) = flaky_server("data: {\"type\":\"heartbeat\"}\n\n").await;
        let (sink, rx) = channel_sink();
        drop(rx);
        let handle = PriceStream::spawn(url, FAST_RETRY, sink);

        let stopped = tokio::time::timeout(Duration::from_secs(5), async {
            while !handle.is_finished() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(stopped.is_ok());
    }
}
