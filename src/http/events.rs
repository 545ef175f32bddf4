//! Server-sent event channel on `GET /mcp`
//!
//! Each connection owns one channel: a `ready` event right away, then a
//! `keepalive` every period until the client goes away. Dropping the stream
//! (which axum does on disconnect) stops the timer.

use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use async_stream::stream;
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
};
use chrono::Utc;
use serde_json::json;
use tokio::time::{interval_at, Instant};
use tracing::info;

use crate::AppState;

pub const READY_EVENT: &str = "ready";
pub const KEEPALIVE_EVENT: &str = "keepalive";

static NEXT_CHANNEL: AtomicU64 = AtomicU64::new(1);

/// Tracks one open channel in the shared gauge for as long as it lives.
struct ChannelGuard {
    channel: u64,
    open_channels: Arc<AtomicUsize>,
}

impl ChannelGuard {
    fn open(open_channels: Arc<AtomicUsize>) -> Self {
        let channel = NEXT_CHANNEL.fetch_add(1, Ordering::Relaxed);
        let open = open_channels.fetch_add(1, Ordering::Relaxed) + 1;
        info!(channel, open, "event stream opened");
        Self {
            channel,
            open_channels,
        }
    }
}

impl Drop for ChannelGuard {
    fn drop(&mut self) {
        let open = self.open_channels.fetch_sub(1, Ordering::Relaxed) - 1;
        info!(channel = self.channel, open, "event stream closed");
    }
}

pub async fn event_stream(State(state): State<AppState>) -> impl IntoResponse {
    let period = state.keepalive_interval;
    let guard = ChannelGuard::open(state.open_channels.clone());

    let events = stream! {
        let _guard = guard;
        yield Ok::<Event, Infallible>(ready_event());

        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            yield Ok::<Event, Infallible>(keepalive_event());
        }
    };

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(events),
    )
}

fn ready_event() -> Event {
    Event::default()
        .event(READY_EVENT)
        .data(json!({ "ok": true }).to_string())
}

fn keepalive_event() -> Event {
    Event::default()
        .event(KEEPALIVE_EVENT)
        .data(json!({ "t": Utc::now().timestamp_millis() }).to_string())
}
