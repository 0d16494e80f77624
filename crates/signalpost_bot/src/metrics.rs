//! Metrics collection for bot operations.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector for bot operations.
#[derive(Debug, Clone, Default)]
pub struct BotMetrics {
    inner: Arc<BotMetricsInner>,
}

#[derive(Debug, Default)]
struct BotMetricsInner {
    events_handled: AtomicU64,
    event_failures: AtomicU64,

    posts_created: AtomicU64,
    posts_published: AtomicU64,
    win_batches_created: AtomicU64,
    win_batches_published: AtomicU64,
    publish_failures: AtomicU64,

    best_win_rebroadcasts: AtomicU64,
    link_rotations: AtomicU64,

    last_publish_success: parking_lot::Mutex<Option<Instant>>,
}

impl BotMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a handled event.
    pub fn record_event(&self) {
        self.inner.events_handled.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an event whose handler failed.
    pub fn record_event_failure(&self) {
        self.inner.event_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a stored post.
    pub fn record_post_created(&self) {
        self.inner.posts_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a post published to every channel.
    pub fn record_post_published(&self) {
        self.inner.posts_published.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_publish_success.lock() = Some(Instant::now());
    }

    /// Records a stored win batch.
    pub fn record_win_batch_created(&self) {
        self.inner.win_batches_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a win batch published to every channel.
    pub fn record_win_batch_published(&self) {
        self.inner.win_batches_published.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_publish_success.lock() = Some(Instant::now());
    }

    /// Records a publish pass that aborted.
    pub fn record_publish_failure(&self) {
        self.inner.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records rebroadcast copies sent.
    pub fn record_rebroadcasts(&self, count: u64) {
        self.inner
            .best_win_rebroadcasts
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Records rotated links sent.
    pub fn record_link_rotations(&self, count: u64) {
        self.inner.link_rotations.fetch_add(count, Ordering::Relaxed);
    }

    /// Gets the posts published count.
    pub fn posts_published(&self) -> u64 {
        self.inner.posts_published.load(Ordering::Relaxed)
    }

    /// Gets the win batches published count.
    pub fn win_batches_published(&self) -> u64 {
        self.inner.win_batches_published.load(Ordering::Relaxed)
    }

    /// Gets the publish failure count.
    pub fn publish_failures(&self) -> u64 {
        self.inner.publish_failures.load(Ordering::Relaxed)
    }

    /// Gets time since last completed publication.
    pub fn time_since_publish(&self) -> Option<std::time::Duration> {
        self.inner
            .last_publish_success
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        MetricsSnapshot {
            events_handled: load(&self.inner.events_handled),
            event_failures: load(&self.inner.event_failures),
            posts_created: load(&self.inner.posts_created),
            posts_published: load(&self.inner.posts_published),
            win_batches_created: load(&self.inner.win_batches_created),
            win_batches_published: load(&self.inner.win_batches_published),
            publish_failures: load(&self.inner.publish_failures),
            best_win_rebroadcasts: load(&self.inner.best_win_rebroadcasts),
            link_rotations: load(&self.inner.link_rotations),
            seconds_since_publish: self.time_since_publish().map(|d| d.as_secs()),
        }
    }
}

/// Serializable snapshot of bot metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Inbound events and timer ticks handled
    pub events_handled: u64,
    /// Handlers that returned an error
    pub event_failures: u64,
    /// Posts stored
    pub posts_created: u64,
    /// Posts sent to every channel
    pub posts_published: u64,
    /// Win batches stored
    pub win_batches_created: u64,
    /// Win batches sent to every channel
    pub win_batches_published: u64,
    /// Publish passes that aborted
    pub publish_failures: u64,
    /// Best-win copies sent
    pub best_win_rebroadcasts: u64,
    /// Rotated links sent
    pub link_rotations: u64,
    /// Seconds since the last completed publication
    pub seconds_since_publish: Option<u64>,
}
