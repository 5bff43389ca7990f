//! Broadcast hub: explicit subscriber registry and snapshot fan-out.
//!
//! The hub owns every subscriber connection and pushes a full snapshot
//! into each subscriber's bounded queue without ever waiting, so one
//! stalled consumer cannot hold up the mutation that triggered the push
//! or delay the other subscribers.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::model::Snapshot;

/// Consecutive failed heartbeats tolerated before a subscriber is closed.
const MAX_MISSED_HEARTBEATS: u8 = 3;

/// Returned by [`BroadcastHub::subscribe`] once the hub has shut down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("hub is closed")]
pub struct HubClosedError;

/// Hub-assigned subscriber identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Registered, initial snapshot not yet queued.
    Connecting,
    /// Receiving snapshots and heartbeats.
    Active,
    /// Terminal; the registry drops the entry on this transition.
    Closed,
}

/// What the hub delivers to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// The full match list after a mutation, or on attach.
    Snapshot(Snapshot),
    /// Keep-alive signal.
    Heartbeat,
}

/// Tuning knobs for the hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of each subscriber's event queue, at least 1.
    pub subscriber_buffer: usize,
    /// Delay between keep-alive sweeps, at least one millisecond.
    pub heartbeat_interval: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: 32,
            heartbeat_interval: Duration::from_secs(5),
        }
    }
}

impl HubConfig {
    /// Set the per-subscriber queue capacity.
    pub fn subscriber_buffer(mut self, capacity: usize) -> Self {
        self.subscriber_buffer = capacity;
        self
    }

    /// Set the delay between keep-alive sweeps.
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }
}

/// Registry bookkeeping for one subscriber.
struct SubscriberEntry {
    tx: mpsc::Sender<HubEvent>,
    state: SubscriberState,
    missed_heartbeats: u8,
}

impl SubscriberEntry {
    fn new(tx: mpsc::Sender<HubEvent>) -> Self {
        SubscriberEntry {
            tx,
            state: SubscriberState::Connecting,
            missed_heartbeats: 0,
        }
    }
}

struct HubState {
    /// Only Active entries are stored: attach flips Connecting to Active
    /// before insert, and closed entries are removed on the spot.
    subscribers: HashMap<SubscriberId, SubscriberEntry>,
    /// Last published snapshot, handed to late joiners on attach.
    latest: Snapshot,
    closed: bool,
}

/// Central registry of live subscribers.
///
/// Thread-safe via a `Mutex` around the registry; every critical section
/// is short and free of `.await`, so the hub can be driven from both
/// sync and async callers.
pub struct BroadcastHub {
    state: Mutex<HubState>,
    next_id: AtomicU64,
    delivery_failures: AtomicU64,
    config: HubConfig,
}

impl BroadcastHub {
    /// Create a hub with default configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with custom configuration.
    ///
    /// Out-of-range settings are clamped to their documented floors; a
    /// zero heartbeat interval would panic the sweep task's timer.
    pub fn with_config(config: HubConfig) -> Self {
        let config = HubConfig {
            subscriber_buffer: config.subscriber_buffer.max(1),
            heartbeat_interval: config.heartbeat_interval.max(Duration::from_millis(1)),
        };
        Self {
            state: Mutex::new(HubState {
                subscribers: HashMap::new(),
                latest: Arc::new(Vec::new()),
                closed: false,
            }),
            next_id: AtomicU64::new(1),
            delivery_failures: AtomicU64::new(0),
            config,
        }
    }

    /// Get the hub configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Registers a subscriber and immediately queues the latest snapshot
    /// to it alone.
    ///
    /// The returned handle yields events and detaches itself when
    /// dropped. Fails only once [`shutdown`](Self::shutdown) has run.
    pub fn subscribe(self: &Arc<Self>) -> Result<SubscriptionHandle, HubClosedError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(HubClosedError);
        }

        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.config.subscriber_buffer);
        let mut entry = SubscriberEntry::new(tx);

        // A fresh queue always has room for the initial snapshot.
        let _ = entry.tx.try_send(HubEvent::Snapshot(Arc::clone(&state.latest)));
        entry.state = SubscriberState::Active;
        state.subscribers.insert(id, entry);

        tracing::debug!(
            subscriber = %id,
            total = state.subscribers.len(),
            "Subscriber attached"
        );

        Ok(SubscriptionHandle {
            id,
            rx,
            hub: Arc::clone(self),
        })
    }

    /// Fans `snapshot` out to every active subscriber.
    ///
    /// Fire-and-forget per subscriber: a full queue or a gone receiver
    /// closes that subscriber alone, is counted and logged, and never
    /// surfaces to the caller. Never blocks, so it is safe to call while
    /// holding the repository lock.
    pub fn publish(&self, snapshot: Snapshot) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        state.latest = Arc::clone(&snapshot);

        let mut failed = 0u64;
        state.subscribers.retain(|id, entry| {
            match entry.tx.try_send(HubEvent::Snapshot(Arc::clone(&snapshot))) {
                Ok(()) => true,
                Err(err) => {
                    entry.state = SubscriberState::Closed;
                    failed += 1;
                    let reason = match err {
                        TrySendError::Full(_) => "queue full",
                        TrySendError::Closed(_) => "receiver gone",
                    };
                    tracing::warn!(
                        subscriber = %id,
                        reason,
                        "Dropping subscriber after failed delivery"
                    );
                    false
                }
            }
        });

        if failed > 0 {
            self.delivery_failures.fetch_add(failed, Ordering::Relaxed);
        }
    }

    /// Detaches a subscriber. Idempotent: unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut state = self.state.lock().unwrap();
        if state.subscribers.remove(&id).is_some() {
            tracing::debug!(
                subscriber = %id,
                remaining = state.subscribers.len(),
                "Subscriber detached"
            );
        }
    }

    /// Runs one keep-alive sweep.
    ///
    /// Queues a heartbeat to every subscriber; a successful send clears
    /// the subscriber's strike count, a full queue adds a strike, and
    /// [`MAX_MISSED_HEARTBEATS`] strikes in a row (or a gone receiver)
    /// close the subscriber.
    pub fn heartbeat(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };

        let mut dropped = 0u64;
        state
            .subscribers
            .retain(|id, entry| match entry.tx.try_send(HubEvent::Heartbeat) {
                Ok(()) => {
                    entry.missed_heartbeats = 0;
                    true
                }
                Err(TrySendError::Closed(_)) => {
                    entry.state = SubscriberState::Closed;
                    dropped += 1;
                    tracing::debug!(subscriber = %id, "Subscriber gone, removing");
                    false
                }
                Err(TrySendError::Full(_)) => {
                    entry.missed_heartbeats += 1;
                    if entry.missed_heartbeats >= MAX_MISSED_HEARTBEATS {
                        entry.state = SubscriberState::Closed;
                        dropped += 1;
                        tracing::warn!(
                            subscriber = %id,
                            missed = entry.missed_heartbeats,
                            "Subscriber unresponsive, removing"
                        );
                        false
                    } else {
                        true
                    }
                }
            });

        if dropped > 0 {
            self.delivery_failures.fetch_add(dropped, Ordering::Relaxed);
        }
    }

    /// Spawn the periodic heartbeat sweep.
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_heartbeat_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let hub = Arc::clone(self);
        let interval = hub.config.heartbeat_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                hub.heartbeat();
            }
        })
    }

    /// Closes the hub: every subscriber is detached (their event streams
    /// end) and later [`subscribe`](Self::subscribe) calls fail.
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        state.closed = true;

        // Dropping the entries drops their senders, which ends every
        // subscriber's event stream once its buffered events drain.
        let detached = state.subscribers.len();
        state.subscribers.clear();
        tracing::info!(subscribers = detached, "Hub closed");
    }

    /// Number of currently attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().unwrap().subscribers.len()
    }

    /// State of one subscriber, or `None` once it has been detached.
    pub fn subscriber_state(&self, id: SubscriberId) -> Option<SubscriberState> {
        let state = self.state.lock().unwrap();
        state.subscribers.get(&id).map(|entry| entry.state)
    }

    /// Total subscribers closed after a failed delivery or missed
    /// heartbeats.
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscriber's end of the hub.
///
/// Yields [`HubEvent`]s in publish order and detaches itself from the
/// registry when dropped, so an abandoned connection releases its slot
/// without waiting for the heartbeat sweep to notice.
pub struct SubscriptionHandle {
    id: SubscriberId,
    rx: mpsc::Receiver<HubEvent>,
    hub: Arc<BroadcastHub>,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next event, or `None` once the subscriber is detached (hub
    /// shutdown, or closed after failed deliveries).
    pub async fn recv(&mut self) -> Option<HubEvent> {
        self.rx.recv().await
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
