//! Snapshot notifications
//!
//! Every dispatch publishes the full new state to all subscribers.
//!
//! # Architecture
//!
//! The bus uses `tokio::sync::broadcast` for multi-subscriber support.
//! Publishing happens synchronously inside `Store::dispatch`, so subscribers
//! observe snapshots in dispatch order.
//!
//! # Non-Blocking Behavior
//!
//! If no subscribers exist, snapshots are dropped immediately. Subscribers can
//! lag without blocking the store; a lagging subscriber misses the oldest
//! snapshots and receives `RecvError::Lagged`.

use tokio::sync::broadcast;

use super::state::TubeDeckState;

/// Snapshot receiver type alias
pub type StateReceiver = broadcast::Receiver<TubeDeckState>;

/// Default number of snapshots buffered per subscriber
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct StateBus {
    sender: broadcast::Sender<TubeDeckState>,
}

impl StateBus {
    /// Create a new bus buffering up to `capacity` snapshots per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to snapshots published after this call
    pub fn subscribe(&self) -> StateReceiver {
        self.sender.subscribe()
    }

    /// Publish a snapshot to all subscribers
    pub fn publish(&self, state: TubeDeckState) {
        // send() only fails when nobody is listening
        let _ = self.sender.send(state);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StateBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
