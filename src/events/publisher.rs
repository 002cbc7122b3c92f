//! Load sample publisher
//!
//! ```rust
//! use db_load_health::events::{HealthEventPublisher, LoadSampled};
//!
//! # tokio_test::block_on(async {
//! let publisher = HealthEventPublisher::new(16);
//! let mut samples = publisher.subscribe();
//!
//! publisher.publish(LoadSampled::new("primary", 0.5, 8));
//!
//! let sample = samples.recv().await.unwrap();
//! assert_eq!(sample.active_sessions, 8);
//! # });
//! ```

use super::types::LoadSampled;
use crate::constants::events::LOAD_SAMPLED;
use tokio::sync::broadcast;
use tracing::info;

/// Broadcast publisher for load samples
///
/// Publishing with no subscribers is not an error; every sample is also
/// emitted as a `tracing` event so log pipelines see it without subscribing.
#[derive(Debug, Clone)]
pub struct HealthEventPublisher {
    sender: broadcast::Sender<LoadSampled>,
}

impl HealthEventPublisher {
    /// Create a new publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a sample to subscribers and to the log
    pub fn publish(&self, event: LoadSampled) {
        info!(
            event = LOAD_SAMPLED,
            database = %event.database_identity,
            load_pct = event.load_pct,
            active_sessions = event.active_sessions,
            "Database load sampled"
        );

        // send() only fails when nobody is subscribed
        let _ = self.sender.send(event);
    }

    /// Subscribe to samples published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LoadSampled> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HealthEventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}
