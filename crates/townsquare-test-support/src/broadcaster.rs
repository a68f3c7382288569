//! Test broadcaster: records every publish for later assertions.

use std::sync::Mutex;

use townsquare_core::broadcast::Broadcaster;

/// A single recorded `publish` call.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    /// The event name passed to `publish`.
    pub event_name: String,
    /// The payload passed to `publish`.
    pub payload: serde_json::Value,
}

/// A broadcaster that records all `publish` calls in order.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    published: Mutex<Vec<PublishedEvent>>,
}

impl RecordingBroadcaster {
    /// Create an empty recording broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<PublishedEvent> {
        self.published.lock().unwrap().clone()
    }

    /// Returns only the payloads published under `event_name`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn payloads_named(&self, event_name: &str) -> Vec<serde_json::Value> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_name == event_name)
            .map(|e| e.payload.clone())
            .collect()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn publish(&self, event_name: &str, payload: serde_json::Value) {
        self.published.lock().unwrap().push(PublishedEvent {
            event_name: event_name.to_owned(),
            payload,
        });
    }
}
