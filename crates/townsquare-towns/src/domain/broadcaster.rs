//! Per-town event fan-out.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use townsquare_core::broadcast::Broadcaster;
use townsquare_core::clock::Clock;
use townsquare_core::event::TownEvent;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Observers {
    last_sequence: u64,
    channels: HashMap<Uuid, mpsc::UnboundedSender<TownEvent>>,
}

/// Fans town events out to every registered observer channel.
///
/// Observers are registered when a player joins and removed when they
/// leave. Channels are unbounded, so a publish never blocks and never drops
/// an event for a live observer. Each event gets the next sequence number
/// of the town.
pub struct TownBroadcaster {
    clock: Arc<dyn Clock>,
    observers: Mutex<Observers>,
}

impl fmt::Debug for TownBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let observers = self.lock();
        f.debug_struct("TownBroadcaster")
            .field("last_sequence", &observers.last_sequence)
            .field("observers", &observers.channels.len())
            .finish_non_exhaustive()
    }
}

impl TownBroadcaster {
    /// Creates a broadcaster with no observers.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            observers: Mutex::new(Observers::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Observers> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an observer channel for `player_id` and returns its receiver.
    ///
    /// Subscribing again replaces the previous channel for that player.
    pub fn subscribe(&self, player_id: Uuid) -> mpsc::UnboundedReceiver<TownEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().channels.insert(player_id, sender);
        receiver
    }

    /// Removes the observer channel for `player_id`, closing its receiver.
    pub fn unsubscribe(&self, player_id: Uuid) {
        self.lock().channels.remove(&player_id);
    }

    /// Removes every observer channel.
    pub fn close(&self) {
        self.lock().channels.clear();
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().channels.len()
    }
}

impl Broadcaster for TownBroadcaster {
    fn publish(&self, event_name: &str, payload: serde_json::Value) {
        let mut observers = self.lock();
        observers.last_sequence += 1;
        let event = TownEvent {
            sequence: observers.last_sequence,
            event: event_name.to_owned(),
            occurred_at: self.clock.now(),
            payload,
        };
        debug!(
            event = event_name,
            sequence = event.sequence,
            observers = observers.channels.len(),
            "publishing town event"
        );
        observers.channels.retain(|player_id, channel| {
            let delivered = channel.send(event.clone()).is_ok();
            if !delivered {
                debug!(%player_id, "dropping closed observer channel");
            }
            delivered
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use townsquare_test_support::FixedClock;

    fn broadcaster() -> TownBroadcaster {
        TownBroadcaster::new(Arc::new(FixedClock::epoch()))
    }

    #[test]
    fn test_publish_reaches_every_observer_in_order() {
        // Arrange
        let broadcaster = broadcaster();
        let mut first = broadcaster.subscribe(Uuid::new_v4());
        let mut second = broadcaster.subscribe(Uuid::new_v4());

        // Act
        broadcaster.publish("interactableUpdate", serde_json::json!({ "n": 1 }));
        broadcaster.publish("interactableUpdate", serde_json::json!({ "n": 2 }));

        // Assert
        for receiver in [&mut first, &mut second] {
            let one = receiver.try_recv().unwrap();
            let two = receiver.try_recv().unwrap();
            assert_eq!(one.sequence, 1);
            assert_eq!(one.payload, serde_json::json!({ "n": 1 }));
            assert_eq!(two.sequence, 2);
            assert_eq!(two.payload, serde_json::json!({ "n": 2 }));
            assert_eq!(one.occurred_at, FixedClock::epoch().0);
            assert!(receiver.try_recv().is_err());
        }
    }

    #[test]
    fn test_unsubscribed_observer_stops_receiving() {
        let broadcaster = broadcaster();
        let player_id = Uuid::new_v4();
        let mut receiver = broadcaster.subscribe(player_id);

        broadcaster.unsubscribe(player_id);
        broadcaster.publish("playerMoved", serde_json::Value::Null);

        assert_eq!(broadcaster.observer_count(), 0);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_pruned_on_publish() {
        let broadcaster = broadcaster();
        let receiver = broadcaster.subscribe(Uuid::new_v4());
        drop(receiver);

        broadcaster.publish("playerMoved", serde_json::Value::Null);

        assert_eq!(broadcaster.observer_count(), 0);
    }
}
