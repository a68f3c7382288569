//! Town-scoped publish interface.

/// Publishing capability shared by every area of a town.
///
/// Implementations fan the event out to all observers currently registered
/// with the town. Publishing is synchronous and never drops an event for a
/// live observer, so observers see events in publish order.
pub trait Broadcaster: Send + Sync + std::fmt::Debug {
    /// Publish `payload` under `event_name` to every observer of the town.
    fn publish(&self, event_name: &str, payload: serde_json::Value);
}
