//! Shared test doubles and utilities for the Townsquare server.

mod broadcaster;
mod clock;

pub use broadcaster::{PublishedEvent, RecordingBroadcaster};
pub use clock::FixedClock;
