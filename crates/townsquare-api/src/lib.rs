//! Townsquare API: HTTP and WebSocket surface over the town dispatcher.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
