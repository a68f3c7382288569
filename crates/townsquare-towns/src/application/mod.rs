//! Application layer: command and query handlers over the town registry.

pub mod command_handlers;
pub mod query_handlers;
