//! Townsquare: towns and the area dispatcher.
//!
//! Responsible for the town registry, player sessions, per-town event
//! fan-out, and the validated operations that mutate interactable areas.

pub mod application;
pub mod domain;
pub mod registry;
