//! Domain layer for interactable areas.

pub mod area;
pub mod conversation;
pub mod geometry;
pub mod models;
pub mod poster_session;
pub mod viewing;
