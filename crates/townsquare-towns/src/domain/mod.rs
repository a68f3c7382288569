//! Domain layer for towns.

pub mod broadcaster;
pub mod commands;
pub mod events;
pub mod player;
pub mod town;
