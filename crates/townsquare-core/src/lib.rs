//! Townsquare Core: shared domain abstractions.
//!
//! This crate defines the error type, the clock and command traits, and the
//! publish interface every town broadcaster implements. It contains no
//! infrastructure code.

pub mod broadcast;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
