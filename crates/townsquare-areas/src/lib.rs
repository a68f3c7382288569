//! Townsquare: interactable areas.
//!
//! Responsible for area geometry, the occupant lifecycle shared by every
//! area, and the content variants (poster session, conversation, viewing)
//! with their validation and reset rules.

pub mod domain;
