//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every variant is raised before any state is mutated, so a returned error
/// always means nothing changed and nothing was broadcast.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    /// No live town has the given identifier.
    #[error("invalid town id: {0}")]
    InvalidTownId(String),

    /// The session token does not belong to a player joined to the town.
    #[error("invalid session token")]
    InvalidSessionToken,

    /// No area with the given id exists, or it is not the expected variant.
    #[error("invalid interactable id: {0}")]
    InvalidInteractableId(String),

    /// A variant-specific payload failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A map object is missing the geometry needed to build an area.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// An infrastructure error outside the synchronization core.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
