//! Command abstractions.

use uuid::Uuid;

/// Trait that all dispatcher commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The town this command targets, as supplied by the caller.
    fn town_id(&self) -> &str;
}
