//! Error types for the SleepNumber button integration.

use thiserror::Error;

/// Failure reported by a bed client when a remote action does not go through.
///
/// Button presses hand this error back to the caller exactly as the client
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BedError {
    /// The SleepIQ service rejected or failed the request
    #[error("SleepIQ request failed: {0}")]
    Request(String),
    /// The client session is not (or no longer) authenticated
    #[error("not authenticated with the SleepIQ service")]
    Unauthenticated,
    /// The bed is not reachable
    #[error("bed {0} is offline")]
    Offline(String),
}

/// Errors raised by the [`EntityRegistry`](crate::entity::EntityRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("an entity with unique id {0} is already registered")]
    DuplicateUniqueId(String),
    #[error("no entity registered with unique id {0}")]
    UnknownEntity(String),
    #[error(transparent)]
    Action(#[from] BedError),
}

/// Errors raised while loading a [`SleepNumberConfig`](crate::config::SleepNumberConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown button key: {0}")]
    UnknownButton(String),
}
