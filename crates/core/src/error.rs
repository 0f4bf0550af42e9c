//! Registry error types

use cvarkit_sdk::VarType;

/// Errors raised while registering variables and commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Name is empty or contains characters the console cannot address
    #[error("invalid name '{0}'")]
    InvalidName(String),

    /// Registration asked for the invalid type
    #[error("cannot register '{0}' with the invalid type")]
    InvalidType(String),

    /// Name already belongs to an entry of the other kind
    #[error("'{name}' is already registered as a {existing}")]
    NameCollision { name: String, existing: &'static str },

    /// Variable already exists with a different type
    #[error("'{name}' is registered as {existing}, not {requested}")]
    TypeMismatch {
        name: String,
        existing: VarType,
        requested: VarType,
    },

    /// Command exists and neither side allows chaining
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    /// Access index space is exhausted
    #[error("registry is full, cannot register '{0}'")]
    TableFull(String),

    /// The process-wide registry was installed twice
    #[error("registry already initialized")]
    AlreadyInitialized,
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by the cross-thread set queue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Queue is at capacity, the write was dropped
    #[error("queued set capacity reached, dropping write")]
    Full,

    /// The receiving side is gone
    #[error("queued set channel disconnected")]
    Disconnected,

    /// Handle does not address a variable
    #[error("queued set targets an invalid handle")]
    InvalidHandle,
}
