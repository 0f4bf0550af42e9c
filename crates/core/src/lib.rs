//! cvarkit - Console Variable and Command Registry
//!
//! This crate holds the registry of typed console variables and console
//! commands: registration, lookup, value access with change notification,
//! command tokenizing and dispatch.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - Handle types, type tags and slot newtypes

// Allow the crate to refer to itself as `cvarkit_core` for proc macro compatibility
extern crate self as cvarkit_core;

// Re-export SDK crate
pub use cvarkit_sdk as sdk;

pub mod commands;
pub mod config;
pub mod convars;
pub mod error;
mod globals;
pub mod registry;
mod tasks;
pub mod types;

// Re-export commonly used items
pub use registry::{Deferred, Registry, RegistrationQueue};

// Re-export the process-wide handle
pub use globals::{is_ready, ready, register_command, register_convar, registry, try_registry};

// Re-export command types
pub use commands::{CommandArgs, CommandCallback, CommandContext, ConCommandSetup};

// Re-export convar types
pub use convars::{ConVar, ConVarCreation, ConVarFlags, ConVarSetup};
pub use types::{ConVarValue, Value};

// Re-export error and config types
pub use config::{ConfigError, ConfigResult, RegistryConfig};
pub use error::{QueueError, RegistryError, RegistryResult};

// Re-export handle types
pub use sdk::{ConCommandRef, ConVarRef, SplitScreenSlot, VarType};

// Re-export macros
pub use cvarkit_macros::console_command;

#[cfg(test)]
mod tests {
    #[test]
    fn test_sdk_types_exist() {
        // Verify SDK types are accessible
        use crate::sdk::{ConVarRef, INVALID_ACCESS_INDEX};
        assert_eq!(ConVarRef::invalid().access_index, INVALID_ACCESS_INDEX);
    }
}
