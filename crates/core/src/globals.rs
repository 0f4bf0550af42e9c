//! Process-wide registry handle
//!
//! Code that runs before the host has built its registry (static
//! declarations, `#[console_command]` functions) registers through
//! [`register_convar`] and [`register_command`]. Those calls are queued until
//! the host calls [`ready`], which installs the registry and flushes the
//! queue exactly once. After that the same calls register immediately.
//!
//! Entries queued before `ready` are registered oldest first. A registration
//! made while the flush is running goes straight to the registry and may
//! land before queued entries that have not been reached yet.

use std::sync::{LazyLock, OnceLock};

use parking_lot::Mutex;

use cvarkit_sdk::{ConCommandRef, ConVarRef};

use crate::commands::ConCommandSetup;
use crate::convars::ConVarSetup;
use crate::error::RegistryError;
use crate::registry::{register_batches, Deferred, Registry, RegistrationQueue};

/// Installed registry
static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Registrations submitted before `ready`
static PENDING: LazyLock<Mutex<RegistrationQueue>> =
    LazyLock::new(|| Mutex::new(RegistrationQueue::new()));

/// Register a variable with the process-wide registry
///
/// Queued until [`ready`] runs; the returned handle resolves then.
pub fn register_convar(setup: impl Into<ConVarSetup>) -> Deferred<ConVarRef> {
    let setup = setup.into();
    {
        let mut pending = PENDING.lock();
        if !pending.is_flushed() {
            return pending.submit_convar(setup);
        }
    }
    match REGISTRY.get() {
        Some(registry) => Deferred::resolved(registry.register_convar(setup)),
        None => Deferred::resolved(ConVarRef::invalid()),
    }
}

/// Register a command with the process-wide registry
///
/// Queued until [`ready`] runs; the returned handle resolves then.
pub fn register_command(setup: ConCommandSetup) -> Deferred<ConCommandRef> {
    {
        let mut pending = PENDING.lock();
        if !pending.is_flushed() {
            return pending.submit_command(setup);
        }
    }
    match REGISTRY.get() {
        Some(registry) => Deferred::resolved(registry.register_command(setup)),
        None => Deferred::resolved(ConCommandRef::invalid()),
    }
}

/// Install the process-wide registry and flush queued registrations
///
/// Returns an error if a registry was already installed.
///
/// # Panics
/// Panics if a queued registration fails; the registry would otherwise
/// serve an inconsistent name-to-type mapping.
pub fn ready(registry: Registry) -> Result<&'static Registry, RegistryError> {
    let mut installed = false;
    let registry = REGISTRY.get_or_init(|| {
        installed = true;
        registry
    });
    if !installed {
        tracing::warn!("Registry already initialized, ignoring ready()");
        return Err(RegistryError::AlreadyInitialized);
    }

    let batches = PENDING.lock().take_batches();
    if let Err(e) = register_batches(registry, batches) {
        tracing::error!("Failed to flush registration queue: {}", e);
        panic!("failed to flush registration queue: {e}");
    }

    tracing::info!(
        "Registry ready ({} convars, {} commands)",
        registry.convar_count(),
        registry.command_count()
    );
    Ok(registry)
}

/// Get the process-wide registry
///
/// # Panics
/// Panics if called before [`ready`]
pub fn registry() -> &'static Registry {
    REGISTRY.get().expect("Registry not initialized")
}

/// Try to get the process-wide registry without panicking
pub fn try_registry() -> Option<&'static Registry> {
    REGISTRY.get()
}

/// Check if the process-wide registry is installed
pub fn is_ready() -> bool {
    REGISTRY.get().is_some()
}

#[cfg(test)]
mod tests {
    use cvarkit_sdk::{SplitScreenSlot, VarType};

    use super::*;
    use crate::commands::{CommandArgs, CommandCallback, CommandContext};
    use crate::convars::ConVarCreation;

    // The process-wide handle can only be installed once, so the whole
    // lifecycle lives in a single test.
    #[test]
    fn test_lifecycle() {
        assert!(!is_ready());
        assert!(try_registry().is_none());

        let early = register_convar(ConVarCreation::new("sv_early", 3i32, "Declared early"));
        let cmd = register_command(ConCommandSetup::new("early_cmd", CommandCallback::void(|| {})));
        assert!(!early.get().is_valid());

        let registry = ready(Registry::default()).unwrap();
        assert!(is_ready());
        assert!(std::ptr::eq(registry, super::registry()));

        assert!(early.get().is_valid());
        assert!(cmd.get().is_valid());
        assert_eq!(registry.get_int(early.get(), SplitScreenSlot::DEFAULT), 3);

        let late = register_convar(ConVarSetup::new("sv_late", VarType::Bool));
        assert!(late.is_resolved());
        assert_eq!(registry.find_convar("sv_late", false), late.get());

        assert!(registry.dispatch_command(
            cmd.get(),
            &CommandContext::default(),
            &CommandArgs::from_argv(["early_cmd"])
        ));

        assert_eq!(
            ready(Registry::default()).unwrap_err(),
            RegistryError::AlreadyInitialized
        );
    }
}
