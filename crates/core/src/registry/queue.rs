//! Registration queue for entries declared before the registry exists
//!
//! Submissions are stored in fixed-size batches and registered oldest first
//! by [`RegistrationQueue::flush`]. Each submission returns a [`Deferred`]
//! handle that resolves once its entry has been registered.

use std::sync::{Arc, OnceLock};

use cvarkit_sdk::{ConCommandRef, ConVarRef};

use super::Registry;
use crate::commands::ConCommandSetup;
use crate::convars::ConVarSetup;
use crate::error::RegistryResult;

/// Entries per batch
pub const BATCH_SIZE: usize = 100;

/// A handle that becomes available after the queue is flushed
///
/// Until then [`Deferred::get`] returns the invalid handle.
#[derive(Debug)]
pub struct Deferred<H> {
    slot: Arc<OnceLock<H>>,
}

impl<H: Copy + Default> Deferred<H> {
    fn pending() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// A deferred handle that is already resolved
    pub fn resolved(handle: H) -> Self {
        let deferred = Self::pending();
        let _ = deferred.slot.set(handle);
        deferred
    }

    /// The handle, or the invalid handle while unresolved
    pub fn get(&self) -> H {
        self.slot.get().copied().unwrap_or_default()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    fn resolve(&self, handle: H) {
        let _ = self.slot.set(handle);
    }
}

impl<H> Clone for Deferred<H> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// A registration waiting for the registry
pub enum PendingRegistration {
    ConVar {
        setup: ConVarSetup,
        slot: Deferred<ConVarRef>,
    },
    Command {
        setup: ConCommandSetup,
        slot: Deferred<ConCommandRef>,
    },
}

impl PendingRegistration {
    pub fn name(&self) -> &str {
        match self {
            Self::ConVar { setup, .. } => setup.name(),
            Self::Command { setup, .. } => setup.name(),
        }
    }

    fn register(self, registry: &Registry) -> RegistryResult<()> {
        match self {
            Self::ConVar { setup, slot } => {
                slot.resolve(registry.try_register_convar(setup)?);
            }
            Self::Command { setup, slot } => {
                slot.resolve(registry.try_register_command(setup)?);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for PendingRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConVar { setup, .. } => f.debug_tuple("ConVar").field(&setup.name()).finish(),
            Self::Command { setup, .. } => f.debug_tuple("Command").field(&setup.name()).finish(),
        }
    }
}

/// Batched queue of registrations
#[derive(Debug, Default)]
pub struct RegistrationQueue {
    batches: Vec<Vec<PendingRegistration>>,
    flushed: bool,
}

impl RegistrationQueue {
    pub const fn new() -> Self {
        Self {
            batches: Vec::new(),
            flushed: false,
        }
    }

    /// Queue a variable registration
    pub fn submit_convar(&mut self, setup: impl Into<ConVarSetup>) -> Deferred<ConVarRef> {
        let slot = Deferred::pending();
        self.push(PendingRegistration::ConVar {
            setup: setup.into(),
            slot: slot.clone(),
        });
        slot
    }

    /// Queue a command registration
    pub fn submit_command(&mut self, setup: ConCommandSetup) -> Deferred<ConCommandRef> {
        let slot = Deferred::pending();
        self.push(PendingRegistration::Command {
            setup,
            slot: slot.clone(),
        });
        slot
    }

    fn push(&mut self, entry: PendingRegistration) {
        match self.batches.last_mut() {
            Some(batch) if batch.len() < BATCH_SIZE => batch.push(entry),
            _ => {
                let mut batch = Vec::with_capacity(BATCH_SIZE);
                batch.push(entry);
                self.batches.push(batch);
            }
        }
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Whether the queue has been flushed at least once
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Take the queued batches and mark the queue flushed
    pub(crate) fn take_batches(&mut self) -> Vec<Vec<PendingRegistration>> {
        self.flushed = true;
        std::mem::take(&mut self.batches)
    }

    /// Register every queued entry, oldest first
    ///
    /// Stops at the first entry that fails to register; entries after it
    /// are dropped. Flushing an empty queue is a no-op.
    pub fn flush(&mut self, registry: &Registry) -> RegistryResult<usize> {
        register_batches(registry, self.take_batches())
    }
}

/// Register batches in order, returning how many entries were registered
pub(crate) fn register_batches(
    registry: &Registry,
    batches: Vec<Vec<PendingRegistration>>,
) -> RegistryResult<usize> {
    let mut count = 0;
    for entry in batches.into_iter().flatten() {
        let name = entry.name().to_string();
        if let Err(e) = entry.register(registry) {
            tracing::error!("Queued registration of '{}' failed: {}", name, e);
            return Err(e);
        }
        count += 1;
    }
    if count > 0 {
        tracing::debug!("Flushed {} queued registration(s)", count);
    }
    Ok(count)
}
