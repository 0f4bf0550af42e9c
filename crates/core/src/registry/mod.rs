//! The variable and command registry
//!
//! A [`Registry`] owns every variable and command record. Records are
//! addressed by index-based handles ([`ConVarRef`], [`ConCommandRef`]) and
//! are never removed, so a resolved handle stays usable for the life of the
//! registry. Unknown handles resolve to shared sentinel records and read as
//! type defaults.
//!
//! # Example
//!
//! ```ignore
//! use cvarkit_core::convars::{ConVar, ConVarCreation};
//! use cvarkit_core::Registry;
//!
//! let registry = Registry::default();
//! let gravity = ConVar::register(
//!     &registry,
//!     ConVarCreation::new("sv_gravity", 800i32, "World gravity").with_min(0),
//! );
//!
//! registry.set_from_string(gravity.cvar_ref(), "-5", Default::default());
//! assert_eq!(gravity.get(&registry), 0);
//! ```

mod iter;
mod listeners;
mod queue;
mod register;
mod reset;
mod snapshot;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;

use cvarkit_sdk::{ConCommandRef, ConVarRef, VarType, INVALID_ACCESS_INDEX};

use crate::commands::ConCommandRecord;
use crate::config::RegistryConfig;
use crate::convars::callbacks::CallbackTables;
use crate::convars::flags::ConVarFlags;
use crate::convars::record::{invalid_record, ConVarRecord};
use crate::tasks::QueuedSets;

pub use iter::{ConCommandIter, ConVarIter};
pub use listeners::{ConCommandCreatedCallback, ConVarCreatedCallback, ListenerKey};
pub use queue::{Deferred, PendingRegistration, RegistrationQueue, BATCH_SIZE};
pub use snapshot::SnapshotKey;

pub(crate) use queue::register_batches;

use listeners::CreationListeners;
use snapshot::Snapshot;

/// Append-only table of records with a name index
pub(crate) struct RecordTable<R> {
    pub records: Vec<Arc<R>>,
    pub by_name: HashMap<String, u16>,
}

impl<R> RecordTable<R> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn get(&self, index: u16) -> Option<&Arc<R>> {
        if index == INVALID_ACCESS_INDEX {
            return None;
        }
        self.records.get(index as usize)
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.by_name.get(name).copied()
    }

    /// Append a record, returning its index or `None` when the table is full
    pub fn push(&mut self, name: &str, record: R) -> Option<u16> {
        let index = u16::try_from(self.records.len())
            .ok()
            .filter(|i| *i != INVALID_ACCESS_INDEX)?;
        self.records.push(Arc::new(record));
        self.by_name.insert(name.to_string(), index);
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Registry of console variables and commands
pub struct Registry {
    config: RegistryConfig,
    pub(crate) convars: RwLock<RecordTable<ConVarRecord>>,
    pub(crate) commands: RwLock<RecordTable<ConCommandRecord>>,
    pub(crate) callbacks: RwLock<CallbackTables>,
    listeners: RwLock<CreationListeners>,
    snapshots: Mutex<SlotMap<SnapshotKey, Snapshot>>,
    pub(crate) queued_sets: QueuedSets,
    max_split_screen_slots: AtomicUsize,
}

impl Registry {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Self {
        let slots = config.max_split_screen_slots.max(1);
        let queued_sets = QueuedSets::new(config.queued_set_capacity);
        Self {
            config,
            convars: RwLock::new(RecordTable::new()),
            commands: RwLock::new(RecordTable::new()),
            callbacks: RwLock::new(CallbackTables::default()),
            listeners: RwLock::new(CreationListeners::default()),
            snapshots: Mutex::new(SlotMap::with_key()),
            queued_sets,
            max_split_screen_slots: AtomicUsize::new(slots),
        }
    }

    /// Configuration this registry was built with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Resolve a variable handle to its record
    pub(crate) fn convar_record(&self, cvar: ConVarRef) -> Option<Arc<ConVarRecord>> {
        self.convars.read().get(cvar.access_index).cloned()
    }

    /// Resolve a variable handle, falling back to the sentinel for `var_type`
    pub(crate) fn convar_record_or_invalid(
        &self,
        cvar: ConVarRef,
        var_type: VarType,
    ) -> Arc<ConVarRecord> {
        self.convar_record(cvar)
            .unwrap_or_else(|| invalid_record(var_type))
    }

    /// Resolve a command handle to its record
    pub(crate) fn command_record(&self, cmd: ConCommandRef) -> Option<Arc<ConCommandRecord>> {
        self.commands.read().get(cmd.access_index).cloned()
    }

    /// Find a variable by exact, case-sensitive name
    ///
    /// Defensive variables are only found when `allow_defensive` is set.
    pub fn find_convar(&self, name: &str, allow_defensive: bool) -> ConVarRef {
        let table = self.convars.read();
        let Some(index) = table.index_of(name) else {
            return ConVarRef::invalid();
        };
        let Some(record) = table.get(index) else {
            return ConVarRef::invalid();
        };

        let state = record.state.lock();
        if !allow_defensive && state.flags.contains(ConVarFlags::DEFENSIVE) {
            return ConVarRef::invalid();
        }
        ConVarRef::new(index, state.registrations)
    }

    /// Find a command by exact, case-sensitive name
    ///
    /// Defensive commands are only found when `allow_defensive` is set.
    pub fn find_command(&self, name: &str, allow_defensive: bool) -> ConCommandRef {
        let table = self.commands.read();
        let Some(index) = table.index_of(name) else {
            return ConCommandRef::invalid();
        };
        let Some(record) = table.get(index) else {
            return ConCommandRef::invalid();
        };

        let state = record.state.lock();
        if !allow_defensive && state.flags.contains(ConVarFlags::DEFENSIVE) {
            return ConCommandRef::invalid();
        }
        ConCommandRef::new(index, state.registrations)
    }

    /// First variable in registration order
    pub fn first_convar(&self) -> ConVarRef {
        self.convar_at(0)
    }

    /// Variable registered after `prev`, or an invalid handle at the end
    pub fn next_convar(&self, prev: ConVarRef) -> ConVarRef {
        if !prev.is_valid() {
            return ConVarRef::invalid();
        }
        self.convar_at(prev.access_index as usize + 1)
    }

    fn convar_at(&self, index: usize) -> ConVarRef {
        let table = self.convars.read();
        match table.records.get(index) {
            Some(record) => ConVarRef::new(index as u16, record.state.lock().registrations),
            None => ConVarRef::invalid(),
        }
    }

    /// First command in registration order
    pub fn first_command(&self) -> ConCommandRef {
        self.command_at(0)
    }

    /// Command registered after `prev`, or an invalid handle at the end
    pub fn next_command(&self, prev: ConCommandRef) -> ConCommandRef {
        if !prev.is_valid() {
            return ConCommandRef::invalid();
        }
        self.command_at(prev.access_index as usize + 1)
    }

    fn command_at(&self, index: usize) -> ConCommandRef {
        let table = self.commands.read();
        match table.records.get(index) {
            Some(record) => ConCommandRef::new(index as u16, record.state.lock().registrations),
            None => ConCommandRef::invalid(),
        }
    }

    /// Iterate variable handles in registration order
    pub fn iter_convars(&self) -> ConVarIter<'_> {
        ConVarIter::new(self)
    }

    /// Iterate command handles in registration order
    pub fn iter_commands(&self) -> ConCommandIter<'_> {
        ConCommandIter::new(self)
    }

    /// Number of variable records, references included
    pub fn convar_count(&self) -> usize {
        self.convars.read().len()
    }

    /// Number of command records
    pub fn command_count(&self) -> usize {
        self.commands.read().len()
    }

    /// Slot count given to per-user variables
    pub fn max_split_screen_slots(&self) -> usize {
        self.max_split_screen_slots.load(Ordering::Acquire)
    }

    /// Change the per-user slot count, resizing existing per-user variables
    pub fn set_max_split_screen_slots(&self, slots: usize) {
        let slots = slots.max(1);
        self.max_split_screen_slots.store(slots, Ordering::Release);

        let records: Vec<Arc<ConVarRecord>> = self.convars.read().records.clone();
        for record in records {
            record.state.lock().resize_slots(slots);
        }
        tracing::debug!("Max split-screen slots set to {}", slots);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("convars", &self.convar_count())
            .field("commands", &self.command_count())
            .field("max_split_screen_slots", &self.max_split_screen_slots())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandCallback, ConCommandSetup};
    use crate::convars::ConVarSetup;
    use crate::types::Value;
    use cvarkit_sdk::SplitScreenSlot;

    #[test]
    fn test_find_is_case_sensitive() {
        let registry = Registry::default();
        let cvar = registry.register_convar(ConVarSetup::new("sv_gravity", VarType::Int32));

        assert_eq!(registry.find_convar("sv_gravity", false), cvar);
        assert!(!registry.find_convar("SV_GRAVITY", false).is_valid());
        assert!(!registry.find_convar("does_not_exist", false).is_valid());
    }

    #[test]
    fn test_find_filters_defensive() {
        let registry = Registry::default();
        let cvar = registry.register_convar(
            ConVarSetup::new("sv_secret", VarType::Bool).with_flags(ConVarFlags::DEFENSIVE),
        );
        assert!(cvar.is_valid());

        assert!(!registry.find_convar("sv_secret", false).is_valid());
        assert_eq!(registry.find_convar("sv_secret", true), cvar);

        let cmd = registry.register_command(
            ConCommandSetup::new("secret_cmd", CommandCallback::void(|| {}))
                .with_flags(ConVarFlags::DEFENSIVE),
        );
        assert!(!registry.find_command("secret_cmd", false).is_valid());
        assert_eq!(registry.find_command("secret_cmd", true), cmd);
    }

    #[test]
    fn test_first_next_walk() {
        let registry = Registry::default();
        assert!(!registry.first_convar().is_valid());

        let a = registry.register_convar(ConVarSetup::new("a", VarType::Int32));
        let b = registry.register_convar(ConVarSetup::new("b", VarType::Int32));

        let first = registry.first_convar();
        assert_eq!(first, a);
        let second = registry.next_convar(first);
        assert_eq!(second, b);
        assert!(!registry.next_convar(second).is_valid());
        assert!(!registry.next_convar(ConVarRef::invalid()).is_valid());
    }

    #[test]
    fn test_split_screen_resize() {
        let registry = Registry::default();
        let per_user = registry.register_convar(
            ConVarSetup::new("cl_fov", VarType::Float32)
                .with_default(90.0f32)
                .with_flags(ConVarFlags::PER_USER),
        );

        assert!(!registry.set_value(per_user, 70.0f32, SplitScreenSlot::new(1)));

        registry.set_max_split_screen_slots(2);
        assert_eq!(registry.max_split_screen_slots(), 2);
        assert!(registry.set_value(per_user, 70.0f32, SplitScreenSlot::new(1)));
        assert_eq!(
            registry.get_value(per_user, SplitScreenSlot::new(1)),
            Value::Float32(70.0)
        );
        assert_eq!(
            registry.get_value(per_user, SplitScreenSlot::DEFAULT),
            Value::Float32(90.0)
        );
    }

    #[test]
    fn test_invalid_handle_resolves_to_sentinel() {
        let registry = Registry::default();
        let record = registry.convar_record_or_invalid(ConVarRef::invalid(), VarType::Int32);
        assert!(record.sentinel);
        assert_eq!(record.var_type, VarType::Int32);
        assert!(registry.convar_record(ConVarRef::new(42, 1)).is_none());
    }
}
