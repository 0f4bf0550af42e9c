//! Registration and callback (un)linking

use std::sync::Arc;

use cvarkit_sdk::{ConCommandRef, ConVarRef, VarType};

use super::Registry;
use crate::commands::{CommandCallbackEntry, ConCommandRecord, ConCommandSetup};
use crate::convars::callbacks::{
    ChangeCallback, ChangeCallbackKey, ChangeEvent, FilterCallback, FilterCallbackKey, Owned,
};
use crate::convars::flags::ConVarFlags;
use crate::convars::record::{ConVarRecord, RecordInit};
use crate::convars::ConVarSetup;
use crate::error::{RegistryError, RegistryResult};
use crate::types::{descriptor, Value};

/// Longest accepted name, in bytes
pub const MAX_NAME_LENGTH: usize = 255;

/// Check that a name can be addressed from a console line
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | ';'))
}

fn validate_name(name: &str) -> RegistryResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

/// Keep a bound only if it has the record's type
fn typed_bound(name: &str, what: &str, value: Option<Value>, var_type: VarType) -> Option<Value> {
    match value {
        Some(v) if v.var_type() == var_type => Some(v),
        Some(v) => {
            tracing::warn!(
                "Ignoring {} for '{}': expected {}, got {}",
                what,
                name,
                var_type,
                v.var_type()
            );
            None
        }
        None => None,
    }
}

impl Registry {
    /// Flags after applying configured registration flags and sanitising
    fn effective_flags(&self, flags: ConVarFlags) -> ConVarFlags {
        let flags = flags | ConVarFlags::from_bits_retain(self.config().registration_flags);
        if self.config().sanitize_flags {
            flags.sanitized()
        } else {
            flags
        }
    }

    /// Register a variable
    ///
    /// Returns an invalid handle if the name is malformed or already used by
    /// a command or a variable of another type.
    pub fn register_convar(&self, setup: impl Into<ConVarSetup>) -> ConVarRef {
        let setup = setup.into();
        let name = setup.name.clone();
        match self.try_register_convar(setup) {
            Ok(cvar) => cvar,
            Err(e) => {
                tracing::warn!("Failed to register convar '{}': {}", name, e);
                ConVarRef::invalid()
            }
        }
    }

    /// Register a variable, reporting why it failed
    ///
    /// Registering a name that already holds a variable of the same type
    /// reuses that record: a reference placeholder is upgraded in place,
    /// a real variable keeps its value and gains the new callbacks.
    pub fn try_register_convar(&self, setup: impl Into<ConVarSetup>) -> RegistryResult<ConVarRef> {
        let ConVarSetup {
            name,
            var_type,
            help,
            flags,
            default,
            min,
            max,
            on_change,
            on_filter,
        } = setup.into();

        validate_name(&name)?;
        if var_type == VarType::Invalid {
            return Err(RegistryError::InvalidType(name));
        }

        let is_reference = flags.contains(ConVarFlags::REFERENCE);
        let flags = if is_reference {
            flags
        } else {
            self.effective_flags(flags)
        };
        let init = RecordInit {
            help,
            flags,
            default: typed_bound(&name, "default", default, var_type)
                .unwrap_or_else(|| descriptor(var_type).construct()),
            min: typed_bound(&name, "min", min, var_type),
            max: typed_bound(&name, "max", max, var_type),
        };
        let slots = self.max_split_screen_slots();

        let (cvar, created) = {
            // Lock order: variable table, then command table
            let mut table = self.convars.write();
            if self.commands.read().index_of(&name).is_some() {
                return Err(RegistryError::NameCollision {
                    name,
                    existing: "command",
                });
            }
            match table.index_of(&name) {
                Some(index) => {
                    let record = Arc::clone(&table.records[index as usize]);
                    drop(table);

                    if record.var_type != var_type {
                        return Err(RegistryError::TypeMismatch {
                            name,
                            existing: record.var_type,
                            requested: var_type,
                        });
                    }

                    let mut state = record.state.lock();
                    if is_reference {
                        (ConVarRef::new(index, state.registrations), false)
                    } else {
                        let upgraded = state.flags.contains(ConVarFlags::REFERENCE);
                        if upgraded {
                            state.apply_init(init, slots);
                        }
                        state.registrations += 1;
                        (ConVarRef::new(index, state.registrations), upgraded)
                    }
                }
                None => {
                    let mut record = ConVarRecord::new(&name, var_type, init, slots);
                    let registration = if is_reference { 0 } else { 1 };
                    record.state.get_mut().registrations = registration;
                    let index = table
                        .push(&name, record)
                        .ok_or_else(|| RegistryError::TableFull(name.clone()))?;
                    (ConVarRef::new(index, registration), !is_reference)
                }
            }
        };

        if let Some(callback) = on_change {
            self.attach_change_callback(cvar, callback);
        }
        if let Some(callback) = on_filter {
            self.attach_filter_callback(cvar, callback);
        }

        tracing::debug!(
            "Registered convar: {} ({}, index {}, registration {})",
            name,
            var_type,
            cvar.access_index,
            cvar.registered_index
        );
        if created {
            self.fire_convar_created(cvar);
        }
        Ok(cvar)
    }

    /// Register a command
    ///
    /// Returns an invalid handle if the name is malformed, used by a
    /// variable, or held by a live command without linked chaining.
    pub fn register_command(&self, setup: ConCommandSetup) -> ConCommandRef {
        let name = setup.name.clone();
        match self.try_register_command(setup) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::warn!("Failed to register command '{}': {}", name, e);
                ConCommandRef::invalid()
            }
        }
    }

    /// Register a command, reporting why it failed
    ///
    /// When both the existing and the new registration carry
    /// `LINKED_CONCOMMAND`, the callbacks chain and all run on dispatch.
    pub fn try_register_command(&self, setup: ConCommandSetup) -> RegistryResult<ConCommandRef> {
        let ConCommandSetup {
            name,
            help,
            flags,
            callback,
            completion,
        } = setup;

        validate_name(&name)?;
        let flags = self.effective_flags(flags);

        let (cmd, created) = {
            // Lock order: variable table, then command table
            let convars = self.convars.read();
            if convars.index_of(&name).is_some() {
                return Err(RegistryError::NameCollision {
                    name,
                    existing: "variable",
                });
            }
            let mut table = self.commands.write();
            match table.index_of(&name) {
                Some(index) => {
                    let record = Arc::clone(&table.records[index as usize]);
                    drop(table);
                    drop(convars);

                    let mut state = record.state.lock();
                    if !state.callbacks.is_empty() {
                        let linked = state.flags.contains(ConVarFlags::LINKED_CONCOMMAND)
                            && flags.contains(ConVarFlags::LINKED_CONCOMMAND);
                        if !linked {
                            return Err(RegistryError::DuplicateCommand(name));
                        }
                    } else {
                        state.help = help;
                        state.flags = flags;
                    }

                    state.registrations += 1;
                    let registration = state.registrations;
                    state.callbacks.push(CommandCallbackEntry {
                        registration,
                        callback,
                    });
                    if let Some(completion) = completion {
                        state.completion = Some((registration, completion));
                    }
                    (ConCommandRef::new(index, registration), false)
                }
                None => {
                    let record = ConCommandRecord::new(&name, help, flags, callback, completion);
                    let index = table
                        .push(&name, record)
                        .ok_or_else(|| RegistryError::TableFull(name.clone()))?;
                    (ConCommandRef::new(index, 1), true)
                }
            }
        };

        tracing::debug!("Registered command: {}", name);
        if created {
            self.fire_command_created(cmd);
        }
        Ok(cmd)
    }

    /// Install a change callback owned by the handle's registration
    ///
    /// Returns `None` for handles that do not address a variable.
    pub fn add_change_callback<F>(&self, cvar: ConVarRef, callback: F) -> Option<ChangeCallbackKey>
    where
        F: Fn(&Registry, &ChangeEvent<'_>) + Send + Sync + 'static,
    {
        self.attach_change_callback(cvar, Arc::new(callback))
    }

    /// Install a filter callback owned by the handle's registration
    pub fn add_filter_callback<F>(&self, cvar: ConVarRef, callback: F) -> Option<FilterCallbackKey>
    where
        F: Fn(&Registry, &ChangeEvent<'_>) -> bool + Send + Sync + 'static,
    {
        self.attach_filter_callback(cvar, Arc::new(callback))
    }

    fn attach_change_callback(
        &self,
        cvar: ConVarRef,
        callback: ChangeCallback,
    ) -> Option<ChangeCallbackKey> {
        let record = self.convar_record(cvar)?;
        let key = self.callbacks.write().change.insert(Owned {
            access_index: cvar.access_index,
            registration: cvar.registered_index,
            callback,
        });
        record.state.lock().change_callbacks.push(key);
        Some(key)
    }

    fn attach_filter_callback(
        &self,
        cvar: ConVarRef,
        callback: FilterCallback,
    ) -> Option<FilterCallbackKey> {
        let record = self.convar_record(cvar)?;
        let key = self.callbacks.write().filter.insert(Owned {
            access_index: cvar.access_index,
            registration: cvar.registered_index,
            callback,
        });
        record.state.lock().filter_callbacks.push(key);
        Some(key)
    }

    /// Remove a single change callback
    pub fn remove_change_callback(&self, key: ChangeCallbackKey) -> bool {
        let Some(owned) = self.callbacks.write().change.remove(key) else {
            return false;
        };
        if let Some(record) = self.convar_record(ConVarRef::new(owned.access_index, 0)) {
            record.state.lock().change_callbacks.retain(|k| *k != key);
        }
        true
    }

    /// Remove a single filter callback
    pub fn remove_filter_callback(&self, key: FilterCallbackKey) -> bool {
        let Some(owned) = self.callbacks.write().filter.remove(key) else {
            return false;
        };
        if let Some(record) = self.convar_record(ConVarRef::new(owned.access_index, 0)) {
            record.state.lock().filter_callbacks.retain(|k| *k != key);
        }
        true
    }

    /// Detach every callback installed by this handle's registration
    ///
    /// The record stays registered; its value and other registrations'
    /// callbacks are untouched. Returns the number of callbacks removed.
    pub fn unregister_convar_callbacks(&self, cvar: ConVarRef) -> usize {
        let Some(record) = self.convar_record(cvar) else {
            return 0;
        };

        let (change_keys, filter_keys) = {
            let state = record.state.lock();
            (state.change_callbacks.clone(), state.filter_callbacks.clone())
        };

        let (removed_change, removed_filter) = {
            let mut tables = self.callbacks.write();
            let removed_change: Vec<ChangeCallbackKey> = change_keys
                .into_iter()
                .filter(|key| {
                    tables
                        .change
                        .get(*key)
                        .is_some_and(|o| o.registration == cvar.registered_index)
                })
                .collect();
            for key in &removed_change {
                tables.change.remove(*key);
            }

            let removed_filter: Vec<FilterCallbackKey> = filter_keys
                .into_iter()
                .filter(|key| {
                    tables
                        .filter
                        .get(*key)
                        .is_some_and(|o| o.registration == cvar.registered_index)
                })
                .collect();
            for key in &removed_filter {
                tables.filter.remove(*key);
            }
            (removed_change, removed_filter)
        };

        let mut state = record.state.lock();
        state.change_callbacks.retain(|k| !removed_change.contains(k));
        state.filter_callbacks.retain(|k| !removed_filter.contains(k));

        let removed = removed_change.len() + removed_filter.len();
        tracing::debug!(
            "Unregistered {} callback(s) from convar: {}",
            removed,
            record.name
        );
        removed
    }

    /// Detach the callbacks installed by this handle's registration
    ///
    /// The command stays registered. Once no callbacks remain, dispatch is a
    /// no-op and the name may be registered again.
    pub fn unregister_command_callbacks(&self, cmd: ConCommandRef) -> usize {
        let Some(record) = self.command_record(cmd) else {
            return 0;
        };

        let mut state = record.state.lock();
        let before = state.callbacks.len();
        state
            .callbacks
            .retain(|entry| entry.registration != cmd.registered_index);
        if state
            .completion
            .as_ref()
            .is_some_and(|(registration, _)| *registration == cmd.registered_index)
        {
            state.completion = None;
        }

        let removed = before - state.callbacks.len();
        tracing::debug!("Unregistered {} callback(s) from command: {}", removed, record.name);
        removed
    }
}
