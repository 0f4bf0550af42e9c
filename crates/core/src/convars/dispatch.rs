//! Value writes and callback dispatch
//!
//! A record is either idle or dispatching. The `PERFORMING_CALLBACKS` flag
//! marks the dispatching state: writes that arrive while it is set, from a
//! callback or another thread, are queued on the record and applied in FIFO
//! order by the dispatching caller once the current write and its callbacks
//! have returned. No lock is held while callbacks run.

use std::sync::Arc;

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use super::callbacks::{
    ChangeCallback, ChangeEvent, FilterCallback, GlobalChangeEvent, GlobalChangeKey,
};
use super::flags::ConVarFlags;
use super::record::{ConVarRecord, PendingMutation};
use crate::registry::Registry;
use crate::types::Value;

/// Clears the dispatching state if a callback unwinds
struct DispatchGuard<'a> {
    record: &'a ConVarRecord,
    armed: bool,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.record.state.lock();
            state.flags.remove(ConVarFlags::PERFORMING_CALLBACKS);
            state.pending.clear();
            tracing::warn!(
                "Dispatch for convar '{}' unwound, dropped queued writes",
                self.record.name
            );
        }
    }
}

impl Registry {
    /// Install a callback that observes every variable change
    ///
    /// Global callbacks run after the variable's own change callbacks, in
    /// installation order.
    pub fn install_global_change_callback<F>(&self, callback: F) -> GlobalChangeKey
    where
        F: Fn(&Registry, &GlobalChangeEvent<'_>) + Send + Sync + 'static,
    {
        self.callbacks.write().install_global(Arc::new(callback))
    }

    /// Remove a global change callback
    pub fn remove_global_change_callback(&self, key: GlobalChangeKey) -> bool {
        self.callbacks.write().remove_global(key)
    }

    /// Write a value to a resolved slot, or queue it if the record is busy
    pub(crate) fn write_slot(&self, index: u16, record: &ConVarRecord, slot: usize, value: Value) {
        {
            let mut state = record.state.lock();
            if state.is_dispatching() {
                tracing::trace!("Deferring write to '{}' slot {}", record.name, slot);
                state.pending.push_back(PendingMutation { slot, value });
                return;
            }
            state.flags.insert(ConVarFlags::PERFORMING_CALLBACKS);
        }

        let mut guard = DispatchGuard {
            record,
            armed: true,
        };

        self.apply_mutation(index, record, slot, value);

        loop {
            let next = {
                let mut state = record.state.lock();
                match state.pending.pop_front() {
                    Some(mutation) => mutation,
                    None => {
                        state.flags.remove(ConVarFlags::PERFORMING_CALLBACKS);
                        break;
                    }
                }
            };
            self.apply_mutation(index, record, next.slot, next.value);
        }

        guard.armed = false;
    }

    /// Clamp, filter, commit and notify for a single write
    fn apply_mutation(&self, index: u16, record: &ConVarRecord, slot: usize, value: Value) {
        let desc = record.descriptor();

        let (candidate, old, registrations, filter_keys, change_keys) = {
            let state = record.state.lock();
            let Some(old) = state.values.get(slot).cloned() else {
                return;
            };
            let mut candidate = value;
            state.clamp(desc, &mut candidate);
            (
                candidate,
                old,
                state.registrations,
                state.filter_callbacks.clone(),
                state.change_callbacks.clone(),
            )
        };

        let (filters, changes): (Vec<(i32, FilterCallback)>, Vec<(i32, ChangeCallback)>) = {
            let tables = self.callbacks.read();
            (
                filter_keys
                    .iter()
                    .filter_map(|k| tables.filter.get(*k))
                    .map(|o| (o.registration, o.callback.clone()))
                    .collect(),
                change_keys
                    .iter()
                    .filter_map(|k| tables.change.get(*k))
                    .map(|o| (o.registration, o.callback.clone()))
                    .collect(),
            )
        };

        let slot_id = SplitScreenSlot::new(slot as i32);
        for (registration, filter) in filters {
            let event = ChangeEvent {
                cvar: ConVarRef::new(index, registration),
                slot: slot_id,
                new_value: &candidate,
                old_value: &old,
            };
            if !filter(self, &event) {
                tracing::debug!("Write to convar '{}' rejected by filter", record.name);
                return;
            }
        }

        {
            let mut state = record.state.lock();
            let Some(cell) = state.values.get_mut(slot) else {
                return;
            };
            desc.copy(cell, &candidate);
            state.times_changed = state.times_changed.wrapping_add(1);
        }

        if desc.equal(&old, &candidate) {
            return;
        }

        for (registration, callback) in changes {
            let event = ChangeEvent {
                cvar: ConVarRef::new(index, registration),
                slot: slot_id,
                new_value: &candidate,
                old_value: &old,
            };
            callback(self, &event);
        }

        let globals = self.callbacks.read().globals();
        if globals.is_empty() {
            return;
        }
        let new_text = desc.format(&candidate);
        let old_text = desc.format(&old);
        let event = GlobalChangeEvent {
            cvar: ConVarRef::new(index, registrations),
            slot: slot_id,
            name: &record.name,
            new_value: &new_text,
            old_value: &old_text,
        };
        for callback in globals {
            callback(self, &event);
        }
    }
}
