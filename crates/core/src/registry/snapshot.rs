//! Value snapshots
//!
//! A snapshot copies every slot of every real variable. Restoring writes the
//! saved values back through the normal set path, so clamping, filters and
//! change callbacks all apply.

use slotmap::new_key_type;

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use super::Registry;
use crate::convars::flags::ConVarFlags;
use crate::types::Value;

new_key_type! {
    /// Key for a stored snapshot
    pub struct SnapshotKey;
}

pub(crate) struct Snapshot {
    entries: Vec<(ConVarRef, Vec<Value>)>,
}

impl Registry {
    /// Save the current value of every variable
    pub fn take_snapshot(&self) -> SnapshotKey {
        let entries: Vec<(ConVarRef, Vec<Value>)> = {
            let table = self.convars.read();
            table
                .records
                .iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    let state = record.state.lock();
                    if state.flags.contains(ConVarFlags::REFERENCE) {
                        return None;
                    }
                    Some((
                        ConVarRef::new(index as u16, state.registrations),
                        state.values.clone(),
                    ))
                })
                .collect()
        };

        tracing::debug!("Took snapshot of {} convar(s)", entries.len());
        self.snapshots.lock().insert(Snapshot { entries })
    }

    /// Write a snapshot's values back
    ///
    /// Returns `false` if the snapshot does not exist. The snapshot is kept
    /// and may be restored again.
    pub fn restore_snapshot(&self, key: SnapshotKey) -> bool {
        let Some(entries) = self.snapshots.lock().get(key).map(|s| s.entries.clone()) else {
            return false;
        };

        for (cvar, values) in entries {
            for (slot, value) in values.into_iter().enumerate() {
                self.set_value(cvar, value, SplitScreenSlot::new(slot as i32));
            }
        }
        true
    }

    /// Discard a snapshot
    pub fn destroy_snapshot(&self, key: SnapshotKey) -> bool {
        self.snapshots.lock().remove(key).is_some()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use cvarkit_sdk::VarType;

    use super::*;
    use crate::convars::ConVarSetup;

    #[test]
    fn test_snapshot_restore() {
        let registry = Registry::default();
        let a = registry.register_convar(ConVarSetup::new("a", VarType::Int32).with_default(1i32));
        let b = registry.register_convar(ConVarSetup::new("b", VarType::String).with_default("x"));

        let key = registry.take_snapshot();
        registry.set_int(a, 5, SplitScreenSlot::DEFAULT);
        registry.set_value(b, "changed", SplitScreenSlot::DEFAULT);

        assert!(registry.restore_snapshot(key));
        assert_eq!(registry.get_int(a, SplitScreenSlot::DEFAULT), 1);
        assert_eq!(registry.get_string(b, SplitScreenSlot::DEFAULT), "x");

        // Reusable until destroyed
        registry.set_int(a, 9, SplitScreenSlot::DEFAULT);
        assert!(registry.restore_snapshot(key));
        assert_eq!(registry.get_int(a, SplitScreenSlot::DEFAULT), 1);

        assert!(registry.destroy_snapshot(key));
        assert!(!registry.destroy_snapshot(key));
        assert!(!registry.restore_snapshot(key));
        assert_eq!(registry.snapshot_count(), 0);
    }

    #[test]
    fn test_restore_notifies_only_changed() {
        let registry = Registry::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let a = registry.register_convar(
            ConVarSetup::new("a", VarType::Int32).with_on_change(move |_, _| {
                h.fetch_add(1, Ordering::SeqCst);
            }),
        );
        registry.register_convar(ConVarSetup::new("b", VarType::Int32));

        let key = registry.take_snapshot();
        registry.restore_snapshot(key);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        registry.set_int(a, 3, SplitScreenSlot::DEFAULT);
        registry.restore_snapshot(key);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshot_skips_references() {
        let registry = Registry::default();
        registry.register_convar(ConVarSetup::reference("later", VarType::Int32));
        let key = registry.take_snapshot();
        let entries = registry.snapshots.lock().get(key).map(|s| s.entries.len());
        assert_eq!(entries, Some(0));
    }
}
