//! Change, filter and global callback storage
//!
//! Callbacks live in slot maps owned by the registry. Records only hold the
//! keys, so a callback can be detached without touching the record.

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use crate::registry::Registry;
use crate::types::Value;

new_key_type! {
    /// Key for a per-variable change callback
    pub struct ChangeCallbackKey;
    /// Key for a per-variable filter callback
    pub struct FilterCallbackKey;
    /// Key for a globally installed change callback
    pub struct GlobalChangeKey;
}

/// A write to a single variable slot, as seen by its callbacks
#[derive(Debug)]
pub struct ChangeEvent<'a> {
    /// Variable being written, tagged with the callback's registration
    pub cvar: ConVarRef,
    /// Slot being written
    pub slot: SplitScreenSlot,
    /// Value after clamping
    pub new_value: &'a Value,
    /// Value before the write
    pub old_value: &'a Value,
}

/// A change notification delivered to global callbacks, in text form
#[derive(Debug)]
pub struct GlobalChangeEvent<'a> {
    pub cvar: ConVarRef,
    pub slot: SplitScreenSlot,
    pub name: &'a str,
    pub new_value: &'a str,
    pub old_value: &'a str,
}

/// Called after a variable's value changed
pub type ChangeCallback = Arc<dyn Fn(&Registry, &ChangeEvent<'_>) + Send + Sync>;

/// Called before a write lands; returning `false` vetoes it
pub type FilterCallback = Arc<dyn Fn(&Registry, &ChangeEvent<'_>) -> bool + Send + Sync>;

/// Called after any variable changed
pub type GlobalChangeCallback = Arc<dyn Fn(&Registry, &GlobalChangeEvent<'_>) + Send + Sync>;

/// A callback tagged with the registration that installed it
pub(crate) struct Owned<C> {
    /// Record the callback is attached to
    pub access_index: u16,
    pub registration: i32,
    pub callback: C,
}

/// All installed callbacks
#[derive(Default)]
pub(crate) struct CallbackTables {
    pub change: SlotMap<ChangeCallbackKey, Owned<ChangeCallback>>,
    pub filter: SlotMap<FilterCallbackKey, Owned<FilterCallback>>,
    pub global: SlotMap<GlobalChangeKey, GlobalChangeCallback>,
    /// Installation order of global callbacks
    pub global_order: Vec<GlobalChangeKey>,
}

impl CallbackTables {
    pub fn install_global(&mut self, callback: GlobalChangeCallback) -> GlobalChangeKey {
        let key = self.global.insert(callback);
        self.global_order.push(key);
        key
    }

    pub fn remove_global(&mut self, key: GlobalChangeKey) -> bool {
        if self.global.remove(key).is_some() {
            self.global_order.retain(|k| *k != key);
            true
        } else {
            false
        }
    }

    /// Global callbacks in installation order
    pub fn globals(&self) -> Vec<GlobalChangeCallback> {
        self.global_order
            .iter()
            .filter_map(|key| self.global.get(*key).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_order_survives_removal() {
        let mut tables = CallbackTables::default();
        let a = tables.install_global(Arc::new(|_, _| {}));
        let b = tables.install_global(Arc::new(|_, _| {}));
        let c = tables.install_global(Arc::new(|_, _| {}));

        assert!(tables.remove_global(b));
        assert!(!tables.remove_global(b));
        assert_eq!(tables.global_order, vec![a, c]);
        assert_eq!(tables.globals().len(), 2);
    }
}
