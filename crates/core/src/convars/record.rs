//! Variable records and the invalid-record sentinels

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use cvarkit_sdk::{SplitScreenSlot, VarType};

use super::callbacks::{ChangeCallbackKey, FilterCallbackKey};
use super::flags::ConVarFlags;
use crate::types::{descriptor, TypeDescriptor, Value};

/// Name reported by sentinel records
pub const INVALID_NAME: &str = "<undefined>";

/// Help text reported by sentinel records
pub const INVALID_HELP: &str = "This convar is being accessed prior to registration";

/// A write deferred while the record is dispatching callbacks
#[derive(Debug, Clone)]
pub(crate) struct PendingMutation {
    pub slot: usize,
    pub value: Value,
}

/// A registered variable
///
/// Name and type never change once the record exists.
pub(crate) struct ConVarRecord {
    pub name: String,
    pub var_type: VarType,
    /// Sentinels absorb writes and always read as their default
    pub sentinel: bool,
    pub state: Mutex<ConVarState>,
}

/// Mutable part of a variable record
pub(crate) struct ConVarState {
    pub help: String,
    pub flags: ConVarFlags,
    pub default: Value,
    pub min: Option<Value>,
    pub max: Option<Value>,
    /// One value per slot
    pub values: Vec<Value>,
    pub times_changed: u32,
    /// Highest registration index handed out for this name
    pub registrations: i32,
    pub change_callbacks: Vec<ChangeCallbackKey>,
    pub filter_callbacks: Vec<FilterCallbackKey>,
    pub pending: VecDeque<PendingMutation>,
}

/// Everything needed to create or upgrade a record
pub(crate) struct RecordInit {
    pub help: String,
    pub flags: ConVarFlags,
    pub default: Value,
    pub min: Option<Value>,
    pub max: Option<Value>,
}

impl ConVarRecord {
    pub fn new(name: &str, var_type: VarType, init: RecordInit, slots: usize) -> Self {
        let mut state = ConVarState {
            help: String::new(),
            flags: ConVarFlags::empty(),
            default: descriptor(var_type).construct(),
            min: None,
            max: None,
            values: Vec::new(),
            times_changed: 0,
            registrations: 0,
            change_callbacks: Vec::new(),
            filter_callbacks: Vec::new(),
            pending: VecDeque::new(),
        };
        state.apply_init(init, slots);

        Self {
            name: name.to_string(),
            var_type,
            sentinel: false,
            state: Mutex::new(state),
        }
    }

    fn sentinel(var_type: VarType) -> Self {
        let desc = descriptor(var_type);
        let init = RecordInit {
            help: INVALID_HELP.to_string(),
            flags: ConVarFlags::REFERENCE,
            default: desc.construct(),
            min: None,
            max: None,
        };
        let mut record = Self::new(INVALID_NAME, var_type, init, 1);
        record.sentinel = true;
        record
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        descriptor(self.var_type)
    }
}

impl ConVarState {
    /// Replace metadata and reset every slot to the new default
    ///
    /// The dispatch marker survives, so an upgrade made from inside a
    /// callback keeps later writes queued.
    pub fn apply_init(&mut self, init: RecordInit, slots: usize) {
        let slot_count = if init.flags.contains(ConVarFlags::PER_USER) {
            slots.max(1)
        } else {
            1
        };
        self.help = init.help;
        let marker = self.flags & ConVarFlags::PERFORMING_CALLBACKS;
        self.flags = (init.flags - ConVarFlags::PERFORMING_CALLBACKS) | marker;
        self.values = vec![init.default.clone(); slot_count];
        self.default = init.default;
        self.min = init.min;
        self.max = init.max;
    }

    /// Index into `values` for a slot, if in range
    pub fn slot_index(&self, slot: SplitScreenSlot) -> Option<usize> {
        slot.resolve().filter(|i| *i < self.values.len())
    }

    /// Value of a slot, falling back to the default when out of range
    pub fn value_or_default(&self, slot: SplitScreenSlot) -> &Value {
        self.slot_index(slot)
            .map(|i| &self.values[i])
            .unwrap_or(&self.default)
    }

    pub fn is_dispatching(&self) -> bool {
        self.flags.contains(ConVarFlags::PERFORMING_CALLBACKS)
    }

    /// Grow or shrink per-user storage; new slots start at the default
    pub fn resize_slots(&mut self, slots: usize) {
        if self.flags.contains(ConVarFlags::PER_USER) {
            let default = self.default.clone();
            self.values.resize(slots.max(1), default);
        }
    }

    /// Clamp a candidate value against this record's bounds
    pub fn clamp(&self, desc: &TypeDescriptor, value: &mut Value) {
        desc.clamp(value, self.min.as_ref(), self.max.as_ref());
    }
}

/// One sentinel per concrete type, plus one for `VarType::Invalid` at the end
static SENTINELS: LazyLock<Vec<Arc<ConVarRecord>>> = LazyLock::new(|| {
    VarType::ALL
        .iter()
        .copied()
        .chain(std::iter::once(VarType::Invalid))
        .map(|ty| Arc::new(ConVarRecord::sentinel(ty)))
        .collect()
});

/// Shared sentinel record for a type
pub(crate) fn invalid_record(var_type: VarType) -> Arc<ConVarRecord> {
    let index = var_type.index().unwrap_or(VarType::COUNT);
    Arc::clone(&SENTINELS[index])
}
