//! Reading, writing and describing variables through handles
//!
//! Reads never fail: unknown handles resolve to the sentinel record for the
//! requested type and read as its default. Writes report whether they were
//! accepted for dispatch; a filter veto still counts as accepted.

use cvarkit_sdk::{ConVarRef, SplitScreenSlot, VarType};

use super::flags::ConVarFlags;
use super::record::{INVALID_HELP, INVALID_NAME};
use crate::registry::Registry;
use crate::types::{descriptor, ConVarValue, Value};

/// Convert a stored value to another type
///
/// Primitives convert with cast semantics, anything converts to String by
/// formatting, and String converts to anything by parsing.
fn convert(value: &Value, target: VarType) -> Option<Value> {
    if value.var_type() == target {
        return Some(value.clone());
    }
    if let Some(converted) = value.convert_primitive(target) {
        return Some(converted);
    }
    match (value, target) {
        (_, VarType::String) => Some(Value::String(descriptor(value.var_type()).format(value))),
        (Value::String(text), _) => descriptor(target).parse(text).ok(),
        _ => None,
    }
}

impl Registry {
    /// Current value of a slot
    ///
    /// Out-of-range slots read the default. Unknown handles read as an
    /// empty untyped value.
    pub fn get_value(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> Value {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let state = record.state.lock();
        state.value_or_default(slot).clone()
    }

    /// Write a value of exactly the variable's type
    ///
    /// Returns `false` for unknown handles, mismatched types and
    /// out-of-range slots.
    pub fn set_value(&self, cvar: ConVarRef, value: impl Into<Value>, slot: SplitScreenSlot) -> bool {
        self.submit(cvar, value.into(), slot)
    }

    fn submit(&self, cvar: ConVarRef, value: Value, slot: SplitScreenSlot) -> bool {
        let Some(record) = self.convar_record(cvar) else {
            return false;
        };
        if value.var_type() != record.var_type {
            tracing::debug!(
                "Rejecting {} write to {} convar '{}'",
                value.var_type(),
                record.var_type,
                record.name
            );
            return false;
        }
        let Some(index) = record.state.lock().slot_index(slot) else {
            return false;
        };
        self.write_slot(cvar.access_index, &record, index, value);
        true
    }

    /// Read a slot converted to `T`
    ///
    /// Unsupported conversions yield `T::default()`.
    pub fn get_as<T: ConVarValue>(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> T {
        let record = self.convar_record_or_invalid(cvar, T::VAR_TYPE);
        let value = record.state.lock().value_or_default(slot).clone();
        convert(&value, T::VAR_TYPE)
            .and_then(|v| T::from_value(&v))
            .unwrap_or_default()
    }

    /// Write a `T`, converting to the variable's type
    pub fn set_as<T: ConVarValue>(&self, cvar: ConVarRef, value: T, slot: SplitScreenSlot) -> bool {
        let Some(target) = self.convar_record(cvar).map(|r| r.var_type) else {
            return false;
        };
        match convert(&value.into_value(), target) {
            Some(converted) => self.submit(cvar, converted, slot),
            None => false,
        }
    }

    pub fn get_bool(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> bool {
        self.get_as(cvar, slot)
    }

    pub fn get_int(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> i32 {
        self.get_as(cvar, slot)
    }

    pub fn get_float(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> f32 {
        self.get_as(cvar, slot)
    }

    pub fn get_string(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> String {
        self.get_as(cvar, slot)
    }

    pub fn set_bool(&self, cvar: ConVarRef, value: bool, slot: SplitScreenSlot) -> bool {
        self.set_as(cvar, value, slot)
    }

    pub fn set_int(&self, cvar: ConVarRef, value: i32, slot: SplitScreenSlot) -> bool {
        self.set_as(cvar, value, slot)
    }

    pub fn set_float(&self, cvar: ConVarRef, value: f32, slot: SplitScreenSlot) -> bool {
        self.set_as(cvar, value, slot)
    }

    /// Current value formatted as text, `""` for unknown handles
    pub fn get_as_string(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> String {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let state = record.state.lock();
        record.descriptor().format(state.value_or_default(slot))
    }

    /// Parse text and write it
    ///
    /// Returns `false` if the handle is unknown, the slot is out of range or
    /// the text does not parse; the value is left unchanged in that case.
    pub fn set_from_string(&self, cvar: ConVarRef, text: &str, slot: SplitScreenSlot) -> bool {
        let Some(record) = self.convar_record(cvar) else {
            return false;
        };
        match record.descriptor().parse(text) {
            Ok(value) => self.submit(cvar, value, slot),
            Err(e) => {
                tracing::debug!("Ignoring write to convar '{}': {}", record.name, e);
                false
            }
        }
    }

    /// Write the default back into a slot
    pub fn revert(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> bool {
        let Some(default) = self.convar_record(cvar).map(|r| r.state.lock().default.clone()) else {
            return false;
        };
        self.submit(cvar, default, slot)
    }

    pub fn convar_name(&self, cvar: ConVarRef) -> String {
        self.convar_record(cvar)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| INVALID_NAME.to_string())
    }

    pub fn convar_help(&self, cvar: ConVarRef) -> String {
        self.convar_record(cvar)
            .map(|r| r.state.lock().help.clone())
            .unwrap_or_else(|| INVALID_HELP.to_string())
    }

    /// Flags of a variable; unknown handles report `REFERENCE`
    pub fn convar_flags(&self, cvar: ConVarRef) -> ConVarFlags {
        self.convar_record(cvar)
            .map(|r| r.state.lock().flags)
            .unwrap_or(ConVarFlags::REFERENCE)
    }

    pub fn convar_type(&self, cvar: ConVarRef) -> VarType {
        self.convar_record(cvar)
            .map(|r| r.var_type)
            .unwrap_or(VarType::Invalid)
    }

    pub fn type_name(&self, cvar: ConVarRef) -> &'static str {
        self.convar_type(cvar).name()
    }

    /// Set additional flags; the dispatch marker cannot be set this way
    pub fn add_flags(&self, cvar: ConVarRef, flags: ConVarFlags) {
        if let Some(record) = self.convar_record(cvar) {
            record.state.lock().flags |= flags - ConVarFlags::PERFORMING_CALLBACKS;
        }
    }

    /// Clear flags; the dispatch marker cannot be cleared this way
    pub fn remove_flags(&self, cvar: ConVarRef, flags: ConVarFlags) {
        if let Some(record) = self.convar_record(cvar) {
            record.state.lock().flags -= flags - ConVarFlags::PERFORMING_CALLBACKS;
        }
    }

    pub fn should_be_hidden(&self, cvar: ConVarRef) -> bool {
        self.convar_flags(cvar).should_be_hidden()
    }

    /// Number of accepted writes since registration
    pub fn times_changed(&self, cvar: ConVarRef) -> u32 {
        self.convar_record(cvar)
            .map(|r| r.state.lock().times_changed)
            .unwrap_or(0)
    }

    pub fn default_value(&self, cvar: ConVarRef) -> Value {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let default = record.state.lock().default.clone();
        default
    }

    pub fn min_value(&self, cvar: ConVarRef) -> Option<Value> {
        self.convar_record(cvar)
            .and_then(|r| r.state.lock().min.clone())
    }

    pub fn max_value(&self, cvar: ConVarRef) -> Option<Value> {
        self.convar_record(cvar)
            .and_then(|r| r.state.lock().max.clone())
    }

    /// Set the lower bound; ignored unless the value has the variable's type
    ///
    /// Stored values are clamped on their next write, not immediately.
    pub fn set_min(&self, cvar: ConVarRef, value: impl Into<Value>) -> bool {
        let value = value.into();
        match self.convar_record(cvar) {
            Some(record) if record.var_type == value.var_type() => {
                record.state.lock().min = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Set the upper bound; ignored unless the value has the variable's type
    pub fn set_max(&self, cvar: ConVarRef, value: impl Into<Value>) -> bool {
        let value = value.into();
        match self.convar_record(cvar) {
            Some(record) if record.var_type == value.var_type() => {
                record.state.lock().max = Some(value);
                true
            }
            _ => false,
        }
    }

    pub fn remove_min(&self, cvar: ConVarRef) {
        if let Some(record) = self.convar_record(cvar) {
            record.state.lock().min = None;
        }
    }

    pub fn remove_max(&self, cvar: ConVarRef) {
        if let Some(record) = self.convar_record(cvar) {
            record.state.lock().max = None;
        }
    }

    pub fn default_as_string(&self, cvar: ConVarRef) -> String {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let state = record.state.lock();
        record.descriptor().format(&state.default)
    }

    pub fn min_as_string(&self, cvar: ConVarRef) -> Option<String> {
        let record = self.convar_record(cvar)?;
        let state = record.state.lock();
        state.min.as_ref().map(|v| record.descriptor().format(v))
    }

    pub fn max_as_string(&self, cvar: ConVarRef) -> Option<String> {
        let record = self.convar_record(cvar)?;
        let state = record.state.lock();
        state.max.as_ref().map(|v| record.descriptor().format(v))
    }

    /// Replace the default from text; current values are not touched
    pub fn update_default_from_string(&self, cvar: ConVarRef, text: &str) -> bool {
        let Some(record) = self.convar_record(cvar) else {
            return false;
        };
        match record.descriptor().parse(text) {
            Ok(value) => {
                record.state.lock().default = value;
                true
            }
            Err(e) => {
                tracing::debug!("Ignoring default for convar '{}': {}", record.name, e);
                false
            }
        }
    }

    pub fn is_set_to_default(&self, cvar: ConVarRef, slot: SplitScreenSlot) -> bool {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let state = record.state.lock();
        record
            .descriptor()
            .equal(state.value_or_default(slot), &state.default)
    }

    /// Whether every slot holds the default
    pub fn is_all_set_to_default(&self, cvar: ConVarRef) -> bool {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let state = record.state.lock();
        let desc = record.descriptor();
        state.values.iter().all(|v| desc.equal(v, &state.default))
    }

    /// One-line description: value, default if changed, bounds, flags, help
    ///
    /// ```text
    /// "sv_gravity" = "400" ( def. "800" ) min. 0 replicated - World gravity
    /// ```
    pub fn describe_convar(&self, cvar: ConVarRef) -> String {
        let record = self.convar_record_or_invalid(cvar, VarType::Invalid);
        let desc = record.descriptor();
        let state = record.state.lock();

        let value = state.value_or_default(SplitScreenSlot::DEFAULT);
        let mut line = format!("\"{}\" = \"{}\"", record.name, desc.format(value));
        if !desc.equal(value, &state.default) {
            line.push_str(&format!(" ( def. \"{}\" )", desc.format(&state.default)));
        }
        if let Some(min) = &state.min {
            line.push_str(&format!(" min. {}", desc.format(min)));
        }
        if let Some(max) = &state.max {
            line.push_str(&format!(" max. {}", desc.format(max)));
        }
        let flag_names = state.flags.display_names();
        if !flag_names.is_empty() {
            line.push(' ');
            line.push_str(&flag_names);
        }
        if !state.help.is_empty() {
            line.push_str(" - ");
            line.push_str(&state.help);
        }
        line
    }
}
