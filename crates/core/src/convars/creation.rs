//! Variable registration requests
//!
//! [`ConVarSetup`] is the type-erased request the registry consumes.
//! [`ConVarCreation`] is the typed builder most callers use; it converts into
//! a setup with its callbacks wrapped to speak `T` instead of [`Value`].

use std::marker::PhantomData;
use std::sync::Arc;

use cvarkit_sdk::{SplitScreenSlot, VarType};

use super::callbacks::{ChangeCallback, ChangeEvent, FilterCallback};
use super::convar::ConVar;
use super::flags::ConVarFlags;
use crate::registry::Registry;
use crate::types::{ConVarValue, Value};

/// Type-erased variable registration request
#[derive(Clone)]
pub struct ConVarSetup {
    pub(crate) name: String,
    pub(crate) var_type: VarType,
    pub(crate) help: String,
    pub(crate) flags: ConVarFlags,
    pub(crate) default: Option<Value>,
    pub(crate) min: Option<Value>,
    pub(crate) max: Option<Value>,
    pub(crate) on_change: Option<ChangeCallback>,
    pub(crate) on_filter: Option<FilterCallback>,
}

impl ConVarSetup {
    /// Request a variable of the given type with the type's global default
    pub fn new(name: impl Into<String>, var_type: VarType) -> Self {
        Self {
            name: name.into(),
            var_type,
            help: String::new(),
            flags: ConVarFlags::empty(),
            default: None,
            min: None,
            max: None,
            on_change: None,
            on_filter: None,
        }
    }

    /// Request a placeholder record to be filled in by a later registration
    pub fn reference(name: impl Into<String>, var_type: VarType) -> Self {
        Self::new(name, var_type).with_flags(ConVarFlags::REFERENCE)
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Add flags to the request
    pub fn with_flags(mut self, flags: ConVarFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_min(mut self, value: impl Into<Value>) -> Self {
        self.min = Some(value.into());
        self
    }

    pub fn with_max(mut self, value: impl Into<Value>) -> Self {
        self.max = Some(value.into());
        self
    }

    /// Set the change callback (builder pattern)
    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Registry, &ChangeEvent<'_>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Set the filter callback (builder pattern)
    pub fn with_filter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Registry, &ChangeEvent<'_>) -> bool + Send + Sync + 'static,
    {
        self.on_filter = Some(Arc::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    pub fn is_reference(&self) -> bool {
        self.flags.contains(ConVarFlags::REFERENCE)
    }
}

impl std::fmt::Debug for ConVarSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConVarSetup")
            .field("name", &self.name)
            .field("var_type", &self.var_type)
            .field("flags", &self.flags)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

/// A change to a typed variable
#[derive(Debug, Clone)]
pub struct ConVarChange<T> {
    pub cvar: ConVar<T>,
    pub slot: SplitScreenSlot,
    pub new_value: T,
    pub old_value: T,
}

impl<T: ConVarValue> ConVarChange<T> {
    fn from_event(event: &ChangeEvent<'_>) -> Self {
        Self {
            cvar: ConVar::from_ref_unchecked(event.cvar),
            slot: event.slot,
            new_value: T::from_value(event.new_value).unwrap_or_default(),
            old_value: T::from_value(event.old_value).unwrap_or_default(),
        }
    }
}

/// Typed variable registration request
///
/// # Example
///
/// ```ignore
/// use cvarkit_core::convars::{ConVar, ConVarCreation};
///
/// let max_players = ConVar::register(
///     &registry,
///     ConVarCreation::new("sv_max_players", 10, "Max players in queue")
///         .with_min(1)
///         .with_max(64)
///         .with_on_change(|_, change| {
///             tracing::info!("Max players changed: {} -> {}", change.old_value, change.new_value);
///         }),
/// );
/// ```
pub struct ConVarCreation<T> {
    setup: ConVarSetup,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ConVarValue> ConVarCreation<T> {
    /// Create a new registration request
    ///
    /// # Arguments
    /// * `name` - The variable name
    /// * `default` - Default value
    /// * `help` - Help text
    pub fn new(name: impl Into<String>, default: T, help: impl Into<String>) -> Self {
        Self {
            setup: ConVarSetup::new(name, T::VAR_TYPE)
                .with_default(default.into_value())
                .with_help(help),
            _marker: PhantomData,
        }
    }

    /// Set minimum value constraint (builder pattern)
    pub fn with_min(mut self, min: T) -> Self {
        self.setup.min = Some(min.into_value());
        self
    }

    /// Set maximum value constraint (builder pattern)
    pub fn with_max(mut self, max: T) -> Self {
        self.setup.max = Some(max.into_value());
        self
    }

    /// Add flags (builder pattern)
    pub fn with_flags(mut self, flags: ConVarFlags) -> Self {
        self.setup.flags |= flags;
        self
    }

    /// Set change callback (builder pattern)
    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Registry, &ConVarChange<T>) + Send + Sync + 'static,
    {
        self.setup.on_change = Some(Arc::new(move |registry: &Registry, event: &ChangeEvent<'_>| {
            callback(registry, &ConVarChange::from_event(event))
        }));
        self
    }

    /// Set filter callback (builder pattern)
    ///
    /// The filter sees the clamped candidate value; returning `false` drops
    /// the write.
    pub fn with_filter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Registry, &ConVarChange<T>) -> bool + Send + Sync + 'static,
    {
        self.setup.on_filter = Some(Arc::new(move |registry: &Registry, event: &ChangeEvent<'_>| {
            callback(registry, &ConVarChange::from_event(event))
        }));
        self
    }

    /// Erase the value type
    pub fn into_setup(self) -> ConVarSetup {
        self.setup
    }
}

impl<T: ConVarValue> From<ConVarCreation<T>> for ConVarSetup {
    fn from(creation: ConVarCreation<T>) -> Self {
        creation.into_setup()
    }
}
