//! Typed variable handle
//!
//! [`ConVar<T>`] is a [`ConVarRef`] plus a type marker. The type is checked
//! once, when the handle is built from a name or an untyped handle; after
//! that reads and writes go straight to the registry.

use std::marker::PhantomData;

use cvarkit_sdk::{ConVarRef, SplitScreenSlot};

use super::creation::ConVarCreation;
use super::ConVarSetup;
use crate::error::QueueError;
use crate::registry::Registry;
use crate::types::ConVarValue;

/// Typed handle to a registered variable
///
/// # Example
/// ```ignore
/// use cvarkit_core::convars::{ConVar, ConVarCreation};
///
/// let cheats = ConVar::register(&registry, ConVarCreation::new("sv_cheats", false, "Allow cheats"));
/// if cheats.get(&registry) {
///     tracing::warn!("Cheats are enabled!");
/// }
/// ```
pub struct ConVar<T> {
    cvar_ref: ConVarRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ConVarValue> ConVar<T> {
    /// Register a variable and wrap its handle
    pub fn register(registry: &Registry, creation: ConVarCreation<T>) -> Self {
        Self::from_ref_unchecked(registry.register_convar(creation))
    }

    /// Look up an existing variable of type `T`
    ///
    /// Returns `None` if the name is unknown or holds another type.
    pub fn find(registry: &Registry, name: &str) -> Option<Self> {
        Self::from_ref(registry, registry.find_convar(name, false))
    }

    /// Reference a variable that may be registered later
    ///
    /// Reads return the default until the real registration arrives; the
    /// handle stays valid across that upgrade.
    pub fn reference(registry: &Registry, name: &str) -> Self {
        Self::from_ref_unchecked(registry.register_convar(ConVarSetup::reference(name, T::VAR_TYPE)))
    }

    /// Wrap an untyped handle after checking its type
    pub fn from_ref(registry: &Registry, cvar_ref: ConVarRef) -> Option<Self> {
        (registry.convar_type(cvar_ref) == T::VAR_TYPE).then(|| Self::from_ref_unchecked(cvar_ref))
    }

    pub(crate) fn from_ref_unchecked(cvar_ref: ConVarRef) -> Self {
        Self {
            cvar_ref,
            _marker: PhantomData,
        }
    }

    /// A handle that addresses nothing and reads as `T::default()`
    pub fn invalid() -> Self {
        Self::from_ref_unchecked(ConVarRef::invalid())
    }

    pub fn cvar_ref(&self) -> ConVarRef {
        self.cvar_ref
    }

    pub fn is_valid(&self) -> bool {
        self.cvar_ref.is_valid()
    }

    /// Value of the default slot
    pub fn get(&self, registry: &Registry) -> T {
        self.get_slot(registry, SplitScreenSlot::DEFAULT)
    }

    pub fn get_slot(&self, registry: &Registry, slot: SplitScreenSlot) -> T {
        registry.get_as(self.cvar_ref, slot)
    }

    /// Write the default slot
    pub fn set(&self, registry: &Registry, value: T) -> bool {
        self.set_slot(registry, value, SplitScreenSlot::DEFAULT)
    }

    pub fn set_slot(&self, registry: &Registry, value: T, slot: SplitScreenSlot) -> bool {
        registry.set_value(self.cvar_ref, value.into_value(), slot)
    }

    /// Queue a write from another thread
    pub fn queue_set(&self, registry: &Registry, value: T) -> Result<(), QueueError> {
        registry.queue_set(self.cvar_ref, value.into_value(), SplitScreenSlot::DEFAULT)
    }

    /// Write the default back into the default slot
    pub fn revert(&self, registry: &Registry) -> bool {
        registry.revert(self.cvar_ref, SplitScreenSlot::DEFAULT)
    }

    pub fn default_value(&self, registry: &Registry) -> T {
        T::from_value(&registry.default_value(self.cvar_ref)).unwrap_or_default()
    }

    pub fn min(&self, registry: &Registry) -> Option<T> {
        registry
            .min_value(self.cvar_ref)
            .and_then(|v| T::from_value(&v))
    }

    pub fn max(&self, registry: &Registry) -> Option<T> {
        registry
            .max_value(self.cvar_ref)
            .and_then(|v| T::from_value(&v))
    }

    pub fn name(&self, registry: &Registry) -> String {
        registry.convar_name(self.cvar_ref)
    }

    pub fn help(&self, registry: &Registry) -> String {
        registry.convar_help(self.cvar_ref)
    }
}

impl<T> Clone for ConVar<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ConVar<T> {}

impl<T> PartialEq for ConVar<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cvar_ref == other.cvar_ref
    }
}

impl<T> Eq for ConVar<T> {}

impl<T> std::fmt::Debug for ConVar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConVar")
            .field("type", &std::any::type_name::<T>())
            .field("cvar_ref", &self.cvar_ref)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use cvarkit_sdk::{Color, VarType, Vector3};

    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let registry = Registry::default();
        let gravity = ConVar::register(
            &registry,
            ConVarCreation::new("sv_gravity", 800i32, "World gravity").with_min(0),
        );

        assert_eq!(gravity.get(&registry), 800);
        assert!(gravity.set(&registry, -10));
        assert_eq!(gravity.get(&registry), 0);
        assert_eq!(gravity.min(&registry), Some(0));
        assert_eq!(gravity.max(&registry), None);
        assert_eq!(gravity.name(&registry), "sv_gravity");
        assert_eq!(gravity.help(&registry), "World gravity");

        assert!(gravity.revert(&registry));
        assert_eq!(gravity.get(&registry), 800);
        assert_eq!(gravity.default_value(&registry), 800);
    }

    #[test]
    fn test_find_checks_type() {
        let registry = Registry::default();
        ConVar::register(&registry, ConVarCreation::new("sv_cheats", false, ""));

        assert!(ConVar::<bool>::find(&registry, "sv_cheats").is_some());
        assert!(ConVar::<i32>::find(&registry, "sv_cheats").is_none());
        assert!(ConVar::<bool>::find(&registry, "missing").is_none());
    }

    #[test]
    fn test_invalid_reads_type_default() {
        let registry = Registry::default();
        let color = ConVar::<Color>::invalid();
        assert!(!color.is_valid());
        assert_eq!(color.get(&registry), Color::default());
        assert!(!color.set(&registry, Color::rgb(1, 2, 3)));

        assert_eq!(ConVar::<f32>::invalid().get(&registry), 0.0);
        assert_eq!(ConVar::<String>::invalid().get(&registry), "");
    }

    #[test]
    fn test_reference_before_registration() {
        let registry = Registry::default();
        let early = ConVar::<Vector3>::reference(&registry, "cl_offset");
        assert!(early.is_valid());
        assert_eq!(early.get(&registry), Vector3::default());

        let real = ConVar::register(
            &registry,
            ConVarCreation::new("cl_offset", Vector3::new(1.0, 2.0, 3.0), "Offset"),
        );
        assert_eq!(early.get(&registry), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(real.cvar_ref().access_index, early.cvar_ref().access_index);
        assert_eq!(registry.convar_type(early.cvar_ref()), VarType::Vector3);
    }

    #[test]
    fn test_typed_callbacks() {
        let registry = Registry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let limit = ConVar::register(
            &registry,
            ConVarCreation::new("mp_limit", 10u32, "Limit")
                .with_filter(|_, change| change.new_value != 13)
                .with_on_change(move |registry, change| {
                    assert_eq!(change.cvar.get(registry), change.new_value);
                    sink.lock().push((change.old_value, change.new_value));
                }),
        );

        limit.set(&registry, 13);
        limit.set(&registry, 20);
        limit.set(&registry, 20);
        assert_eq!(*seen.lock(), vec![(10, 20)]);
    }
}
