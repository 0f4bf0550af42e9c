//! Creation listeners
//!
//! Listeners run after a new variable or command becomes registered.
//! Reference placeholders do not count as creation; their upgrade does.

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use cvarkit_sdk::{ConCommandRef, ConVarRef};

use super::Registry;

new_key_type! {
    /// Key for registered listeners, used for removal
    pub struct ListenerKey;
}

/// Called after a variable is created
pub type ConVarCreatedCallback = Arc<dyn Fn(&Registry, ConVarRef) + Send + Sync>;

/// Called after a command is created
pub type ConCommandCreatedCallback = Arc<dyn Fn(&Registry, ConCommandRef) + Send + Sync>;

#[derive(Clone)]
enum CreationListener {
    ConVar(ConVarCreatedCallback),
    Command(ConCommandCreatedCallback),
}

#[derive(Default)]
pub(crate) struct CreationListeners {
    listeners: SlotMap<ListenerKey, CreationListener>,
}

impl Registry {
    /// Register a callback fired after each new variable
    pub fn on_convar_created<F>(&self, callback: F) -> ListenerKey
    where
        F: Fn(&Registry, ConVarRef) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .listeners
            .insert(CreationListener::ConVar(Arc::new(callback)))
    }

    /// Register a callback fired after each new command
    pub fn on_command_created<F>(&self, callback: F) -> ListenerKey
    where
        F: Fn(&Registry, ConCommandRef) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .listeners
            .insert(CreationListener::Command(Arc::new(callback)))
    }

    /// Remove a listener by its key
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn remove_listener(&self, key: ListenerKey) -> bool {
        self.listeners.write().listeners.remove(key).is_some()
    }

    pub(crate) fn fire_convar_created(&self, cvar: ConVarRef) {
        let callbacks: Vec<ConVarCreatedCallback> = self
            .listeners
            .read()
            .listeners
            .values()
            .filter_map(|l| match l {
                CreationListener::ConVar(cb) => Some(cb.clone()),
                CreationListener::Command(_) => None,
            })
            .collect();

        for callback in callbacks {
            callback(self, cvar);
        }
    }

    pub(crate) fn fire_command_created(&self, cmd: ConCommandRef) {
        let callbacks: Vec<ConCommandCreatedCallback> = self
            .listeners
            .read()
            .listeners
            .values()
            .filter_map(|l| match l {
                CreationListener::Command(cb) => Some(cb.clone()),
                CreationListener::ConVar(_) => None,
            })
            .collect();

        for callback in callbacks {
            callback(self, cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use cvarkit_sdk::VarType;

    use super::*;
    use crate::commands::{CommandCallback, ConCommandSetup};
    use crate::convars::ConVarSetup;

    #[test]
    fn test_convar_created_fires_for_real_registrations() {
        let registry = Registry::default();
        let created = Arc::new(Mutex::new(Vec::new()));

        let sink = created.clone();
        let key = registry.on_convar_created(move |registry, cvar| {
            sink.lock().push(registry.convar_name(cvar));
        });

        registry.register_convar(ConVarSetup::reference("later", VarType::Int32));
        assert!(created.lock().is_empty());

        registry.register_convar(ConVarSetup::new("later", VarType::Int32));
        registry.register_convar(ConVarSetup::new("now", VarType::Bool));
        assert_eq!(*created.lock(), vec!["later".to_string(), "now".to_string()]);

        assert!(registry.remove_listener(key));
        assert!(!registry.remove_listener(key));
        registry.register_convar(ConVarSetup::new("after", VarType::Bool));
        assert_eq!(created.lock().len(), 2);
    }

    #[test]
    fn test_listener_may_register() {
        let registry = Registry::default();
        registry.on_command_created(|registry, cmd| {
            let name = format!("{}_enabled", registry.command_name(cmd));
            registry.register_convar(ConVarSetup::new(name, VarType::Bool));
        });

        registry.register_command(ConCommandSetup::new("kick", CommandCallback::void(|| {})));
        assert!(registry.find_convar("kick_enabled", false).is_valid());
    }
}
