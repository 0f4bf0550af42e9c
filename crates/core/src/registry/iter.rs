//! Lazy iteration over registered handles
//!
//! Iterators hold only a cursor and take the table lock per step, so
//! registrations made while iterating neither block nor invalidate them.
//! Entries appended during iteration are visited if the cursor has not yet
//! passed the end; entries present at creation are always visited once.

use cvarkit_sdk::{ConCommandRef, ConVarRef};

use super::Registry;

/// Iterator over variable handles in registration order
#[derive(Clone)]
pub struct ConVarIter<'a> {
    registry: &'a Registry,
    next: ConVarRef,
    started: bool,
}

impl<'a> ConVarIter<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            next: ConVarRef::invalid(),
            started: false,
        }
    }

    /// Rewind to the first variable
    pub fn restart(&mut self) {
        self.next = ConVarRef::invalid();
        self.started = false;
    }
}

impl Iterator for ConVarIter<'_> {
    type Item = ConVarRef;

    fn next(&mut self) -> Option<ConVarRef> {
        let cvar = if self.started {
            self.registry.next_convar(self.next)
        } else {
            self.started = true;
            self.registry.first_convar()
        };
        self.next = cvar;
        cvar.is_valid().then_some(cvar)
    }
}

/// Iterator over command handles in registration order
#[derive(Clone)]
pub struct ConCommandIter<'a> {
    registry: &'a Registry,
    next: ConCommandRef,
    started: bool,
}

impl<'a> ConCommandIter<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            next: ConCommandRef::invalid(),
            started: false,
        }
    }

    /// Rewind to the first command
    pub fn restart(&mut self) {
        self.next = ConCommandRef::invalid();
        self.started = false;
    }
}

impl Iterator for ConCommandIter<'_> {
    type Item = ConCommandRef;

    fn next(&mut self) -> Option<ConCommandRef> {
        let cmd = if self.started {
            self.registry.next_command(self.next)
        } else {
            self.started = true;
            self.registry.first_command()
        };
        self.next = cmd;
        cmd.is_valid().then_some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cvarkit_sdk::VarType;

    use crate::commands::{CommandCallback, ConCommandSetup};
    use crate::convars::ConVarSetup;
    use crate::registry::Registry;

    #[test]
    fn test_iteration_in_registration_order() {
        let registry = Registry::default();
        let names = ["c", "a", "b"];
        let handles: Vec<_> = names
            .iter()
            .map(|n| registry.register_convar(ConVarSetup::new(*n, VarType::Bool)))
            .collect();

        let seen: Vec<_> = registry.iter_convars().collect();
        assert_eq!(seen, handles);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let registry = Registry::default();
        registry.register_convar(ConVarSetup::new("a", VarType::Bool));
        registry.register_convar(ConVarSetup::new("b", VarType::Bool));

        let mut iter = registry.iter_convars();
        assert!(iter.next().is_some());
        iter.restart();
        assert_eq!(iter.count(), 2);
        assert_eq!(registry.iter_convars().count(), 2);
    }

    #[test]
    fn test_registration_during_iteration() {
        let registry = Registry::default();
        let existing: Vec<_> = (0..5)
            .map(|i| registry.register_convar(ConVarSetup::new(format!("pre_{i}"), VarType::Int32)))
            .collect();

        let mut seen = Vec::new();
        for (i, cvar) in registry.iter_convars().enumerate() {
            seen.push(cvar);
            if i < 3 {
                registry.register_convar(ConVarSetup::new(format!("new_{i}"), VarType::Int32));
            }
        }

        // No duplicates, and nothing that existed beforehand was skipped
        let unique: HashSet<_> = seen.iter().map(|c| c.access_index).collect();
        assert_eq!(unique.len(), seen.len());
        for cvar in existing {
            assert!(unique.contains(&cvar.access_index));
        }
    }

    #[test]
    fn test_command_iteration() {
        let registry = Registry::default();
        assert_eq!(registry.iter_commands().count(), 0);
        registry.register_command(ConCommandSetup::new("one", CommandCallback::void(|| {})));
        registry.register_command(ConCommandSetup::new("two", CommandCallback::void(|| {})));
        assert_eq!(registry.iter_commands().count(), 2);
    }
}
