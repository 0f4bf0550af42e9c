//! Typed wrapper over the `FCVAR_*` bit mask

use bitflags::bitflags;

use cvarkit_sdk::flags::*;

bitflags! {
    /// Flags attached to variables and commands
    ///
    /// All 64 bits are retained; only the named ones have meaning to the
    /// registry itself.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConVarFlags: u64 {
        const LINKED_CONCOMMAND = FCVAR_LINKED_CONCOMMAND;
        const DEVELOPMENTONLY = FCVAR_DEVELOPMENTONLY;
        const GAMEDLL = FCVAR_GAMEDLL;
        const CLIENTDLL = FCVAR_CLIENTDLL;
        const HIDDEN = FCVAR_HIDDEN;
        const PROTECTED = FCVAR_PROTECTED;
        const SPONLY = FCVAR_SPONLY;
        const ARCHIVE = FCVAR_ARCHIVE;
        const NOTIFY = FCVAR_NOTIFY;
        const USERINFO = FCVAR_USERINFO;
        const REFERENCE = FCVAR_REFERENCE;
        const UNLOGGED = FCVAR_UNLOGGED;
        const INITIAL_SETVALUE = FCVAR_INITIAL_SETVALUE;
        const REPLICATED = FCVAR_REPLICATED;
        const CHEAT = FCVAR_CHEAT;
        const PER_USER = FCVAR_PER_USER;
        const DEMO = FCVAR_DEMO;
        const DONTRECORD = FCVAR_DONTRECORD;
        const PERFORMING_CALLBACKS = FCVAR_PERFORMING_CALLBACKS;
        const RELEASE = FCVAR_RELEASE;
        const MENUBAR_ITEM = FCVAR_MENUBAR_ITEM;
        const COMMANDLINE_ENFORCED = FCVAR_COMMANDLINE_ENFORCED;
        const NOT_CONNECTED = FCVAR_NOT_CONNECTED;
        const VCONSOLE_FUZZY_MATCHING = FCVAR_VCONSOLE_FUZZY_MATCHING;
        const SERVER_CAN_EXECUTE = FCVAR_SERVER_CAN_EXECUTE;
        const CLIENT_CAN_EXECUTE = FCVAR_CLIENT_CAN_EXECUTE;
        const SERVER_CANNOT_QUERY = FCVAR_SERVER_CANNOT_QUERY;
        const VCONSOLE_SET_FOCUS = FCVAR_VCONSOLE_SET_FOCUS;
        const CLIENTCMD_CAN_EXECUTE = FCVAR_CLIENTCMD_CAN_EXECUTE;
        const EXECUTE_PER_TICK = FCVAR_EXECUTE_PER_TICK;
        const DEFENSIVE = FCVAR_DEFENSIVE;

        const _ = !0;
    }
}

/// Flags whose presence keeps an entry out of listings
const HIDDEN_MASK: ConVarFlags = ConVarFlags::REFERENCE
    .union(ConVarFlags::HIDDEN)
    .union(ConVarFlags::DEVELOPMENTONLY);

/// Flags that mark an entry as visible in release builds
const RELEASE_VISIBLE_MASK: ConVarFlags = ConVarFlags::RELEASE
    .union(ConVarFlags::GAMEDLL)
    .union(ConVarFlags::CLIENTDLL)
    .union(ConVarFlags::REPLICATED)
    .union(ConVarFlags::ARCHIVE);

/// Flag names printed in descriptions, in print order
const DISPLAY_NAMES: &[(ConVarFlags, &str)] = &[
    (ConVarFlags::GAMEDLL, "game"),
    (ConVarFlags::CLIENTDLL, "client"),
    (ConVarFlags::ARCHIVE, "archive"),
    (ConVarFlags::NOTIFY, "notify"),
    (ConVarFlags::SPONLY, "singleplayer"),
    (ConVarFlags::NOT_CONNECTED, "notconnected"),
    (ConVarFlags::CHEAT, "cheat"),
    (ConVarFlags::REPLICATED, "replicated"),
    (ConVarFlags::SERVER_CAN_EXECUTE, "server_can_execute"),
    (ConVarFlags::CLIENTCMD_CAN_EXECUTE, "clientcmd_can_execute"),
    (ConVarFlags::USERINFO, "userinfo"),
    (ConVarFlags::PER_USER, "per_user"),
];

impl Default for ConVarFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConVarFlags {
    /// Hidden from listings and completion
    pub fn should_be_hidden(self) -> bool {
        self.intersects(HIDDEN_MASK)
    }

    /// Entries without any release-visible bit become defensive dev-only
    pub fn sanitized(self) -> Self {
        if self.intersects(RELEASE_VISIBLE_MASK) {
            self
        } else {
            self | Self::DEFENSIVE | Self::DEVELOPMENTONLY
        }
    }

    /// Space-separated display names of the set flags
    pub fn display_names(self) -> String {
        DISPLAY_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bits_retained() {
        let raw = (1u64 << 40) | FCVAR_CHEAT;
        let flags = ConVarFlags::from_bits_retain(raw);
        assert_eq!(flags.bits(), raw);
        assert!(flags.contains(ConVarFlags::CHEAT));
    }

    #[test]
    fn test_should_be_hidden() {
        assert!(ConVarFlags::HIDDEN.should_be_hidden());
        assert!(ConVarFlags::REFERENCE.should_be_hidden());
        assert!(!ConVarFlags::ARCHIVE.should_be_hidden());
    }

    #[test]
    fn test_sanitized() {
        let plain = ConVarFlags::CHEAT.sanitized();
        assert!(plain.contains(ConVarFlags::DEFENSIVE | ConVarFlags::DEVELOPMENTONLY));

        let release = ConVarFlags::RELEASE.sanitized();
        assert_eq!(release, ConVarFlags::RELEASE);
    }

    #[test]
    fn test_display_names() {
        let flags = ConVarFlags::ARCHIVE | ConVarFlags::CHEAT | ConVarFlags::DEFENSIVE;
        assert_eq!(flags.display_names(), "archive cheat");
    }
}
