//! Command records

use parking_lot::Mutex;

use super::callback::{CommandCallback, CompletionCallback};
use crate::convars::flags::ConVarFlags;

/// A callback tagged with the registration that installed it
pub(crate) struct CommandCallbackEntry {
    pub registration: i32,
    pub callback: CommandCallback,
}

/// A registered command
///
/// The name never changes once the record exists.
pub(crate) struct ConCommandRecord {
    pub name: String,
    pub state: Mutex<CommandState>,
}

pub(crate) struct CommandState {
    pub help: String,
    pub flags: ConVarFlags,
    /// Installed callbacks in registration order; more than one only when linked
    pub callbacks: Vec<CommandCallbackEntry>,
    pub completion: Option<(i32, CompletionCallback)>,
    pub registrations: i32,
}

impl ConCommandRecord {
    pub fn new(
        name: &str,
        help: String,
        flags: ConVarFlags,
        callback: CommandCallback,
        completion: Option<CompletionCallback>,
    ) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(CommandState {
                help,
                flags,
                callbacks: vec![CommandCallbackEntry {
                    registration: 1,
                    callback,
                }],
                completion: completion.map(|c| (1, c)),
                registrations: 1,
            }),
        }
    }
}
