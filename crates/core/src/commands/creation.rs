//! Command registration requests

use super::callback::{CommandCallback, CompletionCallback};
use crate::convars::flags::ConVarFlags;

/// Command registration request
#[derive(Clone)]
pub struct ConCommandSetup {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) flags: ConVarFlags,
    pub(crate) callback: CommandCallback,
    pub(crate) completion: Option<CompletionCallback>,
}

impl ConCommandSetup {
    pub fn new(name: impl Into<String>, callback: CommandCallback) -> Self {
        Self {
            name: name.into(),
            help: String::new(),
            flags: ConVarFlags::empty(),
            callback,
            completion: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Add flags (builder pattern)
    pub fn with_flags(mut self, flags: ConVarFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_completion(mut self, completion: CompletionCallback) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ConCommandSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommandSetup")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("callback", &self.callback)
            .field("completion", &self.completion.is_some())
            .finish()
    }
}
