//! Invocation context

use cvarkit_sdk::{CommandTarget, PlayerSlot};

/// Where a command invocation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandContext {
    target: CommandTarget,
    player_slot: PlayerSlot,
}

impl CommandContext {
    pub const fn new(target: CommandTarget, player_slot: PlayerSlot) -> Self {
        Self {
            target,
            player_slot,
        }
    }

    /// Context for the local server console
    pub const fn server() -> Self {
        Self::new(CommandTarget::NO_TARGET, PlayerSlot::SERVER)
    }

    pub fn target(&self) -> CommandTarget {
        self.target
    }

    pub fn player_slot(&self) -> PlayerSlot {
        self.player_slot
    }

    /// Returns true if the server console issued the command
    pub fn is_server(&self) -> bool {
        self.player_slot.is_server()
    }

    /// Reply to the caller
    ///
    /// Replies are emitted as `console` target log events.
    pub fn reply(&self, message: &str) {
        if self.is_server() {
            tracing::info!(target: "console", "{}", message);
        } else {
            tracing::info!(target: "console", "[player {}] {}", self.player_slot.0, message);
        }
    }

    /// Reply with formatted message
    pub fn reply_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.reply(&args.to_string());
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::server()
    }
}
