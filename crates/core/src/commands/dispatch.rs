//! Command dispatch and metadata

use cvarkit_sdk::ConCommandRef;

use super::args::CommandArgs;
use super::callback::CommandCallback;
use super::context::CommandContext;
use crate::convars::flags::ConVarFlags;
use crate::convars::record::INVALID_NAME;
use crate::registry::Registry;

impl Registry {
    /// Run a command's callback synchronously
    ///
    /// Linked commands run every installed callback in registration order,
    /// others run the most recent one. Returns `false` if the handle is
    /// unknown or no callback is installed.
    pub fn dispatch_command(
        &self,
        cmd: ConCommandRef,
        context: &CommandContext,
        args: &CommandArgs,
    ) -> bool {
        let Some(record) = self.command_record(cmd) else {
            tracing::warn!("Dispatch to unknown command handle {:?}", cmd);
            return false;
        };

        let callbacks: Vec<CommandCallback> = {
            let state = record.state.lock();
            if state.flags.contains(ConVarFlags::LINKED_CONCOMMAND) {
                state.callbacks.iter().map(|e| e.callback.clone()).collect()
            } else {
                state.callbacks.last().map(|e| e.callback.clone()).into_iter().collect()
            }
        };
        if callbacks.is_empty() {
            tracing::debug!("Command '{}' has no callback installed", record.name);
            return false;
        }

        for callback in callbacks {
            callback.invoke(self, context, args);
        }
        true
    }

    /// Completion suggestions for a partially typed command line
    pub fn complete_command(&self, cmd: ConCommandRef, partial: &str) -> Vec<String> {
        let Some(completion) = self
            .command_record(cmd)
            .and_then(|r| r.state.lock().completion.as_ref().map(|(_, c)| c.clone()))
        else {
            return Vec::new();
        };
        completion.complete(self, partial)
    }

    pub fn has_completion(&self, cmd: ConCommandRef) -> bool {
        self.command_record(cmd)
            .is_some_and(|r| r.state.lock().completion.is_some())
    }

    pub fn command_name(&self, cmd: ConCommandRef) -> String {
        self.command_record(cmd)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| INVALID_NAME.to_string())
    }

    pub fn command_help(&self, cmd: ConCommandRef) -> String {
        self.command_record(cmd)
            .map(|r| r.state.lock().help.clone())
            .unwrap_or_default()
    }

    pub fn command_flags(&self, cmd: ConCommandRef) -> ConVarFlags {
        self.command_record(cmd)
            .map(|r| r.state.lock().flags)
            .unwrap_or_default()
    }

    /// One-line description of a command
    pub fn describe_command(&self, cmd: ConCommandRef) -> String {
        let name = self.command_name(cmd);
        let help = self.command_help(cmd);
        let flags = self.command_flags(cmd).display_names();

        let mut line = format!("\"{}\"", name);
        if !flags.is_empty() {
            line.push(' ');
            line.push_str(&flags);
        }
        if !help.is_empty() {
            line.push_str(" - ");
            line.push_str(&help);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::commands::{CompletionCallback, ConCommandSetup};

    #[test]
    fn test_dispatch_receives_args() {
        let registry = Registry::default();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let say = registry.register_command(ConCommandSetup::new(
            "say",
            CommandCallback::context(move |_, _, args| {
                *sink.lock() = Some((args.arg_count(), args.arg_s().to_string()));
            }),
        ));

        let args = CommandArgs::from_argv(["say", "hello", "world"]);
        assert!(registry.dispatch_command(say, &CommandContext::default(), &args));
        assert_eq!(*seen.lock(), Some((3, "hello world".to_string())));
    }

    #[test]
    fn test_dispatch_unknown_handle() {
        let registry = Registry::default();
        let args = CommandArgs::from_argv(["nothing"]);
        assert!(!registry.dispatch_command(
            ConCommandRef::invalid(),
            &CommandContext::default(),
            &args
        ));
        assert_eq!(registry.command_name(ConCommandRef::invalid()), INVALID_NAME);
    }

    #[test]
    fn test_unlinked_runs_last_callback_only() {
        let registry = Registry::default();
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        let first = registry.register_command(ConCommandSetup::new(
            "reload",
            CommandCallback::void(move || sink.lock().push("first")),
        ));
        registry.unregister_command_callbacks(first);
        assert!(!registry.dispatch_command(
            first,
            &CommandContext::default(),
            &CommandArgs::from_argv(["reload"])
        ));

        let sink = log.clone();
        registry.register_command(ConCommandSetup::new(
            "reload",
            CommandCallback::void(move || sink.lock().push("second")),
        ));
        registry.dispatch_command(first, &CommandContext::default(), &CommandArgs::from_argv(["reload"]));
        assert_eq!(*log.lock(), vec!["second"]);
    }

    #[test]
    fn test_completion() {
        let registry = Registry::default();
        let cmd = registry.register_command(
            ConCommandSetup::new("map", CommandCallback::void(|| {})).with_completion(
                CompletionCallback::function(|_, partial| {
                    ["de_dust2", "de_inferno", "cs_office"]
                        .iter()
                        .filter(|m| m.starts_with(partial))
                        .map(|m| m.to_string())
                        .collect()
                }),
            ),
        );

        assert!(registry.has_completion(cmd));
        assert_eq!(registry.complete_command(cmd, "de_"), vec!["de_dust2", "de_inferno"]);

        let plain = registry.register_command(ConCommandSetup::new("quit", CommandCallback::void(|| {})));
        assert!(!registry.has_completion(plain));
        assert!(registry.complete_command(plain, "").is_empty());
    }

    #[test]
    fn test_describe_command() {
        let registry = Registry::default();
        let cmd = registry.register_command(
            ConCommandSetup::new("kick", CommandCallback::void(|| {}))
                .with_help("Kick a player")
                .with_flags(ConVarFlags::GAMEDLL),
        );
        assert_eq!(registry.describe_command(cmd), "\"kick\" game - Kick a player");
    }
}
