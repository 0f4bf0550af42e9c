//! Built-in console commands
//!
//! `find`, `cvarlist`, `help` and `differences`. Hosts opt in with
//! [`register_builtin_commands`]. Hidden entries are never listed.

use cvarkit_sdk::ConCommandRef;

use super::args::CommandArgs;
use super::callback::{CommandCallback, CompletionCallback};
use super::context::CommandContext;
use super::creation::ConCommandSetup;
use crate::registry::Registry;

/// Register the built-in commands, returning their handles
pub fn register_builtin_commands(registry: &Registry) -> Vec<ConCommandRef> {
    let commands = [
        ConCommandSetup::new("find", CommandCallback::context(find))
            .with_help("Find variables and commands whose name or help contains a string"),
        ConCommandSetup::new("cvarlist", CommandCallback::context(cvarlist))
            .with_help("List variables, optionally only those starting with a prefix"),
        ConCommandSetup::new("help", CommandCallback::context(help))
            .with_help("Describe a variable or command")
            .with_completion(CompletionCallback::function(complete_names)),
        ConCommandSetup::new("differences", CommandCallback::context(differences))
            .with_help("List variables that are not at their default value"),
    ];

    commands
        .into_iter()
        .map(|setup| registry.register_command(setup))
        .collect()
}

fn find(registry: &Registry, context: &CommandContext, args: &CommandArgs) {
    if args.arg_count() < 2 {
        context.reply("Usage: find <substring>");
        return;
    }
    for line in find_lines(registry, args.arg(1)) {
        context.reply(&line);
    }
}

fn cvarlist(registry: &Registry, context: &CommandContext, args: &CommandArgs) {
    let lines = cvarlist_lines(registry, args.arg(1));
    for line in &lines {
        context.reply(line);
    }
    context.reply_fmt(format_args!("{} convars", lines.len()));
}

fn help(registry: &Registry, context: &CommandContext, args: &CommandArgs) {
    if args.arg_count() < 2 {
        context.reply("Usage: help <cvarname>");
        return;
    }
    context.reply(&help_line(registry, args.arg(1)));
}

fn differences(registry: &Registry, context: &CommandContext, _args: &CommandArgs) {
    for line in difference_lines(registry) {
        context.reply(&line);
    }
}

/// Descriptions of visible entries whose name or help contains `needle`
pub(crate) fn find_lines(registry: &Registry, needle: &str) -> Vec<String> {
    let needle = needle.to_lowercase();
    let matches = |name: &str, help: &str| {
        name.to_lowercase().contains(&needle) || help.to_lowercase().contains(&needle)
    };

    let mut lines: Vec<String> = registry
        .iter_convars()
        .filter(|cvar| !registry.should_be_hidden(*cvar))
        .filter(|cvar| matches(&registry.convar_name(*cvar), &registry.convar_help(*cvar)))
        .map(|cvar| registry.describe_convar(cvar))
        .collect();
    lines.extend(
        registry
            .iter_commands()
            .filter(|cmd| !registry.command_flags(*cmd).should_be_hidden())
            .filter(|cmd| matches(&registry.command_name(*cmd), &registry.command_help(*cmd)))
            .map(|cmd| registry.describe_command(cmd)),
    );
    lines
}

/// Descriptions of visible variables starting with `prefix`, sorted by name
pub(crate) fn cvarlist_lines(registry: &Registry, prefix: &str) -> Vec<String> {
    let mut cvars: Vec<_> = registry
        .iter_convars()
        .filter(|cvar| !registry.should_be_hidden(*cvar))
        .map(|cvar| (registry.convar_name(cvar), cvar))
        .filter(|(name, _)| name.starts_with(prefix))
        .collect();
    cvars.sort_by(|a, b| a.0.cmp(&b.0));
    cvars
        .into_iter()
        .map(|(_, cvar)| registry.describe_convar(cvar))
        .collect()
}

pub(crate) fn help_line(registry: &Registry, name: &str) -> String {
    let cvar = registry.find_convar(name, false);
    if cvar.is_valid() && !registry.should_be_hidden(cvar) {
        return registry.describe_convar(cvar);
    }
    let cmd = registry.find_command(name, false);
    if cmd.is_valid() && !registry.command_flags(cmd).should_be_hidden() {
        return registry.describe_command(cmd);
    }
    format!("help: no cvar or command named {}", name)
}

/// Descriptions of visible variables with any slot away from its default
pub(crate) fn difference_lines(registry: &Registry) -> Vec<String> {
    registry
        .iter_convars()
        .filter(|cvar| !registry.should_be_hidden(*cvar))
        .filter(|cvar| !registry.is_all_set_to_default(*cvar))
        .map(|cvar| registry.describe_convar(cvar))
        .collect()
}

/// Visible variable and command names starting with `partial`
fn complete_names(registry: &Registry, partial: &str) -> Vec<String> {
    let mut names: Vec<String> = registry
        .iter_convars()
        .filter(|cvar| !registry.should_be_hidden(*cvar))
        .map(|cvar| registry.convar_name(cvar))
        .chain(
            registry
                .iter_commands()
                .filter(|cmd| !registry.command_flags(*cmd).should_be_hidden())
                .map(|cmd| registry.command_name(cmd)),
        )
        .filter(|name| name.starts_with(partial))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use cvarkit_sdk::{SplitScreenSlot, VarType};

    use super::*;
    use crate::convars::flags::ConVarFlags;
    use crate::convars::ConVarSetup;

    fn populated() -> Registry {
        let registry = Registry::default();
        registry.register_convar(
            ConVarSetup::new("sv_gravity", VarType::Int32)
                .with_default(800i32)
                .with_help("World gravity"),
        );
        registry.register_convar(ConVarSetup::new("sv_cheats", VarType::Bool).with_help("Allow cheats"));
        registry.register_convar(
            ConVarSetup::new("sv_hidden", VarType::Bool).with_flags(ConVarFlags::HIDDEN),
        );
        registry.register_convar(ConVarSetup::new("mp_limit", VarType::Int32));
        register_builtin_commands(&registry);
        registry
    }

    #[test]
    fn test_builtins_register() {
        let registry = Registry::default();
        let handles = register_builtin_commands(&registry);
        assert_eq!(handles.len(), 4);
        assert!(handles.iter().all(|h| h.is_valid()));
        assert!(registry.find_command("cvarlist", false).is_valid());
    }

    #[test]
    fn test_find_lines() {
        let registry = populated();
        let lines = find_lines(&registry, "GRAV");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("\"sv_gravity\""));

        // Matches help text too, and commands
        assert_eq!(find_lines(&registry, "cheats").len(), 1);
        assert!(find_lines(&registry, "describe").iter().any(|l| l.starts_with("\"help\"")));
        assert!(find_lines(&registry, "hidden").is_empty());
    }

    #[test]
    fn test_cvarlist_sorted_and_filtered() {
        let registry = populated();
        let all = cvarlist_lines(&registry, "");
        assert_eq!(all.len(), 3);
        assert!(all[0].starts_with("\"mp_limit\""));

        let sv = cvarlist_lines(&registry, "sv_");
        assert_eq!(sv.len(), 2);
        assert!(sv[0].starts_with("\"sv_cheats\""));
    }

    #[test]
    fn test_help_line() {
        let registry = populated();
        assert_eq!(
            help_line(&registry, "sv_gravity"),
            "\"sv_gravity\" = \"800\" - World gravity"
        );
        assert!(help_line(&registry, "cvarlist").starts_with("\"cvarlist\""));
        assert_eq!(
            help_line(&registry, "sv_hidden"),
            "help: no cvar or command named sv_hidden"
        );
    }

    #[test]
    fn test_differences() {
        let registry = populated();
        assert!(difference_lines(&registry).is_empty());

        let gravity = registry.find_convar("sv_gravity", false);
        registry.set_int(gravity, 400, SplitScreenSlot::DEFAULT);
        assert!(!registry.is_set_to_default(gravity, SplitScreenSlot::DEFAULT));
        let lines = difference_lines(&registry);
        assert_eq!(lines, vec!["\"sv_gravity\" = \"400\" ( def. \"800\" ) - World gravity"]);
    }

    #[test]
    fn test_help_completion() {
        let registry = populated();
        let help = registry.find_command("help", false);
        assert_eq!(registry.complete_command(help, "sv_"), vec!["sv_cheats", "sv_gravity"]);
    }

    #[test]
    fn test_dispatch_builtins_do_not_panic() {
        let registry = populated();
        let context = CommandContext::default();
        for line in ["find grav", "find", "cvarlist sv_", "help sv_cheats", "help", "differences"] {
            let args = CommandArgs::tokenize(line).unwrap();
            let cmd = registry.find_command(args.command_name(), false);
            assert!(registry.dispatch_command(cmd, &context, &args));
        }
    }
}
