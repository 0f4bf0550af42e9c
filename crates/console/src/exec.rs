//! Console line execution
//!
//! A line holds one or more statements separated by `;` or newlines. Each
//! statement is tokenized and resolved against the registry:
//!
//! - a command name dispatches the command with the remaining arguments
//! - a variable name alone prints the variable's description
//! - a variable name followed by a value writes the value

use cvarkit_core::commands::{split_commands, tokenize_with, CommandArgs, CommandContext};
use cvarkit_core::sdk::SplitScreenSlot;
use cvarkit_core::Registry;

/// What a single statement did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command ran
    Dispatched(String),
    /// A variable's description was printed
    Described(String),
    /// A variable write was accepted
    Set(String),
    /// A variable write was rejected
    Rejected(String),
    /// Nothing is registered under the name
    Unknown(String),
    /// The statement could not be tokenized
    Malformed,
}

/// Execute every statement on a console line
pub fn execute_line(registry: &Registry, context: &CommandContext, line: &str) -> Vec<Outcome> {
    split_commands(line)
        .into_iter()
        .map(|statement| execute_statement(registry, context, statement))
        .collect()
}

fn execute_statement(registry: &Registry, context: &CommandContext, statement: &str) -> Outcome {
    let args = match tokenize_with(statement, &registry.config().break_set) {
        Ok(args) => args,
        Err(e) => {
            tracing::debug!("Skipping statement '{}': {}", statement, e);
            return Outcome::Malformed;
        }
    };
    let name = args.arg(0).to_string();

    let cmd = registry.find_command(&name, false);
    if cmd.is_valid() {
        registry.dispatch_command(cmd, context, &args);
        return Outcome::Dispatched(name);
    }

    let cvar = registry.find_convar(&name, false);
    if !cvar.is_valid() {
        context.reply_fmt(format_args!("Unknown command \"{}\"", name));
        return Outcome::Unknown(name);
    }

    if args.arg_count() < 2 {
        context.reply(&registry.describe_convar(cvar));
        return Outcome::Described(name);
    }

    if registry.set_from_string(cvar, value_text(&args), SplitScreenSlot::DEFAULT) {
        Outcome::Set(name)
    } else {
        context.reply_fmt(format_args!(
            "Cannot set \"{}\" ({}) to \"{}\"",
            name,
            registry.type_name(cvar),
            value_text(&args)
        ));
        Outcome::Rejected(name)
    }
}

/// Value text for `name value...`
///
/// A single argument is used as tokenized, so quotes are stripped. Several
/// arguments are taken verbatim, letting `vec 1 2 3` address a vector.
fn value_text(args: &CommandArgs) -> &str {
    if args.arg_count() == 2 {
        args.arg(1)
    } else {
        args.arg_s()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use cvarkit_core::commands::{CommandCallback, ConCommandSetup};
    use cvarkit_core::convars::ConVarCreation;
    use cvarkit_core::sdk::Vector3;
    use cvarkit_core::ConVar;

    use super::*;

    fn setup() -> Registry {
        let registry = Registry::default();
        ConVar::register(
            &registry,
            ConVarCreation::new("sv_gravity", 800i32, "World gravity").with_min(0),
        );
        ConVar::register(
            &registry,
            ConVarCreation::new("sv_origin", Vector3::new(0.0, 0.0, 0.0), "Spawn origin"),
        );
        registry
    }

    #[test]
    fn test_sets_and_describes_variables() {
        let registry = setup();
        let context = CommandContext::server();

        assert_eq!(
            execute_line(&registry, &context, "sv_gravity 400; sv_gravity"),
            vec![
                Outcome::Set("sv_gravity".to_string()),
                Outcome::Described("sv_gravity".to_string())
            ]
        );
        let gravity = registry.find_convar("sv_gravity", false);
        assert_eq!(registry.get_int(gravity, SplitScreenSlot::DEFAULT), 400);
    }

    #[test]
    fn test_multi_argument_value() {
        let registry = setup();
        let context = CommandContext::server();
        let origin = registry.find_convar("sv_origin", false);

        execute_line(&registry, &context, "sv_origin 1 2 3");
        assert_eq!(
            registry.get_as_string(origin, SplitScreenSlot::DEFAULT),
            "1 2 3"
        );

        execute_line(&registry, &context, "sv_origin \"4 5 6\"");
        assert_eq!(
            registry.get_as_string(origin, SplitScreenSlot::DEFAULT),
            "4 5 6"
        );
    }

    #[test]
    fn test_rejected_and_unknown() {
        let registry = setup();
        let context = CommandContext::server();

        assert_eq!(
            execute_line(&registry, &context, "sv_gravity abc"),
            vec![Outcome::Rejected("sv_gravity".to_string())]
        );
        assert_eq!(
            execute_line(&registry, &context, "nope 1"),
            vec![Outcome::Unknown("nope".to_string())]
        );
        assert!(execute_line(&registry, &context, "  ; // only a comment").is_empty());
    }

    #[test]
    fn test_dispatches_commands() {
        let registry = setup();
        let context = CommandContext::server();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = seen.clone();
        registry.register_command(ConCommandSetup::new(
            "bump",
            CommandCallback::stateless(move |args| {
                let by: usize = args.arg(1).parse().unwrap_or(1);
                counter.fetch_add(by, Ordering::SeqCst);
            }),
        ));

        let outcomes = execute_line(&registry, &context, "bump; bump 5");
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| *o == Outcome::Dispatched("bump".to_string())));
        assert_eq!(seen.load(Ordering::SeqCst), 6);
    }
}
