//! Command and completion callbacks

use std::sync::Arc;

use super::args::CommandArgs;
use super::context::CommandContext;
use crate::registry::Registry;

/// Most completion suggestions returned for one request
pub const COMMAND_COMPLETION_MAX_ITEMS: usize = 64;

/// Object-style command handler
pub trait CommandHandler: Send + Sync {
    fn command_callback(&self, registry: &Registry, context: &CommandContext, args: &CommandArgs);
}

/// Object-style completion provider
pub trait CompletionHandler: Send + Sync {
    /// Push suggestions for the partially typed line
    fn complete(&self, registry: &Registry, partial: &str, suggestions: &mut Vec<String>);
}

type ContextFn = dyn Fn(&Registry, &CommandContext, &CommandArgs) + Send + Sync;
type StatelessFn = dyn Fn(&CommandArgs) + Send + Sync;
type VoidFn = dyn Fn() + Send + Sync;
type CompletionFn = dyn Fn(&Registry, &str) -> Vec<String> + Send + Sync;

/// The callback a command runs when dispatched
#[derive(Clone)]
pub enum CommandCallback {
    /// Receives the registry, the invocation context and the arguments
    Context(Arc<ContextFn>),
    /// Receives only the arguments
    Stateless(Arc<StatelessFn>),
    /// Receives nothing
    Void(Arc<VoidFn>),
    Interface(Arc<dyn CommandHandler>),
}

impl CommandCallback {
    pub fn context<F>(callback: F) -> Self
    where
        F: Fn(&Registry, &CommandContext, &CommandArgs) + Send + Sync + 'static,
    {
        Self::Context(Arc::new(callback))
    }

    pub fn stateless<F>(callback: F) -> Self
    where
        F: Fn(&CommandArgs) + Send + Sync + 'static,
    {
        Self::Stateless(Arc::new(callback))
    }

    pub fn void<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::Void(Arc::new(callback))
    }

    pub fn interface(handler: Arc<dyn CommandHandler>) -> Self {
        Self::Interface(handler)
    }

    pub(crate) fn invoke(&self, registry: &Registry, context: &CommandContext, args: &CommandArgs) {
        match self {
            Self::Context(f) => f(registry, context, args),
            Self::Stateless(f) => f(args),
            Self::Void(f) => f(),
            Self::Interface(handler) => handler.command_callback(registry, context, args),
        }
    }
}

impl std::fmt::Debug for CommandCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Context(_) => "Context",
            Self::Stateless(_) => "Stateless",
            Self::Void(_) => "Void",
            Self::Interface(_) => "Interface",
        };
        f.debug_tuple("CommandCallback").field(&kind).finish()
    }
}

/// Completion provider attached to a command
#[derive(Clone)]
pub enum CompletionCallback {
    Function(Arc<CompletionFn>),
    Interface(Arc<dyn CompletionHandler>),
}

impl CompletionCallback {
    pub fn function<F>(callback: F) -> Self
    where
        F: Fn(&Registry, &str) -> Vec<String> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(callback))
    }

    pub fn interface(handler: Arc<dyn CompletionHandler>) -> Self {
        Self::Interface(handler)
    }

    /// Collect suggestions, capped at [`COMMAND_COMPLETION_MAX_ITEMS`]
    pub(crate) fn complete(&self, registry: &Registry, partial: &str) -> Vec<String> {
        let mut suggestions = match self {
            Self::Function(f) => f(registry, partial),
            Self::Interface(handler) => {
                let mut out = Vec::new();
                handler.complete(registry, partial, &mut out);
                out
            }
        };
        suggestions.truncate(COMMAND_COMPLETION_MAX_ITEMS);
        suggestions
    }
}

impl std::fmt::Debug for CompletionCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(_) => f.write_str("CompletionCallback::Function"),
            Self::Interface(_) => f.write_str("CompletionCallback::Interface"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter(AtomicUsize);

    impl CommandHandler for Counter {
        fn command_callback(&self, _: &Registry, _: &CommandContext, args: &CommandArgs) {
            self.0.fetch_add(args.arg_count(), Ordering::SeqCst);
        }
    }

    struct Numbers;

    impl CompletionHandler for Numbers {
        fn complete(&self, _: &Registry, partial: &str, suggestions: &mut Vec<String>) {
            suggestions.extend((0..200).map(|i| format!("{partial}{i}")));
        }
    }

    #[test]
    fn test_every_variant_invokes() {
        let registry = Registry::default();
        let context = CommandContext::default();
        let args = CommandArgs::from_argv(["cmd", "a"]);
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        CommandCallback::context(move |_, _, args| {
            h.fetch_add(args.arg_count(), Ordering::SeqCst);
        })
        .invoke(&registry, &context, &args);
        let h = hits.clone();
        CommandCallback::stateless(move |_| {
            h.fetch_add(10, Ordering::SeqCst);
        })
        .invoke(&registry, &context, &args);
        let h = hits.clone();
        CommandCallback::void(move || {
            h.fetch_add(100, Ordering::SeqCst);
        })
        .invoke(&registry, &context, &args);
        assert_eq!(hits.load(Ordering::SeqCst), 112);

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        CommandCallback::interface(counter.clone()).invoke(&registry, &context, &args);
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_completion_is_capped() {
        let registry = Registry::default();
        let suggestions = CompletionCallback::interface(Arc::new(Numbers)).complete(&registry, "x");
        assert_eq!(suggestions.len(), COMMAND_COMPLETION_MAX_ITEMS);
        assert_eq!(suggestions[0], "x0");

        let few = CompletionCallback::function(|_, p| vec![p.to_uppercase()]).complete(&registry, "ab");
        assert_eq!(few, vec!["AB".to_string()]);
    }
}
