//! Console commands
//!
//! Commands are registered with a [`ConCommandSetup`] and dispatched through
//! the [`Registry`](crate::registry::Registry) with a [`CommandContext`] and
//! tokenized [`CommandArgs`].
//!
//! # Example
//!
//! ```ignore
//! use cvarkit_core::commands::{CommandArgs, CommandCallback, CommandContext, ConCommandSetup};
//!
//! let say = registry.register_command(
//!     ConCommandSetup::new("say", CommandCallback::context(|_, context, args| {
//!         context.reply(args.arg_s());
//!     }))
//!     .with_help("Print a message"),
//! );
//!
//! let args = CommandArgs::tokenize("say hello world")?;
//! registry.dispatch_command(say, &CommandContext::server(), &args);
//! ```

mod args;
mod builtin;
mod callback;
mod context;
mod creation;
mod dispatch;
mod record;
pub mod tokenizer;

pub use args::CommandArgs;
pub use builtin::register_builtin_commands;
pub use callback::{
    CommandCallback, CommandHandler, CompletionCallback, CompletionHandler,
    COMMAND_COMPLETION_MAX_ITEMS,
};
pub use context::CommandContext;
pub use creation::ConCommandSetup;
pub use tokenizer::{
    split_commands, tokenize, tokenize_with, TokenizeError, COMMAND_MAX_ARGC, COMMAND_MAX_LENGTH,
    DEFAULT_BREAK_SET,
};

pub(crate) use record::{CommandCallbackEntry, ConCommandRecord};

pub use cvarkit_sdk::{CommandTarget, ConCommandRef, PlayerSlot};
