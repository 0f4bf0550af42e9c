//! cvarkit Proc Macros
//!
//! This crate provides the `#[console_command]` attribute, which turns a
//! plain function into a console command registered through the
//! process-wide registry.
//!
//! # Console Command Example
//!
//! ```ignore
//! use cvarkit_core::commands::{CommandArgs, CommandContext};
//! use cvarkit_core::{console_command, Registry};
//!
//! #[console_command("say", "Print a message")]
//! fn cmd_say(_registry: &Registry, context: &CommandContext, args: &CommandArgs) {
//!     context.reply(args.arg_s());
//! }
//!
//! // With extra flags:
//! #[console_command("kick", "Kick a player", flags = ConVarFlags::RELEASE)]
//! fn cmd_kick(_registry: &Registry, context: &CommandContext, args: &CommandArgs) {
//!     context.reply(&format!("kicking {}", args.arg(1)));
//! }
//!
//! // Generated:
//! // - cmd_say() - The command handler, unchanged
//! // - cmd_say_register() - Queue or register the command
//! // - cmd_say_unregister() - Detach the command's callback
//! ```

mod console_command;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

/// Attribute macro for console command registration
///
/// Keeps the function as written and generates helper functions for
/// registration and unregistration.
///
/// # Arguments
///
/// - First argument: Command name (e.g., `"say"`)
/// - Second argument: Help text (e.g., `"Print a message"`)
/// - Optional: `flags = <expr>` - Flags OR-ed into the registration
///
/// The function must have the signature
/// `fn(&Registry, &CommandContext, &CommandArgs)`.
///
/// # Generated Code
///
/// - `{name}_register()` - Submit the command; returns a `Deferred` handle
///   that resolves once the registry is ready
/// - `{name}_unregister()` - Detach the callback, `false` if nothing was registered
/// - A static holding the command handle
#[proc_macro_attribute]
pub fn console_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as console_command::ConsoleCommandArgs);
    let func = parse_macro_input!(item as ItemFn);
    console_command::generate_console_command(args, func).into()
}
