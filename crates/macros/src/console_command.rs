//! Console command attribute macro implementation
//!
//! Provides the `#[console_command]` attribute for ergonomic command registration.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, Expr, Ident, ItemFn, LitStr, Token};

/// Arguments to the console_command attribute
///
/// Usage:
/// - `#[console_command("say", "Print a message")]`
/// - `#[console_command("kick", "Kick a player", flags = ConVarFlags::RELEASE)]`
pub struct ConsoleCommandArgs {
    /// Command name (e.g., "say")
    pub name: LitStr,
    /// Help text
    pub help: LitStr,
    /// Flag expression OR-ed into the registration
    pub flags: Option<Expr>,
}

impl Parse for ConsoleCommandArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name: LitStr = input.parse()?;
        if name.value().is_empty() {
            return Err(syn::Error::new(name.span(), "command name cannot be empty"));
        }
        input.parse::<Token![,]>()?;
        let help: LitStr = input.parse()?;

        let flags = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            let ident: Ident = input.parse()?;
            if ident != "flags" {
                return Err(syn::Error::new(ident.span(), "expected `flags`"));
            }
            input.parse::<Token![=]>()?;
            Some(input.parse::<Expr>()?)
        } else {
            None
        };

        Ok(Self { name, help, flags })
    }
}

/// Generate the console_command implementation
pub fn generate_console_command(args: ConsoleCommandArgs, func: ItemFn) -> TokenStream {
    let fn_name = &func.sig.ident;
    let fn_vis = &func.vis;

    let command_name = &args.name;
    let command_help = &args.help;

    let handle_static_name = Ident::new(
        &format!("__{}_COMMAND_HANDLE", fn_name.to_string().to_uppercase()),
        fn_name.span(),
    );
    let register_fn_name = Ident::new(&format!("{}_register", fn_name), fn_name.span());
    let unregister_fn_name = Ident::new(&format!("{}_unregister", fn_name), fn_name.span());

    let flags = match &args.flags {
        Some(expr) => quote! { #expr },
        None => quote! { ::cvarkit_core::convars::ConVarFlags::empty() },
    };

    quote! {
        static #handle_static_name: ::std::sync::OnceLock<
            ::cvarkit_core::registry::Deferred<::cvarkit_core::sdk::ConCommandRef>,
        > = ::std::sync::OnceLock::new();

        #func

        /// Register this command with the process-wide registry
        ///
        /// Queued until the registry is ready; the handle resolves then.
        #fn_vis fn #register_fn_name()
            -> ::cvarkit_core::registry::Deferred<::cvarkit_core::sdk::ConCommandRef>
        {
            let setup = ::cvarkit_core::commands::ConCommandSetup::new(
                #command_name,
                ::cvarkit_core::commands::CommandCallback::context(#fn_name),
            )
            .with_help(#command_help)
            .with_flags(#flags);

            let handle = ::cvarkit_core::register_command(setup);
            let _ = #handle_static_name.set(handle.clone());
            handle
        }

        /// Detach this command's callback from the process-wide registry
        #fn_vis fn #unregister_fn_name() -> bool {
            let Some(handle) = #handle_static_name.get() else {
                return false;
            };
            let Some(registry) = ::cvarkit_core::try_registry() else {
                return false;
            };
            registry.unregister_command_callbacks(handle.get()) > 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_help() {
        let args: ConsoleCommandArgs = syn::parse_str(r#""say", "Print a message""#).unwrap();
        assert_eq!(args.name.value(), "say");
        assert_eq!(args.help.value(), "Print a message");
        assert!(args.flags.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let args: ConsoleCommandArgs =
            syn::parse_str(r#""kick", "Kick a player", flags = ConVarFlags::RELEASE"#).unwrap();
        assert!(args.flags.is_some());
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(syn::parse_str::<ConsoleCommandArgs>(r#""kick", "Kick", permission = "x""#).is_err());
        assert!(syn::parse_str::<ConsoleCommandArgs>(r#""", "Empty""#).is_err());
    }

    #[test]
    fn test_generates_helpers() {
        let args: ConsoleCommandArgs = syn::parse_str(r#""say", "Print a message""#).unwrap();
        let func: ItemFn = syn::parse_str(
            "fn cmd_say(registry: &Registry, context: &CommandContext, args: &CommandArgs) {}",
        )
        .unwrap();
        let output = generate_console_command(args, func).to_string();
        assert!(output.contains("cmd_say_register"));
        assert!(output.contains("cmd_say_unregister"));
        assert!(output.contains("__CMD_SAY_COMMAND_HANDLE"));
    }
}
