//! cvarkit - interactive console host
//!
//! Loads the registry config, installs logging, declares the console's own
//! commands, installs the process-wide registry and then executes console
//! lines. Lines given on the command line are executed in order and the
//! process exits; otherwise lines are read from stdin until EOF or `quit`.

mod exec;

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

use cvarkit_core::commands::{register_builtin_commands, CommandArgs, CommandContext};
use cvarkit_core::config::{config_path, RegistryConfig};
use cvarkit_core::{console_command, ready, Registry};

static QUIT: AtomicBool = AtomicBool::new(false);

#[console_command("echo", "Print the arguments back to the console")]
fn cmd_echo(_registry: &Registry, context: &CommandContext, args: &CommandArgs) {
    context.reply(args.arg_s());
}

#[console_command("quit", "Leave the console")]
fn cmd_quit(_registry: &Registry, _context: &CommandContext, _args: &CommandArgs) {
    QUIT.store(true, Ordering::Release);
}

fn load_config() -> RegistryConfig {
    let loaded = config_path().and_then(|path| RegistryConfig::load_or_default(&path));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cvarkit: using default config ({e})");
            RegistryConfig::default()
        }
    }
}

fn init_logging(config: &RegistryConfig) {
    let level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() {
    let config = load_config();
    init_logging(&config);

    // Declared before the registry exists; resolved by ready()
    cmd_echo_register();
    cmd_quit_register();

    let registry = match ready(Registry::new(config)) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Failed to install registry: {}", e);
            std::process::exit(1);
        }
    };
    register_builtin_commands(registry);

    let context = CommandContext::server();
    let lines: Vec<String> = std::env::args().skip(1).collect();
    if !lines.is_empty() {
        for line in &lines {
            exec::execute_line(registry, &context, line);
        }
        return;
    }

    tracing::info!("cvarkit console ready, type `help <name>`, `find <text>` or `quit`");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        exec::execute_line(registry, &context, &line);
        registry.process_queued_sets();

        if QUIT.load(Ordering::Acquire) {
            break;
        }
    }

    let detached = [cmd_echo_unregister(), cmd_quit_unregister()];
    tracing::debug!("Console commands detached: {:?}", detached);
}
