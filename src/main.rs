mod demo;

use anyhow::Result;
use clap::Parser;
use cmdforge_core::commands::{
    register_builtins, CommandPlatform, Dispatcher, PermissionDefault, PlayerDirectory, PlayerRef,
    SenderKind, SenderRef, TypeParserRegistry,
};
use cmdforge_core::{EngineConfig, PermissionSet};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Interactive console for trying commands against the dispatcher.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Name of the sender issuing commands
    #[arg(long, default_value = "Console")]
    sender: String,

    /// Issue commands as a player instead of the console
    #[arg(long)]
    player: bool,

    /// Treat the sender as an operator
    #[arg(long)]
    op: bool,

    /// Grant a permission node (repeatable, wildcards allowed)
    #[arg(long = "grant", value_name = "NODE")]
    grants: Vec<String>,

    /// Deny a permission node (repeatable, wildcards allowed)
    #[arg(long = "deny", value_name = "NODE")]
    denials: Vec<String>,

    /// Engine configuration file, created with defaults when missing
    #[arg(long, default_value = "cmdforge.toml")]
    config: String,

    /// Online players known to the player parser
    #[arg(long, value_delimiter = ',', default_value = "Steve,Alex")]
    players: Vec<String>,
}

struct ConsolePlatform {
    permissions: PermissionSet,
}

impl CommandPlatform for ConsolePlatform {
    fn has_permission(&self, sender: &SenderRef, node: &str, default: PermissionDefault) -> bool {
        if sender.kind == SenderKind::Console {
            return true;
        }
        self.permissions.has(node, default)
    }

    fn send_message(&self, _sender: &SenderRef, message: &str) {
        println!("{message}");
    }

    fn register_permission(&self, node: &str, default: PermissionDefault, description: &str) {
        tracing::trace!("Permission {} ({:?}): {}", node, default, description);
    }
}

struct OnlinePlayers(Vec<PlayerRef>);

impl PlayerDirectory for OnlinePlayers {
    fn online_players(&self) -> Vec<PlayerRef> {
        self.0.clone()
    }
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "cmdforge.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("CMDFORGE_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let config = EngineConfig::load(&args.config)?;

    let mut permissions = PermissionSet::new();
    permissions.set_op(args.op);
    for node in &args.grants {
        permissions.grant(node);
    }
    for node in &args.denials {
        permissions.deny(node);
    }

    let players: Vec<PlayerRef> = args
        .players
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .zip(1u128..)
        .map(|(name, id)| PlayerRef::new(Some(id), name))
        .collect();
    let sender = if args.player {
        SenderRef::player(0, args.sender.as_str())
    } else {
        SenderRef::new(SenderKind::Console, args.sender.as_str())
    };

    let parsers = TypeParserRegistry::with_defaults(Arc::new(OnlinePlayers(players)));
    let dispatcher = Dispatcher::with_config(Arc::new(ConsolePlatform { permissions }), parsers, &config);
    register_builtins(&dispatcher);
    demo::register_commands(&dispatcher);

    info!(
        "Ready. Sending as {} ({}). Type /help, ?<command> for completions, exit to stop.",
        sender.name, sender.kind
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);
        match input.trim() {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }

        if let Some(partial) = input.trim_start().strip_prefix('?') {
            let suggestions = dispatcher.suggest_line(&sender, partial);
            if suggestions.is_empty() {
                println!("(no suggestions)");
            } else {
                println!("{}", suggestions.join("  "));
            }
            continue;
        }

        let result = dispatcher.dispatch_line(&sender, input);
        if result.send_message && !result.message.is_empty() {
            println!("{}", result.message);
        }
        if !result.success {
            info!("{} failed: {}", input.trim(), result.message);
        }
    }
    Ok(())
}
