//! A few commands to play with in the console.

use cmdforge_core::commands::{
    ArgumentSpec, Command, CommandAction, CommandResult, Dispatcher, ExecutionContext,
    HandlerResult, PermissionCondition, PermissionDefault, PlayerRef, RuntimeError, SenderKind,
    ValueType,
};

fn gamemodes() -> ValueType {
    ValueType::enumeration("gamemode", ["SURVIVAL", "CREATIVE", "ADVENTURE", "SPECTATOR"])
}

fn target_or_self(ctx: &ExecutionContext<'_>, name: &str) -> HandlerResult<PlayerRef> {
    match ctx.args().get_optional_player(name)? {
        Some(player) => Ok(player),
        None => ctx.player(),
    }
}

pub fn register_commands(dispatcher: &Dispatcher) {
    fn exec_tp(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let target = ctx.args().get_player("target")?;
        let Some(destination) = ctx.args().get_optional_player("destination")? else {
            return Err(RuntimeError::Message("Specify a player to teleport to".into()).into());
        };
        Ok(CommandResult::success_with(format!(
            "Teleported {} to {}",
            target.name, destination.name
        )))
    }

    fn exec_heal(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let target = target_or_self(ctx, "target")?;
        if ctx.args().get_boolean("silent")? {
            return Ok(CommandResult::success());
        }
        Ok(CommandResult::success_with(format!("Healed {}", target.name)))
    }

    fn exec_kick(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let target = ctx.args().get_player("target")?;
        let reason = ctx.args().get_string("reason")?;
        ctx.reply(&format!("{} was kicked by {}: {}", target.name, ctx.sender().name, reason))?;
        Ok(CommandResult::success())
    }

    fn exec_broadcast(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let message = ctx.args().get_string("message")?;
        let line = match ctx.args().get_optional_string("prefix")? {
            Some(prefix) => format!("{prefix} {message}"),
            None => message,
        };
        ctx.reply(&line)?;
        Ok(CommandResult::success())
    }

    fn exec_gamemode_set(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let mode = ctx.args().get_string("mode")?.to_lowercase();
        let target = target_or_self(ctx, "target")?;
        Ok(CommandResult::success_with(format!(
            "Set {}'s game mode to {}",
            target.name, mode
        )))
    }

    fn exec_gamemode_get(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let target = target_or_self(ctx, "target")?;
        Ok(CommandResult::success_with(format!(
            "{} is in survival mode",
            target.name
        )))
    }

    dispatcher.register(
        Command::new("tp")
            .alias("teleport")
            .description("Teleports a player to another player")
            .executes(
                CommandAction::new("tp", exec_tp)
                    .arg(ArgumentSpec::player("target"))
                    .arg(
                        ArgumentSpec::player("destination")
                            .default_value("self")
                            .permission("")
                            .condition(PermissionCondition::Other, Vec::<String>::new()),
                    ),
            ),
    );

    dispatcher.register(
        Command::new("heal")
            .description("Restores a player's health")
            .permission_default(PermissionDefault::True)
            .executes(
                CommandAction::new("heal", exec_heal)
                    .arg(
                        ArgumentSpec::player("target")
                            .optional()
                            .permission("")
                            .permission_node("others")
                            .without_argument_segment()
                            .condition(PermissionCondition::Other, Vec::<String>::new()),
                    )
                    .arg(ArgumentSpec::new("silent", ValueType::Boolean).flag(&["silent"], &["s"])),
            ),
    );

    dispatcher.register(
        Command::new("kick")
            .description("Disconnects a player")
            .suggestion_provider("reasons", |_, _| {
                vec!["Spamming".to_string(), "Griefing".to_string(), "AFK".to_string()]
            })
            .executes(
                CommandAction::new("kick", exec_kick)
                    .arg(ArgumentSpec::player("target"))
                    .arg(
                        ArgumentSpec::string("reason")
                            .greedy()
                            .default_value("Kicked by an operator")
                            .suggest("reasons"),
                    ),
            ),
    );

    dispatcher.register(
        Command::new("broadcast")
            .alias("bc")
            .description("Sends a message to everyone")
            .executes(
                CommandAction::new("broadcast", exec_broadcast)
                    .arg(ArgumentSpec::string("message").greedy())
                    .arg(
                        ArgumentSpec::string("prefix")
                            .option(&["prefix"], &["p"])
                            .suggest("{[Info],[Alert],[Event]}"),
                    ),
            ),
    );

    dispatcher.register(
        Command::new("gamemode")
            .alias("gm")
            .description("Changes or shows game modes")
            .executes(
                CommandAction::new("gamemode", exec_gamemode_set)
                    .arg(ArgumentSpec::sender("sender", ValueType::Player, &[SenderKind::Player]))
                    .arg(ArgumentSpec::new("mode", gamemodes())),
            )
            .subcommand(
                CommandAction::new("set", exec_gamemode_set)
                    .alias("s")
                    .description("Sets a player's game mode")
                    .arg(ArgumentSpec::new("mode", gamemodes()))
                    .arg(
                        ArgumentSpec::player("target")
                            .optional()
                            .permission("")
                            .permission_node("others")
                            .condition(PermissionCondition::Other, Vec::<String>::new()),
                    ),
            )
            .subcommand(
                CommandAction::new("get", exec_gamemode_get)
                    .description("Shows a player's game mode")
                    .permission_default(PermissionDefault::True)
                    .arg(ArgumentSpec::player("target").optional()),
            ),
    );
}
