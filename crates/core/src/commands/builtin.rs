use crate::commands::{
    argument::{ArgumentSpec, PermissionDefault},
    context::ExecutionContext,
    error::HandlerResult,
    executor::Dispatcher,
    node::{Command, CommandAction},
    result::CommandResult,
};

/// Registers the commands every dispatcher ships with.
pub fn register_builtins(dispatcher: &Dispatcher) {
    register_help(dispatcher);
}

fn register_help(dispatcher: &Dispatcher) {
    fn exec_help_command(ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        let Some(label) = ctx.args().get_optional_string("command")? else {
            let mut commands = Vec::new();
            for command in ctx.visible_commands() {
                if command.aliases().is_empty() {
                    commands.push(format!("/{}", command.name()));
                } else {
                    commands.push(format!(
                        "/{} (Aliases: {})",
                        command.name(),
                        command.aliases().join(", ")
                    ));
                }
            }

            ctx.reply("Run /help <command> for more information.")?;
            ctx.reply("Available commands:")?;
            for cmd in commands {
                ctx.reply(&format!(" {}", cmd))?;
            }
            return Ok(CommandResult::success());
        };

        let visible = ctx.visible_commands();
        let Some(command) = ctx
            .find_command(&label)
            .filter(|found| visible.iter().any(|command| command.name() == found.name()))
        else {
            return Ok(CommandResult::failure(format!("Command not found: {}", label)));
        };

        ctx.reply(&format!("Usage: {}", ctx.usage(&command)))?;
        if !command.description_text().is_empty() {
            ctx.reply(command.description_text())?;
        }
        let subcommands = ctx.subcommand_usages(&command);
        if !subcommands.is_empty() {
            ctx.reply("Subcommands:")?;
            for usage in subcommands {
                ctx.reply(&format!(" {usage}"))?;
            }
        }
        Ok(CommandResult::success())
    }

    dispatcher.register(
        Command::new("help")
            .description("Lists commands or shows how to use one")
            .permission_default(PermissionDefault::True)
            .executes(
                CommandAction::new("help", exec_help_command)
                    .arg(ArgumentSpec::string("command").optional().suggest("@commands")),
            ),
    );
}
