use crate::{
    commands::{
        argument::ArgumentSpec,
        argument_set::ArgumentSet,
        autocomplete::SuggestionGenerator,
        condition::ConditionEvaluator,
        context::{CommandPlatform, ExecutionContext, SenderRef},
        error::{display_kinds, CommandError, ResolveError},
        invocation::Invocation,
        node::{Command, CommandAction},
        parser::TypeParserRegistry,
        permission::PermissionResolver,
        registry::CommandRegistry,
        resolver::{ArgumentResolver, ResolvedArguments},
        result::CommandResult,
        usage,
    },
    config::{EngineConfig, Messages},
};
use itertools::Itertools;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};
use tracing::{debug, error};

/// Looks commands up, gates them on permissions, resolves their arguments
/// and runs their handlers.
pub struct Dispatcher {
    platform: Arc<dyn CommandPlatform>,
    parsers: TypeParserRegistry,
    permissions: PermissionResolver,
    registry: CommandRegistry,
    messages: Messages,
}

impl Dispatcher {
    pub fn new(platform: Arc<dyn CommandPlatform>, parsers: TypeParserRegistry) -> Self {
        Self::with_config(platform, parsers, &EngineConfig::default())
    }

    pub fn with_config(
        platform: Arc<dyn CommandPlatform>,
        parsers: TypeParserRegistry,
        config: &EngineConfig,
    ) -> Self {
        Self {
            platform,
            parsers,
            permissions: PermissionResolver::new(config.permission_prefix.as_str()),
            registry: CommandRegistry::new(config.namespace.as_str()),
            messages: config.messages.clone(),
        }
    }

    pub fn platform(&self) -> &dyn CommandPlatform {
        self.platform.as_ref()
    }

    pub fn parsers(&self) -> &TypeParserRegistry {
        &self.parsers
    }

    pub fn parsers_mut(&mut self) -> &mut TypeParserRegistry {
        &mut self.parsers
    }

    pub fn permissions(&self) -> &PermissionResolver {
        &self.permissions
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn register(&self, command: Command) -> Arc<Command> {
        self.registry.register(command)
    }

    /// Registered commands the sender passes the command-level check for.
    pub fn visible_commands(&self, sender: &SenderRef) -> Vec<Arc<Command>> {
        self.registry
            .commands()
            .into_iter()
            .filter(|command| Invocation::new(self, sender, command).has_command_permission())
            .collect()
    }

    /// Splits a raw line such as `/tp Steve` and dispatches it.
    pub fn dispatch_line(&self, sender: &SenderRef, line: &str) -> CommandResult {
        let mut words = line.trim().trim_start_matches('/').split_whitespace();
        let Some(label) = words.next() else {
            return CommandResult::success();
        };
        let tokens: Vec<String> = words.map(str::to_string).collect();
        self.dispatch(label, sender, &tokens)
    }

    /// Completions for a raw line. Trailing whitespace starts a new, empty token.
    pub fn suggest_line(&self, sender: &SenderRef, line: &str) -> Vec<String> {
        let line = line.trim_start().trim_start_matches('/');
        let mut words = line.split_whitespace();
        let Some(label) = words.next() else {
            return Vec::new();
        };
        let mut tokens: Vec<String> = words.map(str::to_string).collect();
        if line.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }
        self.suggest(label, sender, &tokens)
    }

    /// Runs `label` with `tokens`. Never panics: a panic anywhere in
    /// routing, resolution or the handler becomes an execution error.
    pub fn dispatch(&self, label: &str, sender: &SenderRef, tokens: &[String]) -> CommandResult {
        match panic::catch_unwind(AssertUnwindSafe(|| self.route(label, sender, tokens))) {
            Ok(result) => result,
            Err(payload) => {
                error!("/{} panicked: {}", label, panic_message(payload.as_ref()));
                CommandResult::failure(self.messages.execution_error.as_str())
            }
        }
    }

    pub fn suggest(&self, label: &str, sender: &SenderRef, tokens: &[String]) -> Vec<String> {
        let suggest = || {
            let Some(command) = self.registry.get(label) else {
                return Vec::new();
            };
            let inv = Invocation::new(self, sender, &command);
            if !inv.has_command_permission() {
                return Vec::new();
            }
            SuggestionGenerator::new(inv).suggest(tokens)
        };
        panic::catch_unwind(AssertUnwindSafe(suggest)).unwrap_or_else(|payload| {
            error!(
                "Completing /{} panicked: {}",
                label,
                panic_message(payload.as_ref())
            );
            Vec::new()
        })
    }

    fn route(&self, label: &str, sender: &SenderRef, tokens: &[String]) -> CommandResult {
        let Some(command) = self.registry.get(label) else {
            return self.not_found(label, sender);
        };
        debug!("{} issued /{} {}", sender.name, command.name, tokens.join(" "));

        let inv = Invocation::new(self, sender, &command);
        if !inv.has_command_permission() {
            return CommandResult::failure(self.messages.no_permission.as_str());
        }

        let direct = command.direct.as_ref();
        if command.subcommands.is_empty() || tokens.is_empty() {
            return match direct {
                Some(direct) => self.run_direct(inv, direct, tokens),
                None if command.subcommands.is_empty() => {
                    CommandResult::success_with(self.messages.executed.as_str())
                }
                None => self.missing_subcommand(inv, &[], None),
            };
        }

        let found = command.find_subcommand_path(tokens);
        let depth = command.intermediate_depth(tokens);
        if depth > found.map_or(0, |(_, used)| used) {
            let (path, rest) = tokens.split_at(depth);
            return self.missing_subcommand(inv, path, rest.first());
        }

        let Some((sub, used)) = found else {
            return match direct {
                Some(direct) => self.run_direct(inv, direct, tokens),
                None => self.missing_subcommand(inv, &[], tokens.first()),
            };
        };
        let inv = inv.with_subcommand(Some(sub));
        if !inv.can_reach(sub) {
            debug!("{} may not use /{} {}", sender.name, command.name, sub.name);
            return CommandResult::failure(self.messages.no_permission.as_str());
        }
        self.run_action(inv, sub, &tokens[used..])
    }

    /// Runs the direct action, which requires the command node. Access
    /// granted through a subcommand does not extend to it.
    fn run_direct(&self, inv: Invocation<'_>, direct: &CommandAction, tokens: &[String]) -> CommandResult {
        if !inv.has_command_node() {
            debug!(
                "{} may use subcommands of /{} but not the command itself",
                inv.sender.name, inv.command.name
            );
            return CommandResult::failure(self.messages.no_permission.as_str());
        }
        self.run_action(inv, direct, tokens)
    }

    /// The tokens stop at `path`, which names no action. `next` is the word
    /// after it that matched nothing, if any.
    fn missing_subcommand(&self, inv: Invocation<'_>, path: &[String], next: Option<&String>) -> CommandResult {
        let children = inv.visible_children(path);
        if children.is_empty() && !path.is_empty() {
            return CommandResult::failure(self.messages.no_permission.as_str());
        }
        let subcommands = children.join(", ");
        match next {
            Some(next) => CommandResult::failure(Messages::format(
                &self.messages.unknown_subcommand,
                &[("subcommand", next.as_str()), ("subcommands", subcommands.as_str())],
            )),
            None => CommandResult::failure(Messages::format(
                &self.messages.specify_subcommand,
                &[("subcommands", subcommands.as_str())],
            )),
        }
    }

    fn not_found(&self, label: &str, sender: &SenderRef) -> CommandResult {
        let visible = self
            .visible_commands(sender)
            .iter()
            .map(|command| command.name.clone())
            .join(", ");
        if visible.is_empty() {
            CommandResult::failure(Messages::format(
                &self.messages.not_found,
                &[("command", label)],
            ))
        } else {
            CommandResult::failure(Messages::format(
                &self.messages.not_found_with_alternatives,
                &[("command", label), ("commands", visible.as_str())],
            ))
        }
    }

    fn run_action(&self, inv: Invocation<'_>, action: &CommandAction, tokens: &[String]) -> CommandResult {
        let resolved = match ArgumentResolver::new(inv).resolve(&action.arguments, tokens) {
            Ok(resolved) => resolved,
            Err(ResolveError::SenderMismatch { expected }) => {
                let expected = display_kinds(&expected);
                return CommandResult::failure(Messages::format(
                    &self.messages.sender_mismatch,
                    &[("expected", expected.as_str())],
                ));
            }
            Err(err) => {
                debug!("Could not resolve arguments of /{}: {}", inv.command.name, err);
                let usage = usage::action_usage(&inv, action);
                return CommandResult::failure(Messages::format(
                    &self.messages.invalid_arguments,
                    &[("usage", usage.as_str())],
                ));
            }
        };

        if !self.arguments_permitted(&inv, &action.arguments, &resolved) {
            return CommandResult::failure(self.messages.no_permission.as_str());
        }

        let names = action.arguments.iter().map(|spec| spec.name.clone());
        let arguments = ArgumentSet::new(names.zip(resolved.values));
        let mut ctx = ExecutionContext::new(&inv, tokens, arguments);

        match action.handler.invoke(&mut ctx) {
            Ok(result) => result,
            Err(CommandError::Runtime(err)) => CommandResult::failure(err.to_string()),
            Err(CommandError::Internal(err)) => {
                error!("/{} failed: {}", inv.command.name, err);
                CommandResult::failure(self.messages.execution_error.as_str())
            }
        }
    }

    /// Checks conditional argument permissions against the resolved values.
    /// An argument already replaced by its default because of a missing
    /// permission is not checked again unless its condition looks at other
    /// arguments.
    fn arguments_permitted(
        &self,
        inv: &Invocation<'_>,
        specs: &[ArgumentSpec],
        resolved: &ResolvedArguments,
    ) -> bool {
        let evaluator = ConditionEvaluator::new(inv.parsers(), inv.sender);
        for (i, spec) in specs.iter().enumerate() {
            if inv.is_sender_argument(spec) {
                continue;
            }
            if resolved.gated[i] && spec.condition_args.is_empty() {
                continue;
            }
            let Some(node) = inv.argument_permission(spec) else {
                continue;
            };
            if !evaluator.applies(spec, resolved.values[i].as_ref(), specs, &resolved.values) {
                continue;
            }
            if !self
                .platform
                .has_permission(inv.sender, &node, spec.permission_default)
            {
                debug!(
                    "{} lacks {} for argument {} of /{}",
                    inv.sender.name, node, spec.name, inv.command.name
                );
                return false;
            }
        }
        true
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
