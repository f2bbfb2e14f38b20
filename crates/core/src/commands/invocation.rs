use crate::commands::{
    argument::ArgumentSpec,
    context::{CommandPlatform, SenderRef},
    executor::Dispatcher,
    node::{Command, CommandAction},
    parser::TypeParserRegistry,
    value::Value,
};
use indexmap::IndexSet;
use tracing::debug;

/// One sender acting on one command, optionally scoped to a subcommand.
/// Carries everything permission checks and conversions need.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub(crate) dispatcher: &'a Dispatcher,
    pub(crate) sender: &'a SenderRef,
    pub(crate) command: &'a Command,
    pub(crate) subcommand: Option<&'a CommandAction>,
}

impl<'a> Invocation<'a> {
    pub fn new(dispatcher: &'a Dispatcher, sender: &'a SenderRef, command: &'a Command) -> Self {
        Self {
            dispatcher,
            sender,
            command,
            subcommand: None,
        }
    }

    pub fn with_subcommand(self, subcommand: Option<&'a CommandAction>) -> Self {
        Self { subcommand, ..self }
    }

    pub(crate) fn platform(&self) -> &'a dyn CommandPlatform {
        self.dispatcher.platform()
    }

    pub(crate) fn parsers(&self) -> &'a TypeParserRegistry {
        self.dispatcher.parsers()
    }

    fn command_name(&self) -> String {
        self.command.name.to_lowercase()
    }

    fn subcommand_name(&self) -> Option<&'a str> {
        self.subcommand.map(|sub| sub.name.as_str())
    }

    pub(crate) fn is_sender_argument(&self, spec: &ArgumentSpec) -> bool {
        spec.sender_bound || self.platform().is_sender_type(&spec.value_type)
    }

    /// The resolved node guarding `spec`, or `None` when it declares none.
    pub(crate) fn argument_permission(&self, spec: &ArgumentSpec) -> Option<String> {
        if !spec.declares_permission() {
            return None;
        }
        let command = self.command_name();
        let node =
            self.dispatcher
                .permissions()
                .argument_node(&command, self.subcommand_name(), spec);
        let description = match self.subcommand_name() {
            Some(sub) => format!("Argument {} for /{} {}", spec.name, command, sub),
            None => format!("Argument {} for /{}", spec.name, command),
        };
        self.platform()
            .register_permission(&node, spec.permission_default, &description);
        (!node.is_empty()).then_some(node)
    }

    pub(crate) fn lacks_argument_permission(&self, spec: &ArgumentSpec) -> bool {
        if self.is_sender_argument(spec) {
            return false;
        }
        self.argument_permission(spec).is_some_and(|node| {
            !self
                .platform()
                .has_permission(self.sender, &node, spec.permission_default)
        })
    }

    /// Whether completions may be offered for `spec`.
    pub(crate) fn can_see_argument(&self, spec: &ArgumentSpec) -> bool {
        !self.is_sender_argument(spec) && !self.lacks_argument_permission(spec)
    }

    pub(crate) fn convert(&self, raw: &str, spec: &ArgumentSpec) -> Option<Value> {
        self.parsers().convert(raw, &spec.value_type, self.sender)
    }

    pub(crate) fn command_permission(&self) -> String {
        let node = self
            .dispatcher
            .permissions()
            .command_node(self.command.permission.as_deref(), &self.command.name);
        self.platform().register_permission(
            &node,
            self.command.permission_default,
            &self.command.description,
        );
        node
    }

    /// Access to the command itself, which the direct action requires: the
    /// command node or an argument wildcard on it.
    pub(crate) fn has_command_node(&self) -> bool {
        let node = self.command_permission();
        node.is_empty()
            || self
                .platform()
                .has_permission(self.sender, &node, self.command.permission_default)
            || self.has_argument_override(None)
    }

    /// Command-level access, including the partial-access fallback: a
    /// sender denied the command node still gets in when some subcommand
    /// is open to them or they hold an argument wildcard.
    pub(crate) fn has_command_permission(&self) -> bool {
        if self.has_command_node() {
            return true;
        }
        let granted = self.command.subcommands.iter().any(|sub| self.can_reach(sub));
        if !granted {
            debug!(
                "Permission denied for {} on /{}",
                self.sender.name, self.command.name
            );
        }
        granted
    }

    pub(crate) fn can_access_action(&self, action: &CommandAction) -> bool {
        let node = self.dispatcher.permissions().subcommand_node(
            action.permission.as_deref(),
            &self.command.name,
            &action.name,
        );
        self.platform()
            .register_permission(&node, action.permission_default, &action.description);
        node.is_empty()
            || self
                .platform()
                .has_permission(self.sender, &node, action.permission_default)
    }

    pub(crate) fn has_argument_override(&self, subcommand: Option<&CommandAction>) -> bool {
        let prefixes = self.dispatcher.permissions().argument_prefixes(
            &self.command_name(),
            subcommand.map(|sub| sub.name.as_str()),
        );
        let prefixes = [prefixes[0].as_str(), prefixes[1].as_str()];
        self.platform()
            .has_permission_by_prefix(self.sender, &prefixes)
    }

    /// Whether the sender may run `action`, directly or through an argument wildcard.
    pub(crate) fn can_reach(&self, action: &CommandAction) -> bool {
        self.can_access_action(action) || self.has_argument_override(Some(action))
    }

    /// Names and aliases of the top-level subcommands this sender may run.
    pub(crate) fn visible_subcommand_names(&self) -> Vec<String> {
        self.visible_children::<&str>(&[])
    }

    /// Next path words below `path` that lead to a subcommand this sender
    /// may run. Aliases are listed for words that end a subcommand.
    pub(crate) fn visible_children<S: AsRef<str>>(&self, path: &[S]) -> Vec<String> {
        let mut names = IndexSet::new();
        for sub in &self.command.subcommands {
            if !sub.extends(path) || !self.can_reach(sub) {
                continue;
            }
            let Some(segment) = sub.path().nth(path.len()) else {
                continue;
            };
            names.insert(segment.to_string());
            if sub.path().count() == path.len() + 1 {
                names.extend(sub.aliases.iter().cloned());
            }
        }
        names.into_iter().collect()
    }
}
