use crate::commands::{
    argument::{ArgumentSpec, PermissionDefault, SenderKind, ValueType},
    argument_set::ArgumentSet,
    error::{HandlerResult, ResolveError, RuntimeError},
    invocation::Invocation,
    node::Command,
    usage,
    value::{PlayerRef, Value},
};
use std::sync::Arc;

/// The parts of the invoking sender the engine is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SenderRef {
    pub kind: SenderKind,
    pub name: String,
    pub id: Option<u128>,
}

impl SenderRef {
    pub fn new(kind: SenderKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: None,
        }
    }

    pub fn player(id: u128, name: impl Into<String>) -> Self {
        Self {
            kind: SenderKind::Player,
            name: name.into(),
            id: Some(id),
        }
    }

    pub fn console() -> Self {
        Self::new(SenderKind::Console, "Console")
    }

    pub fn is_player(&self) -> bool {
        self.kind == SenderKind::Player
    }

    pub fn as_player(&self) -> Option<PlayerRef> {
        self.is_player()
            .then(|| PlayerRef::new(self.id, self.name.clone()))
    }

    /// Whether this sender is accepted by a list of allowed kinds. An empty
    /// list or one containing [`SenderKind::Any`] accepts everyone.
    pub fn is_any_of(&self, kinds: &[SenderKind]) -> bool {
        kinds.is_empty() || kinds.contains(&SenderKind::Any) || kinds.contains(&self.kind)
    }
}

/// Capabilities the host application provides to the engine.
pub trait CommandPlatform: Send + Sync {
    fn has_permission(&self, sender: &SenderRef, node: &str, default: PermissionDefault) -> bool;

    fn send_message(&self, sender: &SenderRef, message: &str);

    /// Whether the sender holds a wildcard below any of `prefixes`.
    fn has_permission_by_prefix(&self, sender: &SenderRef, prefixes: &[&str]) -> bool {
        prefixes.iter().filter(|prefix| !prefix.is_empty()).any(|prefix| {
            self.has_permission(sender, &format!("{prefix}.*"), PermissionDefault::Op)
        })
    }

    fn resolve_sender_argument(
        &self,
        sender: &SenderRef,
        spec: &ArgumentSpec,
    ) -> Result<Value, ResolveError> {
        if !sender.is_any_of(&spec.sender_kinds) {
            return Err(ResolveError::SenderMismatch {
                expected: spec.sender_kinds.clone(),
            });
        }
        match &spec.value_type {
            ValueType::Player => sender.as_player().map(Value::Player).ok_or_else(|| {
                ResolveError::SenderMismatch {
                    expected: vec![SenderKind::Player],
                }
            }),
            _ => Ok(Value::Sender(sender.clone())),
        }
    }

    fn is_sender_type(&self, value_type: &ValueType) -> bool {
        matches!(value_type, ValueType::Sender)
    }

    /// Announces a permission node before it is checked.
    fn register_permission(&self, _node: &str, _default: PermissionDefault, _description: &str) {}
}

/// What a handler sees while it runs.
pub struct ExecutionContext<'a> {
    invocation: &'a Invocation<'a>,
    raw_args: &'a [String],
    arguments: ArgumentSet,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        invocation: &'a Invocation<'a>,
        raw_args: &'a [String],
        arguments: ArgumentSet,
    ) -> Self {
        Self {
            invocation,
            raw_args,
            arguments,
        }
    }

    pub fn args(&self) -> &ArgumentSet {
        &self.arguments
    }

    /// Tokens handed to the action, before resolution.
    pub fn raw_args(&self) -> &[String] {
        self.raw_args
    }

    pub fn sender(&self) -> &SenderRef {
        self.invocation.sender
    }

    pub fn command(&self) -> &Command {
        self.invocation.command
    }

    pub fn reply(&self, message: &str) -> HandlerResult<()> {
        self.invocation
            .dispatcher
            .platform()
            .send_message(self.invocation.sender, message);
        Ok(())
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.invocation.dispatcher.platform().has_permission(
            self.invocation.sender,
            permission,
            PermissionDefault::Op,
        )
    }

    pub fn require_permission(&self, permission: &str) -> HandlerResult<()> {
        if !self.has_permission(permission) {
            return Err(RuntimeError::PermissionDenied.into());
        }
        Ok(())
    }

    pub fn player(&self) -> HandlerResult<PlayerRef> {
        self.invocation
            .sender
            .as_player()
            .ok_or_else(|| RuntimeError::PlayerOnly.into())
    }

    /// Every command the sender may use, sorted by name.
    pub fn visible_commands(&self) -> Vec<Arc<Command>> {
        self.invocation.dispatcher.visible_commands(self.invocation.sender)
    }

    pub fn find_command(&self, label: &str) -> Option<Arc<Command>> {
        self.invocation.dispatcher.registry().get(label)
    }

    pub fn usage(&self, command: &Command) -> String {
        usage::generate_usage(command, self.invocation.dispatcher.platform())
    }

    pub fn subcommand_usages(&self, command: &Command) -> Vec<String> {
        usage::generate_subcommand_usages(command, self.invocation.dispatcher.platform())
    }
}
