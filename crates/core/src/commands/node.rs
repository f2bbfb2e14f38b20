use crate::commands::{
    argument::{ArgumentSpec, PermissionDefault},
    context::{ExecutionContext, SenderRef},
    error::HandlerResult,
};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::{fmt, sync::Arc};

pub type Executor = fn(&mut ExecutionContext<'_>) -> HandlerResult;

pub type ClosureExecutor = Arc<dyn Fn(&mut ExecutionContext<'_>) -> HandlerResult + Send + Sync>;

/// Named completion source a command offers to its arguments. Receives the
/// sender and the token being completed.
pub type SuggestionProvider = Arc<dyn Fn(&SenderRef, &str) -> Vec<String> + Send + Sync>;

#[derive(Clone)]
pub enum Handler {
    Method(Executor),
    Closure(ClosureExecutor),
}

impl Handler {
    pub fn invoke(&self, ctx: &mut ExecutionContext<'_>) -> HandlerResult {
        match self {
            Handler::Method(executor) => executor(ctx),
            Handler::Closure(executor) => executor(ctx),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Method(_) => f.write_str("Handler::Method"),
            Handler::Closure(_) => f.write_str("Handler::Closure"),
        }
    }
}

/// One resolvable unit: the direct form of a command or one of its subcommands.
///
/// A subcommand name may hold several words, such as `zone flag set`. Each
/// word is one level of the subcommand path and aliases stand in for the
/// last word only.
#[derive(Debug, Clone)]
pub struct CommandAction {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: String,
    pub(crate) permission: Option<String>,
    pub(crate) permission_default: PermissionDefault,
    pub(crate) arguments: Vec<ArgumentSpec>,
    pub(crate) handler: Handler,
}

impl CommandAction {
    /// A subcommand named `name`, which may be a whitespace-separated path.
    pub fn new(name: impl Into<String>, executor: Executor) -> Self {
        Self::with_handler(name, Handler::Method(executor))
    }

    pub fn closure<F>(name: impl Into<String>, executor: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Self::with_handler(name, Handler::Closure(Arc::new(executor)))
    }

    fn with_handler(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into().split_whitespace().join(" "),
            aliases: Vec::new(),
            description: String::new(),
            permission: None,
            permission_default: PermissionDefault::Op,
            arguments: Vec::new(),
            handler,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = Some(node.into());
        self
    }

    pub fn permission_default(mut self, default: PermissionDefault) -> Self {
        self.permission_default = default;
        self
    }

    pub fn arg(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// The words of the subcommand path.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.name.split(' ')
    }

    /// How many leading tokens name this action, if they do.
    pub(crate) fn match_path<S: AsRef<str>>(&self, tokens: &[S]) -> Option<usize> {
        let segments: Vec<&str> = self.path().collect();
        let (last, parents) = segments.split_last()?;
        let tail = tokens.get(parents.len())?.as_ref();
        let parents_match = parents
            .iter()
            .zip(tokens)
            .all(|(segment, token)| segment.eq_ignore_ascii_case(token.as_ref()));
        let last_match = last.eq_ignore_ascii_case(tail)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(tail));
        (parents_match && last_match).then_some(segments.len())
    }

    /// Whether the path continues past `prefix`, compared word by word.
    pub(crate) fn extends<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        let mut path = self.path();
        prefix.iter().all(|token| {
            path.next()
                .is_some_and(|segment| segment.eq_ignore_ascii_case(token.as_ref()))
        }) && path.next().is_some()
    }
}

/// A root command: an optional direct action plus named subcommands.
#[derive(Clone)]
pub struct Command {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: String,
    pub(crate) permission: Option<String>,
    pub(crate) permission_default: PermissionDefault,
    pub(crate) direct: Option<CommandAction>,
    pub(crate) subcommands: Vec<CommandAction>,
    pub(crate) providers: FxHashMap<String, SuggestionProvider>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            permission: None,
            permission_default: PermissionDefault::Op,
            direct: None,
            subcommands: Vec::new(),
            providers: FxHashMap::default(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn permission(mut self, node: impl Into<String>) -> Self {
        self.permission = Some(node.into());
        self
    }

    pub fn permission_default(mut self, default: PermissionDefault) -> Self {
        self.permission_default = default;
        self
    }

    /// Sets the action run when no subcommand is named. Its name is ignored.
    pub fn executes(mut self, action: CommandAction) -> Self {
        self.direct = Some(action);
        self
    }

    pub fn subcommand(mut self, action: CommandAction) -> Self {
        self.subcommands.push(action);
        self
    }

    pub fn suggestion_provider<F>(mut self, name: impl Into<String>, provider: F) -> Self
    where
        F: Fn(&SenderRef, &str) -> Vec<String> + Send + Sync + 'static,
    {
        self.providers.insert(name.into(), Arc::new(provider));
        self
    }

    /// Applies runtime overrides, producing the effective command.
    pub fn with_overrides(mut self, overrides: &CommandOverrides) -> Self {
        if let Some(name) = overrides
            .rename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            self.name = name.to_string();
        }
        self.aliases.retain(|alias| {
            !overrides
                .removed_aliases
                .iter()
                .any(|removed| removed.eq_ignore_ascii_case(alias))
        });
        for alias in &overrides.added_aliases {
            let alias = alias.trim();
            if alias.is_empty()
                || alias.eq_ignore_ascii_case(&self.name)
                || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
            {
                continue;
            }
            self.aliases.push(alias.to_string());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn direct(&self) -> Option<&CommandAction> {
        self.direct.as_ref()
    }

    pub fn subcommands(&self) -> &[CommandAction] {
        &self.subcommands
    }

    /// First one-word subcommand whose name or alias equals `token`, ignoring case.
    pub fn find_subcommand(&self, token: &str) -> Option<&CommandAction> {
        self.find_subcommand_path(&[token])
            .map(|(sub, _)| sub)
    }

    /// The subcommand with the longest path named by the leading tokens,
    /// with the number of tokens that path used. Earlier registrations win ties.
    pub fn find_subcommand_path<S: AsRef<str>>(&self, tokens: &[S]) -> Option<(&CommandAction, usize)> {
        self.subcommands
            .iter()
            .rev()
            .filter_map(|sub| sub.match_path(tokens).map(|used| (sub, used)))
            .max_by_key(|(_, used)| *used)
    }

    /// Number of leading tokens forming the deepest path that some
    /// subcommand continues past. Zero when the first token starts none.
    pub(crate) fn intermediate_depth<S: AsRef<str>>(&self, tokens: &[S]) -> usize {
        (1..=tokens.len())
            .rev()
            .find(|&depth| self.subcommands.iter().any(|sub| sub.extends(&tokens[..depth])))
            .unwrap_or(0)
    }

    pub(crate) fn provider(&self, name: &str) -> Option<&SuggestionProvider> {
        self.providers.get(name)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("direct", &self.direct)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// Name and alias changes applied to a command before it is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOverrides {
    pub rename: Option<String>,
    pub added_aliases: Vec<String>,
    pub removed_aliases: Vec<String>,
}

impl CommandOverrides {
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn add_alias(mut self, alias: impl Into<String>) -> Self {
        self.added_aliases.push(alias.into());
        self
    }

    pub fn remove_alias(mut self, alias: impl Into<String>) -> Self {
        self.removed_aliases.push(alias.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::result::CommandResult;

    fn noop(_: &mut ExecutionContext<'_>) -> HandlerResult {
        Ok(CommandResult::success())
    }

    #[test]
    fn subcommands_match_name_or_alias() {
        let command = Command::new("warp")
            .subcommand(CommandAction::new("set", noop).alias("create"))
            .subcommand(CommandAction::new("delete", noop).alias("del"));
        assert_eq!(command.find_subcommand("SET").unwrap().name(), "set");
        assert_eq!(command.find_subcommand("Del").unwrap().name(), "delete");
        assert!(command.find_subcommand("list").is_none());
    }

    #[test]
    fn nested_paths_match_longest_first() {
        let command = Command::new("zone")
            .subcommand(CommandAction::new("flag", noop))
            .subcommand(CommandAction::new("flag  set", noop).alias("put"))
            .subcommand(CommandAction::new("flag clear", noop))
            .subcommand(CommandAction::new("member add", noop));

        let (sub, used) = command.find_subcommand_path(&["FLAG", "put", "pvp"]).unwrap();
        assert_eq!((sub.name(), used), ("flag set", 2));
        assert_eq!(sub.path().collect::<Vec<_>>(), vec!["flag", "set"]);
        let (sub, used) = command.find_subcommand_path(&["flag", "pvp"]).unwrap();
        assert_eq!((sub.name(), used), ("flag", 1));
        assert!(command.find_subcommand_path(&["member"]).is_none());
        assert!(command.find_subcommand_path(&["put"]).is_none());
        assert!(command.find_subcommand("member").is_none());

        assert_eq!(command.intermediate_depth(&["member"]), 1);
        assert_eq!(command.intermediate_depth(&["Flag", "set"]), 1);
        assert_eq!(command.intermediate_depth(&["member", "add"]), 1);
        assert_eq!(command.intermediate_depth(&["claim"]), 0);
    }

    #[test]
    fn overrides_are_applied() {
        let command = Command::new("teleport").alias("tp").alias("tele");
        let overrides = CommandOverrides::default()
            .rename("warpto")
            .remove_alias("TP")
            .add_alias("wt")
            .add_alias("tele")
            .add_alias("WarpTo");
        let command = command.with_overrides(&overrides);
        assert_eq!(command.name(), "warpto");
        assert_eq!(command.aliases(), &["tele".to_string(), "wt".to_string()]);
    }
}
