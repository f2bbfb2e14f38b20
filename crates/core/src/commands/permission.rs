//! Permission node naming.

use crate::commands::argument::ArgumentSpec;

/// Turns declared or derived node names into fully qualified nodes.
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver {
    prefix: String,
}

impl PermissionResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim().trim_end_matches('.').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The explicit node if one was given, else `fallback`, qualified with
    /// the prefix. An empty result means no check applies.
    pub fn resolve(&self, explicit: Option<&str>, fallback: &str) -> String {
        let node = explicit
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .unwrap_or(fallback)
            .trim();
        if node.is_empty() {
            return String::new();
        }
        if self.prefix.is_empty() {
            return node.trim_start_matches('.').to_string();
        }
        if node
            .strip_prefix(&self.prefix)
            .is_some_and(|rest| rest.starts_with('.'))
        {
            return node.to_string();
        }
        if node.starts_with('.') {
            return format!("{}{}", self.prefix, node);
        }
        format!("{}.{}", self.prefix, node)
    }

    pub fn command_node(&self, explicit: Option<&str>, command: &str) -> String {
        self.resolve(explicit, &command_base(command, None))
    }

    pub fn subcommand_node(&self, explicit: Option<&str>, command: &str, subcommand: &str) -> String {
        self.resolve(explicit, &command_base(command, Some(subcommand)))
    }

    pub fn argument_node(
        &self,
        command: &str,
        subcommand: Option<&str>,
        spec: &ArgumentSpec,
    ) -> String {
        let mut fallback = command_base(command, subcommand);
        fallback.push_str(if spec.include_argument_segment {
            ".argument."
        } else {
            "."
        });
        let node = spec
            .permission_node
            .as_deref()
            .filter(|node| !node.is_empty())
            .unwrap_or(&spec.name);
        fallback.push_str(node);
        self.resolve(spec.permission.as_deref(), &fallback)
    }

    /// Nodes whose wildcard grants every argument of the action.
    pub fn argument_prefixes(&self, command: &str, subcommand: Option<&str>) -> [String; 2] {
        let base = command_base(command, subcommand);
        [
            self.resolve(None, &format!("{base}.argument")),
            self.resolve(None, &base),
        ]
    }
}

fn command_base(command: &str, subcommand: Option<&str>) -> String {
    let mut base = format!("commands.{}", command.to_lowercase());
    if let Some(subcommand) = subcommand.map(str::trim).filter(|sub| !sub.is_empty()) {
        base.push_str(".subcommand.");
        base.push_str(&subcommand.split_whitespace().collect::<Vec<_>>().join("."));
    }
    base
}
