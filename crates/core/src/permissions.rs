//! In-memory permission nodes for one sender.

use crate::commands::PermissionDefault;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug, Clone)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    fn parse(name: &str, value: bool) -> Self {
        let path = name
            .trim()
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_lowercase()),
            })
            .collect();
        PermissionNode { path, value }
    }

    /// A trailing `*` covers one or more further segments.
    fn matches(&self, node: &str) -> bool {
        let mut segments = node.split('.');
        for expected in &self.path {
            match expected {
                PathSegment::WildCard => return segments.next().is_some(),
                PathSegment::Named(name) => match segments.next() {
                    Some(segment) if segment.eq_ignore_ascii_case(name) => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }

    fn is_exact(&self) -> bool {
        !self.path.contains(&PathSegment::WildCard)
    }
}

/// Explicit grants and denials, wildcards included, plus an operator flag
/// that feeds [`PermissionDefault`] for nodes nobody set.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    nodes: Vec<PermissionNode>,
    op: bool,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator() -> Self {
        Self {
            nodes: Vec::new(),
            op: true,
        }
    }

    pub fn is_op(&self) -> bool {
        self.op
    }

    pub fn set_op(&mut self, op: bool) {
        self.op = op;
    }

    pub fn grant(&mut self, node: &str) {
        self.insert(node, true);
    }

    pub fn deny(&mut self, node: &str) {
        self.insert(node, false);
    }

    pub fn insert(&mut self, node: &str, value: bool) {
        self.nodes.push(PermissionNode::parse(node, value));
    }

    /// The explicit value for `node`. Exact entries beat wildcards, longer
    /// wildcards beat shorter ones and later entries beat earlier ones.
    pub fn value(&self, node: &str) -> Option<bool> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(node))
            .max_by_key(|(i, entry)| (entry.is_exact(), entry.path.len(), *i))
            .map(|(_, entry)| entry.value)
    }

    pub fn has(&self, node: &str, default: PermissionDefault) -> bool {
        self.value(node)
            .unwrap_or_else(|| default.grants(self.op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_and_precedence() {
        let mut perms = PermissionSet::new();
        perms.grant("forge.commands.*");
        perms.deny("forge.commands.kick");
        assert_eq!(perms.value("forge.commands.heal"), Some(true));
        assert_eq!(perms.value("forge.commands.heal.argument.target"), Some(true));
        assert_eq!(perms.value("Forge.Commands.Kick"), Some(false));
        assert_eq!(perms.value("forge.commands"), None);
        assert_eq!(perms.value("forge.other"), None);

        perms.deny("forge.commands.heal.*");
        assert_eq!(perms.value("forge.commands.heal.argument.target"), Some(false));
        assert!(!perms.has("forge.commands.heal.argument.*", PermissionDefault::True));
    }

    #[test]
    fn defaults_follow_operator_flag() {
        let player = PermissionSet::new();
        let op = PermissionSet::operator();
        assert!(!player.has("forge.commands.tp", PermissionDefault::Op));
        assert!(op.has("forge.commands.tp", PermissionDefault::Op));
        assert!(player.has("forge.commands.tp", PermissionDefault::NotOp));
        assert!(!op.has("forge.commands.tp", PermissionDefault::NotOp));
        assert!(!op.has("forge.commands.tp", PermissionDefault::False));
    }
}
