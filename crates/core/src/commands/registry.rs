use super::node::{Command, CommandOverrides};
use arc_swap::ArcSwap;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, warn};

type CommandIndex = FxHashMap<String, Arc<Command>>;

/// Name and alias index of the registered commands. Lookups read a snapshot
/// without locking; registration publishes a new snapshot.
pub struct CommandRegistry {
    namespace: String,
    commands: ArcSwap<CommandIndex>,
}

impl CommandRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim().to_lowercase(),
            commands: ArcSwap::from_pointee(CommandIndex::default()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registers `command`, replacing any command with the same name.
    pub fn register(&self, command: Command) -> Arc<Command> {
        let command = Arc::new(command);
        let keys = self.keys(&command);
        debug!("Registering /{} under {}", command.name, keys.iter().join(", "));
        self.commands.rcu(|current| {
            let mut next = CommandIndex::clone(current);
            let name = command.name.to_lowercase();
            next.retain(|_, existing| existing.name.to_lowercase() != name);
            for key in &keys {
                if let Some(previous) = next.insert(key.clone(), Arc::clone(&command)) {
                    warn!(
                        "'{}' of /{} shadows /{}",
                        key, command.name, previous.name
                    );
                }
            }
            next
        });
        command
    }

    pub fn register_with_overrides(&self, command: Command, overrides: &CommandOverrides) -> Arc<Command> {
        self.register(command.with_overrides(overrides))
    }

    /// Removes the command reachable as `label` together with all of its
    /// names and aliases.
    pub fn unregister(&self, label: &str) -> bool {
        let Some(command) = self.get(label) else {
            return false;
        };
        self.commands.rcu(|current| {
            let mut next = CommandIndex::clone(current);
            next.retain(|_, existing| !Arc::ptr_eq(existing, &command));
            next
        });
        debug!("Unregistered /{}", command.name);
        true
    }

    /// Looks up a name, alias or `namespace:name`, ignoring case and a
    /// leading slash.
    pub fn get(&self, label: &str) -> Option<Arc<Command>> {
        let label = label.trim().trim_start_matches('/').to_lowercase();
        self.commands.load().get(&label).cloned()
    }

    /// Every registered command once, sorted by name.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.commands
            .load()
            .values()
            .unique_by(|command| Arc::as_ptr(*command))
            .cloned()
            .sorted_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .collect()
    }

    fn keys(&self, command: &Command) -> Vec<String> {
        let labels = std::iter::once(&command.name)
            .chain(&command.aliases)
            .map(|label| label.trim().to_lowercase())
            .filter(|label| !label.is_empty());
        let mut keys = Vec::new();
        for label in labels.unique() {
            if !self.namespace.is_empty() {
                keys.push(format!("{}:{}", self.namespace, label));
            }
            keys.push(label);
        }
        keys
    }
}
