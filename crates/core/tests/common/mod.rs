#![allow(dead_code)]

use cmdforge_core::commands::{
    CommandPlatform, Dispatcher, PermissionDefault, PlayerDirectory, PlayerRef, SenderRef,
    TypeParserRegistry,
};
use cmdforge_core::{EngineConfig, PermissionSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PREFIX: &str = "forge";

#[derive(Default)]
struct State {
    permissions: HashMap<String, PermissionSet>,
    messages: Vec<(String, String)>,
    registered: Vec<String>,
}

/// Records everything the engine asks of the host.
#[derive(Default)]
pub struct TestPlatform {
    state: Mutex<State>,
}

impl TestPlatform {
    pub fn new() -> Arc<TestPlatform> {
        let platform = TestPlatform::default();
        platform.with_permissions("Console", |set| set.set_op(true));
        Arc::new(platform)
    }

    fn with_permissions(&self, sender: &str, f: impl FnOnce(&mut PermissionSet)) {
        let mut state = self.state.lock().unwrap();
        f(state.permissions.entry(sender.to_string()).or_default());
    }

    pub fn grant(&self, sender: &str, node: &str) {
        self.with_permissions(sender, |set| set.grant(node));
    }

    pub fn deny(&self, sender: &str, node: &str) {
        self.with_permissions(sender, |set| set.deny(node));
    }

    pub fn set_op(&self, sender: &str, op: bool) {
        self.with_permissions(sender, |set| set.set_op(op));
    }

    /// Messages sent to `sender` since the last call.
    pub fn take_messages(&self, sender: &str) -> Vec<String> {
        let mut state = self.state.lock().unwrap();
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.messages)
            .into_iter()
            .partition(|(to, _)| to == sender);
        state.messages = kept;
        taken.into_iter().map(|(_, message)| message).collect()
    }

    pub fn registered(&self) -> Vec<String> {
        self.state.lock().unwrap().registered.clone()
    }
}

impl CommandPlatform for TestPlatform {
    fn has_permission(&self, sender: &SenderRef, node: &str, default: PermissionDefault) -> bool {
        let state = self.state.lock().unwrap();
        match state.permissions.get(&sender.name) {
            Some(set) => set.has(node, default),
            None => default.grants(false),
        }
    }

    fn send_message(&self, sender: &SenderRef, message: &str) {
        self.state
            .lock()
            .unwrap()
            .messages
            .push((sender.name.clone(), message.to_string()));
    }

    fn register_permission(&self, node: &str, _default: PermissionDefault, _description: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.registered.iter().any(|registered| registered == node) {
            state.registered.push(node.to_string());
        }
    }
}

pub struct Online;

impl PlayerDirectory for Online {
    fn online_players(&self) -> Vec<PlayerRef> {
        vec![
            PlayerRef::new(Some(1), "Alice"),
            PlayerRef::new(Some(2), "Steve"),
            PlayerRef::new(Some(3), "Bob"),
        ]
    }
}

pub fn alice() -> SenderRef {
    SenderRef::player(1, "Alice")
}

pub fn steve() -> SenderRef {
    SenderRef::player(2, "Steve")
}

pub fn player(id: u128, name: &str) -> PlayerRef {
    PlayerRef::new(Some(id), name)
}

pub struct Harness {
    pub platform: Arc<TestPlatform>,
    pub dispatcher: Dispatcher,
}

pub fn harness() -> Harness {
    let platform = TestPlatform::new();
    let config = EngineConfig {
        permission_prefix: PREFIX.to_string(),
        namespace: PREFIX.to_string(),
        ..EngineConfig::default()
    };
    let parsers = TypeParserRegistry::with_defaults(Arc::new(Online));
    let dispatcher = Dispatcher::with_config(platform.clone(), parsers, &config);
    Harness {
        platform,
        dispatcher,
    }
}

pub fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
