use crate::commands::{
    context::SenderRef,
    error::{HandlerResult, InternalError},
    value::{PlayerRef, Value},
};
use rustc_hash::FxHashMap;

/// Resolved values of one invocation, by argument name. Absent optional
/// arguments are stored as `None`.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSet {
    args: FxHashMap<String, Option<Value>>,
}

impl ArgumentSet {
    pub(super) fn new(args: impl IntoIterator<Item = (String, Option<Value>)>) -> Self {
        Self {
            args: args.into_iter().collect(),
        }
    }

    fn get(&self, name: &str) -> HandlerResult<&Value> {
        match self.args.get(name) {
            Some(Some(value)) => Ok(value),
            _ => Err(InternalError::MissingArgument {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// The value if the argument was declared and resolved to something.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.args.get(name).and_then(Option::as_ref)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn get_string(&self, name: &str) -> HandlerResult<String> {
        Ok(self.get(name)?.as_string(name)?.clone())
    }

    pub fn get_integer(&self, name: &str) -> HandlerResult<i32> {
        self.get(name)?.as_integer(name)
    }

    pub fn get_long(&self, name: &str) -> HandlerResult<i64> {
        self.get(name)?.as_long(name)
    }

    pub fn get_float(&self, name: &str) -> HandlerResult<f64> {
        self.get(name)?.as_float(name)
    }

    pub fn get_boolean(&self, name: &str) -> HandlerResult<bool> {
        self.get(name)?.as_boolean(name)
    }

    pub fn get_uuid(&self, name: &str) -> HandlerResult<u128> {
        self.get(name)?.as_uuid(name)
    }

    pub fn get_player(&self, name: &str) -> HandlerResult<PlayerRef> {
        Ok(self.get(name)?.as_player(name)?.clone())
    }

    pub fn get_sender(&self, name: &str) -> HandlerResult<SenderRef> {
        Ok(self.get(name)?.as_sender(name)?.clone())
    }

    pub fn get_optional_string(&self, name: &str) -> HandlerResult<Option<String>> {
        self.value(name)
            .map(|value| value.as_string(name).cloned())
            .transpose()
    }

    pub fn get_optional_integer(&self, name: &str) -> HandlerResult<Option<i32>> {
        self.value(name)
            .map(|value| value.as_integer(name))
            .transpose()
    }

    pub fn get_optional_player(&self, name: &str) -> HandlerResult<Option<PlayerRef>> {
        self.value(name)
            .map(|value| value.as_player(name).cloned())
            .transpose()
    }
}
