use crate::commands::{
    context::SenderRef,
    error::{HandlerResult, InternalError},
};
use crate::utils::HyphenatedUUID;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerRef {
    pub id: Option<u128>,
    pub name: String,
}

impl PlayerRef {
    pub fn new(id: Option<u128>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A converted argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Long(i64),
    Float(f64),
    Boolean(bool),
    /// Canonical constant of an enumeration type.
    Choice(String),
    Uuid(u128),
    Player(PlayerRef),
    Sender(SenderRef),
    /// Produced by host parsers for host-defined types.
    Custom {
        type_name: String,
        id: Option<u128>,
        name: Option<String>,
        raw: String,
    },
}

impl Value {
    /// Best-effort identity key used by the generic comparator.
    pub fn identity(&self) -> Option<u128> {
        match self {
            Value::Uuid(id) => Some(*id),
            Value::Player(player) => player.id,
            Value::Sender(sender) => sender.id,
            Value::Custom { id, .. } => *id,
            _ => None,
        }
    }

    /// Best-effort display name used by the generic comparator.
    pub fn name(&self) -> Option<&str> {
        match self {
            Value::Player(player) => Some(&player.name),
            Value::Sender(sender) => Some(&sender.name),
            Value::Custom { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    fn type_error(name: &str, expected: &str) -> InternalError {
        InternalError::WrongArgumentType {
            name: name.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(super) fn as_string(&self, name: &str) -> HandlerResult<&String> {
        match self {
            Value::String(s) | Value::Choice(s) => Ok(s),
            _ => Err(Self::type_error(name, "String").into()),
        }
    }

    pub(super) fn as_integer(&self, name: &str) -> HandlerResult<i32> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(Self::type_error(name, "Integer").into()),
        }
    }

    pub(super) fn as_long(&self, name: &str) -> HandlerResult<i64> {
        match self {
            Value::Long(l) => Ok(*l),
            Value::Integer(i) => Ok(i64::from(*i)),
            _ => Err(Self::type_error(name, "Long").into()),
        }
    }

    pub(super) fn as_float(&self, name: &str) -> HandlerResult<f64> {
        match self {
            Value::Float(f) => Ok(*f),
            _ => Err(Self::type_error(name, "Float").into()),
        }
    }

    pub(super) fn as_boolean(&self, name: &str) -> HandlerResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(Self::type_error(name, "Boolean").into()),
        }
    }

    pub(super) fn as_uuid(&self, name: &str) -> HandlerResult<u128> {
        match self {
            Value::Uuid(id) => Ok(*id),
            _ => Err(Self::type_error(name, "Uuid").into()),
        }
    }

    pub(super) fn as_player(&self, name: &str) -> HandlerResult<&PlayerRef> {
        match self {
            Value::Player(p) => Ok(p),
            _ => Err(Self::type_error(name, "Player").into()),
        }
    }

    pub(super) fn as_sender(&self, name: &str) -> HandlerResult<&SenderRef> {
        match self {
            Value::Sender(s) => Ok(s),
            _ => Err(Self::type_error(name, "Sender").into()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Choice(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Uuid(id) => write!(f, "{}", HyphenatedUUID(*id)),
            Value::Player(player) => write!(f, "{player}"),
            Value::Sender(sender) => f.write_str(&sender.name),
            Value::Custom { raw, .. } => f.write_str(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::argument::SenderKind;

    #[test]
    fn identity_and_name_extraction() {
        let player = Value::Player(PlayerRef::new(Some(7), "Steve"));
        assert_eq!(player.identity(), Some(7));
        assert_eq!(player.name(), Some("Steve"));

        let sender = Value::Sender(SenderRef::new(SenderKind::Console, "Console"));
        assert_eq!(sender.identity(), None);
        assert_eq!(sender.name(), Some("Console"));

        assert_eq!(Value::Integer(3).identity(), None);
        assert_eq!(Value::Integer(3).name(), None);
    }

    #[test]
    fn accessors_report_wrong_type() {
        let err = Value::Integer(1).as_string("label").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: Argument 'label' has wrong type, expected String (command registration bug)"
        );
        assert_eq!(Value::Integer(5).as_long("count").unwrap(), 5);
        assert_eq!(Value::Choice("CREATIVE".into()).as_string("mode").unwrap(), "CREATIVE");
    }
}
