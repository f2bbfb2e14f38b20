use crate::commands::{argument::SenderKind, result::CommandResult};
use itertools::Itertools;
use thiserror::Error;

/// Why a token list could not be turned into argument values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("This command can only be used by {}", display_kinds(.expected))]
    SenderMismatch { expected: Vec<SenderKind> },
    #[error("Missing required argument '{name}'")]
    MissingRequired { name: String },
    #[error("Invalid value '{raw}' for argument '{name}'")]
    ConversionFailed { name: String, raw: String },
    #[error("Option '{option}' requires a value")]
    MissingOptionValue { option: String },
}

pub(crate) fn display_kinds(kinds: &[SenderKind]) -> String {
    if kinds.is_empty() {
        return SenderKind::Any.to_string();
    }
    kinds.iter().join(", ")
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Permission denied")]
    PermissionDenied,
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("Player '{name}' is not online")]
    PlayerNotFound { name: String },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error("Internal error: Argument '{name}' was not resolved (command registration bug)")]
    MissingArgument { name: String },
    #[error("Internal error: Argument '{name}' has wrong type, expected {expected} (command registration bug)")]
    WrongArgumentType { name: String, expected: String },
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn runtime(message: impl Into<String>) -> Self {
        CommandError::Runtime(RuntimeError::Message(message.into()))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

impl From<ResolveError> for CommandError {
    fn from(err: ResolveError) -> Self {
        CommandError::Runtime(RuntimeError::Resolve(err))
    }
}

/// What handlers and argument accessors return.
pub type HandlerResult<T = CommandResult> = Result<T, CommandError>;
