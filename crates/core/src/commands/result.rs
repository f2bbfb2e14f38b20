/// Outcome of one dispatch, ready to be shown to the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    /// Whether the host should forward `message` to the sender.
    pub send_message: bool,
}

impl CommandResult {
    /// Silent success.
    pub fn success() -> Self {
        Self {
            success: true,
            message: String::new(),
            send_message: false,
        }
    }

    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            send_message: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            send_message: true,
        }
    }
}

impl Default for CommandResult {
    fn default() -> Self {
        Self::success()
    }
}
