//! UI/backend events and error modeling for the desktop controller.

use shared::domain::{UserId, UserRecord};

pub enum UiEvent {
    Info(String),
    UsersLoaded(Vec<UserRecord>),
    UsersLoadFailed(String),
    UserResolved(UserRecord),
    UserResolutionFailed { id: UserId, message: String },
    CreateFinished { success: bool },
    CreateFailed(String),
    UpdateFinished { id: UserId },
    UpdateFailed { id: UserId, message: String },
    DeleteFinished { id: UserId },
    DeleteFailed { id: UserId, message: String },
    BackendFailed(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    NotFound,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadUsers,
    CreateUser,
    ResolveUser,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("404") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unreachable")
            || message_lower.contains("refused")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_failures_as_transport() {
        let err = UiError::from_message(UiErrorContext::LoadUsers, "connection refused");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::LoadUsers);
    }

    #[test]
    fn classifies_missing_record_as_not_found() {
        let err = UiError::from_message(UiErrorContext::ResolveUser, "user 9 not found");
        assert_eq!(err.category(), UiErrorCategory::NotFound);
    }

    #[test]
    fn classifies_required_field_messages_as_validation() {
        let err = UiError::from_message(UiErrorContext::CreateUser, "Telephone is required.");
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn falls_back_to_unknown_for_unrecognized_messages() {
        let err = UiError::from_message(UiErrorContext::BackendStartup, "something odd happened");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "something odd happened");
    }
}
