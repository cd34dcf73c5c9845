//! Mail provider boundary
//!
//! The triage core never talks to a provider directly; everything goes
//! through [`MailGateway`] so hosted APIs and the local mailbox file are
//! interchangeable.

use std::future::Future;

use super::types::{Message, MessageBody, MessageId, Scope};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No usable session; the user has to sign in again
    #[error("not signed in")]
    Unauthorized,
    #[error("message {0} not found")]
    NotFound(MessageId),
    /// Provider answered with a non-success status or the transport failed
    #[error("request failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Remote side effects that can be applied to a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteAction {
    MarkRead,
    MarkUnread,
    Archive,
    Unarchive,
}

impl RemoteAction {
    /// The call that reverses this one
    pub fn inverse(self) -> Self {
        match self {
            RemoteAction::MarkRead => RemoteAction::MarkUnread,
            RemoteAction::MarkUnread => RemoteAction::MarkRead,
            RemoteAction::Archive => RemoteAction::Unarchive,
            RemoteAction::Unarchive => RemoteAction::Archive,
        }
    }

    /// Verb used in error messages ("failed to archive")
    pub fn verb(self) -> &'static str {
        match self {
            RemoteAction::MarkRead => "mark as read",
            RemoteAction::MarkUnread => "mark as unread",
            RemoteAction::Archive => "archive",
            RemoteAction::Unarchive => "unarchive",
        }
    }
}

pub trait MailGateway {
    /// Unread messages inside `scope`, in provider (fetch) order
    fn list_unread(&self, scope: Scope)
    -> impl Future<Output = Result<Vec<Message>, GatewayError>>;

    fn get_body(&self, id: &MessageId) -> impl Future<Output = Result<MessageBody, GatewayError>>;

    fn set_read(&self, id: &MessageId) -> impl Future<Output = Result<(), GatewayError>>;

    fn set_unread(&self, id: &MessageId) -> impl Future<Output = Result<(), GatewayError>>;

    fn archive(&self, id: &MessageId) -> impl Future<Output = Result<(), GatewayError>>;

    fn unarchive(&self, id: &MessageId) -> impl Future<Output = Result<(), GatewayError>>;

    /// Dispatch a [`RemoteAction`] to the matching call
    fn apply(
        &self,
        action: RemoteAction,
        id: &MessageId,
    ) -> impl Future<Output = Result<(), GatewayError>> {
        async move {
            match action {
                RemoteAction::MarkRead => self.set_read(id).await,
                RemoteAction::MarkUnread => self.set_unread(id).await,
                RemoteAction::Archive => self.archive(id).await,
                RemoteAction::Unarchive => self.unarchive(id).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_pairs() {
        assert_eq!(RemoteAction::MarkRead.inverse(), RemoteAction::MarkUnread);
        assert_eq!(RemoteAction::Archive.inverse(), RemoteAction::Unarchive);
        for action in [
            RemoteAction::MarkRead,
            RemoteAction::MarkUnread,
            RemoteAction::Archive,
            RemoteAction::Unarchive,
        ] {
            assert_eq!(action.inverse().inverse(), action);
        }
    }
}
