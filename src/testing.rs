//! Shared fixtures and fake collaborators for unit tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{TimeZone, Utc};

use crate::mail::gateway::{GatewayError, MailGateway, RemoteAction};
use crate::mail::types::{Analysis, Category, Message, MessageBody, MessageId, Scope};
use crate::score::Scorer;
use crate::tasks::{TaskDraft, TaskSink};

/// A message with the given urgency score (0 = unscored)
pub fn message(id: &str, score: u8) -> Message {
    Message {
        id: MessageId::new(id),
        thread_id: format!("t-{}", id),
        from_addr: format!("{}@example.com", id),
        from_name: id.to_uppercase(),
        subject: format!("Subject {}", id),
        snippet: format!("Snippet for {}", id),
        date: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        analysis: (score > 0)
            .then(|| Analysis::new(score, "Do the thing", "", None, Category::Normal).unwrap()),
    }
}

pub fn ids(list: &[Message]) -> Vec<&str> {
    list.iter().map(|m| m.id.as_str()).collect()
}

#[derive(Default)]
struct GatewayState {
    inbox: Vec<Message>,
    failing: HashSet<(RemoteAction, MessageId)>,
    list_error: Option<bool>,
    calls: Vec<(RemoteAction, MessageId)>,
}

/// In-memory gateway with scriptable failures. Clones share state.
#[derive(Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl FakeGateway {
    pub fn with_inbox(inbox: Vec<Message>) -> Self {
        let gateway = Self::default();
        gateway.set_inbox(inbox);
        gateway
    }

    pub fn set_inbox(&self, inbox: Vec<Message>) {
        self.state.lock().unwrap().inbox = inbox;
    }

    pub fn fail(&self, action: RemoteAction, id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert((action, MessageId::new(id)));
    }

    /// Make the next listings fail; `unauthorized` picks the error kind
    pub fn fail_listing(&self, unauthorized: bool) {
        self.state.lock().unwrap().list_error = Some(unauthorized);
    }

    pub fn calls(&self) -> Vec<(RemoteAction, MessageId)> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, action: RemoteAction, id: &MessageId) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((action, id.clone()));
        if state.failing.contains(&(action, id.clone())) {
            return Err(GatewayError::Failed(format!("{} rejected", action.verb())));
        }
        Ok(())
    }
}

impl MailGateway for FakeGateway {
    async fn list_unread(&self, _scope: Scope) -> Result<Vec<Message>, GatewayError> {
        let state = self.state.lock().unwrap();
        match state.list_error {
            Some(true) => Err(GatewayError::Unauthorized),
            Some(false) => Err(GatewayError::Failed("listing failed".to_string())),
            None => Ok(state.inbox.clone()),
        }
    }

    async fn get_body(&self, id: &MessageId) -> Result<MessageBody, GatewayError> {
        Ok(MessageBody {
            text: Some(format!("Body of {}", id)),
            html: None,
        })
    }

    async fn set_read(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.record(RemoteAction::MarkRead, id)
    }

    async fn set_unread(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.record(RemoteAction::MarkUnread, id)
    }

    async fn archive(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.record(RemoteAction::Archive, id)
    }

    async fn unarchive(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.record(RemoteAction::Unarchive, id)
    }
}

/// Keeps whatever analysis the message already carries; unscored mail fails
pub struct PresetScorer;

impl Scorer for PresetScorer {
    async fn analyze(&self, message: &Message) -> anyhow::Result<Analysis> {
        message
            .analysis
            .clone()
            .ok_or_else(|| anyhow!("scoring service unavailable"))
    }
}

#[derive(Default)]
struct TaskState {
    created: Vec<TaskDraft>,
    failing_titles: HashSet<String>,
}

/// Records created tasks. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTasks {
    state: Arc<Mutex<TaskState>>,
}

impl FakeTasks {
    pub fn fail_title(&self, title: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_titles
            .insert(title.to_string());
    }

    pub fn created(&self) -> Vec<TaskDraft> {
        self.state.lock().unwrap().created.clone()
    }
}

impl TaskSink for FakeTasks {
    async fn create_task(&self, draft: &TaskDraft) -> Result<String, GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_titles.contains(&draft.title) {
            return Err(GatewayError::Failed("tracker rejected task".to_string()));
        }
        state.created.push(draft.clone());
        Ok(format!("task-{}", state.created.len()))
    }
}
