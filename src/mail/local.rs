//! Mailbox backed by a local TOML file
//!
//! Each `[[messages]]` entry carries the raw sender header, display fields,
//! optional body parts and the `unread`/`archived` flags. Flag changes are
//! written back to the file so state survives restarts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::gateway::{GatewayError, MailGateway};
use super::types::{Message, MessageBody, MessageId, Scope, split_sender};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMessage {
    id: MessageId,
    #[serde(default)]
    thread_id: Option<String>,
    from: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    snippet: String,
    date: DateTime<Utc>,
    #[serde(default)]
    body_text: Option<String>,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default = "default_true")]
    unread: bool,
    #[serde(default)]
    archived: bool,
}

fn default_true() -> bool {
    true
}

impl StoredMessage {
    fn to_message(&self) -> Message {
        let (from_name, from_addr) = split_sender(&self.from);
        Message {
            id: self.id.clone(),
            thread_id: self
                .thread_id
                .clone()
                .unwrap_or_else(|| self.id.to_string()),
            from_addr,
            from_name,
            subject: if self.subject.trim().is_empty() {
                "(No Subject)".to_string()
            } else {
                self.subject.clone()
            },
            snippet: self.snippet.clone(),
            date: self.date,
            analysis: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MailboxFile {
    #[serde(default)]
    messages: Vec<StoredMessage>,
}

pub struct LocalMailbox {
    path: PathBuf,
    file: Mutex<MailboxFile>,
}

impl LocalMailbox {
    /// Open the mailbox at `path`. A missing file is an empty mailbox.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GatewayError> {
        let path = path.into();
        let file = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| {
                GatewayError::Failed(format!("invalid mailbox file {}: {}", path.display(), e))
            })?
        } else {
            tracing::warn!("Mailbox file {} not found, starting empty", path.display());
            MailboxFile::default()
        };
        tracing::info!(
            "Opened mailbox {} ({} messages)",
            path.display(),
            file.messages.len()
        );
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, MailboxFile>, GatewayError> {
        self.file
            .lock()
            .map_err(|_| GatewayError::Failed("mailbox lock poisoned".to_string()))
    }

    fn persist(&self, file: &MailboxFile) -> Result<(), GatewayError> {
        write_file(&self.path, file)
    }

    fn list_unread_on(&self, scope: Scope, today: NaiveDate) -> Result<Vec<Message>, GatewayError> {
        let window = scope.window(today);
        let file = self.lock()?;
        let mut hits: Vec<&StoredMessage> = file
            .messages
            .iter()
            .filter(|m| m.unread && !m.archived)
            .filter(|m| window.contains(m.date.with_timezone(&Local).date_naive()))
            .collect();
        // Newest first, like a provider listing
        hits.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(hits.into_iter().map(StoredMessage::to_message).collect())
    }

    fn update(
        &self,
        id: &MessageId,
        change: impl FnOnce(&mut StoredMessage),
    ) -> Result<(), GatewayError> {
        let mut file = self.lock()?;
        let stored = file
            .messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        change(stored);
        self.persist(&file)
    }

    /// Write a small demo mailbox to `path`
    pub fn write_sample(path: &Path) -> Result<(), GatewayError> {
        let now = Utc::now();
        let minutes_ago = |m: i64| now - chrono::Duration::minutes(m);
        let sample = |id: &str, from: &str, subject: &str, snippet: &str, age: i64| StoredMessage {
            id: MessageId::new(id),
            thread_id: None,
            from: from.to_string(),
            subject: subject.to_string(),
            snippet: snippet.to_string(),
            date: minutes_ago(age),
            body_text: Some(snippet.to_string()),
            body_html: None,
            unread: true,
            archived: false,
        };
        let file = MailboxFile {
            messages: vec![
                sample(
                    "sample-1",
                    "Dana Fields <dana@billing.example.com>",
                    "Invoice overdue - payment needed ASAP",
                    "Your invoice is past due. Please pay by end of day today.",
                    15,
                ),
                sample(
                    "sample-2",
                    "Lincoln Elementary <office@school.example.org>",
                    "Permission slip for Friday's field trip",
                    "Please sign and return the permission slip by tomorrow.",
                    60,
                ),
                sample(
                    "sample-3",
                    "Deals Weekly <news@deals.example.com>",
                    "This week's newsletter: 40% off",
                    "Click to unsubscribe from future promotional emails.",
                    120,
                ),
                sample(
                    "sample-4",
                    "sam@example.com",
                    "Lunch next week?",
                    "Are you free for lunch sometime next week?",
                    240,
                ),
            ],
        };
        write_file(path, &file)
    }
}

fn write_file(path: &Path, file: &MailboxFile) -> Result<(), GatewayError> {
    let content = toml::to_string_pretty(file)
        .map_err(|e| GatewayError::Failed(format!("failed to serialize mailbox: {}", e)))?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl MailGateway for LocalMailbox {
    async fn list_unread(&self, scope: Scope) -> Result<Vec<Message>, GatewayError> {
        self.list_unread_on(scope, Local::now().date_naive())
    }

    async fn get_body(&self, id: &MessageId) -> Result<MessageBody, GatewayError> {
        let file = self.lock()?;
        let stored = file
            .messages
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        Ok(MessageBody {
            text: stored.body_text.clone(),
            html: stored.body_html.clone(),
        })
    }

    async fn set_read(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.update(id, |m| m.unread = false)
    }

    async fn set_unread(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.update(id, |m| m.unread = true)
    }

    async fn archive(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.update(id, |m| m.archived = true)
    }

    async fn unarchive(&self, id: &MessageId) -> Result<(), GatewayError> {
        self.update(id, |m| m.archived = false)
    }
}
