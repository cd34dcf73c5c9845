//! Task sink that appends tasks to a local TOML file

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{TaskDraft, TaskSink};
use crate::mail::gateway::GatewayError;

#[derive(Serialize)]
struct TaskRecord<'a> {
    id: &'a str,
    created: DateTime<Utc>,
    #[serde(flatten)]
    draft: &'a TaskDraft,
}

#[derive(Serialize)]
struct TaskEntry<'a> {
    tasks: [TaskRecord<'a>; 1],
}

pub struct FileTaskSink {
    path: PathBuf,
}

impl FileTaskSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn new_task_id() -> Result<String, GatewayError> {
        let mut bytes = [0u8; 8];
        getrandom::fill(&mut bytes)
            .map_err(|e| GatewayError::Failed(format!("failed to generate task id: {}", e)))?;
        Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

impl TaskSink for FileTaskSink {
    async fn create_task(&self, draft: &TaskDraft) -> Result<String, GatewayError> {
        let id = Self::new_task_id()?;
        let entry = TaskEntry {
            tasks: [TaskRecord {
                id: &id,
                created: Utc::now(),
                draft,
            }],
        };
        let block = toml::to_string(&entry)
            .map_err(|e| GatewayError::Failed(format!("failed to serialize task: {}", e)))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", block)?;

        tracing::info!("Created task {} ({})", id, draft.title);
        Ok(id)
    }
}
