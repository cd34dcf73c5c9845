//! Converting messages into externally tracked tasks

mod file;

use std::future::Future;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::mail::gateway::GatewayError;
use crate::mail::types::Message;

pub use file::FileTaskSink;

/// Task payload handed to the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// 1 (lowest) to 4 (highest)
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
}

/// Tracker priority for an urgency score
pub fn priority_for_score(score: u8) -> u8 {
    match score {
        5 => 4,
        4 => 3,
        _ => 2,
    }
}

/// When the task should be due, as picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueChoice {
    Today,
    Tomorrow,
    On(NaiveDate),
    /// Whatever the analysis suggested, if anything
    Suggested,
    None,
}

impl DueChoice {
    fn due_string(self, message: &Message, today: NaiveDate) -> Option<String> {
        let date = match self {
            DueChoice::Today => today,
            DueChoice::Tomorrow => today + Duration::days(1),
            DueChoice::On(date) => date,
            DueChoice::Suggested => message.analysis.as_ref()?.suggested_due()?,
            DueChoice::None => return None,
        };
        Some(date.format("%Y-%m-%d").to_string())
    }
}

impl TaskDraft {
    /// Build the task for `message`; `link_base` + id points back at the mail
    pub fn from_message(message: &Message, due: DueChoice, link_base: &str, today: NaiveDate) -> Self {
        let action = message
            .analysis
            .as_ref()
            .map(|a| a.action_item())
            .filter(|a| !a.trim().is_empty())
            .unwrap_or("Review this email");

        Self {
            title: message.subject.clone(),
            description: format!("{}\n\n---\nOpen email: {}{}", action, link_base, message.id),
            priority: priority_for_score(message.score()),
            due_string: due.due_string(message, today),
        }
    }
}

pub trait TaskSink {
    /// Create the task, returning the tracker's id for it
    fn create_task(&self, draft: &TaskDraft) -> impl Future<Output = Result<String, GatewayError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::types::{Analysis, Category};
    use crate::testing::message;

    const LINK: &str = "https://mail.example.com/#inbox/";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 30).unwrap()
    }

    #[test]
    fn test_priority_mapping() {
        assert_eq!(priority_for_score(5), 4);
        assert_eq!(priority_for_score(4), 3);
        assert_eq!(priority_for_score(3), 2);
        assert_eq!(priority_for_score(1), 2);
        assert_eq!(priority_for_score(0), 2);
    }

    #[test]
    fn test_draft_from_scored_message() {
        let mut m = message("abc", 5);
        m.subject = "Pay invoice".to_string();
        m.analysis = Some(
            Analysis::new(
                5,
                "Pay the invoice",
                "",
                NaiveDate::from_ymd_opt(2026, 2, 1),
                Category::Urgent,
            )
            .unwrap(),
        );

        let draft = TaskDraft::from_message(&m, DueChoice::Suggested, LINK, today());
        assert_eq!(draft.title, "Pay invoice");
        assert_eq!(draft.priority, 4);
        assert_eq!(draft.due_string.as_deref(), Some("2026-02-01"));
        assert_eq!(
            draft.description,
            "Pay the invoice\n\n---\nOpen email: https://mail.example.com/#inbox/abc"
        );
    }

    #[test]
    fn test_draft_without_analysis() {
        let m = message("xyz", 0);
        let draft = TaskDraft::from_message(&m, DueChoice::Suggested, LINK, today());
        assert_eq!(draft.priority, 2);
        assert_eq!(draft.due_string, None);
        assert!(draft.description.starts_with("Review this email"));
    }

    #[test]
    fn test_due_choices() {
        let m = message("a", 3);
        let due = |choice| TaskDraft::from_message(&m, choice, LINK, today()).due_string;
        assert_eq!(due(DueChoice::Today).as_deref(), Some("2026-01-30"));
        assert_eq!(due(DueChoice::Tomorrow).as_deref(), Some("2026-01-31"));
        assert_eq!(
            due(DueChoice::On(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())).as_deref(),
            Some("2026-03-01")
        );
        assert_eq!(due(DueChoice::None), None);
    }
}
