//! Offline scorer based on keyword signals
//!
//! Looks for urgency, deadline, school and newsletter phrases in the subject
//! and snippet using case-insensitive multi-pattern matching.

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};

use super::Scorer;
use crate::mail::types::{Analysis, Category, Message};

const URGENT_PHRASES: &[&str] = &[
    "asap",
    "urgent",
    "eod",
    "end of day",
    "immediately",
    "right away",
    "overdue",
    "final notice",
];

const DEADLINE_PHRASES: &[&str] = &[
    "deadline",
    "due",
    "invoice",
    "payment",
    "billing",
    "action required",
    "waiting on",
    "reminder",
    "by tomorrow",
    "by today",
];

const SCHOOL_PHRASES: &[&str] = &[
    "permission slip",
    "report card",
    "early dismissal",
    "field trip",
    "parent-teacher",
];

const UNSUBSCRIBE_PHRASES: &[&str] = &[
    "unsubscribe",
    "newsletter",
    "promotion",
    "promotional",
    "% off",
    "limited time",
];

const TODAY_PHRASES: &[&str] = &["today", "end of day", "eod", "tonight"];

const TOMORROW_PHRASES: &[&str] = &["tomorrow"];

const SUMMARY_CHARS: usize = 200;

pub struct KeywordScorer {
    urgent: AhoCorasick,
    deadline: AhoCorasick,
    school: AhoCorasick,
    unsubscribe: AhoCorasick,
    today: AhoCorasick,
    tomorrow: AhoCorasick,
    school_domains: Vec<String>,
}

fn matcher(patterns: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .context("Failed to build keyword matcher")
}

impl KeywordScorer {
    /// Build a scorer; senders under any of `school_domains` count as school mail
    pub fn new(school_domains: &[String]) -> Result<Self> {
        Ok(Self {
            urgent: matcher(URGENT_PHRASES)?,
            deadline: matcher(DEADLINE_PHRASES)?,
            school: matcher(SCHOOL_PHRASES)?,
            unsubscribe: matcher(UNSUBSCRIBE_PHRASES)?,
            today: matcher(TODAY_PHRASES)?,
            tomorrow: matcher(TOMORROW_PHRASES)?,
            school_domains: school_domains
                .iter()
                .map(|d| d.trim().trim_start_matches('@').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        })
    }

    fn is_school_sender(&self, addr: &str) -> bool {
        let addr = addr.to_ascii_lowercase();
        let Some((_, domain)) = addr.rsplit_once('@') else {
            return false;
        };
        self.school_domains
            .iter()
            .any(|d| domain == d || domain.ends_with(&format!(".{}", d)))
    }

    pub(crate) fn analyze_on(&self, message: &Message, today: NaiveDate) -> Result<Analysis> {
        let text = format!("{}\n{}", message.subject, message.snippet);

        let urgent_hits = self.urgent.find_iter(&text).count();
        let deadline_hits = self.deadline.find_iter(&text).count();
        let school =
            self.school.is_match(&text) || self.is_school_sender(&message.from_addr);
        let promo = self.unsubscribe.is_match(&text);

        let mut score = match (urgent_hits, deadline_hits) {
            (0, 0) => 2,
            (0, 1) => 3,
            (0, _) => 4,
            (1, 0) => 4,
            _ => 5,
        };
        if school {
            score = score.max(3);
        }
        if promo && urgent_hits == 0 {
            score = 1;
        }

        let category = if score >= 4 {
            Category::Urgent
        } else if school {
            Category::School
        } else if promo {
            Category::UnsubscribeCandidate
        } else {
            Category::Normal
        };

        let suggested_due = if self.today.is_match(&text) {
            Some(today)
        } else if self.tomorrow.is_match(&text) {
            Some(today + Duration::days(1))
        } else {
            None
        };

        let action_item = match category {
            Category::Urgent => format!("Respond to {}: {}", message.from_name, message.subject),
            Category::School => format!("Review school notice: {}", message.subject),
            Category::UnsubscribeCandidate => {
                format!("Consider unsubscribing from {}", message.from_name)
            }
            Category::Normal => "Review email".to_string(),
        };
        let summary: String = message.snippet.chars().take(SUMMARY_CHARS).collect();

        Ok(Analysis::new(
            score,
            action_item,
            summary,
            suggested_due,
            category,
        )?)
    }
}

impl Scorer for KeywordScorer {
    async fn analyze(&self, message: &Message) -> Result<Analysis> {
        self.analyze_on(message, Local::now().date_naive())
    }
}
