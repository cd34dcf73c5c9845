use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Stable, provider-assigned message identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Classification attached by the scorer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Urgent,
    School,
    UnsubscribeCandidate,
    #[default]
    Normal,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Urgent => "urgent",
            Category::School => "school",
            Category::UnsubscribeCandidate => "unsubscribe",
            Category::Normal => "normal",
        }
    }
}

/// Lowest and highest urgency score a scorer may assign
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Score at or above which a message counts as urgent
pub const URGENT_SCORE: u8 = 4;

/// Maximum summary length (in chars) for the fallback analysis
const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Error returned when a scorer hands back an out-of-range score
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("urgency score {0} outside {MIN_SCORE}..={MAX_SCORE}")]
pub struct InvalidScore(pub u8);

/// Scoring result for a single message.
///
/// Fields are private so an analysis is always complete: it is either built
/// through [`Analysis::new`] (which validates the score and derives the
/// urgent flag) or is the deterministic [`Analysis::fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    score: u8,
    urgent: bool,
    action_item: String,
    summary: String,
    suggested_due: Option<NaiveDate>,
    category: Category,
}

impl Analysis {
    pub fn new(
        score: u8,
        action_item: impl Into<String>,
        summary: impl Into<String>,
        suggested_due: Option<NaiveDate>,
        category: Category,
    ) -> Result<Self, InvalidScore> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(InvalidScore(score));
        }
        Ok(Self {
            score,
            urgent: score >= URGENT_SCORE,
            action_item: action_item.into(),
            summary: summary.into(),
            suggested_due,
            category,
        })
    }

    /// Analysis substituted whenever scoring fails
    pub fn fallback(snippet: &str) -> Self {
        Self {
            score: 2,
            urgent: false,
            action_item: "Review email".to_string(),
            summary: snippet.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
            suggested_due: None,
            category: Category::Normal,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn action_item(&self) -> &str {
        &self.action_item
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn suggested_due(&self) -> Option<NaiveDate> {
        self.suggested_due
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub thread_id: String,
    pub from_addr: String,
    pub from_name: String,
    pub subject: String,
    pub snippet: String,
    pub date: DateTime<Utc>,
    pub analysis: Option<Analysis>,
}

impl Message {
    /// Urgency score used for ranking; unscored messages sort last
    pub fn score(&self) -> u8 {
        self.analysis.as_ref().map_or(0, Analysis::score)
    }

    pub fn is_urgent(&self) -> bool {
        self.analysis.as_ref().is_some_and(Analysis::is_urgent)
    }
}

/// Split a raw `From` header into (display name, address).
///
/// `"Jane Doe" <jane@example.com>` yields `("Jane Doe", "jane@example.com")`;
/// anything without angle brackets is used for both.
pub fn split_sender(raw: &str) -> (String, String) {
    let raw = raw.trim();
    if raw.is_empty() {
        return ("Unknown".to_string(), "Unknown".to_string());
    }
    if let Some(open) = raw.rfind('<')
        && raw.ends_with('>')
        && open > 0
    {
        let name = raw[..open].trim().replace('"', "");
        let addr = raw[open + 1..raw.len() - 1].trim().to_string();
        if !name.is_empty() && !addr.is_empty() {
            return (name, addr);
        }
    }
    (raw.to_string(), raw.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct MessageBody {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl MessageBody {
    /// Get displayable text content
    /// Returns plain text if available, otherwise renders the HTML part
    pub fn display_text(&self) -> String {
        if let Some(ref text) = self.text {
            text.clone()
        } else if let Some(ref html) = self.html {
            html_to_text(html)
        } else {
            "[No content]".to_string()
        }
    }
}

fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 80).unwrap_or_else(|e| {
        tracing::debug!("HTML render failed, showing raw markup: {}", e);
        html.to_string()
    })
}

/// Time window used when listing unread mail
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "60d")]
    TwoMonths,
    #[serde(rename = "90d")]
    Quarter,
}

/// Day-boundary filter: `start` inclusive, `end` exclusive (open when `None`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && self.end.is_none_or(|end| day < end)
    }
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Today,
        Scope::Yesterday,
        Scope::Week,
        Scope::Month,
        Scope::TwoMonths,
        Scope::Quarter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scope::Today => "today",
            Scope::Yesterday => "yesterday",
            Scope::Week => "7d",
            Scope::Month => "30d",
            Scope::TwoMonths => "60d",
            Scope::Quarter => "90d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scope| scope.label() == s)
    }

    /// The scope after this one, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Window of calendar days covered by this scope relative to `today`
    pub fn window(self, today: NaiveDate) -> DateWindow {
        let days_back = |n: i64| today - Duration::days(n);
        match self {
            Scope::Today => DateWindow {
                start: today,
                end: None,
            },
            Scope::Yesterday => DateWindow {
                start: days_back(1),
                end: Some(today),
            },
            Scope::Week => DateWindow {
                start: days_back(7),
                end: None,
            },
            Scope::Month => DateWindow {
                start: days_back(30),
                end: None,
            },
            Scope::TwoMonths => DateWindow {
                start: days_back(60),
                end: None,
            },
            Scope::Quarter => DateWindow {
                start: days_back(90),
                end: None,
            },
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
