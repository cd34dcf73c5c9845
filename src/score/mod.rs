//! Urgency scoring
//!
//! A [`Scorer`] annotates messages with an [`Analysis`]. Scoring is
//! best-effort: [`analyze_batch`] swallows every failure and substitutes
//! [`Analysis::fallback`], so the list never shows a half-scored message.

mod keyword;

use std::future::Future;

use futures::future::join_all;

use crate::mail::types::{Analysis, Message};

pub use keyword::KeywordScorer;

pub trait Scorer {
    fn analyze(&self, message: &Message) -> impl Future<Output = anyhow::Result<Analysis>>;
}

/// Score every message concurrently, degrading failures to the default analysis
pub async fn analyze_batch<S: Scorer>(scorer: &S, messages: Vec<Message>) -> Vec<Message> {
    let analyses = join_all(messages.iter().map(|m| scorer.analyze(m))).await;

    messages
        .into_iter()
        .zip(analyses)
        .map(|(mut message, result)| {
            let analysis = match result {
                Ok(analysis) => analysis,
                Err(e) => {
                    tracing::warn!("Failed to analyze message {}: {:#}", message.id, e);
                    Analysis::fallback(&message.snippet)
                }
            };
            message.analysis = Some(analysis);
            message
        })
        .collect()
}

/// Order by urgency score, highest first. Stable, so ties keep fetch order.
pub fn rank(messages: &mut [Message]) {
    messages.sort_by(|a, b| b.score().cmp(&a.score()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::types::{Category, MessageId};
    use crate::testing::message;

    /// Scores by subject: a number parses as the score, anything else fails
    struct SubjectScorer;

    impl Scorer for SubjectScorer {
        async fn analyze(&self, message: &Message) -> anyhow::Result<Analysis> {
            let score: u8 = message.subject.parse()?;
            Ok(Analysis::new(
                score,
                "Reply",
                "summary",
                None,
                Category::Normal,
            )?)
        }
    }

    #[tokio::test]
    async fn test_failures_get_default_analysis() {
        let mut bad = message("bad", 0);
        bad.subject = "not a number".to_string();
        let mut out_of_range = message("range", 0);
        out_of_range.subject = "9".to_string();
        let mut good = message("good", 0);
        good.subject = "5".to_string();

        let scored = analyze_batch(&SubjectScorer, vec![bad, out_of_range, good]).await;

        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|m| m.analysis.is_some()));
        assert_eq!(scored[0].score(), 2);
        assert_eq!(
            scored[0].analysis.as_ref().unwrap().action_item(),
            "Review email"
        );
        assert_eq!(scored[1].score(), 2);
        assert_eq!(scored[2].score(), 5);
        assert!(scored[2].is_urgent());
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut list = vec![
            message("a", 2),
            message("b", 5),
            message("c", 2),
            message("d", 4),
            message("e", 5),
        ];
        rank(&mut list);
        let ids: Vec<_> = list.iter().map(|m| m.id.clone()).collect();
        assert_eq!(
            ids,
            ["b", "e", "d", "a", "c"].map(MessageId::from).to_vec()
        );
    }
}
